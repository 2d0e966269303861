// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze response types

use serde::{Deserialize, Serialize};

/// Response from image PII analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Natural-language description of the uploaded image
    pub image_description: String,
    /// Analysis of the description for personally identifiable information
    pub privacy_analysis: String,
    /// Whether the analysis flagged PII
    pub pii_detected: bool,
}

impl AnalyzeResponse {
    /// Create a new analyze response
    ///
    /// Both texts are whitespace-trimmed here; the verdict is computed by the
    /// caller over the untrimmed analysis.
    pub fn new(image_description: &str, privacy_analysis: &str, pii_detected: bool) -> Self {
        Self {
            image_description: image_description.trim().to_string(),
            privacy_analysis: privacy_analysis.trim().to_string(),
            pii_detected,
        }
    }
}
