// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PII verdict classification over analysis completions

/// Negative-finding phrases: any one of these clears the PII flag
const NO_PII_PHRASES: &[&str] = &[
    "No PII Detected",
    "No Personal Identifiable Information Found",
    "No Sensitive Information Detected",
];

/// Strategy for deriving the boolean PII verdict from an analysis completion.
///
/// Implementations only decide the flag; the analysis text itself is passed
/// through to the client unmodified.
pub trait PiiClassifier: Send + Sync {
    /// Returns true when the analysis indicates PII is present.
    fn detect(&self, analysis: &str) -> bool;
}

/// Classifier that takes the model's negative findings literally.
///
/// The flag clears iff the analysis contains one of the `NO_PII_PHRASES`
/// markers, matched case-sensitively as plain substrings. Any other output,
/// including rephrased or empty completions, counts as detected.
pub struct NegativePhraseClassifier;

impl PiiClassifier for NegativePhraseClassifier {
    fn detect(&self, analysis: &str) -> bool {
        !NO_PII_PHRASES.iter().any(|phrase| analysis.contains(phrase))
    }
}
