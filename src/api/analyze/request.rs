// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze request extraction and validation

use axum_extra::extract::Multipart;
use bytes::Bytes;

use crate::api::errors::ApiError;

/// Prompt sent to the vision model when the form carries none
pub const DEFAULT_PROMPT: &str = "Describe this image";

/// Fields extracted from the multipart analyze form
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// Raw uploaded image bytes
    pub image: Bytes,
    /// Description prompt forwarded to the vision model
    pub prompt: String,
}

impl AnalyzeRequest {
    /// Pull the `image` file and optional `prompt` text out of a multipart form
    ///
    /// Unknown form fields are ignored. A missing `image` field is a
    /// validation error; a missing `prompt` falls back to `DEFAULT_PROMPT`.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut image: Option<Bytes> = None;
        let mut prompt: Option<String> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(format!("Malformed multipart form: {}", e)))?
        {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("image") => {
                    let data = field.bytes().await.map_err(|e| {
                        ApiError::InvalidRequest(format!("Failed to read image field: {}", e))
                    })?;
                    image = Some(data);
                }
                Some("prompt") => {
                    let text = field.text().await.map_err(|e| {
                        ApiError::InvalidRequest(format!("Failed to read prompt field: {}", e))
                    })?;
                    prompt = Some(text);
                }
                _ => {}
            }
        }

        Self::from_parts(image, prompt)
    }

    /// Assemble the request once the form fields are collected
    fn from_parts(image: Option<Bytes>, prompt: Option<String>) -> Result<Self, ApiError> {
        let image = image.ok_or_else(|| ApiError::ValidationError {
            field: "image".to_string(),
            message: "No image file provided".to_string(),
        })?;

        // A present-but-empty prompt field is used as-is; only an absent
        // field falls back to the default
        let prompt = prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string());

        Ok(Self { image, prompt })
    }
}
