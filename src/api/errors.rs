// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::inference::InferenceError;
use crate::vision::ImageError;

/// JSON body for every non-2xx response. Clients key off `error`;
/// `error_type` carries the failure kind slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
}

/// API failure kinds, each with its own HTTP status
#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    InvalidImage(String),
    UpstreamUnavailable(String),
    UpstreamError(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone()),
            ApiError::ValidationError { message, .. } => ("validation_error", message.clone()),
            ApiError::InvalidImage(msg) => ("invalid_image", msg.clone()),
            ApiError::UpstreamUnavailable(msg) => ("upstream_unavailable", msg.clone()),
            ApiError::UpstreamError(msg) => ("upstream_error", msg.clone()),
            ApiError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        ErrorResponse {
            error: message,
            error_type: error_type.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::ValidationError { .. }
            | ApiError::InvalidImage(_) => 400,
            ApiError::UpstreamUnavailable(_) => 503,
            ApiError::UpstreamError(_) => 502,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::InvalidImage(msg) => write!(f, "Invalid image: {}", msg),
            ApiError::UpstreamUnavailable(msg) => {
                write!(f, "Inference provider unavailable: {}", msg)
            }
            ApiError::UpstreamError(msg) => write!(f, "Inference provider error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        match err {
            // Encode failures happen after a successful decode, so the
            // upload itself was fine
            ImageError::EncodeFailed(msg) => ApiError::InternalError(msg),
            other => ApiError::InvalidImage(other.to_string()),
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Unreachable(_) => ApiError::UpstreamUnavailable(err.to_string()),
            InferenceError::Provider { .. } | InferenceError::MalformedCompletion(_) => {
                ApiError::UpstreamError(err.to_string())
            }
        }
    }
}
