// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::request::AnalyzeRequest;
use super::response::AnalyzeResponse;
use crate::api::http_server::{ApiErrorResponse, AppState};
use crate::vision::{decode_image_bytes, encode_jpeg_base64};

/// POST /analyze - Describe an uploaded image and flag PII
///
/// Accepts a multipart form upload and runs the two-stage analysis pipeline:
/// a vision model describes the image, then a text model checks the
/// description for personally identifiable information.
///
/// # Request (multipart form)
/// - `image`: Image file (required; PNG, JPEG, WebP, GIF, BMP or TIFF)
/// - `prompt`: Description prompt (optional, defaults to "Describe this image")
///
/// # Response
/// - `image_description`: Generated description of the image
/// - `privacy_analysis`: PII analysis of that description
/// - `pii_detected`: Whether the analysis flagged PII
///
/// # Errors
/// - 400 Bad Request: Missing image field, or undecodable/oversized image
/// - 502 Bad Gateway: Inference provider rejected a request
/// - 503 Service Unavailable: Inference provider unreachable
pub async fn analyze_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiErrorResponse> {
    let started = Instant::now();

    // 1. Extract form fields
    let request = AnalyzeRequest::from_multipart(multipart).await.map_err(|e| {
        warn!("Analyze request rejected: {}", e);
        ApiErrorResponse(e)
    })?;

    debug!(
        "Analyze request received: {} image bytes, prompt_len={}",
        request.image.len(),
        request.prompt.len()
    );

    // 2. Decode the upload
    let (image, image_info) = decode_image_bytes(&request.image).map_err(|e| {
        warn!("Failed to decode image: {}", e);
        ApiErrorResponse(e.into())
    })?;

    debug!(
        "Decoded image: {}x{}, {:?}, {} bytes",
        image_info.width, image_info.height, image_info.format, image_info.size_bytes
    );

    // 3. Normalize to base64 JPEG for provider transport
    let base64_image = encode_jpeg_base64(&image).map_err(|e| {
        warn!("Failed to re-encode image: {}", e);
        ApiErrorResponse(e.into())
    })?;

    // 4. Describe the image
    let description = state
        .inference
        .describe_image(&base64_image, &request.prompt)
        .await
        .map_err(|e| {
            warn!("Description stage failed: {}", e);
            ApiErrorResponse(e.into())
        })?;

    // 5. Analyze the description for PII
    let analysis = state
        .inference
        .analyze_description(&description)
        .await
        .map_err(|e| {
            warn!("Analysis stage failed: {}", e);
            ApiErrorResponse(e.into())
        })?;

    // 6. Classify the verdict over the raw analysis text
    let pii_detected = state.classifier.detect(&analysis);

    info!(
        "Analyze complete: pii_detected={}, {}ms",
        pii_detected,
        started.elapsed().as_millis()
    );

    Ok(Json(AnalyzeResponse::new(
        &description,
        &analysis,
        pii_detected,
    )))
}
