// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Integration tests for the POST /analyze endpoint.
//!
//! The hosted inference provider is replaced with a scripted double so the
//! full multipart -> decode -> describe -> analyze -> classify pipeline runs
//! without network access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tower::ServiceExt;

use privalert_node::api::{create_router, AppState};
use privalert_node::inference::{InferenceError, InferenceService};
use privalert_node::pii::NegativePhraseClassifier;
use privalert_node::vision::MAX_IMAGE_SIZE;

/// 1x1 transparent PNG used as the upload fixture
const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

const BOUNDARY: &str = "privalert-test-boundary";

/// Inference double that returns canned completions and records its inputs
struct ScriptedInference {
    description: Result<String, InferenceError>,
    analysis: Result<String, InferenceError>,
    seen_prompts: Mutex<Vec<String>>,
    seen_descriptions: Mutex<Vec<String>>,
}

impl ScriptedInference {
    fn new(
        description: Result<String, InferenceError>,
        analysis: Result<String, InferenceError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            description,
            analysis,
            seen_prompts: Mutex::new(Vec::new()),
            seen_descriptions: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl InferenceService for ScriptedInference {
    async fn describe_image(
        &self,
        _base64_image: &str,
        prompt: &str,
    ) -> Result<String, InferenceError> {
        self.seen_prompts.lock().unwrap().push(prompt.to_string());
        self.description.clone()
    }

    async fn analyze_description(&self, description: &str) -> Result<String, InferenceError> {
        self.seen_descriptions
            .lock()
            .unwrap()
            .push(description.to_string());
        self.analysis.clone()
    }
}

fn create_test_app(inference: Arc<ScriptedInference>) -> Router {
    create_router(AppState {
        inference,
        classifier: Arc::new(NegativePhraseClassifier),
    })
}

fn png_bytes() -> Vec<u8> {
    STANDARD
        .decode(TINY_PNG_BASE64)
        .expect("Failed to decode test PNG")
}

/// Build a multipart form body with an optional image file and optional prompt
fn multipart_body(image: Option<&[u8]>, prompt: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(bytes) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"upload.png\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(text) = prompt {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"prompt\"\r\n\r\n{}\r\n",
                BOUNDARY, text
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn post_analyze(app: Router, body: Vec<u8>) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}

#[cfg(test)]
mod analyze_endpoint_tests {
    use super::*;

    /// Test 1: Successful analysis returns all three response fields
    #[tokio::test]
    async fn test_analyze_returns_description_analysis_and_flag() {
        let mock = ScriptedInference::new(
            Ok("A scanned letter with a visible address block.".to_string()),
            Ok("The text contains a postal address, which is PII.".to_string()),
        );
        let app = create_test_app(mock);

        let response = post_analyze(app, multipart_body(Some(&png_bytes()), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(
            body["image_description"],
            "A scanned letter with a visible address block."
        );
        assert_eq!(
            body["privacy_analysis"],
            "The text contains a postal address, which is PII."
        );
        assert_eq!(body["pii_detected"], true);
        assert_eq!(body.as_object().unwrap().len(), 3);
    }

    /// Test 2: An analysis containing "No PII Detected" clears the flag
    #[tokio::test]
    async fn test_analyze_no_pii_phrase_clears_flag() {
        let mock = ScriptedInference::new(
            Ok("A landscape photo of mountains at dusk.".to_string()),
            Ok("The description is generic scenery. No PII Detected".to_string()),
        );
        let app = create_test_app(mock);

        let response = post_analyze(app, multipart_body(Some(&png_bytes()), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["pii_detected"], false);
    }

    /// Test 3: Missing image field returns 400 with the exact error message
    #[tokio::test]
    async fn test_analyze_missing_image_returns_400() {
        let mock = ScriptedInference::new(
            Ok("unused".to_string()),
            Ok("unused".to_string()),
        );
        let app = create_test_app(mock.clone());

        let response = post_analyze(app, multipart_body(None, Some("Describe this image"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error"], "No image file provided");
        assert_eq!(body["error_type"], "validation_error");
        assert!(mock.seen_prompts.lock().unwrap().is_empty());
    }

    /// Test 4: Undecodable image bytes return 400
    #[tokio::test]
    async fn test_analyze_undecodable_image_returns_400() {
        let mock = ScriptedInference::new(
            Ok("unused".to_string()),
            Ok("unused".to_string()),
        );
        let app = create_test_app(mock);

        let response =
            post_analyze(app, multipart_body(Some(b"this is not an image"), None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error_type"], "invalid_image");
        assert_eq!(body["error"], "Unsupported image format");
    }

    /// Test 5: Empty image file returns 400
    #[tokio::test]
    async fn test_analyze_empty_image_returns_400() {
        let mock = ScriptedInference::new(
            Ok("unused".to_string()),
            Ok("unused".to_string()),
        );
        let app = create_test_app(mock);

        let response = post_analyze(app, multipart_body(Some(&[]), None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error_type"], "invalid_image");
        assert_eq!(body["error"], "Image data is empty");
    }

    /// Test 6: Oversized image returns 400 before any decode attempt
    #[tokio::test]
    async fn test_analyze_oversized_image_returns_400() {
        let mock = ScriptedInference::new(
            Ok("unused".to_string()),
            Ok("unused".to_string()),
        );
        let app = create_test_app(mock);

        let oversized = vec![0u8; MAX_IMAGE_SIZE + 1];
        let response = post_analyze(app, multipart_body(Some(&oversized), None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["error_type"], "invalid_image");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Image data is too large"));
    }

    /// Test 7: Provider connection failure maps to 503
    #[tokio::test]
    async fn test_analyze_provider_unreachable_returns_503() {
        let mock = ScriptedInference::new(
            Err(InferenceError::Unreachable(
                "connection refused".to_string(),
            )),
            Ok("unused".to_string()),
        );
        let app = create_test_app(mock);

        let response = post_analyze(app, multipart_body(Some(&png_bytes()), None)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = response_json(response).await;
        assert_eq!(body["error_type"], "upstream_unavailable");
    }

    /// Test 8: Provider HTTP error maps to 502
    #[tokio::test]
    async fn test_analyze_provider_error_returns_502() {
        let mock = ScriptedInference::new(
            Err(InferenceError::Provider {
                status: 429,
                body: "rate limited".to_string(),
            }),
            Ok("unused".to_string()),
        );
        let app = create_test_app(mock);

        let response = post_analyze(app, multipart_body(Some(&png_bytes()), None)).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = response_json(response).await;
        assert_eq!(body["error_type"], "upstream_error");
        assert!(body["error"].as_str().unwrap().contains("429"));
    }

    /// Test 9: A failure in the analysis stage maps to 502 after the
    /// description stage already ran
    #[tokio::test]
    async fn test_analyze_second_stage_failure_returns_502() {
        let mock = ScriptedInference::new(
            Ok("A photo of an empty street.".to_string()),
            Err(InferenceError::MalformedCompletion(
                "response contained no choices".to_string(),
            )),
        );
        let app = create_test_app(mock.clone());

        let response = post_analyze(app, multipart_body(Some(&png_bytes()), None)).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = response_json(response).await;
        assert_eq!(body["error_type"], "upstream_error");
        assert_eq!(mock.seen_prompts.lock().unwrap().len(), 1);
    }

    /// Test 10: The default prompt is used when the form omits it
    #[tokio::test]
    async fn test_analyze_uses_default_prompt_when_absent() {
        let mock = ScriptedInference::new(
            Ok("A photo.".to_string()),
            Ok("No PII Detected".to_string()),
        );
        let app = create_test_app(mock.clone());

        let response = post_analyze(app, multipart_body(Some(&png_bytes()), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let prompts = mock.seen_prompts.lock().unwrap();
        assert_eq!(*prompts, ["Describe this image"]);
    }

    /// Test 11: A provided prompt is passed through verbatim
    #[tokio::test]
    async fn test_analyze_passes_custom_prompt_through() {
        let mock = ScriptedInference::new(
            Ok("A form with handwritten entries.".to_string()),
            Ok("No PII Detected".to_string()),
        );
        let app = create_test_app(mock.clone());

        let response = post_analyze(
            app,
            multipart_body(Some(&png_bytes()), Some("List any text in this image")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let prompts = mock.seen_prompts.lock().unwrap();
        assert_eq!(*prompts, ["List any text in this image"]);
    }

    /// Test 12: Response texts are trimmed of surrounding whitespace
    #[tokio::test]
    async fn test_analyze_trims_response_texts() {
        let mock = ScriptedInference::new(
            Ok("  A photo of a receipt.  ".to_string()),
            Ok("\n  No PII Detected \n".to_string()),
        );
        let app = create_test_app(mock);

        let response = post_analyze(app, multipart_body(Some(&png_bytes()), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["image_description"], "A photo of a receipt.");
        assert_eq!(body["privacy_analysis"], "No PII Detected");
        assert_eq!(body["pii_detected"], false);
    }

    /// Test 13: The vision description is forwarded to the analysis stage
    #[tokio::test]
    async fn test_analyze_forwards_description_to_analysis() {
        let mock = ScriptedInference::new(
            Ok("A form with a phone number field filled in.".to_string()),
            Ok("The form contains a phone number.".to_string()),
        );
        let app = create_test_app(mock.clone());

        let response = post_analyze(app, multipart_body(Some(&png_bytes()), None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let descriptions = mock.seen_descriptions.lock().unwrap();
        assert_eq!(*descriptions, ["A form with a phone number field filled in."]);
    }

    /// Test 14: Unknown form fields are ignored
    #[tokio::test]
    async fn test_analyze_ignores_unknown_fields() {
        let mock = ScriptedInference::new(
            Ok("A photo.".to_string()),
            Ok("No PII Detected".to_string()),
        );
        let app = create_test_app(mock);

        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"metadata\"\r\n\r\nignored\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"upload.png\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(&png_bytes());
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        let response = post_analyze(app, body).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
