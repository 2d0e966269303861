use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::analyze::analyze_handler;
use super::errors::ApiError;
use crate::inference::InferenceService;
use crate::pii::PiiClassifier;
use crate::vision::MAX_IMAGE_SIZE;

/// Shared state for request handlers. Both collaborators are constructed at
/// startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub inference: Arc<dyn InferenceService>,
    pub classifier: Arc<dyn PiiClassifier>,
}

/// Body of GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Image analysis endpoint
        .route("/analyze", post(analyze_handler))
        // Uploads up to MAX_IMAGE_SIZE plus multipart framing overhead
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port).parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

// Error response wrapper
pub struct ApiErrorResponse(pub ApiError);

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let error_response = self.0.to_response();

        (status, Json(error_response)).into_response()
    }
}
