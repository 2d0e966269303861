// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod inference;
pub mod pii;
pub mod version;
pub mod vision;

// Re-export main types from the analysis pipeline
pub use api::{create_router, start_server, AnalyzeResponse, ApiError, AppState, ErrorResponse};
pub use config::{NodeConfig, ProviderConfig};
pub use inference::{InferenceClient, InferenceError, InferenceService};
pub use pii::{NegativePhraseClassifier, PiiClassifier};
