// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze API endpoint module
//!
//! Provides POST /analyze for describing an uploaded image and flagging PII.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::analyze_handler;
pub use request::{AnalyzeRequest, DEFAULT_PROMPT};
pub use response::AnalyzeResponse;
