// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Export all submodules and their public types
pub mod client;

// Re-export main types for convenience
pub use client::{InferenceClient, InferenceError, InferenceService};
