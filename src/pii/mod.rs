// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PII classification strategies

pub mod classifier;

pub use classifier::{NegativePhraseClassifier, PiiClassifier};
