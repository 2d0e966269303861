// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for image normalization
//!
//! This module provides:
//! - Format detection and decoding for uploaded images
//! - RGB normalization and JPEG/base64 encoding for provider transport
//!
//! All processing runs in-memory; nothing touches disk.

pub mod image_utils;

pub use image_utils::{
    decode_image_bytes, detect_format, encode_jpeg_base64, ImageError, ImageInfo, MAX_IMAGE_SIZE,
};
