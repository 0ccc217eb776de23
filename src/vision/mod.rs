// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing for road-damage detection
//!
//! This module provides:
//! - Passthrough image decoding for uploads
//! - The detector capability both experts implement
//! - YOLO expert models on ONNX Runtime (CPU only)
//! - Startup loading of the two expert models

pub mod detection;
pub mod image_utils;
pub mod model_manager;
pub mod yolo;

pub use detection::{BoundingBox, ClassLabels, Detection, Detector};
pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use model_manager::{ExpertModelConfig, ExpertModelManager};
