// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLO expert models on ONNX Runtime
//!
//! Components:
//! - `preprocessing` - letterbox resize and NCHW tensor conversion
//! - `postprocessing` - output decoding, NMS, class-name parsing
//! - `model` - session loading and the [`Detector`](crate::vision::Detector) impl

pub mod model;
pub mod postprocessing;
pub mod preprocessing;

pub use model::{resolve_labels_path, YoloConfig, YoloDetector};
pub use postprocessing::PostprocessParams;
pub use preprocessing::{letterbox, LetterboxInfo};
