// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use super::expert::ExpertId;
use crate::vision::ImageError;

/// Failures of a detection request
#[derive(Debug, Error)]
pub enum DetectError {
    /// The expert's model did not load at startup
    #[error("{marker} not loaded")]
    ServiceUnavailable { expert: ExpertId, marker: String },

    /// The caller sent something unusable
    #[error("{0}")]
    BadRequest(String),

    /// The uploaded bytes are not a decodable image
    #[error(transparent)]
    Decode(#[from] ImageError),

    /// The detector raised an error while running
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl DetectError {
    pub fn missing_file() -> Self {
        DetectError::BadRequest("No file uploaded".to_string())
    }

    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            DetectError::ServiceUnavailable { .. } => "service_unavailable",
            DetectError::BadRequest(_) => "bad_request",
            DetectError::Decode(_) => "decode_error",
            DetectError::Inference(_) => "inference_error",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            DetectError::ServiceUnavailable { .. } => 503,
            DetectError::BadRequest(_) => 400,
            DetectError::Decode(_) | DetectError::Inference(_) => 500,
        }
    }
}
