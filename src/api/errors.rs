// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::detection::DetectError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ServiceUnavailable(String),
    DecodeError(String),
    InferenceError(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message) = match self {
            ApiError::InvalidRequest(msg) => ("bad_request", msg),
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg),
            ApiError::DecodeError(msg) => ("decode_error", msg),
            ApiError::InferenceError(msg) => ("inference_error", msg),
            ApiError::InternalError(msg) => ("internal_error", msg),
        };

        ErrorResponse {
            error: message.clone(),
            error_type: error_type.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::DecodeError(_) | ApiError::InferenceError(_) | ApiError::InternalError(_) => {
                500
            }
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            ApiError::InferenceError(msg) => write!(f, "Inference error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DetectError> for ApiError {
    fn from(err: DetectError) -> Self {
        let message = err.to_string();
        match err {
            DetectError::ServiceUnavailable { .. } => ApiError::ServiceUnavailable(message),
            DetectError::BadRequest(_) => ApiError::InvalidRequest(message),
            DetectError::Decode(_) => ApiError::DecodeError(message),
            DetectError::Inference(_) => ApiError::InferenceError(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
