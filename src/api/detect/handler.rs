// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint handlers

use axum::{
    extract::{Request, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error};

use super::upload::read_file_field;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::detection::{DetectError, DetectionResponse, ExpertId, TriageReport};

/// POST /api/detect/potholes - Run the pothole expert (Model 1)
///
/// # Request
/// `multipart/form-data` with a single image field named `file`.
///
/// # Response
/// - `detected`: whether any candidate scored above zero
/// - `confidence`: highest candidate confidence (0.0 when none)
/// - `label`: `"<class> (Model 1)"` or `"No Potholes"`
///
/// # Errors
/// - 503 Service Unavailable: Model 1 not loaded
/// - 400 Bad Request: no `file` field
/// - 500 Internal Server Error: undecodable image or inference failure
pub async fn detect_potholes_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<DetectionResponse>, ApiError> {
    detect_with(state, ExpertId::Pothole, request).await
}

/// POST /api/detect/general-damage - Run the general damage expert (Model 2)
///
/// Same contract as the pothole route; the absence label is `"No Damage"`
/// and detected labels carry the `(Model 2)` marker.
pub async fn detect_general_damage_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<DetectionResponse>, ApiError> {
    detect_with(state, ExpertId::GeneralDamage, request).await
}

/// POST /api/detect - Prioritized triage across both experts
///
/// The pothole expert runs first; the general damage expert only runs when
/// no pothole is found.
pub async fn triage_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<TriageReport>, ApiError> {
    // Readiness wins over payload problems
    state.experts.pipeline(ExpertId::Pothole).ensure_loaded()?;

    let payload = read_file_field(request).await?;

    let experts = Arc::clone(&state.experts);
    let report = run_blocking(move || experts.triage(payload.as_deref())).await?;

    debug!(
        "Triage complete: severity={:?}, status={:?}",
        report.severity, report.status
    );
    Ok(Json(report))
}

async fn detect_with(
    state: AppState,
    expert: ExpertId,
    request: Request,
) -> Result<Json<DetectionResponse>, ApiError> {
    state.experts.pipeline(expert).ensure_loaded()?;

    let payload = read_file_field(request).await?;

    let experts = Arc::clone(&state.experts);
    let response = run_blocking(move || experts.detect(expert, payload.as_deref())).await?;

    Ok(Json(response))
}

/// Decode and inference are CPU bound; keep them off the async workers
async fn run_blocking<T, F>(job: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, DetectError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(job).await.map_err(|e| {
        error!("Detection task panicked: {}", e);
        ApiError::InternalError(format!("Detection task failed: {}", e))
    })?;

    result.map_err(ApiError::from)
}
