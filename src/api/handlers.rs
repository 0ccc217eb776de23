// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;
use crate::detection::{ExpertRegistry, ExpertStatus};
use crate::vision::Detector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Both experts loaded
    Healthy,
    /// Exactly one expert loaded
    Degraded,
    /// No expert loaded
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub experts: Vec<ExpertStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

impl HealthResponse {
    pub fn from_registry<D: Detector + ?Sized>(registry: &ExpertRegistry<D>) -> Self {
        let experts = registry.status();

        let status = match experts.iter().filter(|e| e.loaded).count() {
            n if n == experts.len() => HealthStatus::Healthy,
            0 => HealthStatus::Unhealthy,
            _ => HealthStatus::Degraded,
        };

        let issues: Vec<String> = experts
            .iter()
            .filter(|e| !e.loaded)
            .map(|e| format!("{} not loaded", e.marker))
            .collect();

        Self {
            status,
            version: crate::version::VERSION_NUMBER.to_string(),
            experts,
            issues: (!issues.is_empty()).then_some(issues),
        }
    }
}

/// GET /health - Expert readiness
///
/// Always answers 200; the `status` field tells whether the node can serve
/// both experts, one, or none.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_registry(state.experts.as_ref()))
}
