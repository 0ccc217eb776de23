// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{future::Future, net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::detect::{detect_general_damage_handler, detect_potholes_handler, triage_handler};
use super::handlers::health_handler;
use crate::detection::ExpertRegistry;

/// Default request body cap for uploads (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Immutable per-process state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub experts: Arc<ExpertRegistry>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(experts: ExpertRegistry, max_upload_bytes: usize) -> Self {
        Self {
            experts: Arc::new(experts),
            max_upload_bytes,
        }
    }
}

/// Build the router with all routes and layers
pub fn create_app(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Single-expert endpoints
        .route("/api/detect/potholes", post(detect_potholes_handler))
        .route(
            "/api/detect/general-damage",
            post(detect_general_damage_handler),
        )
        // Two-stage triage
        .route("/api/detect", post(triage_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves
pub async fn start_server<F>(addr: SocketAddr, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
