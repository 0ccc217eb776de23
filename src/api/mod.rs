// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod detect;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use detect::{detect_general_damage_handler, detect_potholes_handler, triage_handler};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse, HealthStatus};
pub use http_server::{create_app, start_server, AppState, DEFAULT_MAX_UPLOAD_BYTES};
