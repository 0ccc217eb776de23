// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Road-damage detection endpoints
//!
//! - `POST /api/detect/potholes` - pothole expert (Model 1)
//! - `POST /api/detect/general-damage` - general damage expert (Model 2)
//! - `POST /api/detect` - prioritized triage across both experts

pub mod handler;
pub mod upload;

pub use handler::{detect_general_damage_handler, detect_potholes_handler, triage_handler};
pub use upload::{read_file_field, FILE_FIELD};
