// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Rashtra AI Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-dual-expert-2026-10-15";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2026-10-15";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "pothole-expert",
    "general-damage-expert",
    "prioritized-triage",
    "onnx-yolo",
    "multipart-upload",
    "health-readiness",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Rashtra AI Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
