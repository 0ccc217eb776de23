// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shapes a verdict into the externally visible detection result

use serde::{Deserialize, Serialize};

use super::expert::ExpertProfile;
use super::reducer::Verdict;

/// Result returned by the per-expert detection endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    /// Whether the expert found anything
    pub detected: bool,
    /// Best confidence score (0.0 when nothing was found)
    pub confidence: f32,
    /// "<class> (<marker>)" when detected, the expert's absence phrase otherwise
    pub label: String,
}

impl DetectionResponse {
    pub fn from_verdict(verdict: &Verdict, profile: &ExpertProfile) -> Self {
        let label = match (verdict.detected, verdict.label.as_deref()) {
            (true, Some(class)) => format!("{} ({})", class, profile.marker),
            _ => profile.absent_label.clone(),
        };

        Self {
            detected: verdict.detected,
            confidence: if verdict.detected {
                verdict.confidence
            } else {
                0.0
            },
            label,
        }
    }
}
