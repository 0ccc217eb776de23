// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Reduces a detector's candidate set to a single best-confidence verdict

use serde::{Deserialize, Serialize};

use crate::vision::{ClassLabels, Detection};

/// Label used when a detector cannot name the winning class
pub const PLACEHOLDER_LABEL: &str = "object";

/// Outcome of one detector run on one image
///
/// `detected == false` always comes with `confidence == 0.0` and no label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub detected: bool,
    pub confidence: f32,
    pub label: Option<String>,
}

impl Verdict {
    pub fn not_detected() -> Self {
        Self {
            detected: false,
            confidence: 0.0,
            label: None,
        }
    }
}

/// Pick the highest-confidence detection
///
/// The running maximum starts at 0.0 and only moves on a strictly greater
/// confidence, so on ties the first detection in iteration order wins and a
/// set whose scores are all 0.0 counts as "not detected".
pub fn reduce<L>(detections: &[Detection], labels: Option<&L>) -> Verdict
where
    L: ClassLabels + ?Sized,
{
    let mut best: Option<&Detection> = None;
    let mut max_confidence = 0.0_f32;

    for detection in detections {
        if detection.confidence > max_confidence {
            max_confidence = detection.confidence;
            best = Some(detection);
        }
    }

    match best {
        Some(detection) => Verdict {
            detected: true,
            confidence: max_confidence,
            label: Some(
                labels
                    .and_then(|l| l.class_label(detection.class_id))
                    .unwrap_or_else(|| PLACEHOLDER_LABEL.to_string()),
            ),
        },
        None => Verdict::not_detected(),
    }
}
