// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Expert identities and their per-expert presentation settings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two experts produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpertId {
    /// Model 1: pothole specialist, runs first in the triage cascade
    Pothole,
    /// Model 2: cracks, ruts, debris and other surface damage
    GeneralDamage,
}

impl ExpertId {
    pub const ALL: [ExpertId; 2] = [ExpertId::Pothole, ExpertId::GeneralDamage];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertId::Pothole => "pothole",
            ExpertId::GeneralDamage => "general_damage",
        }
    }
}

impl fmt::Display for ExpertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an expert's verdicts are presented to callers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpertProfile {
    pub id: ExpertId,
    /// Suffix marker appended to detected labels, e.g. "Model 1"
    pub marker: String,
    /// Label returned when nothing was found
    pub absent_label: String,
}

impl ExpertProfile {
    pub fn pothole() -> Self {
        Self {
            id: ExpertId::Pothole,
            marker: "Model 1".to_string(),
            absent_label: "No Potholes".to_string(),
        }
    }

    pub fn general_damage() -> Self {
        Self {
            id: ExpertId::GeneralDamage,
            marker: "Model 2".to_string(),
            absent_label: "No Damage".to_string(),
        }
    }

    pub fn for_expert(id: ExpertId) -> Self {
        match id {
            ExpertId::Pothole => Self::pothole(),
            ExpertId::GeneralDamage => Self::general_damage(),
        }
    }

    pub fn with_absent_label(mut self, label: impl Into<String>) -> Self {
        self.absent_label = label.into();
        self
    }
}
