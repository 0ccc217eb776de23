// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Both expert pipelines, addressed by [`ExpertId`]

use serde::{Deserialize, Serialize};

use super::error::DetectError;
use super::expert::ExpertId;
use super::pipeline::DetectionPipeline;
use super::response::DetectionResponse;
use crate::vision::Detector;

/// Readiness of one expert, as reported by the health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertStatus {
    pub expert: ExpertId,
    pub marker: String,
    pub model: Option<String>,
    pub loaded: bool,
    pub classes: usize,
}

pub struct ExpertRegistry<D: Detector + ?Sized = dyn Detector> {
    pothole: DetectionPipeline<D>,
    general_damage: DetectionPipeline<D>,
}

impl<D: Detector + ?Sized> ExpertRegistry<D> {
    pub fn new(pothole: DetectionPipeline<D>, general_damage: DetectionPipeline<D>) -> Self {
        Self {
            pothole,
            general_damage,
        }
    }

    pub fn pipeline(&self, expert: ExpertId) -> &DetectionPipeline<D> {
        match expert {
            ExpertId::Pothole => &self.pothole,
            ExpertId::GeneralDamage => &self.general_damage,
        }
    }

    /// Run one expert on an uploaded payload and shape its response
    pub fn detect(
        &self,
        expert: ExpertId,
        payload: Option<&[u8]>,
    ) -> Result<DetectionResponse, DetectError> {
        let pipeline = self.pipeline(expert);
        let verdict = pipeline.detect(payload)?;
        Ok(pipeline.respond(&verdict))
    }

    pub fn status(&self) -> Vec<ExpertStatus> {
        ExpertId::ALL
            .iter()
            .map(|&expert| {
                let pipeline = self.pipeline(expert);
                let model = pipeline.model();
                ExpertStatus {
                    expert,
                    marker: pipeline.profile().marker.clone(),
                    model: model.map(|m| m.model_name().to_string()),
                    loaded: model.is_some(),
                    classes: model.map(|m| m.class_count()).unwrap_or(0),
                }
            })
            .collect()
    }

    pub fn loaded_count(&self) -> usize {
        ExpertId::ALL
            .iter()
            .filter(|&&expert| self.pipeline(expert).is_loaded())
            .count()
    }
}
