// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prioritized triage: pothole expert first, general damage as fallback
//!
//! The image is decoded once. The general-damage expert only runs (and only
//! needs to be loaded) when the pothole expert finds nothing.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::DetectError;
use super::expert::ExpertId;
use super::registry::ExpertRegistry;
use super::response::DetectionResponse;
use crate::vision::{decode_image_bytes, Detector};

/// Wire values follow the complaint records of the reporting app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Damage confirmed by one of the experts
    #[serde(rename = "Auto-Verified")]
    AutoVerified,
    /// Nothing found; needs manual review
    #[serde(rename = "Waiting List")]
    WaitingList,
}

/// Outcome of the two-stage cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageReport {
    pub severity: Severity,
    pub status: ReportStatus,
    pub description: String,
    /// Pothole expert result
    pub primary: DetectionResponse,
    /// General-damage expert result, `None` when the cascade stopped early
    pub secondary: Option<DetectionResponse>,
}

impl<D: Detector + ?Sized> ExpertRegistry<D> {
    /// Run the cascade on an uploaded payload
    pub fn triage(&self, payload: Option<&[u8]>) -> Result<TriageReport, DetectError> {
        info!("Triage request received");

        let primary = self.pipeline(ExpertId::Pothole);
        primary.ensure_loaded()?;
        let bytes = payload.ok_or_else(DetectError::missing_file)?;

        let (image, image_info) = decode_image_bytes(bytes)?;
        debug!(
            "Decoded image: {}x{}, {} bytes",
            image_info.width, image_info.height, image_info.size_bytes
        );

        let primary_verdict = primary.detect_image(&image)?;
        let primary_response = primary.respond(&primary_verdict);

        if primary_verdict.detected {
            info!("Pothole detected, skipping secondary verification");
            return Ok(TriageReport {
                severity: Severity::High,
                status: ReportStatus::AutoVerified,
                description: "Heavy damage detected.".to_string(),
                primary: primary_response,
                secondary: None,
            });
        }

        info!("No pothole, running secondary verification");
        let secondary = self.pipeline(ExpertId::GeneralDamage);
        let secondary_verdict = secondary.detect_image(&image)?;
        let secondary_response = secondary.respond(&secondary_verdict);

        let (severity, status, description) = if secondary_verdict.detected {
            (
                Severity::Medium,
                ReportStatus::AutoVerified,
                "Road crack/uneven surface detected.",
            )
        } else {
            (
                Severity::Low,
                ReportStatus::WaitingList,
                "No clear damage detected. Pending manual review.",
            )
        };

        Ok(TriageReport {
            severity,
            status,
            description: description.to_string(),
            primary: primary_response,
            secondary: Some(secondary_response),
        })
    }
}
