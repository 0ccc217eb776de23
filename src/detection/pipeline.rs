// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-expert detection pipeline
//!
//! decode → infer → reduce, with the readiness and payload checks done first.
//! Both experts use this same type; they differ only in the model handle and
//! the [`ExpertProfile`] they are built with.

use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::error::DetectError;
use super::expert::ExpertProfile;
use super::reducer::{reduce, Verdict};
use super::response::DetectionResponse;
use crate::vision::image_utils::format_to_extension;
use crate::vision::{decode_image_bytes, Detector};

/// A loaded detector, or `None` when the model failed to load at startup
pub type ModelHandle<D = dyn Detector> = Option<Arc<D>>;

pub struct DetectionPipeline<D: Detector + ?Sized = dyn Detector> {
    profile: ExpertProfile,
    model: ModelHandle<D>,
}

impl<D: Detector + ?Sized> Clone for DetectionPipeline<D> {
    fn clone(&self) -> Self {
        Self {
            profile: self.profile.clone(),
            model: self.model.clone(),
        }
    }
}

impl<D: Detector + ?Sized> std::fmt::Debug for DetectionPipeline<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionPipeline")
            .field("profile", &self.profile)
            .field("loaded", &self.model.is_some())
            .finish()
    }
}

impl<D: Detector + ?Sized> DetectionPipeline<D> {
    pub fn new(profile: ExpertProfile, model: ModelHandle<D>) -> Self {
        Self { profile, model }
    }

    pub fn profile(&self) -> &ExpertProfile {
        &self.profile
    }

    pub fn model(&self) -> Option<&Arc<D>> {
        self.model.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Fail fast when the model is not loaded
    pub fn ensure_loaded(&self) -> Result<&D, DetectError> {
        self.model.as_deref().ok_or_else(|| {
            warn!("{} requested but not loaded", self.profile.marker);
            DetectError::ServiceUnavailable {
                expert: self.profile.id,
                marker: self.profile.marker.clone(),
            }
        })
    }

    /// Run the full pipeline on an uploaded payload
    ///
    /// Checks, in order: model loaded, payload present. Only then is the
    /// payload decoded and passed to the detector.
    pub fn detect(&self, payload: Option<&[u8]>) -> Result<Verdict, DetectError> {
        info!(
            "Request received for {} ({})",
            self.profile.marker, self.profile.id
        );

        let model = self.ensure_loaded()?;
        let bytes = payload.ok_or_else(DetectError::missing_file)?;

        let (image, image_info) = decode_image_bytes(bytes).map_err(|e| {
            warn!("Failed to decode image for {}: {}", self.profile.marker, e);
            e
        })?;

        debug!(
            "Decoded {} image: {}x{}, {} bytes",
            format_to_extension(image_info.format),
            image_info.width,
            image_info.height,
            image_info.size_bytes
        );

        self.run(model, &image)
    }

    /// Run on an already decoded image (used by the triage cascade)
    pub fn detect_image(&self, image: &DynamicImage) -> Result<Verdict, DetectError> {
        let model = self.ensure_loaded()?;
        self.run(model, image)
    }

    pub fn respond(&self, verdict: &Verdict) -> DetectionResponse {
        DetectionResponse::from_verdict(verdict, &self.profile)
    }

    fn run(&self, model: &D, image: &DynamicImage) -> Result<Verdict, DetectError> {
        let start = Instant::now();

        let detections = model.infer(image).map_err(|e| {
            warn!("{} inference failed: {:#}", self.profile.marker, e);
            DetectError::Inference(format!("{:#}", e))
        })?;

        debug!(
            "{} returned {} candidate(s) in {}ms",
            model.model_name(),
            detections.len(),
            start.elapsed().as_millis()
        );

        let verdict = reduce(&detections, Some(model));

        info!(
            "{} result: detected={}, confidence={:.2}",
            self.profile.marker, verdict.detected, verdict.confidence
        );

        Ok(verdict)
    }
}
