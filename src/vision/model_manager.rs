// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Startup loading of the two expert models

use std::path::PathBuf;
use std::sync::Arc;

use crate::detection::{DetectionPipeline, ExpertProfile, ExpertRegistry, ModelHandle};
use crate::vision::yolo::{resolve_labels_path, YoloConfig, YoloDetector};
use crate::vision::Detector;

/// Configuration for loading the expert models
#[derive(Debug, Clone)]
pub struct ExpertModelConfig {
    /// Path to the pothole expert ONNX file (optional)
    pub pothole_model_path: Option<PathBuf>,
    /// Path to the general damage expert ONNX file (optional)
    pub damage_model_path: Option<PathBuf>,
    /// Explicit labels file for the pothole expert
    pub pothole_labels_path: Option<PathBuf>,
    /// Explicit labels file for the general damage expert
    pub damage_labels_path: Option<PathBuf>,
    /// Runtime settings shared by both models
    pub yolo: YoloConfig,
}

impl Default for ExpertModelConfig {
    fn default() -> Self {
        Self {
            pothole_model_path: Some(PathBuf::from("./models/pothole_model.onnx")),
            damage_model_path: Some(PathBuf::from("./models/damage_model.onnx")),
            pothole_labels_path: None,
            damage_labels_path: None,
            yolo: YoloConfig::default(),
        }
    }
}

/// Loaded expert models
///
/// A model that fails to load is kept as an absent handle; requests to that
/// expert then fail with service unavailable.
pub struct ExpertModelManager {
    pothole: ModelHandle,
    general_damage: ModelHandle,
}

impl ExpertModelManager {
    /// Load both experts once. Never fails: load errors are logged and
    /// recorded as absence.
    pub fn load(config: &ExpertModelConfig) -> Self {
        let pothole = Self::load_one(
            "Model 1 (pothole expert)",
            config.pothole_model_path.as_ref(),
            config.pothole_labels_path.as_ref(),
            &config.yolo,
        );
        let general_damage = Self::load_one(
            "Model 2 (general damage expert)",
            config.damage_model_path.as_ref(),
            config.damage_labels_path.as_ref(),
            &config.yolo,
        );

        Self {
            pothole,
            general_damage,
        }
    }

    /// Wrap already constructed detectors
    pub fn from_handles(pothole: ModelHandle, general_damage: ModelHandle) -> Self {
        Self {
            pothole,
            general_damage,
        }
    }

    fn load_one(
        what: &str,
        model_path: Option<&PathBuf>,
        labels_path: Option<&PathBuf>,
        yolo: &YoloConfig,
    ) -> ModelHandle {
        let Some(path) = model_path else {
            tracing::warn!("⚠️ No model path configured for {}", what);
            return None;
        };

        tracing::info!("Loading {} from {}", what, path.display());
        let labels = resolve_labels_path(path, labels_path.map(PathBuf::as_path));

        match YoloDetector::load(path, labels.as_deref(), yolo.clone()) {
            Ok(model) => {
                tracing::info!(
                    "✅ {} loaded ({} classes)",
                    what,
                    model.class_count()
                );
                Some(Arc::new(model) as Arc<dyn Detector>)
            }
            Err(e) => {
                tracing::warn!("❌ Failed to load {} from {}: {:#}", what, path.display(), e);
                tracing::warn!("   Requests to this expert will return 503");
                None
            }
        }
    }

    pub fn pothole(&self) -> ModelHandle {
        self.pothole.clone()
    }

    pub fn general_damage(&self) -> ModelHandle {
        self.general_damage.clone()
    }

    pub fn has_pothole(&self) -> bool {
        self.pothole.is_some()
    }

    pub fn has_general_damage(&self) -> bool {
        self.general_damage.is_some()
    }

    /// Build the expert registry from the loaded handles
    pub fn into_registry(
        self,
        pothole_profile: ExpertProfile,
        damage_profile: ExpertProfile,
    ) -> ExpertRegistry {
        ExpertRegistry::new(
            DetectionPipeline::new(pothole_profile, self.pothole),
            DetectionPipeline::new(damage_profile, self.general_damage),
        )
    }
}
