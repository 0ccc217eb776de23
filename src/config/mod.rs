// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration
//!
//! Every setting can be given as a flag or through the environment (a `.env`
//! file is loaded by `main` before parsing).

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::api::DEFAULT_MAX_UPLOAD_BYTES;
use crate::detection::ExpertProfile;
use crate::vision::yolo::{PostprocessParams, YoloConfig};
use crate::vision::ExpertModelConfig;

/// Log level used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the log filter from `RUST_LOG`-style directives
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Rashtra AI road-damage detection node
#[derive(Parser, Debug, Clone)]
#[command(name = "rashtra-ai-node")]
#[command(version)]
#[command(about = "Road-damage detection node with pothole and general damage experts", long_about = None)]
pub struct NodeConfig {
    /// Address the HTTP API listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// Pothole expert model (Model 1)
    #[arg(long, env = "POTHOLE_MODEL_PATH", default_value = "./models/pothole_model.onnx")]
    pub pothole_model: PathBuf,

    /// General damage expert model (Model 2)
    #[arg(long, env = "DAMAGE_MODEL_PATH", default_value = "./models/damage_model.onnx")]
    pub damage_model: PathBuf,

    /// Class names for Model 1, one per line
    #[arg(long, env = "POTHOLE_LABELS_PATH")]
    pub pothole_labels: Option<PathBuf>,

    /// Class names for Model 2, one per line
    #[arg(long, env = "DAMAGE_LABELS_PATH")]
    pub damage_labels: Option<PathBuf>,

    /// Minimum candidate confidence kept by the detectors
    #[arg(long, env = "DETECT_CONF_THRESHOLD", default_value_t = 0.25)]
    pub conf_threshold: f32,

    /// IoU above which overlapping candidates are suppressed
    #[arg(long, env = "DETECT_IOU_THRESHOLD", default_value_t = 0.7)]
    pub iou_threshold: f32,

    /// Square model input size in pixels
    #[arg(long, env = "DETECT_INPUT_SIZE", default_value_t = 640)]
    pub input_size: u32,

    /// ONNX Runtime intra-op threads per model
    #[arg(long, env = "DETECT_THREADS", default_value_t = 4)]
    pub threads: usize,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Label returned when Model 1 finds nothing
    #[arg(long, env = "POTHOLE_ABSENT_LABEL", default_value = "No Potholes")]
    pub pothole_absent_label: String,

    /// Label returned when Model 2 finds nothing
    #[arg(long, env = "DAMAGE_ABSENT_LABEL", default_value = "No Damage")]
    pub damage_absent_label: String,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let yolo = YoloConfig::default();
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 5000)),
            pothole_model: PathBuf::from("./models/pothole_model.onnx"),
            damage_model: PathBuf::from("./models/damage_model.onnx"),
            pothole_labels: None,
            damage_labels: None,
            conf_threshold: yolo.params.conf_threshold,
            iou_threshold: yolo.params.iou_threshold,
            input_size: yolo.input_size,
            threads: yolo.intra_threads,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            pothole_absent_label: ExpertProfile::pothole().absent_label,
            damage_absent_label: ExpertProfile::general_damage().absent_label,
        }
    }
}

impl NodeConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.conf_threshold) {
            return Err(format!(
                "Confidence threshold must be within [0, 1], got {}",
                self.conf_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(format!(
                "IoU threshold must be within [0, 1], got {}",
                self.iou_threshold
            ));
        }
        if self.input_size == 0 {
            return Err("Input size must be greater than 0".to_string());
        }
        if self.threads == 0 {
            return Err("Thread count must be greater than 0".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("Max upload size must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn yolo_config(&self) -> YoloConfig {
        YoloConfig {
            input_size: self.input_size,
            params: PostprocessParams {
                conf_threshold: self.conf_threshold,
                iou_threshold: self.iou_threshold,
                ..Default::default()
            },
            intra_threads: self.threads,
        }
    }

    pub fn expert_model_config(&self) -> ExpertModelConfig {
        ExpertModelConfig {
            pothole_model_path: Some(self.pothole_model.clone()),
            damage_model_path: Some(self.damage_model.clone()),
            pothole_labels_path: self.pothole_labels.clone(),
            damage_labels_path: self.damage_labels.clone(),
            yolo: self.yolo_config(),
        }
    }

    pub fn pothole_profile(&self) -> ExpertProfile {
        ExpertProfile::pothole().with_absent_label(self.pothole_absent_label.clone())
    }

    pub fn damage_profile(&self) -> ExpertProfile {
        ExpertProfile::general_damage().with_absent_label(self.damage_absent_label.clone())
    }
}
