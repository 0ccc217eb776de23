// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX YOLO expert model
//!
//! Loads an Ultralytics-style YOLO export and runs it on CPU. Class names come
//! from a sidecar labels file when one is configured, otherwise from the
//! `names` entry of the model metadata.

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use super::postprocessing::{
    decode_output, parse_labels_file, parse_names_metadata, PostprocessParams,
};
use super::preprocessing::{letterbox, to_input_tensor, DEFAULT_INPUT_SIZE};
use crate::vision::{ClassLabels, Detection, Detector};

/// Runtime settings shared by both expert models
#[derive(Debug, Clone, PartialEq)]
pub struct YoloConfig {
    /// Square model input size in pixels
    pub input_size: u32,
    /// Post-processing thresholds
    pub params: PostprocessParams,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl Default for YoloConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            params: PostprocessParams::default(),
            intra_threads: 4,
        }
    }
}

/// YOLO detector backed by an ONNX Runtime session
pub struct YoloDetector {
    /// ONNX Runtime session; `run` needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    names: Vec<String>,
    model_name: String,
    config: YoloConfig,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("classes", &self.names.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load a YOLO model from an ONNX file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    /// - The labels file is configured but unreadable
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        labels_path: Option<&Path>,
        config: YoloConfig,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Detector model not found: {}", model_path.display());
        }

        info!("Loading detector model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(config.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load detector model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        let names = match labels_path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read labels file {}", path.display()))?;
                parse_labels_file(&contents)
            }
            None => Self::names_from_metadata(&session),
        };

        if names.is_empty() {
            warn!(
                "No class names for {}, labels will use the generic placeholder",
                model_path.display()
            );
        }

        let model_name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "detector".to_string());

        debug!(
            "Detector {} loaded - input: {}, classes: {:?}",
            model_name, input_name, names
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            names,
            model_name,
            config,
        })
    }

    fn names_from_metadata(session: &Session) -> Vec<String> {
        session
            .metadata()
            .ok()
            .and_then(|metadata| metadata.custom("names").ok().flatten())
            .map(|raw| parse_names_metadata(&raw))
            .unwrap_or_default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl ClassLabels for YoloDetector {
    fn class_label(&self, class_id: usize) -> Option<String> {
        self.names.class_label(class_id)
    }
}

impl Detector for YoloDetector {
    fn infer(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let (boxed, letterbox_info) = letterbox(image, self.config.input_size);
        let input = to_input_tensor(&boxed);

        let input_value = Value::from_array(input).context("Failed to create input tensor")?;

        let mut session = lock_recovering(&self.session, &self.model_name);

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detector inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        decode_output(output_tensor.view(), &self.config.params, &letterbox_info)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn class_count(&self) -> usize {
        self.names.len()
    }
}

/// Lock the session, taking it back if an earlier holder panicked
///
/// A panic between `run` calls cannot leave the session half-mutated, so the
/// poison flag is cleared and the expert keeps serving.
fn lock_recovering<'a, T>(mutex: &'a Mutex<T>, model_name: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            error!(
                "Session lock for {} was poisoned by a panic, recovering",
                model_name
            );
            let guard = poisoned.into_inner();
            mutex.clear_poison();
            guard
        }
    }
}

/// Resolve the labels sidecar for a model: explicit path, or `<model>.names`
/// next to the model file when it exists
pub fn resolve_labels_path(model_path: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let sidecar = model_path.with_extension("names");
    sidecar.exists().then_some(sidecar)
}
