// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector capability shared by both road-damage experts
//!
//! A detector takes a decoded image and returns every candidate it found. The
//! candidates carry a class index rather than a name; names are resolved
//! through [`ClassLabels`], which the detector also provides.

use anyhow::Result;
use image::DynamicImage;

/// Axis-aligned box in original image pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection over union with another box
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

/// One candidate found by a detector in one image
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Model class index
    pub class_id: usize,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Location of the candidate
    pub bounding_box: BoundingBox,
}

impl Detection {
    pub fn new(class_id: usize, confidence: f32) -> Self {
        Self {
            class_id,
            confidence,
            bounding_box: BoundingBox::default(),
        }
    }

    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }
}

/// Maps a model class index to a human-readable label
pub trait ClassLabels {
    fn class_label(&self, class_id: usize) -> Option<String>;
}

impl ClassLabels for [String] {
    fn class_label(&self, class_id: usize) -> Option<String> {
        self.get(class_id).cloned()
    }
}

impl ClassLabels for Vec<String> {
    fn class_label(&self, class_id: usize) -> Option<String> {
        self.as_slice().class_label(class_id)
    }
}

/// An expert detection model
///
/// Implementations must be safe to call from several requests at once; the
/// pipeline holds them behind an `Arc` and never mutates them.
pub trait Detector: ClassLabels + Send + Sync {
    /// Run inference on a decoded image and return every candidate, in the
    /// model's output order
    fn infer(&self, image: &DynamicImage) -> Result<Vec<Detection>>;

    /// Short model name used in logs and health output
    fn model_name(&self) -> &str;

    /// Number of classes the model knows names for
    fn class_count(&self) -> usize;
}
