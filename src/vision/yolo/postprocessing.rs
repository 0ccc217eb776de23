// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decoding of raw YOLO output tensors into detections

use anyhow::Result;
use ndarray::{ArrayViewD, Axis, Ix2};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::preprocessing::LetterboxInfo;
use crate::vision::{BoundingBox, Detection};

/// Thresholds applied after inference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostprocessParams {
    /// Minimum class score for a candidate to be kept
    pub conf_threshold: f32,
    /// IoU above which a lower-scored box of the same class is suppressed
    pub iou_threshold: f32,
    /// Upper bound on returned detections
    pub max_detections: usize,
}

impl Default for PostprocessParams {
    fn default() -> Self {
        Self {
            conf_threshold: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}

/// Decode a `[1, 4 + nc, anchors]` output (or its transpose `[1, anchors, 4 + nc]`)
///
/// Each anchor contributes at most one candidate: its best class. Boxes are
/// mapped back to original image coordinates. The result is sorted by
/// descending confidence with class-aware NMS applied.
pub fn decode_output(
    output: ArrayViewD<'_, f32>,
    params: &PostprocessParams,
    letterbox: &LetterboxInfo,
) -> Result<Vec<Detection>> {
    let shape = output.shape().to_vec();
    if shape.len() != 3 || shape[0] != 1 {
        anyhow::bail!("Unexpected detector output shape: {:?}, expected [1, C, N]", shape);
    }

    let predictions = output
        .index_axis(Axis(0), 0)
        .into_dimensionality::<Ix2>()?;

    // Exported models put channels first; fewer channels than anchors is the tell
    let predictions = if shape[1] <= shape[2] {
        predictions
    } else {
        predictions.reversed_axes()
    };

    let channels = predictions.shape()[0];
    if channels <= 4 {
        anyhow::bail!("Detector output has no class scores ({} channels)", channels);
    }

    let mut candidates = Vec::new();
    for anchor in predictions.axis_iter(Axis(1)) {
        let (class_id, score) = anchor
            .iter()
            .skip(4)
            .enumerate()
            .fold((0usize, f32::MIN), |best, (i, &s)| {
                if s > best.1 {
                    (i, s)
                } else {
                    best
                }
            });

        if score < params.conf_threshold {
            continue;
        }

        let (cx, cy, w, h) = (anchor[0], anchor[1], anchor[2], anchor[3]);
        let (x1, y1) = letterbox.map_to_original(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.map_to_original(cx + w / 2.0, cy + h / 2.0);

        candidates.push(Detection::new(class_id, score).with_bounding_box(BoundingBox {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }));
    }

    Ok(non_max_suppression(
        candidates,
        params.iou_threshold,
        params.max_detections,
    ))
}

/// Greedy class-aware NMS
///
/// Output is ordered by descending confidence; equal scores keep their input
/// order.
pub fn non_max_suppression(
    mut candidates: Vec<Detection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id
                && k.bounding_box.iou(&candidate.bounding_box) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}

/// Parse the `names` metadata written by Ultralytics exports
///
/// The value looks like `{0: 'pothole', 1: 'alligator crack'}`. Missing
/// indices are filled with `class_<i>`.
pub fn parse_names_metadata(raw: &str) -> Vec<String> {
    let body = raw.trim().trim_start_matches('{').trim_end_matches('}');

    let mut names = BTreeMap::new();
    let mut rest = body;
    while let Some((key, tail)) = rest.split_once(':') {
        let Ok(index) = key.trim().trim_start_matches(',').trim().parse::<usize>() else {
            break;
        };

        let tail = tail.trim_start();
        let Some(quote) = tail.chars().next().filter(|c| *c == '\'' || *c == '"') else {
            break;
        };
        let Some(end) = tail[1..].find(quote) else {
            break;
        };

        names.insert(index, tail[1..1 + end].to_string());
        rest = &tail[end + 2..];
    }

    let len = names.keys().next_back().map(|&i| i + 1).unwrap_or(0);
    (0..len)
        .map(|i| {
            names
                .remove(&i)
                .unwrap_or_else(|| format!("class_{}", i))
        })
        .collect()
}

/// Parse a sidecar labels file: one class name per line, blank lines ignored
pub fn parse_labels_file(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
