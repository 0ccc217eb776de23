// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! YOLO output decoding tests
//!
//! Synthetic `[1, 4 + nc, anchors]` tensors run through decoding, NMS and the
//! best-detection reducer, no model file needed.

use image::DynamicImage;
use ndarray::Array3;
use rashtra_ai_node::{
    detection::reduce,
    vision::yolo::{
        postprocessing::{decode_output, PostprocessParams},
        LetterboxInfo,
    },
};

const ANCHORS: usize = 8;
const CLASSES: usize = 2;

/// Channels-first output with every anchor below threshold
fn empty_output() -> Array3<f32> {
    Array3::zeros((1, 4 + CLASSES, ANCHORS))
}

fn set_anchor(output: &mut Array3<f32>, anchor: usize, bbox: [f32; 4], class_id: usize, score: f32) {
    for (i, v) in bbox.iter().enumerate() {
        output[[0, i, anchor]] = *v;
    }
    output[[0, 4 + class_id, anchor]] = score;
}

fn square_letterbox() -> LetterboxInfo {
    LetterboxInfo::new(&DynamicImage::new_rgb8(640, 640), 640)
}

#[test]
fn test_overlapping_same_class_is_suppressed() {
    let mut output = empty_output();
    set_anchor(&mut output, 0, [100.0, 100.0, 50.0, 50.0], 0, 0.9);
    set_anchor(&mut output, 1, [102.0, 101.0, 50.0, 50.0], 0, 0.8);
    set_anchor(&mut output, 2, [400.0, 400.0, 60.0, 40.0], 1, 0.3);

    let detections = decode_output(
        output.view().into_dyn(),
        &PostprocessParams::default(),
        &square_letterbox(),
    )
    .unwrap();

    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0].class_id, 0);
    assert_eq!(detections[0].confidence, 0.9);
    assert_eq!(detections[1].class_id, 1);

    let bbox = detections[0].bounding_box;
    assert!((bbox.x - 75.0).abs() < 1e-3);
    assert!((bbox.width - 50.0).abs() < 1e-3);
}

#[test]
fn test_below_threshold_dropped() {
    let mut output = empty_output();
    set_anchor(&mut output, 3, [50.0, 50.0, 10.0, 10.0], 1, 0.2);

    let detections = decode_output(
        output.view().into_dyn(),
        &PostprocessParams::default(),
        &square_letterbox(),
    )
    .unwrap();

    assert!(detections.is_empty());
    assert!(!reduce(&detections, Some(&["pothole".to_string()][..])).detected);
}

#[test]
fn test_transposed_layout_matches() {
    let mut output = empty_output();
    set_anchor(&mut output, 0, [100.0, 100.0, 50.0, 50.0], 1, 0.7);
    set_anchor(&mut output, 5, [300.0, 300.0, 50.0, 50.0], 0, 0.6);

    let params = PostprocessParams::default();
    let letterbox = square_letterbox();

    let channels_first = decode_output(output.view().into_dyn(), &params, &letterbox).unwrap();

    let transposed = output.view().permuted_axes([0, 2, 1]);
    let anchors_first = decode_output(transposed.into_dyn(), &params, &letterbox).unwrap();

    assert_eq!(channels_first, anchors_first);
}

#[test]
fn test_decoded_output_feeds_reducer() {
    let mut output = empty_output();
    set_anchor(&mut output, 0, [100.0, 100.0, 40.0, 40.0], 0, 0.45);
    set_anchor(&mut output, 1, [500.0, 200.0, 40.0, 40.0], 1, 0.88);

    let detections = decode_output(
        output.view().into_dyn(),
        &PostprocessParams::default(),
        &square_letterbox(),
    )
    .unwrap();

    let names = vec!["crack".to_string(), "rut".to_string()];
    let verdict = reduce(&detections, Some(&names));
    assert!(verdict.detected);
    assert_eq!(verdict.confidence, 0.88);
    assert_eq!(verdict.label.as_deref(), Some("rut"));
}

#[test]
fn test_rejects_unexpected_shape() {
    let output = ndarray::Array2::<f32>::zeros((6, 8));
    let result = decode_output(
        output.view().into_dyn(),
        &PostprocessParams::default(),
        &square_letterbox(),
    );
    assert!(result.is_err());
}
