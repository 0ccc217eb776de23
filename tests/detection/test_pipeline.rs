// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Detection pipeline tests
//!
//! Exercises decode → infer → reduce → shape without the HTTP layer.

use rashtra_ai_node::{
    detection::{DetectError, DetectionPipeline, ExpertProfile, PLACEHOLDER_LABEL},
    vision::{Detection, ImageError},
};

use crate::common::{png_bytes, MockModel, ScriptedExpert};

fn pothole_pipeline(expert: ScriptedExpert) -> DetectionPipeline {
    DetectionPipeline::new(ExpertProfile::pothole(), expert.into_handle())
}

#[test]
fn test_verdict_reports_maximum() {
    let pipeline = pothole_pipeline(ScriptedExpert::returning(
        "pothole_model",
        &["pothole", "manhole"],
        vec![Detection::new(1, 0.3), Detection::new(0, 0.82)],
    ));

    let verdict = pipeline.detect(Some(png_bytes(10, 10).as_slice())).unwrap();
    assert!(verdict.detected);
    assert_eq!(verdict.confidence, 0.82);
    assert_eq!(verdict.label.as_deref(), Some("pothole"));

    let response = pipeline.respond(&verdict);
    assert_eq!(response.label, "pothole (Model 1)");
}

#[test]
fn test_zero_confidence_is_not_a_detection() {
    let pipeline = pothole_pipeline(ScriptedExpert::returning(
        "pothole_model",
        &["pothole"],
        vec![Detection::new(0, 0.0)],
    ));

    let verdict = pipeline.detect(Some(png_bytes(10, 10).as_slice())).unwrap();
    assert!(!verdict.detected);
    assert_eq!(verdict.confidence, 0.0);
    assert_eq!(pipeline.respond(&verdict).label, "No Potholes");
}

#[test]
fn test_unnamed_class_uses_placeholder() {
    let pipeline = pothole_pipeline(ScriptedExpert::returning(
        "pothole_model",
        &[],
        vec![Detection::new(3, 0.7)],
    ));

    let verdict = pipeline.detect(Some(png_bytes(10, 10).as_slice())).unwrap();
    assert_eq!(verdict.label.as_deref(), Some(PLACEHOLDER_LABEL));
    assert_eq!(pipeline.respond(&verdict).label, "object (Model 1)");
}

#[test]
fn test_absent_model_fails_before_payload() {
    let pipeline: DetectionPipeline = DetectionPipeline::new(ExpertProfile::general_damage(), None);

    let err = pipeline.detect(None).unwrap_err();
    assert!(matches!(err, DetectError::ServiceUnavailable { .. }));
    assert_eq!(err.to_string(), "Model 2 not loaded");
    assert_eq!(err.status_code(), 503);
}

#[test]
fn test_missing_payload_is_bad_request() {
    let pipeline = pothole_pipeline(ScriptedExpert::never_called("pothole_model"));

    let err = pipeline.detect(None).unwrap_err();
    assert!(matches!(err, DetectError::BadRequest(_)));
    assert_eq!(err.to_string(), "No file uploaded");
}

#[test]
fn test_undecodable_payload_is_decode_error() {
    let pipeline = pothole_pipeline(ScriptedExpert::never_called("pothole_model"));

    let err = pipeline.detect(Some(&b"GIF89a-but-truncated"[..])).unwrap_err();
    assert!(matches!(err, DetectError::Decode(ImageError::DecodeFailed(_))));
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.kind(), "decode_error");
}

#[test]
fn test_inference_error_is_not_swallowed() {
    let mut model = MockModel::new();
    model
        .expect_run()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("session run failed")));
    let pipeline = pothole_pipeline(ScriptedExpert::new("pothole_model", &["pothole"], model));

    let err = pipeline.detect(Some(png_bytes(4, 4).as_slice())).unwrap_err();
    assert!(matches!(err, DetectError::Inference(_)));
    assert_eq!(err.kind(), "inference_error");
    assert!(err.to_string().contains("session run failed"));
}

#[test]
fn test_detector_sees_decoded_dimensions() {
    let mut model = MockModel::new();
    model
        .expect_run()
        .withf(|image| image.width() == 40 && image.height() == 30)
        .times(1)
        .returning(|_| Ok(vec![]));
    let pipeline = pothole_pipeline(ScriptedExpert::new("pothole_model", &["pothole"], model));

    let verdict = pipeline.detect(Some(png_bytes(40, 30).as_slice())).unwrap();
    assert!(!verdict.detected);
}
