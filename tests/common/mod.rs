// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures: scripted experts, image payloads, multipart requests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use mockall::mock;
use rashtra_ai_node::{
    detection::{DetectionPipeline, ExpertProfile, ExpertRegistry, ModelHandle},
    vision::{ClassLabels, Detection, Detector},
};
use std::sync::Arc;

// 1x1 red PNG - minimal valid image
pub const TINY_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

// 1x1 GIF - minimal valid image
pub const TINY_GIF_BASE64: &str = "R0lGODlhAQABAIAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==";

pub const BOUNDARY: &str = "----rashtra-test-boundary";

/// Raw inference step of an expert
pub trait Infer: Send + Sync {
    fn run(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>>;
}

mock! {
    pub Model {}
    impl Infer for Model {
        fn run(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>>;
    }
}

/// Detector whose inference is driven by a mockall expectation
pub struct ScriptedExpert {
    name: String,
    classes: Vec<String>,
    model: MockModel,
}

impl ScriptedExpert {
    pub fn new(name: &str, classes: &[&str], model: MockModel) -> Self {
        Self {
            name: name.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            model,
        }
    }

    /// Expert returning the given candidates on every call
    pub fn returning(name: &str, classes: &[&str], detections: Vec<Detection>) -> Self {
        let mut model = MockModel::new();
        model
            .expect_run()
            .returning(move |_| Ok(detections.clone()));
        Self::new(name, classes, model)
    }

    /// Expert that must never be invoked
    pub fn never_called(name: &str) -> Self {
        let mut model = MockModel::new();
        model.expect_run().times(0);
        Self::new(name, &[], model)
    }

    pub fn into_handle(self) -> ModelHandle {
        Some(Arc::new(self) as Arc<dyn Detector>)
    }
}

impl ClassLabels for ScriptedExpert {
    fn class_label(&self, class_id: usize) -> Option<String> {
        self.classes.class_label(class_id)
    }
}

impl Detector for ScriptedExpert {
    fn infer(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        self.model.run(image)
    }

    fn model_name(&self) -> &str {
        &self.name
    }

    fn class_count(&self) -> usize {
        self.classes.len()
    }
}

pub fn registry(pothole: ModelHandle, general_damage: ModelHandle) -> ExpertRegistry {
    ExpertRegistry::new(
        DetectionPipeline::new(ExpertProfile::pothole(), pothole),
        DetectionPipeline::new(ExpertProfile::general_damage(), general_damage),
    )
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

pub fn tiny_png() -> Vec<u8> {
    STANDARD.decode(TINY_PNG_BASE64).unwrap()
}

pub fn tiny_gif() -> Vec<u8> {
    STANDARD.decode(TINY_GIF_BASE64).unwrap()
}

/// Encode one multipart field
pub fn multipart_body(field: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"road.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST `data` as the multipart field `field`
pub fn upload_request(uri: &str, field: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, data)))
        .unwrap()
}

/// POST with no body at all
pub fn empty_post(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as JSON
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
