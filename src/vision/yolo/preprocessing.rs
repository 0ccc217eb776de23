// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Letterbox preprocessing for YOLO expert models

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Default square input size of the exported models
pub const DEFAULT_INPUT_SIZE: u32 = 640;

/// Grey used for letterbox padding (matches the training pipeline)
pub const PAD_VALUE: u8 = 114;

/// Scale and padding applied by [`letterbox`]
///
/// Used to map boxes from model input space back to the original image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Scale factor applied
    pub scale: f32,
    /// X offset from padding
    pub offset_x: u32,
    /// Y offset from padding
    pub offset_y: u32,
    /// Original image width
    pub original_width: u32,
    /// Original image height
    pub original_height: u32,
    /// Width of the image content inside the padded input
    pub resized_width: u32,
    /// Height of the image content inside the padded input
    pub resized_height: u32,
}

impl LetterboxInfo {
    pub fn new(image: &DynamicImage, target_size: u32) -> Self {
        let (orig_w, orig_h) = image.dimensions();

        if orig_w == 0 || orig_h == 0 {
            return Self {
                scale: 1.0,
                offset_x: 0,
                offset_y: 0,
                original_width: orig_w,
                original_height: orig_h,
                resized_width: 0,
                resized_height: 0,
            };
        }

        let scale = (target_size as f32 / orig_w as f32).min(target_size as f32 / orig_h as f32);
        let new_w = ((orig_w as f32 * scale).round() as u32).clamp(1, target_size);
        let new_h = ((orig_h as f32 * scale).round() as u32).clamp(1, target_size);

        Self {
            scale,
            offset_x: (target_size - new_w) / 2,
            offset_y: (target_size - new_h) / 2,
            original_width: orig_w,
            original_height: orig_h,
            resized_width: new_w,
            resized_height: new_h,
        }
    }

    /// Map a coordinate from model input space back to original image space
    pub fn map_to_original(&self, x: f32, y: f32) -> (f32, f32) {
        let orig_x = (x - self.offset_x as f32) / self.scale;
        let orig_y = (y - self.offset_y as f32) / self.scale;
        (
            orig_x.clamp(0.0, self.original_width as f32),
            orig_y.clamp(0.0, self.original_height as f32),
        )
    }
}

/// Resize with aspect ratio preserved and pad to a square of `target_size`
pub fn letterbox(image: &DynamicImage, target_size: u32) -> (DynamicImage, LetterboxInfo) {
    let info = LetterboxInfo::new(image, target_size);
    let mut output = RgbImage::from_pixel(
        target_size,
        target_size,
        Rgb([PAD_VALUE, PAD_VALUE, PAD_VALUE]),
    );

    if info.original_width == 0 || info.original_height == 0 {
        return (DynamicImage::ImageRgb8(output), info);
    }

    let resized = image
        .resize_exact(
            info.resized_width,
            info.resized_height,
            image::imageops::FilterType::Triangle,
        )
        .to_rgb8();

    image::imageops::replace(
        &mut output,
        &resized,
        info.offset_x as i64,
        info.offset_y as i64,
    );

    (DynamicImage::ImageRgb8(output), info)
}

/// Convert a letterboxed image to an NCHW tensor with values in [0, 1]
pub fn to_input_tensor(image: &DynamicImage) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut tensor = Array4::zeros((1, 3, height as usize, width as usize));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    tensor
}
