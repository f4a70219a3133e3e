use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use thiserror::Error;

pub const CONTRAST_FACTOR: f32 = 1.5;
pub const BRIGHTNESS_FACTOR: f32 = 1.1;
pub const SHARPNESS_FACTOR: f32 = 1.5;

/// Center weight of the 3×3 smoothing kernel; every neighbour weighs 1.
const SMOOTH_CENTER_WEIGHT: u32 = 5;
const SMOOTH_TOTAL_WEIGHT: u32 = SMOOTH_CENTER_WEIGHT + 8;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Decode raw image bytes, optionally enhance them, and return PNG bytes ready for OCR.
pub fn prepare_for_ocr_from_bytes(data: &[u8], enhance_image: bool) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    let img = if enhance_image {
        DynamicImage::ImageLuma8(enhance(&img))
    } else {
        encodable(img)
    };
    encode_as_png(&img)
}

/// Grayscale, then contrast, brightness and sharpness, in that order.
pub fn enhance(img: &DynamicImage) -> GrayImage {
    let gray = img.to_luma8();
    let gray = adjust_contrast(&gray, CONTRAST_FACTOR);
    let gray = adjust_brightness(&gray, BRIGHTNESS_FACTOR);
    adjust_sharpness(&gray, SHARPNESS_FACTOR)
}

/// Interpolate from `degenerate` towards `original` by `factor` (1.0 = original).
fn blend(degenerate: u8, original: u8, factor: f32) -> u8 {
    let d = f32::from(degenerate);
    (d + (f32::from(original) - d) * factor).round().clamp(0.0, 255.0) as u8
}

/// Contrast relative to the mean gray level.
pub fn adjust_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let count = u64::from(gray.width()) * u64::from(gray.height());
    if count == 0 {
        return gray.clone();
    }
    let sum: u64 = gray.pixels().map(|p| u64::from(p[0])).sum();
    let mean = (sum as f64 / count as f64 + 0.5) as u8;

    map_pixels(gray, |_, _, p| blend(mean, p, factor))
}

/// Brightness relative to black.
pub fn adjust_brightness(gray: &GrayImage, factor: f32) -> GrayImage {
    map_pixels(gray, |_, _, p| blend(0, p, factor))
}

/// Sharpness relative to a smoothed copy. Border pixels are left as-is.
pub fn adjust_sharpness(gray: &GrayImage, factor: f32) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w < 3 || h < 3 {
        return gray.clone();
    }

    map_pixels(gray, |x, y, p| {
        if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
            p
        } else {
            blend(smoothed(gray, x, y), p, factor)
        }
    })
}

/// Weighted 3×3 average around an interior pixel, rounded.
fn smoothed(gray: &GrayImage, x: u32, y: u32) -> u8 {
    let mut sum = u32::from(gray.get_pixel(x, y)[0]) * (SMOOTH_CENTER_WEIGHT - 1);
    for ny in y - 1..=y + 1 {
        for nx in x - 1..=x + 1 {
            sum += u32::from(gray.get_pixel(nx, ny)[0]);
        }
    }
    ((sum + SMOOTH_TOTAL_WEIGHT / 2) / SMOOTH_TOTAL_WEIGHT) as u8
}

fn map_pixels(gray: &GrayImage, f: impl Fn(u32, u32, u8) -> u8) -> GrayImage {
    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([f(x, y, gray.get_pixel(x, y)[0])])
    })
}

/// PNG cannot hold floating-point samples.
fn encodable(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba8(img.to_rgba8())
        }
        other => other,
    }
}

fn encode_as_png(img: &DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
