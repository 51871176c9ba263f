//! Luminance sampling.
//!
//! Brightness is the Rec. 601 luma approximation on 8-bit channels. Sources
//! with more precision are converted to [`RgbImage`] before analysis, which
//! scales every channel down to 0–255.

use super::calculations::Rect;
use image::{Rgb, RgbImage};

const RED_WEIGHT: f64 = 0.299;
const GREEN_WEIGHT: f64 = 0.587;
const BLUE_WEIGHT: f64 = 0.114;

/// Perceived brightness of one pixel, 0.0 (black) to 255.0 (white).
#[inline]
pub fn brightness(pixel: &Rgb<u8>) -> f64 {
    let [r, g, b] = pixel.0;
    RED_WEIGHT * r as f64 + GREEN_WEIGHT * g as f64 + BLUE_WEIGHT * b as f64
}

/// Mean brightness over every pixel in `rect`.
///
/// `rect` must lie inside the image. An empty rectangle yields 0.0, which is
/// not a meaningful reading. Cost is proportional to the area.
pub fn region_brightness(image: &RgbImage, rect: &Rect) -> f64 {
    if rect.is_empty() {
        return 0.0;
    }
    debug_assert!(
        rect.max_x <= image.width() && rect.max_y <= image.height(),
        "sample region {rect} outside {}x{} image",
        image.width(),
        image.height()
    );

    let raw = image.as_raw();
    let stride = image.width() as usize * 3;
    let row_start = rect.min_x as usize * 3;
    let row_end = rect.max_x as usize * 3;

    let mut sum = 0.0;
    for y in rect.min_y..rect.max_y {
        let offset = y as usize * stride;
        for px in raw[offset + row_start..offset + row_end].chunks_exact(3) {
            sum += brightness(&Rgb([px[0], px[1], px[2]]));
        }
    }
    sum / rect.area() as f64
}
