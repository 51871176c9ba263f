//! Shared test utilities for the lumacrop test suite.
//!
//! Provides synthetic image builders with known brightness layouts and small
//! writers that put them on disk for backend and batch tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! // 100x100, 10px frame at brightness 20 around a 200 center
//! let img = framed_image(100, 100, 10, 20, 200);
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_jpeg(&tmp.path().join("framed.jpg"), &img);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use std::path::Path;

use crate::imaging::Edge;

// =========================================================================
// Image builders
// =========================================================================

/// Uniform gray image.
pub fn flat_image(width: u32, height: u32, value: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([value, value, value]))
}

/// Gray image with a `border`-pixel frame of `frame_value` around a
/// `center_value` interior. Borders wider than half the image fill it.
pub fn framed_image(
    width: u32,
    height: u32,
    border: u32,
    frame_value: u8,
    center_value: u8,
) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let in_frame = x < border
            || y < border
            || x >= width.saturating_sub(border)
            || y >= height.saturating_sub(border);
        let v = if in_frame { frame_value } else { center_value };
        Rgb([v, v, v])
    })
}

/// Gray image of `base_value` with a `thickness`-pixel strip of
/// `edge_value` along a single edge.
pub fn edge_shaded_image(
    width: u32,
    height: u32,
    edge: Edge,
    thickness: u32,
    edge_value: u8,
    base_value: u8,
) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let shaded = match edge {
            Edge::Top => y < thickness,
            Edge::Bottom => y >= height.saturating_sub(thickness),
            Edge::Left => x < thickness,
            Edge::Right => x >= width.saturating_sub(thickness),
        };
        let v = if shaded { edge_value } else { base_value };
        Rgb([v, v, v])
    })
}

// =========================================================================
// Writers (panic on failure)
// =========================================================================

pub fn write_png(path: &Path, image: &RgbImage) {
    image.save_with_format(path, image::ImageFormat::Png).unwrap();
}

pub fn write_jpeg(path: &Path, image: &RgbImage) {
    let file = std::fs::File::create(path).unwrap();
    JpegEncoder::new_with_quality(std::io::BufWriter::new(file), 95)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framed_image_layout() {
        let img = framed_image(10, 8, 2, 0, 255);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(1, 4).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(2, 2).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(7, 5).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(8, 5).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(5, 6).0, [0, 0, 0]);
    }

    #[test]
    fn oversized_border_fills_image() {
        let img = framed_image(6, 6, 10, 7, 200);
        assert!(img.pixels().all(|p| p.0 == [7, 7, 7]));
    }

    #[test]
    fn edge_shaded_only_touches_one_edge() {
        let img = edge_shaded_image(10, 10, Edge::Bottom, 3, 0, 100);
        assert_eq!(img.get_pixel(5, 9).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(5, 7).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(5, 6).0, [100, 100, 100]);
        assert_eq!(img.get_pixel(0, 0).0, [100, 100, 100]);
    }
}
