//! High-level crop operations.
//!
//! These functions combine the analysis modules with backend execution:
//! decode the source, decide the crop rectangle, then either copy the source
//! verbatim or encode a freshly allocated buffer holding exactly the crop.

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::calculations::{Rect, corner_rect, cropped_area_percent};
use super::params::{Corner, CropMode, Quality};
use super::search::{SearchError, find_uniform_crop};
use super::uniformity::is_uniform;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::path::Path;
use thiserror::Error;

const UNCHANGED_MESSAGE: &str = "already uniform, copied unchanged";

#[derive(Error, Debug)]
pub enum CropError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

pub type Result<T> = std::result::Result<T, CropError>;

/// Outcome of one crop operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropResult {
    pub was_cropped: bool,
    pub message: String,
}

impl CropResult {
    fn unchanged() -> Self {
        Self {
            was_cropped: false,
            message: UNCHANGED_MESSAGE.to_string(),
        }
    }
}

/// Format used to encode a cropped image.
///
/// PNG sources and `.png` destinations stay PNG; everything else is JPEG.
pub fn output_format(decoded: ImageFormat, output: &Path) -> ImageFormat {
    let png_extension = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if png_extension || decoded == ImageFormat::Png {
        ImageFormat::Png
    } else {
        ImageFormat::Jpeg
    }
}

/// Copy the pixels of `rect` into a new image with its origin at (0, 0).
pub fn extract_region(image: &DynamicImage, rect: &Rect) -> DynamicImage {
    image.crop_imm(rect.min_x, rect.min_y, rect.width(), rect.height())
}

/// Decide the uniform-crop rectangle for an analysis image.
///
/// Uniform images short-circuit without entering the search.
pub fn plan_uniform_crop(
    image: &RgbImage,
    tolerance: f64,
    max_crop: f64,
) -> std::result::Result<Rect, SearchError> {
    let bounds = Rect::from_dimensions(image.width(), image.height());
    if is_uniform(image, &bounds, tolerance) {
        return Ok(bounds);
    }
    find_uniform_crop(image, bounds, tolerance, max_crop)
}

/// Write `rect` of the decoded source to `output`.
///
/// Returns `false` when the rectangle covers the whole image and the source
/// was copied byte-for-byte instead.
fn materialize(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    decoded: &DecodedImage,
    rect: &Rect,
) -> Result<bool> {
    let bounds = Rect::from_dimensions(decoded.image.width(), decoded.image.height());
    if *rect == bounds {
        backend.copy(source, output)?;
        return Ok(false);
    }

    let cropped = extract_region(&decoded.image, rect);
    backend.encode(
        &cropped,
        output_format(decoded.format, output),
        output,
        Quality::default(),
    )?;
    Ok(true)
}

/// Crop the borders of `source` until its brightness is uniform and write the
/// result to `output`.
///
/// - `tolerance`: allowed edge deviation from the center brightness, in percent
/// - `max_crop`: maximum share of each dimension that may be removed, in percent
pub fn crop_to_uniform(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    tolerance: f64,
    max_crop: f64,
) -> Result<CropResult> {
    let decoded = backend.decode(source)?;
    let analysis = decoded.image.to_rgb8();
    let bounds = Rect::from_dimensions(analysis.width(), analysis.height());
    let rect = plan_uniform_crop(&analysis, tolerance, max_crop)?;
    drop(analysis);

    if !materialize(backend, source, output, &decoded, &rect)? {
        return Ok(CropResult::unchanged());
    }
    tracing::debug!(source = %source.display(), %rect, "cropped to uniform region");
    Ok(CropResult {
        was_cropped: true,
        message: format!(
            "cropped {:.1}% of image area",
            cropped_area_percent(&bounds, &rect)
        ),
    })
}

/// Remove a flat `percent` of width and height from the two edges adjacent to
/// `corner`. No brightness analysis.
pub fn crop_corner(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    corner: Corner,
    percent: f64,
) -> Result<CropResult> {
    let decoded = backend.decode(source)?;
    let (width, height) = (decoded.image.width(), decoded.image.height());
    let bounds = Rect::from_dimensions(width, height);
    let rect = corner_rect(width, height, corner, percent);

    let was_cropped = materialize(backend, source, output, &decoded, &rect)?;
    Ok(CropResult {
        was_cropped,
        message: format!(
            "cropped {:.1}% of image area from {} corner",
            cropped_area_percent(&bounds, &rect),
            corner
        ),
    })
}

/// Dispatch to the operation selected by `mode`.
pub fn crop_with_mode(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    mode: &CropMode,
) -> Result<CropResult> {
    match *mode {
        CropMode::Uniform {
            tolerance,
            max_crop,
        } => crop_to_uniform(backend, source, output, tolerance, max_crop),
        CropMode::Corner { corner, percent } => {
            crop_corner(backend, source, output, corner, percent)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::calculations::Edge;
    use crate::test_helpers::{edge_shaded_image, flat_image, framed_image};
    use image::Rgb;

    fn mock_with(path: &str, image: RgbImage, format: ImageFormat) -> MockBackend {
        MockBackend::with_image(path, DynamicImage::ImageRgb8(image), format)
    }

    // =========================================================================
    // output_format tests
    // =========================================================================

    #[test]
    fn png_source_stays_png() {
        assert_eq!(
            output_format(ImageFormat::Png, Path::new("/out/.temp_0_a.jpg")),
            ImageFormat::Png
        );
    }

    #[test]
    fn png_extension_forces_png() {
        assert_eq!(
            output_format(ImageFormat::Jpeg, Path::new("/out/a.PNG")),
            ImageFormat::Png
        );
    }

    #[test]
    fn everything_else_is_jpeg() {
        assert_eq!(
            output_format(ImageFormat::Jpeg, Path::new("/out/a.jpeg")),
            ImageFormat::Jpeg
        );
        assert_eq!(
            output_format(ImageFormat::Jpeg, Path::new("/out/noext")),
            ImageFormat::Jpeg
        );
    }

    // =========================================================================
    // extract_region tests
    // =========================================================================

    #[test]
    fn extract_region_translates_to_origin() {
        let source = RgbImage::from_fn(10, 8, |x, y| Rgb([x as u8, y as u8, 0]));
        let region = extract_region(&DynamicImage::ImageRgb8(source), &Rect::new(3, 2, 9, 7));
        let region = region.to_rgb8();

        assert_eq!(region.dimensions(), (6, 5));
        assert_eq!(region.get_pixel(0, 0).0, [3, 2, 0]);
        assert_eq!(region.get_pixel(5, 4).0, [8, 6, 0]);
    }

    // =========================================================================
    // crop_to_uniform tests
    // =========================================================================

    #[test]
    fn flat_image_is_copied_unchanged() {
        let backend = mock_with("/in/flat.jpg", flat_image(64, 48, 120), ImageFormat::Jpeg);

        let result = crop_to_uniform(
            &backend,
            Path::new("/in/flat.jpg"),
            Path::new("/out/flat.jpg"),
            15.0,
            30.0,
        )
        .unwrap();

        assert_eq!(result, CropResult::unchanged());
        assert_eq!(
            backend.get_operations(),
            vec![
                RecordedOp::Decode("/in/flat.jpg".to_string()),
                RecordedOp::Copy {
                    source: "/in/flat.jpg".to_string(),
                    output: "/out/flat.jpg".to_string(),
                },
            ]
        );
    }

    #[test]
    fn framed_image_is_encoded_at_crop_size() {
        let image = framed_image(100, 100, 10, 20, 200);
        let expected = plan_uniform_crop(&image, 15.0, 30.0).unwrap();
        let backend = mock_with("/in/framed.jpg", image, ImageFormat::Jpeg);

        let result = crop_to_uniform(
            &backend,
            Path::new("/in/framed.jpg"),
            Path::new("/out/framed.jpg"),
            15.0,
            30.0,
        )
        .unwrap();

        assert!(result.was_cropped);
        assert!(result.message.starts_with("cropped "));
        assert!(result.message.ends_with("% of image area"));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(
            ops[1],
            RecordedOp::Encode {
                output: "/out/framed.jpg".to_string(),
                width: expected.width(),
                height: expected.height(),
                format: ImageFormat::Jpeg,
                quality: 95,
            }
        );
    }

    #[test]
    fn png_input_is_encoded_as_png() {
        let image = edge_shaded_image(120, 80, Edge::Left, 15, 10, 180);
        let backend = mock_with("/in/shade.png", image, ImageFormat::Png);

        crop_to_uniform(
            &backend,
            Path::new("/in/shade.png"),
            Path::new("/out/.temp_1_shade.png"),
            15.0,
            30.0,
        )
        .unwrap();

        let ops = backend.get_operations();
        assert!(matches!(
            &ops[1],
            RecordedOp::Encode { format: ImageFormat::Png, height: 80, .. }
        ));
    }

    #[test]
    fn zero_budget_copies_unchanged() {
        let backend = mock_with(
            "/in/framed.jpg",
            framed_image(100, 100, 10, 20, 200),
            ImageFormat::Jpeg,
        );

        let result = crop_to_uniform(
            &backend,
            Path::new("/in/framed.jpg"),
            Path::new("/out/framed.jpg"),
            15.0,
            0.0,
        )
        .unwrap();

        assert!(!result.was_cropped);
        assert!(matches!(&backend.get_operations()[1], RecordedOp::Copy { .. }));
    }

    #[test]
    fn decode_failure_propagates() {
        let backend = MockBackend::new();
        let err = crop_to_uniform(
            &backend,
            Path::new("/in/missing.jpg"),
            Path::new("/out/missing.jpg"),
            15.0,
            30.0,
        )
        .unwrap_err();

        assert!(matches!(err, CropError::Backend(_)));
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn collapse_is_a_search_error() {
        let image = RgbImage::from_fn(400, 2, |_, y| {
            if y == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let backend = mock_with("/in/thin.png", image, ImageFormat::Png);

        let err = crop_to_uniform(
            &backend,
            Path::new("/in/thin.png"),
            Path::new("/out/thin.png"),
            15.0,
            100.0,
        )
        .unwrap_err();

        assert!(matches!(err, CropError::Search(SearchError::Collapsed { .. })));
        assert!(err.to_string().contains("empty image"));
    }

    // =========================================================================
    // crop_corner tests
    // =========================================================================

    #[test]
    fn corner_crop_reports_dimensions_and_message() {
        let backend = mock_with("/in/a.jpg", flat_image(200, 100, 90), ImageFormat::Jpeg);

        let result = crop_corner(
            &backend,
            Path::new("/in/a.jpg"),
            Path::new("/out/a.jpg"),
            Corner::TopLeft,
            10.0,
        )
        .unwrap();

        assert!(result.was_cropped);
        assert_eq!(result.message, "cropped 19.0% of image area from tl corner");
        assert!(matches!(
            &backend.get_operations()[1],
            RecordedOp::Encode { width: 180, height: 90, .. }
        ));
    }

    #[test]
    fn corner_crop_without_cut_copies() {
        // 5% of 10 pixels floors to zero
        let backend = mock_with("/in/tiny.jpg", flat_image(10, 10, 90), ImageFormat::Jpeg);

        let result = crop_corner(
            &backend,
            Path::new("/in/tiny.jpg"),
            Path::new("/out/tiny.jpg"),
            Corner::BottomRight,
            5.0,
        )
        .unwrap();

        assert!(!result.was_cropped);
        assert_eq!(result.message, "cropped 0.0% of image area from br corner");
        assert!(matches!(&backend.get_operations()[1], RecordedOp::Copy { .. }));
    }

    #[test]
    fn crop_with_mode_dispatches() {
        let backend = mock_with("/in/a.jpg", flat_image(50, 50, 90), ImageFormat::Jpeg);
        let mode = CropMode::Corner {
            corner: Corner::TopRight,
            percent: 20.0,
        };

        let result =
            crop_with_mode(&backend, Path::new("/in/a.jpg"), Path::new("/out/a.jpg"), &mode)
                .unwrap();
        assert!(result.message.ends_with("from tr corner"));

        let mode = CropMode::Uniform {
            tolerance: 15.0,
            max_crop: 30.0,
        };
        let result =
            crop_with_mode(&backend, Path::new("/in/a.jpg"), Path::new("/out/b.jpg"), &mode)
                .unwrap();
        assert!(!result.was_cropped);
    }
}
