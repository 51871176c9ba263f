//! Pure Rust image codec backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the requested quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless) |
//! | Copy | `std::fs::copy` |

use super::backend::{BackendError, DecodedImage, ImageBackend};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn create_writer(path: &Path) -> Result<BufWriter<File>, BackendError> {
    Ok(BufWriter::new(File::create(path)?))
}

fn save_jpeg(image: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    // JPEG has no alpha channel and only 8-bit samples
    let rgb = image.to_rgb8();
    let encoder = JpegEncoder::new_with_quality(create_writer(path)?, quality.value() as u8);
    encoder
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    image
        .write_with_encoder(PngEncoder::new(create_writer(path)?))
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format().ok_or_else(|| {
            BackendError::UnsupportedFormat(format!("{}: unrecognized content", path.display()))
        })?;
        let image = reader.decode().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })?;
        Ok(DecodedImage { image, format })
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        output: &Path,
        quality: Quality,
    ) -> Result<(), BackendError> {
        match format {
            ImageFormat::Jpeg => save_jpeg(image, output, quality),
            ImageFormat::Png => save_png(image, output),
            other => Err(BackendError::UnsupportedFormat(format!(
                "cannot encode {:?}",
                other
            ))),
        }
    }

    fn copy(&self, source: &Path, output: &Path) -> Result<(), BackendError> {
        std::fs::copy(source, output)?;
        Ok(())
    }
}
