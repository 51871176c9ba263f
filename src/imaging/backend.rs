//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the cropper needs
//! from the outside world: decode a file into pixels, encode pixels into a
//! file, and copy a file byte-for-byte.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust JPEG and PNG codecs.

use super::params::Quality;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// A decoded image together with the container format it was read from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

/// Trait for image codec backends.
///
/// Backends are shared by every batch worker, so they must be `Sync`.
pub trait ImageBackend: Sync {
    /// Read and decode an image file.
    fn decode(&self, path: &Path) -> Result<DecodedImage, BackendError>;

    /// Encode `image` as `format` and write it to `output`.
    ///
    /// `quality` applies to lossy formats only.
    fn encode(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        output: &Path,
        quality: Quality,
    ) -> Result<(), BackendError>;

    /// Copy `source` to `output` without re-encoding.
    fn copy(&self, source: &Path, output: &Path) -> Result<(), BackendError>;
}
