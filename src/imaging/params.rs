//! Parameter types for crop operations.
//!
//! These describe *what* to do, not *how* to do it. They are the interface
//! between the batch driver (which builds one [`CropMode`] per run) and the
//! [`operations`](super::operations) module (which decides the crop rectangle
//! and hands pixels to the backend).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 95). Clamped on construction.
//! - [`Corner`]: Anchor corner for the fixed-percentage corner crop.
//! - [`CropMode`]: Brightness-uniformity search or corner crop, with its parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Corner that a corner crop is anchored at. The two edges adjacent to it
/// are the ones that get trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Corner {
    #[serde(rename = "tl")]
    #[value(name = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    #[value(name = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    #[value(name = "bl")]
    BottomLeft,
    #[serde(rename = "br")]
    #[value(name = "br")]
    BottomRight,
}

impl Corner {
    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// Short identifier as accepted on the command line.
    pub fn code(self) -> &'static str {
        match self {
            Corner::TopLeft => "tl",
            Corner::TopRight => "tr",
            Corner::BottomLeft => "bl",
            Corner::BottomRight => "br",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How a batch run decides what to crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropMode {
    /// Shrink the borders until brightness is uniform.
    ///
    /// - `tolerance`: allowed edge deviation from the center, in percent
    /// - `max_crop`: maximum share of each dimension that may be removed, in percent
    Uniform { tolerance: f64, max_crop: f64 },
    /// Remove a flat `percent` of width and height at `corner`. No analysis.
    Corner { corner: Corner, percent: f64 },
}

impl CropMode {
    /// Lowercase file extensions this mode reads.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            CropMode::Uniform { .. } => &["jpg", "jpeg", "png"],
            CropMode::Corner { .. } => &["jpg", "jpeg"],
        }
    }
}
