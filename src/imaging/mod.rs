//! Brightness analysis and cropping in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG) |
//! | **Brightness** | Rec. 601 luma over 8-bit RGB |
//! | **Crop search** | iterative edge shrink toward uniform brightness |
//! | **Extract** | `DynamicImage::crop_imm` |
//! | **Encode** | JPEG quality 95 or lossless PNG |
//!
//! The module is split into:
//! - **Calculations**: Pure rectangle geometry (unit testable)
//! - **Luminance / Uniformity / Search**: The brightness engine, read-only on pixels
//! - **Parameters**: Data structures describing crop operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining analysis + backend

pub mod backend;
mod calculations;
mod luminance;
pub mod operations;
mod params;
pub mod rust_backend;
mod search;
mod uniformity;

pub use backend::{BackendError, DecodedImage, ImageBackend};
pub use calculations::{Edge, Rect, corner_rect, crop_step, cropped_area_percent};
pub use luminance::{brightness, region_brightness};
pub use operations::{
    CropError, CropResult, crop_corner, crop_to_uniform, crop_with_mode, extract_region,
    plan_uniform_crop,
};
pub use params::{Corner, CropMode, Quality};
pub use rust_backend::RustBackend;
pub use search::{EdgeScan, SearchError, find_uniform_crop};
pub use uniformity::is_uniform;
