//! Uniformity check: are all four edge bands close to the center brightness?
//!
//! Edges are compared against the inner 60% of the region, not against the
//! whole-region mean. A wide dark border would otherwise pull the reference
//! toward itself and hide its own deviation.

use super::calculations::{Edge, Rect, band_thickness, center_reference};
use super::luminance::region_brightness;
use image::RgbImage;

/// Edge bands cover 1/10 of the perpendicular dimension.
const EDGE_BAND_DIVISOR: u32 = 10;

/// Express an absolute brightness deviation as a percentage of `center`.
///
/// A zero center has no meaningful ratio: zero deviation counts as none,
/// anything else as infinitely far off.
pub fn deviation_percent(deviation: f64, center: f64) -> f64 {
    if center == 0.0 {
        return if deviation == 0.0 { 0.0 } else { f64::INFINITY };
    }
    deviation / center * 100.0
}

/// Deviation of `edge` from `center` as a percentage of `center`.
pub fn relative_deviation(edge: f64, center: f64) -> f64 {
    deviation_percent((edge - center).abs(), center)
}

/// Whether every edge band of `rect` is within `tolerance` percent of the
/// center reference brightness.
///
/// Depends only on the pixels inside `rect`. Bands are checked in the order
/// top, bottom, left, right and the first failure short-circuits.
pub fn is_uniform(image: &RgbImage, rect: &Rect, tolerance: f64) -> bool {
    let center = region_brightness(image, &center_reference(rect));

    Edge::ALL.iter().all(|&edge| {
        let band = rect.band(edge, band_thickness(rect, edge, EDGE_BAND_DIVISOR));
        relative_deviation(region_brightness(image, &band), center) <= tolerance
    })
}
