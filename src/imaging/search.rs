//! Iterative crop search.
//!
//! Starting from the full image, the search repeatedly finds the edge whose
//! narrow sample band deviates most from the center brightness and moves that
//! edge inward by one step. It stops as soon as the region is uniform, the
//! crop budget is spent in both dimensions, or no remaining edge is worth
//! cutting.
//!
//! ```text
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓│      │                      │
//! │▓ ┌──────────────┐   ▓│      │  ┌──────────────┐    │
//! │▓ │    center    │   ▓│  →   │  │    center    │    │
//! │▓ └──────────────┘   ▓│      │  └──────────────┘    │
//! │▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓│      │                      │
//! └──────────────────────┘      └──────────────────────┘
//!   dark frame, edges far          frame cropped away,
//!   from center brightness         edges within tolerance
//! ```
//!
//! Step size scales with the image (about 1% of `width + height`) and the
//! iteration count is capped, so large images converge in a bounded number of
//! passes.

use super::calculations::{
    Edge, Rect, band_thickness, center_reference, crop_ceiling, crop_step, iteration_cap,
};
use super::luminance::region_brightness;
use super::uniformity::{deviation_percent, is_uniform};
use image::RgbImage;
use thiserror::Error;

/// Search bands cover 1/20 of the perpendicular dimension.
const SEARCH_BAND_DIVISOR: u32 = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("crop would result in empty image (shrinking {edge} edge of {rect})")]
    Collapsed { edge: Edge, rect: Rect },
}

/// Absolute deviation of each edge band from the center, with eligibility.
///
/// Slots are indexed in [`Edge::ALL`] order, which doubles as the tie-break
/// order when two edges deviate equally.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeScan {
    slots: [Option<f64>; 4],
}

impl EdgeScan {
    fn index(edge: Edge) -> usize {
        match edge {
            Edge::Top => 0,
            Edge::Bottom => 1,
            Edge::Left => 2,
            Edge::Right => 3,
        }
    }

    /// Record the deviation of an edge that may still be cropped.
    pub fn record(&mut self, edge: Edge, deviation: f64) {
        self.slots[Self::index(edge)] = Some(deviation);
    }

    pub fn deviation(&self, edge: Edge) -> Option<f64> {
        self.slots[Self::index(edge)]
    }

    /// The eligible edge with the largest deviation. Earlier edges win ties.
    pub fn worst(&self) -> Option<(Edge, f64)> {
        Edge::ALL
            .iter()
            .filter_map(|&edge| self.deviation(edge).map(|d| (edge, d)))
            .fold(None, |best, (edge, d)| match best {
                Some((_, best_d)) if best_d >= d => best,
                _ => Some((edge, d)),
            })
    }
}

/// Per-dimension crop allowance fixed at the start of a search.
#[derive(Debug, Clone, Copy)]
struct Budget {
    bounds: Rect,
    max_width: u32,
    max_height: u32,
}

impl Budget {
    fn new(bounds: Rect, max_crop_percent: f64) -> Self {
        Self {
            bounds,
            max_width: crop_ceiling(bounds.width(), max_crop_percent),
            max_height: crop_ceiling(bounds.height(), max_crop_percent),
        }
    }

    fn width_open(&self, crop: &Rect) -> bool {
        self.bounds.width() - crop.width() < self.max_width
    }

    fn height_open(&self, crop: &Rect) -> bool {
        self.bounds.height() - crop.height() < self.max_height
    }

    fn allows(&self, edge: Edge, crop: &Rect) -> bool {
        if edge.is_horizontal() {
            self.height_open(crop)
        } else {
            self.width_open(crop)
        }
    }
}

/// Sample the narrow band of every edge that is still under its ceiling.
fn scan_edges(image: &RgbImage, crop: &Rect, center: f64, budget: &Budget) -> EdgeScan {
    let mut scan = EdgeScan::default();
    for edge in Edge::ALL {
        if !budget.allows(edge, crop) {
            continue;
        }
        let band = crop.band(edge, band_thickness(crop, edge, SEARCH_BAND_DIVISOR));
        scan.record(edge, (region_brightness(image, &band) - center).abs());
    }
    scan
}

/// Find a sub-rectangle of `bounds` whose edges are uniformly lit.
///
/// Returns `bounds` unchanged when the image is already uniform or no crop is
/// allowed. When the budget runs out before uniformity is reached the best
/// rectangle so far is returned; that is a normal outcome, not an error.
///
/// # Errors
///
/// [`SearchError::Collapsed`] if a step would shrink the rectangle to zero
/// width or height. This happens only with budgets close to 100% on very thin
/// images and is never clamped away.
pub fn find_uniform_crop(
    image: &RgbImage,
    bounds: Rect,
    tolerance: f64,
    max_crop_percent: f64,
) -> Result<Rect, SearchError> {
    let budget = Budget::new(bounds, max_crop_percent);
    let mut crop = bounds;

    for iteration in 0..iteration_cap(&bounds) {
        if is_uniform(image, &crop, tolerance) {
            tracing::debug!(iteration, %crop, "region is uniform");
            return Ok(crop);
        }

        if !budget.width_open(&crop) && !budget.height_open(&crop) {
            tracing::debug!(iteration, %crop, "crop budget exhausted");
            return Ok(crop);
        }

        let center = region_brightness(image, &center_reference(&crop));
        let scan = scan_edges(image, &crop, center, &budget);

        let Some((edge, deviation)) = scan.worst() else {
            return Ok(crop);
        };
        if deviation_percent(deviation, center) <= tolerance {
            tracing::debug!(iteration, %crop, "remaining edges within tolerance");
            return Ok(crop);
        }

        let step = crop_step(&crop);
        tracing::trace!(iteration, %edge, deviation, step, "cropping edge");
        crop = crop
            .shrink(edge, step)
            .ok_or(SearchError::Collapsed { edge, rect: crop })?;
    }

    tracing::debug!(%crop, "iteration cap reached");
    Ok(crop)
}
