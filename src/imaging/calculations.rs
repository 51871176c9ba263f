//! Pure rectangle geometry for the crop search.
//!
//! All functions here are pure and testable without any I/O or images. The
//! sampler, the evaluator, and the search engine only ever see rectangles
//! produced by these helpers, so every band and inset rule lives in one place.

use super::params::Corner;
use std::fmt;

/// Fraction of each dimension removed on every side to get the center
/// reference region (1/5 per side keeps the inner 60%).
const CENTER_MARGIN_DIVISOR: u32 = 5;

/// Step divisor: one step removes about 1% of `width + height`.
const STEP_DIVISOR: u32 = 200;

/// Lower bound on the search iteration budget.
const MIN_ITERATIONS: usize = 100;

/// One of the four sides of a rectangle.
///
/// The declaration order is the tie-break order used by the crop search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    /// All edges in tie-break order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Whether cropping this edge reduces the height (as opposed to the width).
    pub fn is_horizontal(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }

    /// The extent of `rect` perpendicular to this edge.
    pub fn extent(self, rect: &Rect) -> u32 {
        if self.is_horizontal() {
            rect.height()
        } else {
            rect.width()
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis-aligned rectangle, half-open on the max side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Rect {
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Full bounds of a `width × height` image.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Shrink inward by `dx` on the left and right and `dy` on the top and
    /// bottom. Returns `None` when nothing with positive area would remain.
    pub fn inset(&self, dx: u32, dy: u32) -> Option<Rect> {
        let min_x = self.min_x.checked_add(dx)?;
        let min_y = self.min_y.checked_add(dy)?;
        let max_x = self.max_x.checked_sub(dx)?;
        let max_y = self.max_y.checked_sub(dy)?;
        (min_x < max_x && min_y < max_y).then(|| Rect::new(min_x, min_y, max_x, max_y))
    }

    /// Move one edge inward by `amount` pixels.
    ///
    /// Returns `None` if the rectangle would collapse to zero or negative
    /// extent.
    pub fn shrink(&self, edge: Edge, amount: u32) -> Option<Rect> {
        let mut next = *self;
        match edge {
            Edge::Top => next.min_y = self.min_y.checked_add(amount)?,
            Edge::Bottom => next.max_y = self.max_y.checked_sub(amount)?,
            Edge::Left => next.min_x = self.min_x.checked_add(amount)?,
            Edge::Right => next.max_x = self.max_x.checked_sub(amount)?,
        }
        (next.min_x < next.max_x && next.min_y < next.max_y).then_some(next)
    }

    /// A band of `thickness` pixels lying flush against `edge`, spanning the
    /// full length of that edge.
    pub fn band(&self, edge: Edge, thickness: u32) -> Rect {
        let t = thickness.min(edge.extent(self));
        match edge {
            Edge::Top => Rect::new(self.min_x, self.min_y, self.max_x, self.min_y + t),
            Edge::Bottom => Rect::new(self.min_x, self.max_y - t, self.max_x, self.max_y),
            Edge::Left => Rect::new(self.min_x, self.min_y, self.min_x + t, self.max_y),
            Edge::Right => Rect::new(self.max_x - t, self.min_y, self.max_x, self.max_y),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width(),
            self.height(),
            self.min_x,
            self.min_y
        )
    }
}

/// The inner 60% of `rect`, used as the brightness reference.
///
/// Margins are at least one pixel. Regions too small to keep anything after
/// the inset fall back to `rect` itself.
pub fn center_reference(rect: &Rect) -> Rect {
    let dx = (rect.width() / CENTER_MARGIN_DIVISOR).max(1);
    let dy = (rect.height() / CENTER_MARGIN_DIVISOR).max(1);
    rect.inset(dx, dy).unwrap_or(*rect)
}

/// Thickness of a sample band against `edge`: `1/divisor` of the
/// perpendicular extent, at least one pixel.
pub fn band_thickness(rect: &Rect, edge: Edge, divisor: u32) -> u32 {
    (edge.extent(rect) / divisor).max(1)
}

/// Pixels removed per search step for the current crop.
///
/// # Examples
/// ```
/// # use lumacrop::imaging::{Rect, crop_step};
/// assert_eq!(crop_step(&Rect::from_dimensions(4000, 3000)), 35);
/// assert_eq!(crop_step(&Rect::from_dimensions(64, 48)), 1);
/// ```
pub fn crop_step(rect: &Rect) -> u32 {
    ((rect.width() + rect.height()) / STEP_DIVISOR).max(1)
}

/// Upper bound on search iterations for an image with the given bounds.
pub fn iteration_cap(bounds: &Rect) -> usize {
    (bounds.width().max(bounds.height()) as usize / 2).max(MIN_ITERATIONS)
}

/// Maximum number of pixels that may be removed from a dimension of
/// `extent` pixels, truncated toward zero.
pub fn crop_ceiling(extent: u32, max_crop_percent: f64) -> u32 {
    (extent as f64 * max_crop_percent / 100.0) as u32
}

/// Rectangle left after removing `percent`% of the width and height from the
/// two edges adjacent to `corner`.
///
/// Removed amounts are floored, so a 101-pixel side cut by 10% loses 10 pixels.
pub fn corner_rect(width: u32, height: u32, corner: Corner, percent: f64) -> Rect {
    let cut_w = (width as f64 * percent / 100.0).floor() as u32;
    let cut_h = (height as f64 * percent / 100.0).floor() as u32;
    let cut_w = cut_w.min(width.saturating_sub(1));
    let cut_h = cut_h.min(height.saturating_sub(1));

    let (min_x, max_x) = if corner.is_left() {
        (cut_w, width)
    } else {
        (0, width - cut_w)
    };
    let (min_y, max_y) = if corner.is_top() {
        (cut_h, height)
    } else {
        (0, height - cut_h)
    };
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Percentage of `bounds` area removed by cropping to `crop`.
pub fn cropped_area_percent(bounds: &Rect, crop: &Rect) -> f64 {
    let full = bounds.area();
    if full == 0 {
        return 0.0;
    }
    (1.0 - crop.area() as f64 / full as f64) * 100.0
}
