//! # lumacrop
//!
//! Batch cropper for unevenly lit photographs and scans. Borders that are
//! noticeably darker or brighter than the middle of the image (vignetting,
//! scanner shadows, flash falloff) are trimmed away step by step until the
//! brightness is uniform or a crop budget is spent.
//!
//! # Architecture
//!
//! ```text
//! input/  ──scan──►  jobs  ──batch (N workers)──►  output/
//!                               │
//!                               ├─ decode            (imaging::backend)
//!                               ├─ find crop rect    (imaging::search → uniformity → luminance)
//!                               ├─ copy or encode    (imaging::operations)
//!                               └─ temp → rename     (naming)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Brightness engine, crop operations, and the codec backend |
//! | [`batch`] | Job enumeration, worker pool, atomic commit, counters |
//! | [`scan`] | Recursive input discovery filtered by extension |
//! | [`naming`] | Temp and final output filenames |
//! | [`config`] | TOML config loading, validation, CLI value parsers |
//! | [`output`] | CLI output formatting for progress and summary |
//!
//! # Design Decisions
//!
//! ## Center-Referenced Uniformity
//!
//! Edge bands are compared against the inner 60% of the region rather than the
//! whole-region average. A wide dark border would otherwise drag the average
//! toward itself and hide its own deviation. See [`imaging::is_uniform`].
//!
//! ## Proportional Steps, Bounded Iterations
//!
//! Each search step removes `(width + height) / 200` pixels (at least one)
//! and the iteration count is capped, so a 6000-pixel scan converges in
//! roughly the same number of passes as a thumbnail.
//!
//! ## Untouched Files Stay Untouched
//!
//! When nothing needs cropping the source bytes are copied verbatim: no
//! re-encode, no generation loss, metadata preserved exactly.
//!
//! ## Temp-Then-Rename Commit
//!
//! Whether an output is called `name.ext` or `name_cropped.ext` is only known
//! after processing. Workers therefore write to a per-worker temp name and
//! rename once the outcome is known, so concurrent workers never write the
//! same path and a crash never leaves a half-written final file.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and encoding use the `image` crate's pure-Rust JPEG and PNG
//! codecs. The binary has no system dependencies.

pub mod batch;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
