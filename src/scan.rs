//! Input discovery.
//!
//! Recursively walks the input directory and returns every image file whose
//! extension the chosen crop mode can read. In-flight `.temp_*` outputs
//! left by an interrupted run are skipped. Other dot-files and dot-directories
//! are ordinary input.
//!
//! ```text
//! photos/
//! ├── a.jpg              ✓
//! ├── b.PNG              ✓ (uniform mode only, case-insensitive)
//! ├── notes.txt          ✗
//! ├── .temp_0_c.jpg      ✗ in-flight output
//! ├── .archive/
//! │   └── e.jpg          ✓
//! └── trip/
//!     └── d.jpeg         ✓
//! ```
//!
//! Results are sorted by path so job order, and with it the printed report,
//! is the same on every run.

use crate::naming::TEMP_PREFIX;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Error walking directory: {0}")]
    Walk(#[from] walkdir::Error),
}

fn is_temp_output(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX)
}

/// Whether `path` has one of `extensions` (lowercase, without the dot).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|c| ext.eq_ignore_ascii_case(c)))
}

/// Find all files under `root` with one of `extensions`, sorted by path.
pub fn find_images(root: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, ScanError> {
    let mut images = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_temp_output(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            images.push(entry.into_path());
        }
    }
    images.sort();
    Ok(images)
}
