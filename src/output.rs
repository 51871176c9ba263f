//! CLI output formatting for a batch run.
//!
//! # Output Format
//!
//! ```text
//! Found 3 images to process using 4 threads...
//!
//! Processing: a.jpg
//!   already uniform, copied unchanged -> a.jpg
//! Processing: b.png
//!   cropped 12.4% of image area -> b_cropped.png
//! Processing: c.jpg
//!   Error: Processing failed: Failed to decode c.jpg: ...
//!
//! Processing complete!
//! Successfully processed: 2 files
//!   Cropped: 1 files
//!   Unchanged: 1 files
//! Errors encountered: 1 files
//! ```
//!
//! Jobs finish in any order, so the per-file blocks are printed as they
//! arrive. Each block comes from one event and is printed in one go.
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::batch::{BatchEvent, BatchSummary};

// ============================================================================
// Run header
// ============================================================================

pub fn format_batch_header(image_count: usize, threads: usize) -> Vec<String> {
    if image_count == 0 {
        return vec![String::new(), "No image files found to process.".to_string()];
    }
    vec![
        format!(
            "Found {} images to process using {} threads...",
            image_count, threads
        ),
        String::new(),
    ]
}

pub fn print_batch_header(image_count: usize, threads: usize) {
    for line in format_batch_header(image_count, threads) {
        println!("{}", line);
    }
}

// ============================================================================
// Per-file events
// ============================================================================

/// Format one finished job as display lines.
pub fn format_batch_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Completed {
            filename,
            message,
            output_name,
        } => vec![
            format!("Processing: {}", filename),
            format!("  {} -> {}", message, output_name),
        ],
        BatchEvent::Failed { filename, error } => vec![
            format!("Processing: {}", filename),
            format!("  Error: {}", error),
        ],
    }
}

pub fn print_batch_event(event: &BatchEvent) {
    // One locked write per event keeps a job's lines together
    let block = format_batch_event(event).join("\n");
    println!("{}", block);
}

// ============================================================================
// Summary
// ============================================================================

pub fn format_summary(summary: &BatchSummary) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        "Processing complete!".to_string(),
        format!("Successfully processed: {} files", summary.processed),
        format!("  Cropped: {} files", summary.cropped),
        format!("  Unchanged: {} files", summary.unchanged),
    ];
    if summary.errors > 0 {
        lines.push(format!("Errors encountered: {} files", summary.errors));
    }
    lines
}

pub fn print_summary(summary: &BatchSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
