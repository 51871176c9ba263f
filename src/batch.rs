//! Concurrent batch driver.
//!
//! Runs one crop operation per input file on a dedicated pool of exactly
//! `threads` workers and commits every result without two workers ever
//! touching the same path.
//!
//! ## Commit protocol
//!
//! ```text
//! worker 2, photo.jpg
//!   crop/copy ──► out/.temp_2_photo.jpg
//!   outcome known (cropped?)
//!   rename    ──► out/photo_cropped.jpg   or   out/photo.jpg
//!   on any failure: remove the temp file, record the error
//! ```
//!
//! The final name depends on whether the image was cropped, so it is only
//! chosen after the work is done. Temp names embed the worker index, so
//! concurrent workers never share an in-flight path.
//!
//! ## Shared state
//!
//! - Counters ([`BatchSummary`]) live behind their own `Mutex`, held only for
//!   the increment.
//! - Console output is not printed here. Each finished job sends one
//!   [`BatchEvent`] over an `mpsc` channel to a single printer, so a job's
//!   lines are never torn apart and printing never waits on the counter lock.
//!
//! A failed job never stops the batch; there are no retries.

use crate::imaging::{CropError, CropMode, CropResult, ImageBackend, crop_with_mode};
use crate::naming::{output_file_name, temp_file_name};
use crate::scan::{ScanError, find_images};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Input directory '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),
    #[error("Error creating output directory '{}': {}", .0.display(), .1)]
    OutputDir(PathBuf, #[source] io::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Per-job failure. Only its message leaves this module.
#[derive(Error, Debug)]
enum JobError {
    #[error(transparent)]
    Crop(#[from] CropError),
    #[error("Error renaming output file: {0}")]
    Rename(#[source] io::Error),
}

/// One unit of batch work.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub source: PathBuf,
    /// File name of `source`, reused for the temp and final output names.
    pub filename: String,
    pub output_dir: PathBuf,
    pub mode: CropMode,
}

/// What happened to one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub filename: String,
    /// Final file name inside the output directory, on success.
    pub output_name: Option<String>,
    pub result: Result<CropResult, String>,
}

/// Run-level counters.
///
/// `processed + errors` always equals the number of jobs once a run is done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub cropped: usize,
    pub unchanged: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &WorkerOutcome) {
        match &outcome.result {
            Ok(result) => {
                self.processed += 1;
                if result.was_cropped {
                    self.cropped += 1;
                } else {
                    self.unchanged += 1;
                }
            }
            Err(_) => self.errors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.processed + self.errors
    }
}

/// Progress event sent once per finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Completed {
        filename: String,
        message: String,
        output_name: String,
    },
    Failed {
        filename: String,
        error: String,
    },
}

impl From<&WorkerOutcome> for BatchEvent {
    fn from(outcome: &WorkerOutcome) -> Self {
        match &outcome.result {
            Ok(result) => BatchEvent::Completed {
                filename: outcome.filename.clone(),
                message: result.message.clone(),
                output_name: outcome.output_name.clone().unwrap_or_default(),
            },
            Err(error) => BatchEvent::Failed {
                filename: outcome.filename.clone(),
                error: error.clone(),
            },
        }
    }
}

/// Result of a whole run. `outcomes` follows job order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub outcomes: Vec<WorkerOutcome>,
}

/// Check the input directory and create the output directory.
pub fn prepare_directories(input: &Path, output: &Path) -> Result<(), BatchError> {
    if !input.is_dir() {
        return Err(BatchError::InputNotFound(input.to_path_buf()));
    }
    fs::create_dir_all(output).map_err(|e| BatchError::OutputDir(output.to_path_buf(), e))
}

/// Enumerate one job per readable image under `input`, sorted by path.
///
/// When `output` is a subdirectory of `input`, files already in it are
/// skipped so a second run does not crop its own results. An output equal to
/// the input (or above it) excludes nothing.
pub fn collect_jobs(input: &Path, output: &Path, mode: CropMode) -> Result<Vec<Job>, BatchError> {
    let output_root = nested_output_root(input, output);
    let jobs = find_images(input, mode.extensions())?
        .into_iter()
        .filter(|path| match (&output_root, fs::canonicalize(path)) {
            (Some(root), Ok(path)) => !path.starts_with(root),
            _ => true,
        })
        .filter_map(|source| {
            let filename = source.file_name()?.to_string_lossy().into_owned();
            Some(Job {
                source,
                filename,
                output_dir: output.to_path_buf(),
                mode,
            })
        })
        .collect();
    Ok(jobs)
}

/// Canonical `output` when it lies strictly below `input`.
fn nested_output_root(input: &Path, output: &Path) -> Option<PathBuf> {
    let input_root = fs::canonicalize(input).ok()?;
    let output_root = fs::canonicalize(output).ok()?;
    (output_root != input_root && output_root.starts_with(&input_root)).then_some(output_root)
}

fn remove_temp(temp: &Path) {
    match fs::remove_file(temp) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %temp.display(), error = %e, "could not remove temp file"),
    }
}

fn commit(
    backend: &impl ImageBackend,
    job: &Job,
    temp: &Path,
) -> Result<(CropResult, String), JobError> {
    let result = crop_with_mode(backend, &job.source, temp, &job.mode)?;
    let output_name = output_file_name(&job.filename, result.was_cropped);
    fs::rename(temp, job.output_dir.join(&output_name)).map_err(JobError::Rename)?;
    Ok((result, output_name))
}

/// Run one job to completion on the calling worker.
pub fn process_job(backend: &impl ImageBackend, job: &Job, worker: usize) -> WorkerOutcome {
    let temp = job.output_dir.join(temp_file_name(worker, &job.filename));
    tracing::debug!(worker, source = %job.source.display(), "processing");

    match commit(backend, job, &temp) {
        Ok((result, output_name)) => WorkerOutcome {
            filename: job.filename.clone(),
            output_name: Some(output_name),
            result: Ok(result),
        },
        Err(e) => {
            remove_temp(&temp);
            tracing::warn!(source = %job.source.display(), error = %e, "job failed");
            WorkerOutcome {
                filename: job.filename.clone(),
                output_name: None,
                result: Err(e.to_string()),
            }
        }
    }
}

/// Run every job on a pool of exactly `threads` workers (at least one).
///
/// Each job sends one [`BatchEvent`] to `events` when it finishes. The sender
/// is dropped on return, which ends the receiving loop.
pub fn run_batch(
    backend: &impl ImageBackend,
    jobs: &[Job],
    threads: usize,
    events: Option<Sender<BatchEvent>>,
) -> Result<BatchReport, BatchError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("lumacrop-worker-{i}"))
        .build()?;
    let summary = Mutex::new(BatchSummary::default());

    let outcomes: Vec<WorkerOutcome> = pool.install(|| {
        jobs.par_iter()
            .with_max_len(1)
            .map(|job| {
                let worker = rayon::current_thread_index().unwrap_or(0);
                let outcome = process_job(backend, job, worker);
                summary
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .record(&outcome);
                if let Some(tx) = &events {
                    // A closed receiver only means nobody is printing
                    let _ = tx.send(BatchEvent::from(&outcome));
                }
                outcome
            })
            .collect()
    });

    let summary = summary.into_inner().unwrap_or_else(PoisonError::into_inner);
    tracing::debug!(jobs = jobs.len(), finished = summary.total(), ?summary, "batch finished");
    Ok(BatchReport { summary, outcomes })
}
