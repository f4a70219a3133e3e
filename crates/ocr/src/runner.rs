use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ptac_core::{display_key, OcrOutcome, ResultSet};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::normalize::normalize;
use crate::preprocess::{self, PreprocessError};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Maximum number of images processed at once.
    pub workers: usize,
    /// Apply grayscale/contrast/brightness/sharpness enhancement before OCR.
    pub preprocess: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism().map_or(1, |n| n.get()),
            preprocess: true,
        }
    }
}

/// Orchestrates: read → decode → enhance → OCR → trim → normalize, over a bounded pool.
pub struct BatchRunner<R: OcrBackend> {
    recognizer: Arc<R>,
    options: RunnerOptions,
}

impl<R: OcrBackend + 'static> BatchRunner<R> {
    pub fn new(recognizer: R, options: RunnerOptions) -> Self {
        Self { recognizer: Arc::new(recognizer), options }
    }

    pub fn options(&self) -> RunnerOptions {
        self.options
    }

    /// Process a single image synchronously.
    pub fn process_image(&self, path: &Path) -> Result<String, ProcessError> {
        process_file(self.recognizer.as_ref(), path, self.options.preprocess)
    }

    /// OCR every path and collect the outcomes by display key.
    ///
    /// A failure on one image is recorded under its key and never affects the others.
    pub async fn run_batch(&self, paths: &[PathBuf], base_paths: &[PathBuf]) -> ResultSet {
        let semaphore = Arc::new(Semaphore::new(self.options.workers.max(1)));
        let mut tasks = JoinSet::new();

        for (key, path) in assign_keys(paths, base_paths) {
            let semaphore = Arc::clone(&semaphore);
            let recognizer = Arc::clone(&self.recognizer);
            let preprocess = self.options.preprocess;

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (key, OcrOutcome::failed("worker pool closed"));
                };
                info!("Processing: {key}");

                let work = move || process_file(recognizer.as_ref(), &path, preprocess);
                let outcome = match tokio::task::spawn_blocking(work).await {
                    Ok(Ok(text)) => OcrOutcome::Text(text),
                    Ok(Err(e)) => {
                        error!("Error processing {key}: {e}");
                        OcrOutcome::failed(e.to_string())
                    }
                    Err(e) => {
                        error!("Worker for {key} did not finish: {e}");
                        OcrOutcome::failed(format!("worker failed: {e}"))
                    }
                };
                (key, outcome)
            });
        }

        let mut results = ResultSet::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, outcome)) => {
                    info!("Completed: {key}");
                    results.insert(key, outcome);
                }
                Err(e) => error!("Batch task aborted: {e}"),
            }
        }
        results
    }
}

fn process_file<R: OcrBackend + ?Sized>(
    recognizer: &R,
    path: &Path,
    preprocess: bool,
) -> Result<String, ProcessError> {
    let bytes = std::fs::read(path)?;
    let image_bytes = preprocess::prepare_for_ocr_from_bytes(&bytes, preprocess)?;
    let raw = recognizer.recognize(&image_bytes)?;
    Ok(normalize(raw.trim()))
}

/// Pair each path with its display key. A key that is already taken (two base
/// folders sharing a name) falls back to the full path.
pub fn assign_keys(paths: &[PathBuf], base_paths: &[PathBuf]) -> Vec<(String, PathBuf)> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let mut key = display_key(path, base_paths);
            if !seen.insert(key.clone()) {
                let fallback = path.display().to_string();
                warn!("Display key {key} already used, using {fallback}");
                seen.insert(fallback.clone());
                key = fallback;
            }
            (key, path.clone())
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
