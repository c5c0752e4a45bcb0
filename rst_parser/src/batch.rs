//! Batch processing module for document parsing
//!
//! Parses a list of document files either sequentially or on scoped worker
//! threads. Each worker owns its parser states; the scorer and the logging
//! service are shared by reference. Results come back in input order.

use crate::config::compile_time::batch_processing::{MAX_DOCUMENTS_PER_BATCH, MAX_WORKER_THREADS};
use crate::logging::{codes, Code, LoggingService};
use crate::pipeline::{self, ParseOutput, PipelineError};
use crate::scorer::ActionScorer;
use crate::search::ShiftReduceParser;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH PROCESSING TYPES
// ============================================================================

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    /// Stop after the first chunk that contains a failure. Failures that
    /// require a halt (broken model, transition invariants) always stop.
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(1),
            fail_fast: false,
        }
    }
}

impl BatchConfig {
    pub fn sequential() -> Self {
        Self {
            max_threads: 1,
            fail_fast: false,
        }
    }

    pub fn with_threads(max_threads: usize) -> Self {
        Self {
            max_threads,
            fail_fast: false,
        }
    }

    pub fn validate(&self) -> Result<(), BatchError> {
        if self.max_threads == 0 || self.max_threads > MAX_WORKER_THREADS {
            return Err(BatchError::InvalidThreadCount {
                requested: self.max_threads,
                max: MAX_WORKER_THREADS,
            });
        }
        Ok(())
    }
}

/// Batch processing results, in input order
#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, ParseOutput)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_submitted: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn add_success(&mut self, file_path: PathBuf, output: ParseOutput) {
        self.successful_files.push((file_path, output));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    /// First collected failure whose code requires halting the batch
    pub fn halting_failure(&self) -> Option<&(PathBuf, PipelineError)> {
        self.failed_files.iter().find(|(_, error)| error.requires_halt())
    }

    fn add_outcome(&mut self, file_path: PathBuf, outcome: Result<ParseOutput, PipelineError>) {
        match outcome {
            Ok(output) => self.add_success(file_path, output),
            Err(error) => self.add_failure(file_path, error),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} documents processed, {} successful ({:.1}%), {} failed, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

/// Batch processing errors
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Too many documents in batch: {count} (max: {max})")]
    TooManyDocuments { count: usize, max: usize },

    #[error("Invalid worker thread count: {requested} (allowed: 1..={max})")]
    InvalidThreadCount { requested: usize, max: usize },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::TooManyDocuments { .. } => codes::batch::TOO_MANY_DOCUMENTS,
            Self::InvalidThreadCount { .. } => codes::config::INVALID_VALUE,
            Self::ThreadError { .. } => codes::batch::WORKER_FAILURE,
        }
    }
}

type Outcome = (usize, Result<ParseOutput, PipelineError>);

// ============================================================================
// BATCH PROCESSING
// ============================================================================

/// Parse every file in `files`; per-document failures are collected, not
/// returned
pub fn process_files(
    files: &[PathBuf],
    config: &BatchConfig,
    parser: &ShiftReduceParser,
    scorer: &dyn ActionScorer,
    logger: &LoggingService,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    config.validate()?;

    if files.len() > MAX_DOCUMENTS_PER_BATCH {
        let error = BatchError::TooManyDocuments {
            count: files.len(),
            max: MAX_DOCUMENTS_PER_BATCH,
        };
        log_error!(logger, error.error_code(), &error.to_string());
        return Err(error);
    }

    log_info!(logger, "Starting batch processing",
        "documents" => files.len(),
        "threads" => config.max_threads
    );

    let mut results = BatchResults::new();
    results.files_submitted = files.len();

    if config.max_threads == 1 {
        process_sequential(files, config, parser, scorer, logger, &mut results);
    } else {
        process_parallel(files, config, parser, scorer, logger, &mut results)?;
    }

    results.processing_duration = start_time.elapsed();

    log_success!(
        logger,
        codes::success::BATCH_COMPLETED,
        "Batch processing completed",
        "documents_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );

    Ok(results)
}

fn process_sequential(
    files: &[PathBuf],
    config: &BatchConfig,
    parser: &ShiftReduceParser,
    scorer: &dyn ActionScorer,
    logger: &LoggingService,
    results: &mut BatchResults,
) {
    for file_path in files {
        let outcome = pipeline::process_file(file_path, parser, scorer, logger);
        let failed = outcome.is_err();
        results.add_outcome(file_path.clone(), outcome);

        if failed && should_stop(config, results, logger) {
            break;
        }
    }
}

fn process_parallel(
    files: &[PathBuf],
    config: &BatchConfig,
    parser: &ShiftReduceParser,
    scorer: &dyn ActionScorer,
    logger: &LoggingService,
    results: &mut BatchResults,
) -> Result<(), BatchError> {
    let chunk_size = calculate_chunk_size(files.len(), config.max_threads);

    log_debug!(logger, "Parallel processing configuration",
        "total_documents" => files.len(),
        "chunk_size" => chunk_size,
        "threads" => config.max_threads
    );

    for chunk in files.chunks(chunk_size) {
        let outcomes = process_chunk_parallel(chunk, config.max_threads, parser, scorer, logger)?;
        for (index, outcome) in outcomes {
            results.add_outcome(chunk[index].clone(), outcome);
        }

        if results.failure_count() > 0 && should_stop(config, results, logger) {
            break;
        }
    }
    Ok(())
}

fn should_stop(config: &BatchConfig, results: &BatchResults, logger: &LoggingService) -> bool {
    if let Some((path, error)) = results.halting_failure() {
        log_warning!(
            logger,
            error.error_code(),
            "Unrecoverable failure, stopping batch processing",
            "file" => path.display(),
            "remaining" => results.files_submitted - results.files_processed
        );
        return true;
    }
    if config.fail_fast {
        log_warning!(
            logger,
            codes::batch::WORKER_FAILURE,
            "Fail-fast mode enabled, stopping batch processing"
        );
        return true;
    }
    false
}

/// Spread one chunk over up to `max_threads` scoped workers
fn process_chunk_parallel(
    files: &[PathBuf],
    max_threads: usize,
    parser: &ShiftReduceParser,
    scorer: &dyn ActionScorer,
    logger: &LoggingService,
) -> Result<Vec<Outcome>, BatchError> {
    let files_per_thread = files.len().div_ceil(max_threads).max(1);

    let mut outcomes: Vec<Outcome> = thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(files_per_thread)
            .enumerate()
            .map(|(thread_id, thread_files)| {
                let offset = thread_id * files_per_thread;
                scope.spawn(move || {
                    thread_files
                        .iter()
                        .enumerate()
                        .map(|(local, path)| {
                            (offset + local, pipeline::process_file(path, parser, scorer, logger))
                        })
                        .collect::<Vec<Outcome>>()
                })
            })
            .collect();

        let mut collected = Vec::with_capacity(files.len());
        for handle in handles {
            let thread_outcomes = handle.join().map_err(|_| BatchError::ThreadError {
                message: "Worker thread panicked during processing".to_string(),
            })?;
            collected.extend(thread_outcomes);
        }
        Ok::<_, BatchError>(collected)
    })
    .map_err(|error| {
        log_error!(logger, error.error_code(), &error.to_string());
        error
    })?;

    outcomes.sort_by_key(|(index, _)| *index);
    Ok(outcomes)
}

/// Calculate chunk size for parallel processing
fn calculate_chunk_size(file_count: usize, max_threads: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 1;
    const MAX_CHUNK_SIZE: usize = 64;

    file_count
        .div_ceil(max_threads.max(1))
        .max(max_threads)
        .clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}
