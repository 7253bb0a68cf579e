// pir/src/processors/batch.rs
use crate::core::processor::{FileTransform, ImageProcessor};
use crate::core::{
    BatchOutcome, ImageSet, ImageToolError, ProcessConfig, Resolution, ResolutionOutcome, Result,
    SkippedFile, TransformOutcome,
};
use crate::processors::ProgressReporter;
use crate::utils::format_elapsed;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Shared bookkeeping for one resolution. Workers only touch it through
/// `record`.
struct Tally {
    progress: ProgressReporter,
    written: AtomicUsize,
    skipped: Mutex<Vec<SkippedFile>>,
}

impl Tally {
    fn new(progress: ProgressReporter) -> Self {
        Self {
            progress,
            written: AtomicUsize::new(0),
            skipped: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, file: &str, resolution: Resolution, outcome: TransformOutcome) {
        match outcome {
            TransformOutcome::Written(_) => {
                self.written.fetch_add(1, Ordering::Relaxed);
            }
            TransformOutcome::Skipped(reason) => {
                self.progress.suspend(|| {
                    log::warn!("Skipping {} at {}: {}", file, resolution, reason)
                });
                self.skipped
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(SkippedFile {
                        file: file.to_string(),
                        reason,
                    });
            }
        }
        self.progress.advance();
    }

    fn into_parts(self) -> (usize, Vec<SkippedFile>) {
        let skipped = self
            .skipped
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        (self.written.into_inner(), skipped)
    }
}

pub struct BatchProcessor<T = ImageProcessor> {
    config: ProcessConfig,
    transform: T,
    cancel: Option<Arc<AtomicBool>>,
    show_progress: bool,
}

impl BatchProcessor<ImageProcessor> {
    pub fn new(config: ProcessConfig) -> Self {
        let transform = ImageProcessor::new(config.clone());
        Self::with_transform(config, transform)
    }
}

impl<T: FileTransform> BatchProcessor<T> {
    pub fn with_transform(config: ProcessConfig, transform: T) -> Self {
        Self {
            config,
            transform,
            cancel: None,
            show_progress: true,
        }
    }

    /// Stops the batch before the next file or resolution once `flag` is set.
    /// A resolution whose files all ran to completion is still reported.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Runs every configured resolution over `images`, one after another.
    pub fn run(&self, images: &ImageSet) -> Result<BatchOutcome> {
        self.config.validate()?;

        let started = Instant::now();
        let mut outcome = BatchOutcome {
            total_files: images.len(),
            ..Default::default()
        };

        for &resolution in &self.config.resolutions {
            self.check_cancelled()?;
            outcome.resolutions.push(self.run_resolution(images, resolution)?);
        }
        outcome.elapsed = started.elapsed();

        let skipped = outcome.skipped_count();
        if skipped > 0 {
            log::info!("Skipped {} file(s)", skipped);
        }
        log::info!("Finished in {}", format_elapsed(outcome.elapsed));

        Ok(outcome)
    }

    fn run_resolution(&self, images: &ImageSet, resolution: Resolution) -> Result<ResolutionOutcome> {
        let started = Instant::now();
        let destination = self.config.destination_for(resolution);
        std::fs::create_dir_all(&destination)?;

        log::debug!(
            "Processing {} file(s) at {} into {}",
            images.len(),
            resolution,
            destination.display()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|index| format!("pir-worker-{}", index))
            .build()
            .map_err(|e| {
                ImageToolError::ProcessingError(format!("Failed to create thread pool: {}", e))
            })?;

        let progress = if self.show_progress {
            ProgressReporter::new(images.len(), resolution.to_string())
        } else {
            ProgressReporter::hidden(images.len())
        };
        let tally = Tally::new(progress);

        pool.install(|| {
            images.files.par_iter().for_each(|file| {
                if self.is_cancelled() {
                    return;
                }
                let outcome =
                    self.transform
                        .transform(file, &images.base_dir, &destination, resolution);
                tally.record(file, resolution, outcome);
            })
        });
        drop(pool);

        if !tally.progress.is_finished() {
            self.check_cancelled()?;
        }

        let elapsed = started.elapsed();
        tally.progress.suspend(|| {
            log::info!("{} done in {}", resolution, format_elapsed(elapsed))
        });
        let (written, skipped) = tally.into_parts();

        Ok(ResolutionOutcome {
            resolution,
            destination,
            written,
            skipped,
            elapsed,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::SeqCst))
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ImageToolError::Cancelled)
        } else {
            Ok(())
        }
    }
}
