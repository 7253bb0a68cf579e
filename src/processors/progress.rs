// pir/src/processors/progress.rs
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};

/// Progress line for one batch of work, shared by all workers.
pub struct ProgressReporter {
    bar: ProgressBar,
    total: u64,
    completed: AtomicU64,
}

impl ProgressReporter {
    pub fn new(total: usize, label: impl Into<String>) -> Self {
        Self::with_bar(ProgressBar::new(total as u64), total, label)
    }

    /// Same counting behaviour without drawing anything.
    pub fn hidden(total: usize) -> Self {
        Self::with_bar(ProgressBar::hidden(), total, "")
    }

    fn with_bar(bar: ProgressBar, total: usize, label: impl Into<String>) -> Self {
        bar.set_length(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:>12} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_prefix(label.into());

        Self {
            bar,
            total: total as u64,
            completed: AtomicU64::new(0),
        }
    }

    /// Records one finished unit. Calls past the total are ignored.
    pub fn advance(&self) {
        let previous = self
            .completed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |done| {
                (done < self.total).then_some(done + 1)
            });

        if let Ok(done) = previous {
            self.bar.inc(1);
            if done + 1 == self.total {
                self.bar.finish();
            }
        }
    }

    /// Runs `f` with the bar cleared so log lines do not tear it.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bar.suspend(f)
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.completed() == self.total
    }
}
