//! Terminal progress for record batches.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use strucflow::engine::progress::{Progress, ProgressCallback};

const BAR_TEMPLATE: &str =
    "{prefix:<12} [{bar:40.cyan/blue}] {pos}/{len} records, {msg} ({elapsed})";

/// One bar per batch: advances once per record and keeps a running count of
/// the records that failed.
#[derive(Clone)]
pub struct BatchProgress {
    bar: ProgressBar,
    failed: Arc<AtomicU64>,
}

impl BatchProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(style);
        Self {
            bar,
            failed: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        let failures = Arc::clone(&self.failed);

        Box::new(move |event| match event {
            Progress::BatchStart { stage, records } => {
                failures.store(0, Ordering::Relaxed);
                bar.reset();
                bar.set_length(records);
                bar.set_prefix(stage);
                bar.set_message(failure_label(0));
            }
            Progress::RecordDone { failed: true } => {
                let so_far = failures.fetch_add(1, Ordering::Relaxed) + 1;
                bar.set_message(failure_label(so_far));
                bar.inc(1);
            }
            Progress::RecordDone { failed: false } => bar.inc(1),
            Progress::BatchFinish { succeeded, failed } => {
                bar.finish_with_message(format!("✓ {succeeded} ok, {}", failure_label(failed)));
            }
        })
    }
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn failure_label(failed: u64) -> String {
    format!("{failed} failed")
}
