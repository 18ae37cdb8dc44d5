pub mod atoms;
pub mod contacts;
pub mod fragments;
pub mod frequency;
pub mod quality;
pub mod similarity;

use crate::utils::progress::BatchProgress;
use strucflow::engine::batch::{BatchReport, BatchRunner, Identified};
use strucflow::engine::progress::ProgressReporter;
use strucflow::engine::stage::Stage;
use tracing::{info, warn};

/// Runs a stage over every record behind a progress bar.
fn run_stage<I, S>(stage: &S, records: &[I]) -> BatchReport<S::Output>
where
    I: Identified + Sync,
    S: Stage<I>,
{
    let progress = BatchProgress::new();
    let reporter = ProgressReporter::with_callback(progress.callback());
    info!("Running the '{}' stage on {} record(s)...", stage.name(), records.len());
    BatchRunner::with_reporter(reporter).run(stage, records)
}

/// Logs every failed record and prints a one-line summary of the batch.
fn summarize<O>(report: &BatchReport<O>) {
    for (id, error) in report.failures() {
        warn!(record = id, "Skipped record: {}", error.root());
    }
    if report.failed() > 0 {
        println!(
            "{} record(s) processed, {} skipped because of errors (rerun with -v for details).",
            report.succeeded(),
            report.failed()
        );
    } else {
        println!("{} record(s) processed.", report.succeeded());
    }
}
