use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{Layer, filter::LevelFilter, fmt, prelude::*, registry::LookupSpan};

fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Plain-text layer for `--log-file`, with thread ids so interleaved worker
/// events can be told apart.
fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level_filter = level_for(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(path).map_err(CliError::Io)?;
        subscriber.with(file_layer(file)).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;
    use strucflow::core::record::StructureRecord;
    use strucflow::engine::batch::BatchRunner;
    use strucflow::engine::config::AnalysisConfigBuilder;
    use strucflow::workflows::contacts;

    /// Runs a contacts batch over one undecodable record with a file layer
    /// at `level`, and returns what was written.
    fn log_failed_batch(level: LevelFilter) -> String {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("strucflow.log");
        let subscriber = tracing_subscriber::registry()
            .with(level)
            .with(file_layer(File::create(&log_path).unwrap()));

        let config = AnalysisConfigBuilder::new().contact_cutoff(4.0).build().unwrap();
        let records = [StructureRecord {
            structure_id: "NOMODEL".to_string(),
            ..Default::default()
        }];
        // One worker, so batch events stay on the thread holding the subscriber.
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        pool.install(|| {
            tracing::subscriber::with_default(subscriber, || {
                BatchRunner::new().run(&contacts::contacts_stage(&config.contacts), &records);
            })
        });

        std::fs::read_to_string(log_path).unwrap()
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0, false), LevelFilter::WARN);
        assert_eq!(level_for(1, false), LevelFilter::INFO);
        assert_eq!(level_for(2, false), LevelFilter::DEBUG);
        assert_eq!(level_for(7, false), LevelFilter::TRACE);
        assert_eq!(level_for(3, true), LevelFilter::OFF);
    }

    #[test]
    #[serial]
    fn log_file_records_failed_records_with_their_batch() {
        let content = log_failed_batch(level_for(1, false));
        assert!(content.contains("Record failed."));
        assert!(content.contains("record=\"NOMODEL\""));
        assert!(content.contains("stage=\"Contacts\""));
        assert!(content.contains("Batch finished."));
        assert!(content.contains("failed=1"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn default_verbosity_keeps_only_warnings() {
        let content = log_failed_batch(level_for(0, false));
        assert!(content.contains("WARN"));
        assert!(content.contains("Record failed."));
        assert!(!content.contains("Batch finished."));
    }

    #[test]
    #[serial]
    fn quiet_mode_writes_nothing() {
        assert!(log_failed_batch(level_for(2, true)).is_empty());
    }

    #[test]
    #[serial]
    fn unwritable_log_path_is_an_io_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(&invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
