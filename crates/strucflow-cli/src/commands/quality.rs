use super::{run_stage, summarize};
use crate::cli::QualityArgs;
use crate::config::{ConfigOverrides, build_config};
use crate::error::Result;
use crate::io::{read_records, write_records};
use strucflow::workflows::quality::quality_stage;
use tracing::{info, warn};

pub fn run(args: QualityArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        max_resolution: args.max_resolution,
        max_r_free: args.max_r_free,
        ..Default::default()
    };
    let app = build_config(&args.common, &overrides)?;
    let records = read_records(&app.input_path)?;

    let config = &app.core_config.quality;
    if config.max_resolution.is_none() && config.max_r_free.is_none() {
        warn!("No quality bound configured; every record will be kept.");
    }
    info!(
        max_resolution = ?config.max_resolution,
        max_r_free = ?config.max_r_free,
        "Filtering records."
    );
    let report = run_stage(&quality_stage(config), &records);
    summarize(&report);

    let kept = write_records(&app.output_path, report.outputs())?;
    println!(
        "✓ {} of {} record(s) kept, written to: {}",
        kept,
        records.len(),
        app.output_path.display()
    );
    Ok(())
}
