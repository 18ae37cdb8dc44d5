use super::{run_stage, summarize};
use crate::cli::FrequencyArgs;
use crate::config::{ConfigOverrides, build_config};
use crate::error::Result;
use crate::io::{read_records, write_csv};
use serde::Serialize;
use strucflow::workflows::atoms::frequency_stage;
use tracing::info;

#[derive(Debug, Serialize)]
struct FrequencyRow<'a> {
    key: &'a str,
    count: usize,
    fraction: f64,
}

pub fn run(args: FrequencyArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        key_rule: args.key,
        ..Default::default()
    };
    let app = build_config(&args.common, &overrides)?;
    let records = read_records(&app.input_path)?;

    let config = &app.core_config.frequency;
    info!("Counting atoms by {}.", config.key);
    let report = run_stage(&frequency_stage(config), &records);
    summarize(&report);

    let table = report.merged_frequencies();
    let total = table.total();
    let rows = table.sorted().into_iter().map(|(key, count)| FrequencyRow {
        key,
        count,
        fraction: if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        },
    });
    let written = write_csv(&app.output_path, rows)?;
    println!(
        "✓ {} distinct key(s) over {} atom(s) written to: {}",
        written,
        total,
        app.output_path.display()
    );
    Ok(())
}
