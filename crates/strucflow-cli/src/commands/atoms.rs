use super::{run_stage, summarize};
use crate::cli::AtomsArgs;
use crate::config::{ConfigOverrides, build_config};
use crate::error::Result;
use crate::io::{read_records, write_csv};
use strucflow::workflows::atoms::atoms_stage;

pub fn run(args: AtomsArgs) -> Result<()> {
    let app = build_config(&args.common, &ConfigOverrides::default())?;
    let records = read_records(&app.input_path)?;

    let report = run_stage(&atoms_stage(&app.core_config.frequency.selection), &records);
    summarize(&report);

    let rows = write_csv(&app.output_path, report.outputs())?;
    println!("✓ {} atom(s) written to: {}", rows, app.output_path.display());
    Ok(())
}
