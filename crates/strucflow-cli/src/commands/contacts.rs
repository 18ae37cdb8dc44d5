use super::{run_stage, summarize};
use crate::cli::ContactsArgs;
use crate::config::{ConfigOverrides, build_config};
use crate::error::Result;
use crate::io::{read_records, write_csv};
use strucflow::workflows::contacts::contacts_stage;
use tracing::info;

pub fn run(args: ContactsArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        contact_cutoff: args.cutoff,
        ..Default::default()
    };
    let app = build_config(&args.common, &overrides)?;
    let records = read_records(&app.input_path)?;

    let config = &app.core_config.contacts;
    info!(
        cutoff = config.cutoff,
        two_lists = config.selection_two.is_some(),
        "Searching contacts."
    );
    let report = run_stage(&contacts_stage(config), &records);
    summarize(&report);

    let rows = write_csv(&app.output_path, report.outputs())?;
    println!("✓ {} contact(s) written to: {}", rows, app.output_path.display());
    Ok(())
}
