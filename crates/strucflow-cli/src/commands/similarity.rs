use super::fragments::format_points;
use super::{run_stage, summarize};
use crate::cli::SimilarityArgs;
use crate::config::{ConfigOverrides, build_config};
use crate::error::{CliError, Result};
use crate::io::{read_records, write_csv};
use serde::Serialize;
use strucflow::workflows::similarity::{SimilarSegment, build_filter, similarity_stage};
use tracing::info;

/// A kept chain with its alignment scores against the reference.
#[derive(Debug, Serialize)]
struct SimilarityRow<'a> {
    id: &'a str,
    structure_id: &'a str,
    chain_id: &'a str,
    length: usize,
    sequence: &'a str,
    similarity: f64,
    identity: f64,
    coordinates: String,
}

impl<'a> From<&'a SimilarSegment> for SimilarityRow<'a> {
    fn from(kept: &'a SimilarSegment) -> Self {
        let segment = &kept.segment;
        Self {
            id: &segment.id,
            structure_id: &segment.structure_id,
            chain_id: &segment.chain_id,
            length: segment.points.len(),
            sequence: &segment.sequence,
            similarity: kept.similarity,
            identity: kept.identity,
            coordinates: format_points(&segment.points),
        }
    }
}

pub fn run(args: SimilarityArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        reference_sequence: args.reference.clone(),
        min_similarity: args.min_similarity,
        representative_atom: args.atom.clone(),
        ..Default::default()
    };
    let app = build_config(&args.common, &overrides)?;
    let similarity = app.core_config.similarity.as_ref().ok_or_else(|| {
        CliError::Config(
            "A reference sequence and a minimum similarity are required either in the config file or via CLI arguments.".to_string(),
        )
    })?;
    let filter = build_filter(similarity)?;
    let records = read_records(&app.input_path)?;

    info!(
        reference_length = similarity.reference.len(),
        min_similarity = similarity.min_similarity,
        "Filtering chains by sequence similarity."
    );
    let report = run_stage(
        &similarity_stage(&app.core_config.fragments, &filter),
        &records,
    );
    summarize(&report);

    let written = write_csv(&app.output_path, report.outputs().map(SimilarityRow::from))?;
    println!("✓ {} similar chain(s) written to: {}", written, app.output_path.display());
    Ok(())
}
