use super::{run_stage, summarize};
use crate::cli::FragmentsArgs;
use crate::config::{ConfigOverrides, build_config};
use crate::error::Result;
use crate::io::{read_records, write_csv};
use itertools::Itertools;
use nalgebra::Point3;
use serde::Serialize;
use strucflow::workflows::fragments::{FragmentRecord, Segment, fragments_stage, segments_stage};
use tracing::info;

/// Flattened fragment for CSV output.
#[derive(Debug, Serialize)]
struct FragmentRow<'a> {
    id: &'a str,
    structure_id: &'a str,
    chain_id: &'a str,
    start: usize,
    length: usize,
    sequence: &'a str,
    coordinates: String,
}

impl<'a> From<&'a FragmentRecord> for FragmentRow<'a> {
    fn from(fragment: &'a FragmentRecord) -> Self {
        Self {
            id: &fragment.id,
            structure_id: &fragment.structure_id,
            chain_id: &fragment.chain_id,
            start: fragment.start,
            length: fragment.points.len(),
            sequence: &fragment.sequence,
            coordinates: format_points(&fragment.points),
        }
    }
}

impl<'a> From<&'a Segment> for FragmentRow<'a> {
    fn from(segment: &'a Segment) -> Self {
        Self {
            id: &segment.id,
            structure_id: &segment.structure_id,
            chain_id: &segment.chain_id,
            start: 0,
            length: segment.points.len(),
            sequence: &segment.sequence,
            coordinates: format_points(&segment.points),
        }
    }
}

/// `"x y z;x y z;..."` with three decimals.
pub(super) fn format_points(points: &[Point3<f64>]) -> String {
    points
        .iter()
        .map(|p| format!("{:.3} {:.3} {:.3}", p.x, p.y, p.z))
        .join(";")
}

pub fn run(args: FragmentsArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        fragment_length: args.length,
        representative_atom: args.atom.clone(),
        ..Default::default()
    };
    let app = build_config(&args.common, &overrides)?;
    let records = read_records(&app.input_path)?;
    let config = &app.core_config.fragments;

    let written = if args.whole_chains {
        info!(atom = %config.representative_atom, "Extracting whole-chain segments.");
        let report = run_stage(&segments_stage(config), &records);
        summarize(&report);
        write_csv(&app.output_path, report.outputs().map(FragmentRow::from))?
    } else {
        info!(
            length = ?config.length,
            atom = %config.representative_atom,
            "Extracting backbone fragments."
        );
        let report = run_stage(&fragments_stage(config), &records);
        summarize(&report);
        write_csv(&app.output_path, report.outputs().map(FragmentRow::from))?
    };

    println!("✓ {} fragment(s) written to: {}", written, app.output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_joined_with_three_decimals() {
        let points = [Point3::new(1.0, -2.5, 0.0), Point3::new(3.8, 0.12345, 10.0)];
        assert_eq!(
            format_points(&points),
            "1.000 -2.500 0.000;3.800 0.123 10.000"
        );
        assert_eq!(format_points(&[]), "");
    }

    #[test]
    fn segment_rows_start_at_zero() {
        let segment = Segment {
            id: "1ABC.A".to_string(),
            structure_id: "1ABC".to_string(),
            chain_id: "A".to_string(),
            sequence: "GG".to_string(),
            points: vec![Point3::origin(), Point3::new(3.8, 0.0, 0.0)],
        };
        let row = FragmentRow::from(&segment);
        assert_eq!(row.start, 0);
        assert_eq!(row.length, 2);
        assert_eq!(row.id, "1ABC.A");
    }
}
