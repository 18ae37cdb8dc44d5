use crate::core::decode::decode;
use crate::core::fragments::{BackboneTrace, backbone_traces, fragment_windows};
use crate::core::record::StructureRecord;
use crate::engine::batch::Identified;
use crate::engine::config::FragmentConfig;
use crate::engine::error::EngineError;
use crate::engine::stage::{FlatMapStage, Stage};
use nalgebra::Point3;
use tracing::{debug, instrument};

/// A whole polymer chain as a representative-atom trace plus its sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// `"<structure id>.<chain id>"`
    pub id: String,
    pub structure_id: String,
    pub chain_id: String,
    pub sequence: String,
    pub points: Vec<Point3<f64>>,
}

impl Identified for Segment {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One backbone window of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentRecord {
    /// `"<structure id>.<chain id>.<start>"`
    pub id: String,
    pub structure_id: String,
    pub chain_id: String,
    /// Offset of the first point in the chain trace.
    pub start: usize,
    pub sequence: String,
    pub points: Vec<Point3<f64>>,
}

impl Identified for FragmentRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

fn traces(
    record: &StructureRecord,
    config: &FragmentConfig,
) -> Result<Vec<BackboneTrace>, EngineError> {
    let structure = decode(record)?;
    Ok(backbone_traces(&structure, &config.representative_atom))
}

/// Decodes a record into one segment per polymer chain.
#[instrument(skip_all, name = "segments_workflow", fields(structure_id = %record.structure_id))]
pub fn segments(
    record: &StructureRecord,
    config: &FragmentConfig,
) -> Result<Vec<Segment>, EngineError> {
    let segments: Vec<Segment> = traces(record, config)?
        .into_iter()
        .map(|trace| Segment {
            id: format!("{}.{}", record.structure_id, trace.chain_id),
            structure_id: record.structure_id.clone(),
            chain_id: trace.chain_id,
            sequence: trace.sequence,
            points: trace.points,
        })
        .collect();
    debug!(segments = segments.len(), "Segment extraction complete.");
    Ok(segments)
}

/// Decodes a record and cuts every polymer chain into backbone windows.
#[instrument(skip_all, name = "fragments_workflow", fields(structure_id = %record.structure_id))]
pub fn fragments(
    record: &StructureRecord,
    config: &FragmentConfig,
) -> Result<Vec<FragmentRecord>, EngineError> {
    let mut out = Vec::new();
    for trace in traces(record, config)? {
        // Sequence letters and points are index-aligned.
        let letters: Vec<char> = trace.sequence.chars().collect();
        for window in fragment_windows(trace.len(), config.length) {
            out.push(FragmentRecord {
                id: format!("{}.{}.{}", record.structure_id, trace.chain_id, window.start),
                structure_id: record.structure_id.clone(),
                chain_id: trace.chain_id.clone(),
                start: window.start,
                sequence: letters[window.clone()].iter().collect(),
                points: trace.points[window].to_vec(),
            });
        }
    }
    debug!(fragments = out.len(), length = ?config.length, "Fragment extraction complete.");
    Ok(out)
}

pub fn segments_stage(
    config: &FragmentConfig,
) -> impl Stage<StructureRecord, Output = Segment> + '_ {
    FlatMapStage::new("Segments", move |record: &StructureRecord| {
        segments(record, config)
    })
}

pub fn fragments_stage(
    config: &FragmentConfig,
) -> impl Stage<StructureRecord, Output = FragmentRecord> + '_ {
    FlatMapStage::new("Fragments", move |record: &StructureRecord| {
        fragments(record, config)
    })
}
