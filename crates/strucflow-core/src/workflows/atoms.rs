use crate::core::decode::decode;
use crate::core::frequency::{FrequencyTable, count_frequencies};
use crate::core::models::structure::AtomRef;
use crate::core::record::StructureRecord;
use crate::core::selection::AtomSelection;
use crate::engine::config::FrequencyConfig;
use crate::engine::error::EngineError;
use crate::engine::stage::{FlatMapStage, MapStage, Stage};
use serde::Serialize;
use tracing::{debug, instrument};

/// One selected atom, flattened for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomRecord {
    pub structure_id: String,
    pub chain_id: String,
    pub group_name: String,
    pub group_number: i32,
    pub atom_name: String,
    pub element: String,
    pub charge: i32,
    pub serial: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AtomRecord {
    fn from_atom(structure_id: &str, atom: &AtomRef<'_>) -> Self {
        let p = atom.position();
        Self {
            structure_id: structure_id.to_string(),
            chain_id: atom.chain().id().to_string(),
            group_name: atom.group().name().to_string(),
            group_number: atom.group().number(),
            atom_name: atom.name().to_string(),
            element: atom.element().to_string(),
            charge: atom.atom().charge(),
            serial: atom.atom().serial(),
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

/// Decodes a record and returns its selected atoms in decode order.
#[instrument(skip_all, name = "atoms_workflow", fields(structure_id = %record.structure_id))]
pub fn find_atoms(
    record: &StructureRecord,
    selection: &AtomSelection,
) -> Result<Vec<AtomRecord>, EngineError> {
    let structure = decode(record)?;
    let selected = selection.select(&structure);
    debug!(
        total = structure.atom_count(),
        selected = selected.len(),
        "Atom selection complete."
    );
    Ok(selected
        .iter()
        .map(|atom| AtomRecord::from_atom(structure.id(), atom))
        .collect())
}

/// Decodes a record and counts its selected atoms by the configured key.
#[instrument(skip_all, name = "frequency_workflow", fields(structure_id = %record.structure_id))]
pub fn count_atoms(
    record: &StructureRecord,
    config: &FrequencyConfig,
) -> Result<FrequencyTable<String>, EngineError> {
    let structure = decode(record)?;
    let table = count_frequencies(config.selection.select(&structure), &config.key);
    debug!(keys = table.len(), atoms = table.total(), "Frequency count complete.");
    Ok(table)
}

pub fn atoms_stage(
    selection: &AtomSelection,
) -> impl Stage<StructureRecord, Output = AtomRecord> + '_ {
    FlatMapStage::new("Atoms", move |record: &StructureRecord| {
        find_atoms(record, selection)
    })
}

/// Per-record frequency tables; merge them with
/// [`BatchReport::merged_frequencies`](crate::engine::batch::BatchReport::merged_frequencies).
pub fn frequency_stage(
    config: &FrequencyConfig,
) -> impl Stage<StructureRecord, Output = FrequencyTable<String>> + '_ {
    MapStage::new("Frequency", move |record: &StructureRecord| {
        count_atoms(record, config)
    })
}
