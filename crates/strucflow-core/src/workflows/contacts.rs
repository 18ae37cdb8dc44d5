use crate::core::contacts::{ContactGrid, ContactPair};
use crate::core::decode::decode;
use crate::core::record::StructureRecord;
use crate::engine::config::ContactConfig;
use crate::engine::error::EngineError;
use crate::engine::stage::{FlatMapStage, Stage};
use serde::Serialize;
use tracing::{debug, instrument};

/// One contact, flattened for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRecord {
    pub structure_id: String,
    pub chain_one: String,
    pub group_one: String,
    pub number_one: i32,
    pub atom_one: String,
    pub serial_one: i32,
    pub chain_two: String,
    pub group_two: String,
    pub number_two: i32,
    pub atom_two: String,
    pub serial_two: i32,
    pub distance: f64,
}

impl ContactRecord {
    fn from_pair(structure_id: &str, pair: &ContactPair<'_>) -> Self {
        let (a, b) = (pair.first(), pair.second());
        Self {
            structure_id: structure_id.to_string(),
            chain_one: a.chain().id().to_string(),
            group_one: a.group().name().to_string(),
            number_one: a.group().number(),
            atom_one: a.group_atom_name(),
            serial_one: a.atom().serial(),
            chain_two: b.chain().id().to_string(),
            group_two: b.group().name().to_string(),
            number_two: b.group().number(),
            atom_two: b.group_atom_name(),
            serial_two: b.atom().serial(),
            distance: pair.distance(),
        }
    }
}

/// Decodes a record and lists its contacts.
///
/// Without a second selection the atoms of the first are searched against
/// each other; with one, only pairs across the two selections are reported.
#[instrument(skip_all, name = "contacts_workflow", fields(structure_id = %record.structure_id))]
pub fn find_contacts(
    record: &StructureRecord,
    config: &ContactConfig,
) -> Result<Vec<ContactRecord>, EngineError> {
    let structure = decode(record)?;
    let grid = ContactGrid::new(config.cutoff)?;
    let one = config.selection_one.select(&structure);

    let contacts = match &config.selection_two {
        None => grid.contacts(&one),
        Some(selection) => {
            let two = selection.select(&structure);
            grid.contacts_between(&one, &two)
        }
    };

    debug!(
        selected = one.len(),
        contacts = contacts.len(),
        "Contact search complete."
    );
    Ok(contacts
        .iter()
        .map(|pair| ContactRecord::from_pair(structure.id(), pair))
        .collect())
}

/// Contacts among all atoms of a record.
pub fn find_all_contacts(
    record: &StructureRecord,
    cutoff: f64,
) -> Result<Vec<ContactRecord>, EngineError> {
    find_contacts(
        record,
        &ContactConfig {
            cutoff,
            selection_one: Default::default(),
            selection_two: None,
        },
    )
}

pub fn contacts_stage(
    config: &ContactConfig,
) -> impl Stage<StructureRecord, Output = ContactRecord> + '_ {
    FlatMapStage::new("Contacts", move |record: &StructureRecord| {
        find_contacts(record, config)
    })
}
