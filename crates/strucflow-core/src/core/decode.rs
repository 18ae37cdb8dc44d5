//! Columnar record → atom hierarchy.
//!
//! The whole record is validated before anything is assembled, so a record is
//! either decoded completely or rejected with a [`DecodeError`]. Only the first
//! model is decoded; atoms of later models are validated and then skipped.

use crate::core::models::builder::StructureBuilder;
use crate::core::models::chain::EntityType;
use crate::core::models::structure::{Metadata, Structure};
use crate::core::record::StructureRecord;
use nalgebra::Point3;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, instrument};

const UNKNOWN_SINGLE_LETTER_CODE: char = '?';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Record declares no models")]
    NoModels,

    #[error("Column '{column}' has {found} entries, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Group {group} references atom-type table {index}, but only {available} exist")]
    MissingGroupType {
        group: usize,
        index: usize,
        available: usize,
    },

    #[error(
        "Atom-type table {index} ('{name}') is inconsistent: {names} names, {elements} elements, {charges} charges"
    )]
    InconsistentGroupType {
        index: usize,
        name: String,
        names: usize,
        elements: usize,
        charges: usize,
    },

    #[error("Atom-type tables imply {expected} atoms, but the coordinate arrays hold {found}")]
    AtomCountMismatch { expected: usize, found: usize },
}

/// Decodes the first model of a record into a [`Structure`].
///
/// Atoms are emitted chain by chain, group by group, in record order, consuming
/// the flat coordinate arrays through a single monotonic cursor.
///
/// # Errors
///
/// Returns a [`DecodeError`] if any column length disagrees with the counts the
/// record declares, if a group references a missing atom-type table, or if the
/// atom-type tables do not account for exactly the atoms in the coordinate arrays.
#[instrument(level = "debug", skip_all, fields(structure_id = %record.structure_id))]
pub fn decode(record: &StructureRecord) -> Result<Structure, DecodeError> {
    validate(record)?;

    let mut builder = StructureBuilder::new(&record.structure_id);
    builder.metadata(Metadata {
        num_models: record.num_models,
        resolution: finite(record.resolution),
        r_free: finite(record.r_free),
        r_work: finite(record.r_work),
    });

    let chains_in_model = record.chains_per_model[0];
    let mut group_cursor = 0usize;
    let mut atom_cursor = 0usize;

    for chain_index in 0..chains_in_model {
        let entity_type = record
            .chain_entity_types
            .get(chain_index)
            .map(|s| EntityType::from_str(s).unwrap_or(EntityType::Other))
            .unwrap_or(EntityType::Polymer);
        let chain_id = builder.add_chain(&record.chain_ids[chain_index], entity_type);

        for offset in 0..record.groups_per_chain[chain_index] {
            let group_index = group_cursor + offset;
            let group_type = &record.group_types[record.group_type_indices[group_index]];
            let number = record
                .group_sequence_numbers
                .get(group_index)
                .copied()
                .unwrap_or(offset as i32);
            let code = group_type
                .single_letter_code
                .filter(|&c| c != UNKNOWN_SINGLE_LETTER_CODE);
            let group_id = builder.add_group(chain_id, &group_type.group_name, number, code);

            for j in 0..group_type.atom_count() {
                let serial = record
                    .atom_ids
                    .get(atom_cursor)
                    .copied()
                    .unwrap_or(atom_cursor as i32 + 1);
                let position = Point3::new(
                    f64::from(record.x_coords[atom_cursor]),
                    f64::from(record.y_coords[atom_cursor]),
                    f64::from(record.z_coords[atom_cursor]),
                );
                builder.add_atom(
                    group_id,
                    serial,
                    &group_type.atom_names[j],
                    &group_type.element_names[j],
                    group_type.atom_charges[j],
                    position,
                );
                atom_cursor += 1;
            }
        }
        group_cursor += record.groups_per_chain[chain_index];
    }

    let structure = builder.build();
    debug!(
        chains = structure.chain_count(),
        groups = structure.group_count(),
        atoms = structure.atom_count(),
        skipped_models = record.num_models.saturating_sub(1),
        "Decoded first model."
    );
    Ok(structure)
}

fn validate(record: &StructureRecord) -> Result<(), DecodeError> {
    if record.num_models == 0 || record.chains_per_model.is_empty() {
        return Err(DecodeError::NoModels);
    }
    check_len("chainsPerModel", record.num_models, record.chains_per_model.len())?;

    let num_chains: usize = record.chains_per_model.iter().sum();
    check_len("groupsPerChain", num_chains, record.groups_per_chain.len())?;
    check_len("chainIds", num_chains, record.chain_ids.len())?;
    check_optional_len(
        "chainEntityTypes",
        num_chains,
        record.chain_entity_types.len(),
    )?;

    let num_groups: usize = record.groups_per_chain.iter().sum();
    check_len("groupTypeIndices", num_groups, record.group_type_indices.len())?;
    check_optional_len(
        "groupSequenceNumbers",
        num_groups,
        record.group_sequence_numbers.len(),
    )?;

    for (index, group_type) in record.group_types.iter().enumerate() {
        let charges = group_type.atom_charges.len();
        if group_type.atom_names.len() != charges || group_type.element_names.len() != charges {
            return Err(DecodeError::InconsistentGroupType {
                index,
                name: group_type.group_name.clone(),
                names: group_type.atom_names.len(),
                elements: group_type.element_names.len(),
                charges,
            });
        }
    }

    let mut expected_atoms = 0usize;
    for (group, &index) in record.group_type_indices.iter().enumerate() {
        let group_type =
            record
                .group_types
                .get(index)
                .ok_or(DecodeError::MissingGroupType {
                    group,
                    index,
                    available: record.group_types.len(),
                })?;
        expected_atoms += group_type.atom_count();
    }

    let num_atoms = record.x_coords.len();
    check_len("yCoords", num_atoms, record.y_coords.len())?;
    check_len("zCoords", num_atoms, record.z_coords.len())?;
    check_optional_len("atomIds", num_atoms, record.atom_ids.len())?;

    if expected_atoms != num_atoms {
        return Err(DecodeError::AtomCountMismatch {
            expected: expected_atoms,
            found: num_atoms,
        });
    }
    Ok(())
}

fn check_len(column: &'static str, expected: usize, found: usize) -> Result<(), DecodeError> {
    if expected == found {
        Ok(())
    } else {
        Err(DecodeError::LengthMismatch {
            column,
            expected,
            found,
        })
    }
}

/// Optional columns may be left empty; otherwise they must be complete.
fn check_optional_len(
    column: &'static str,
    expected: usize,
    found: usize,
) -> Result<(), DecodeError> {
    if found == 0 {
        Ok(())
    } else {
        check_len(column, expected, found)
    }
}

fn finite(value: Option<f32>) -> Option<f64> {
    value.map(f64::from).filter(|v| v.is_finite())
}
