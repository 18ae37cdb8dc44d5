//! The columnar structure record consumed by the decoder.
//!
//! A record stores a whole structure as parallel, index-aligned arrays instead
//! of an object graph. Group-level chemistry (atom names, elements, charges) is
//! stored once per distinct chemical component in [`GroupType`] tables and
//! referenced from every group by index; per-atom data (coordinates, serials)
//! is stored flat across all models, chains and groups in record order.

use serde::{Deserialize, Serialize};

/// Atom-type table for one chemical component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupType {
    pub group_name: String,
    pub atom_names: Vec<String>,
    pub element_names: Vec<String>,
    pub atom_charges: Vec<i32>,
    #[serde(default)]
    pub chem_comp_type: String,
    /// One-letter code of the component, `None` (or `'?'`) when it has none.
    #[serde(default)]
    pub single_letter_code: Option<char>,
}

impl GroupType {
    /// Number of atoms every group of this type contributes.
    pub fn atom_count(&self) -> usize {
        self.atom_charges.len()
    }
}

/// A macromolecular structure in columnar form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureRecord {
    pub structure_id: String,
    pub num_models: usize,
    /// Number of chains of each model; chains are listed model after model.
    pub chains_per_model: Vec<usize>,
    /// Number of groups of each chain, over all models.
    pub groups_per_chain: Vec<usize>,
    /// Index into [`group_types`](Self::group_types) for every group, over all models.
    pub group_type_indices: Vec<usize>,
    /// Residue number of every group. Empty means "position within the chain".
    #[serde(default)]
    pub group_sequence_numbers: Vec<i32>,
    /// Chain identifier of every chain, over all models.
    pub chain_ids: Vec<String>,
    /// Entity category of every chain. Empty means every chain is a polymer.
    #[serde(default)]
    pub chain_entity_types: Vec<String>,
    pub group_types: Vec<GroupType>,
    /// Serial of every atom. Empty means 1-based running serials.
    #[serde(default)]
    pub atom_ids: Vec<i32>,
    pub x_coords: Vec<f32>,
    pub y_coords: Vec<f32>,
    pub z_coords: Vec<f32>,
    #[serde(default)]
    pub resolution: Option<f32>,
    #[serde(default)]
    pub r_free: Option<f32>,
    #[serde(default)]
    pub r_work: Option<f32>,
}

impl StructureRecord {
    /// Total number of chains across all models.
    pub fn num_chains(&self) -> usize {
        self.groups_per_chain.len()
    }

    /// Total number of groups across all models.
    pub fn num_groups(&self) -> usize {
        self.group_type_indices.len()
    }

    /// Total number of atoms, as given by the coordinate arrays.
    pub fn num_atoms(&self) -> usize {
        self.x_coords.len()
    }
}
