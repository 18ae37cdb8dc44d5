use super::chain::EntityType;
use super::ids::{AtomId, ChainId};
use std::collections::HashMap;

/// A residue-like group: one chemical component instance inside a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub(crate) name: String,                // Chemical component name (e.g. "ALA", "HOH")
    pub(crate) category: EntityType,        // Category tag inherited from the owning chain
    pub(crate) number: i32,                 // Sequence position within the chain
    pub(crate) single_letter_code: Option<char>,
    pub(crate) chain_id: ChainId,           // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,          // Atoms in record order
    atom_name_map: HashMap<String, AtomId>, // First atom carrying each name
}

impl Group {
    pub(crate) fn new(
        name: &str,
        category: EntityType,
        number: i32,
        single_letter_code: Option<char>,
        chain_id: ChainId,
    ) -> Self {
        Self {
            name: name.to_string(),
            category,
            number,
            single_letter_code,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> EntityType {
        self.category
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn single_letter_code(&self) -> Option<char> {
        self.single_letter_code
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Returns the first atom of this group carrying `name`, if any.
    pub fn atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }
}
