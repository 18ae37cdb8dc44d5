use super::atom::Atom;
use super::chain::{Chain, EntityType};
use super::group::Group;
use super::ids::{AtomId, ChainId, GroupId};
use super::structure::{Metadata, Structure};
use nalgebra::Point3;

/// Assembles a [`Structure`] in a single pass.
///
/// Only the decoder (and tests) construct structures; after [`build`](Self::build)
/// the hierarchy is frozen and exposed through read accessors only.
pub(crate) struct StructureBuilder {
    structure: Structure,
}

impl StructureBuilder {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            structure: Structure {
                id: id.to_string(),
                ..Structure::default()
            },
        }
    }

    pub(crate) fn metadata(&mut self, metadata: Metadata) -> &mut Self {
        self.structure.metadata = metadata;
        self
    }

    pub(crate) fn add_chain(&mut self, id: &str, entity_type: EntityType) -> ChainId {
        let chain_id = self.structure.chains.insert(Chain::new(id, entity_type));
        self.structure.chain_order.push(chain_id);
        chain_id
    }

    /// Appends a group to `chain_id`. The chain must come from this builder.
    pub(crate) fn add_group(
        &mut self,
        chain_id: ChainId,
        name: &str,
        number: i32,
        single_letter_code: Option<char>,
    ) -> GroupId {
        let category = self.structure.chains[chain_id].entity_type;
        let group_id = self.structure.groups.insert(Group::new(
            name,
            category,
            number,
            single_letter_code,
            chain_id,
        ));
        self.structure.chains[chain_id].groups.push(group_id);
        group_id
    }

    /// Appends an atom to `group_id`. The group must come from this builder.
    pub(crate) fn add_atom(
        &mut self,
        group_id: GroupId,
        serial: i32,
        name: &str,
        element: &str,
        charge: i32,
        position: Point3<f64>,
    ) -> AtomId {
        let atom = Atom::new(serial, name, element, charge, position, group_id);
        let atom_id = self.structure.atoms.insert(atom);
        self.structure.groups[group_id].add_atom(name, atom_id);
        self.structure.atom_order.push(atom_id);
        atom_id
    }

    pub(crate) fn build(self) -> Structure {
        self.structure
    }
}
