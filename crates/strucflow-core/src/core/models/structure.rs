use super::atom::Atom;
use super::chain::{Chain, EntityType};
use super::group::Group;
use super::ids::{AtomId, ChainId, GroupId};
use nalgebra::Point3;
use slotmap::SlotMap;
use std::fmt;

/// Scalar quality metadata carried over from the source record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metadata {
    /// Number of models present in the record (only the first is decoded).
    pub num_models: usize,
    /// Crystallographic resolution in Angstroms, if reported.
    pub resolution: Option<f64>,
    /// R-free refinement score, if reported.
    pub r_free: Option<f64>,
    /// R-work refinement score, if reported.
    pub r_work: Option<f64>,
}

/// A decoded structure: the chain, group and atom hierarchy of one record.
///
/// All entities live in slot maps owned by this struct. Chains reference their
/// groups and groups their atoms by id; atoms and groups point back to their
/// owner by id only, so the hierarchy stays strictly tree-shaped. Once built by
/// the decoder the structure is read-only.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    pub(crate) id: String,
    pub(crate) atoms: SlotMap<AtomId, Atom>,
    pub(crate) groups: SlotMap<GroupId, Group>,
    pub(crate) chains: SlotMap<ChainId, Chain>,
    /// Chains in record order.
    pub(crate) chain_order: Vec<ChainId>,
    /// Atoms in decode (record) order.
    pub(crate) atom_order: Vec<AtomId>,
    pub(crate) metadata: Metadata,
}

impl Structure {
    /// The identifier of the source record (e.g. a PDB code).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    pub fn atom_count(&self) -> usize {
        self.atom_order.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn chain_count(&self) -> usize {
        self.chain_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_order.is_empty()
    }

    /// Returns a view of one atom, resolving its group and chain on demand.
    pub fn atom_ref(&self, id: AtomId) -> Option<AtomRef<'_>> {
        self.atoms.get(id).map(|atom| AtomRef {
            structure: self,
            id,
            atom,
        })
    }

    /// Iterates over all atoms in decode order.
    pub fn atoms(&self) -> impl Iterator<Item = AtomRef<'_>> {
        self.atom_order.iter().map(move |&id| AtomRef {
            structure: self,
            id,
            atom: &self.atoms[id],
        })
    }

    /// Iterates over all chains in record order.
    pub fn chains(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order.iter().map(move |&id| (id, &self.chains[id]))
    }

    /// Iterates over the groups of a chain in record order.
    ///
    /// Yields nothing for an unknown chain id.
    pub fn groups_of(&self, chain_id: ChainId) -> impl Iterator<Item = (GroupId, &Group)> {
        self.chains
            .get(chain_id)
            .map(|chain| chain.groups.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&id| (id, &self.groups[id]))
    }

    /// Finds the first chain carrying the given identifier.
    pub fn find_chain_by_name(&self, name: &str) -> Option<ChainId> {
        self.chain_order
            .iter()
            .copied()
            .find(|&id| self.chains[id].id == name)
    }

    /// Iterates over the polymer chains in record order.
    pub fn polymer_chains(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains()
            .filter(|(_, chain)| chain.entity_type == EntityType::Polymer)
    }
}

/// A borrowed view of one atom together with the structure that owns it.
///
/// This is the currency of the analysis operations: selections return atom
/// views, and contact pairs and frequency keys are computed from them.
#[derive(Clone, Copy)]
pub struct AtomRef<'a> {
    structure: &'a Structure,
    id: AtomId,
    atom: &'a Atom,
}

impl<'a> AtomRef<'a> {
    pub fn id(&self) -> AtomId {
        self.id
    }

    pub fn atom(&self) -> &'a Atom {
        self.atom
    }

    pub fn structure(&self) -> &'a Structure {
        self.structure
    }

    pub fn name(&self) -> &'a str {
        &self.atom.name
    }

    pub fn element(&self) -> &'a str {
        &self.atom.element
    }

    pub fn position(&self) -> &'a Point3<f64> {
        &self.atom.position
    }

    pub fn group(&self) -> &'a Group {
        &self.structure.groups[self.atom.group_id]
    }

    pub fn chain(&self) -> &'a Chain {
        &self.structure.chains[self.group().chain_id]
    }

    /// The conjoined "RES_ATOM" name, e.g. "ALA_CA".
    pub fn group_atom_name(&self) -> String {
        format!("{}_{}", self.group().name, self.atom.name)
    }

    pub fn distance_to(&self, other: &AtomRef<'_>) -> f64 {
        self.atom.distance_to(other.atom)
    }
}

impl PartialEq for AtomRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.structure, other.structure) && self.id == other.id
    }
}

impl Eq for AtomRef<'_> {}

impl fmt::Debug for AtomRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomRef")
            .field("id", &self.id)
            .field("serial", &self.atom.serial)
            .field("name", &self.group_atom_name())
            .field("position", &self.atom.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::StructureBuilder;

    fn two_chain_structure() -> Structure {
        let mut builder = StructureBuilder::new("1ABC");
        let a = builder.add_chain("A", EntityType::Polymer);
        let ala = builder.add_group(a, "ALA", 0, Some('A'));
        builder.add_atom(ala, 1, "N", "N", 0, Point3::new(0.0, 0.0, 0.0));
        builder.add_atom(ala, 2, "CA", "C", 0, Point3::new(1.5, 0.0, 0.0));
        let lys = builder.add_group(a, "LYS", 1, Some('K'));
        builder.add_atom(lys, 3, "NZ", "N", 1, Point3::new(4.0, 0.0, 0.0));
        let w = builder.add_chain("W", EntityType::Water);
        let hoh = builder.add_group(w, "HOH", 0, None);
        builder.add_atom(hoh, 4, "O", "O", 0, Point3::new(9.0, 9.0, 9.0));
        builder.build()
    }

    #[test]
    fn atoms_iterate_in_insertion_order() {
        let structure = two_chain_structure();
        let names: Vec<_> = structure.atoms().map(|a| a.group_atom_name()).collect();
        assert_eq!(names, vec!["ALA_N", "ALA_CA", "LYS_NZ", "HOH_O"]);
        assert_eq!(structure.atom_count(), 4);
        assert_eq!(structure.group_count(), 3);
        assert_eq!(structure.chain_count(), 2);
    }

    #[test]
    fn atom_ref_resolves_group_and_chain_back_references() {
        let structure = two_chain_structure();
        let nz = structure.atoms().nth(2).unwrap();
        assert_eq!(nz.name(), "NZ");
        assert_eq!(nz.group().name(), "LYS");
        assert_eq!(nz.group().number(), 1);
        assert_eq!(nz.chain().id(), "A");
        assert_eq!(nz.atom().charge(), 1);

        let water = structure.atoms().last().unwrap();
        assert_eq!(water.chain().id(), "W");
        assert_eq!(water.group().category(), EntityType::Water);
    }

    #[test]
    fn groups_of_returns_groups_in_order_and_nothing_for_unknown_chain() {
        let structure = two_chain_structure();
        let chain_a = structure.find_chain_by_name("A").unwrap();
        let names: Vec<_> = structure
            .groups_of(chain_a)
            .map(|(_, g)| g.name().to_string())
            .collect();
        assert_eq!(names, vec!["ALA", "LYS"]);
        assert_eq!(structure.groups_of(ChainId::default()).count(), 0);
        assert!(structure.find_chain_by_name("Z").is_none());
    }

    #[test]
    fn polymer_chains_skips_water() {
        let structure = two_chain_structure();
        let ids: Vec<_> = structure.polymer_chains().map(|(_, c)| c.id()).collect();
        assert_eq!(ids, vec!["A"]);
    }

    #[test]
    fn atom_refs_compare_by_identity() {
        let structure = two_chain_structure();
        let first = structure.atoms().next().unwrap();
        let again = structure.atom_ref(first.id()).unwrap();
        let other = structure.atoms().nth(1).unwrap();
        assert_eq!(first, again);
        assert_ne!(first, other);
    }
}
