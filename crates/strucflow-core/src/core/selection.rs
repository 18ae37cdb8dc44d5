use crate::core::models::chain::EntityType;
use crate::core::models::structure::{AtomRef, Structure};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A conjunction of optional atom predicates.
///
/// Every field is independent: `None` (or an empty set) imposes no constraint,
/// and an atom is selected only if it satisfies every predicate that is
/// present. The default selection therefore selects every atom.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AtomSelection {
    /// Allowed atom names (e.g. "CA").
    pub atom_names: Option<HashSet<String>>,
    /// Allowed element symbols (e.g. "Zn").
    pub element_names: Option<HashSet<String>>,
    /// Allowed group names (e.g. "HIS").
    pub group_names: Option<HashSet<String>>,
    /// Allowed conjoined "RES_ATOM" names (e.g. "HIS_NE2").
    pub group_atom_names: Option<HashSet<String>>,
    /// Only atoms with a non-zero formal charge.
    pub charged: bool,
    /// Only atoms whose group belongs to this entity category.
    pub group_type: Option<EntityType>,
}

impl AtomSelection {
    /// A selection with no predicates.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_atom_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.atom_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_element_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.element_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_group_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_group_atom_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_atom_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn charged(mut self, charged: bool) -> Self {
        self.charged = charged;
        self
    }

    pub fn with_group_type(mut self, group_type: EntityType) -> Self {
        self.group_type = Some(group_type);
        self
    }

    /// Whether no predicate is active.
    pub fn is_unconstrained(&self) -> bool {
        !is_active(&self.atom_names)
            && !is_active(&self.element_names)
            && !is_active(&self.group_names)
            && !is_active(&self.group_atom_names)
            && !self.charged
            && self.group_type.is_none()
    }

    /// Tests one atom against every active predicate.
    pub fn matches(&self, atom: &AtomRef<'_>) -> bool {
        allows(&self.atom_names, atom.name())
            && allows(&self.element_names, atom.element())
            && allows(&self.group_names, atom.group().name())
            && (!self.charged || atom.atom().is_charged())
            && self
                .group_type
                .is_none_or(|ty| atom.group().category() == ty)
            && (!is_active(&self.group_atom_names)
                || allows(&self.group_atom_names, &atom.group_atom_name()))
    }

    /// Selects the matching atoms of a structure, in decode order.
    pub fn select<'a>(&self, structure: &'a Structure) -> Vec<AtomRef<'a>> {
        self.filter(structure.atoms())
    }

    /// Filters an arbitrary sequence of atoms, preserving its order.
    pub fn filter<'a>(&self, atoms: impl IntoIterator<Item = AtomRef<'a>>) -> Vec<AtomRef<'a>> {
        if self.is_unconstrained() {
            return atoms.into_iter().collect();
        }
        atoms.into_iter().filter(|atom| self.matches(atom)).collect()
    }
}

fn is_active(set: &Option<HashSet<String>>) -> bool {
    set.as_ref().is_some_and(|s| !s.is_empty())
}

fn allows(set: &Option<HashSet<String>>, value: &str) -> bool {
    match set {
        Some(allowed) if !allowed.is_empty() => allowed.contains(value),
        _ => true,
    }
}
