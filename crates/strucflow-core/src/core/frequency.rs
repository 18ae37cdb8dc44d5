use crate::core::models::structure::AtomRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use thiserror::Error;

/// How a frequency key is derived from an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyRule {
    /// "CA"
    AtomName,
    /// "C"
    Element,
    /// "ALA"
    GroupName,
    /// "ALA_CA"
    #[default]
    GroupAtomName,
    /// "ALA,CA"
    GroupAndAtom,
}

impl KeyRule {
    pub fn key_of(&self, atom: &AtomRef<'_>) -> String {
        match self {
            KeyRule::AtomName => atom.name().to_string(),
            KeyRule::Element => atom.element().to_string(),
            KeyRule::GroupName => atom.group().name().to_string(),
            KeyRule::GroupAtomName => atom.group_atom_name(),
            KeyRule::GroupAndAtom => format!("{},{}", atom.group().name(), atom.name()),
        }
    }
}

impl fmt::Display for KeyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyRule::AtomName => "atom-name",
            KeyRule::Element => "element",
            KeyRule::GroupName => "group-name",
            KeyRule::GroupAtomName => "group-atom-name",
            KeyRule::GroupAndAtom => "group-and-atom",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown frequency key rule '{0}'")]
pub struct ParseKeyRuleError(String);

impl FromStr for KeyRule {
    type Err = ParseKeyRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "atom-name" | "atom" => Ok(KeyRule::AtomName),
            "element" => Ok(KeyRule::Element),
            "group-name" | "group" | "residue" => Ok(KeyRule::GroupName),
            "group-atom-name" | "group-atom" => Ok(KeyRule::GroupAtomName),
            "group-and-atom" => Ok(KeyRule::GroupAndAtom),
            _ => Err(ParseKeyRuleError(s.to_string())),
        }
    }
}

/// Occurrence counts per distinct key. Iteration order is unspecified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<K: Eq + Hash> {
    counts: HashMap<K, usize>,
}

impl<K: Eq + Hash> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        self.add_count(key, 1);
    }

    pub fn add_count(&mut self, key: K, count: usize) {
        *self.counts.entry(key).or_insert(0) += count;
    }

    pub fn get<Q>(&self, key: &Q) -> usize
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    /// Adds every count of `other` into this table.
    pub fn merge(&mut self, other: FrequencyTable<K>) {
        for (key, count) in other.counts {
            self.add_count(key, count);
        }
    }

    /// Entries by descending count, ties broken by key.
    pub fn sorted(&self) -> Vec<(&K, usize)>
    where
        K: Ord,
    {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<K: Eq + Hash> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.add(key);
        }
        table
    }
}

impl<K: Eq + Hash> IntoIterator for FrequencyTable<K> {
    type Item = (K, usize);
    type IntoIter = std::collections::hash_map::IntoIter<K, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

/// Counts atoms by the key `rule` derives from each of them.
pub fn count_frequencies<'a>(
    atoms: impl IntoIterator<Item = AtomRef<'a>>,
    rule: &KeyRule,
) -> FrequencyTable<String> {
    count_by(atoms, |atom| rule.key_of(atom))
}

/// Counts atoms by an arbitrary key function.
pub fn count_by<'a, K, F>(atoms: impl IntoIterator<Item = AtomRef<'a>>, key: F) -> FrequencyTable<K>
where
    K: Eq + Hash,
    F: Fn(&AtomRef<'a>) -> K,
{
    atoms.into_iter().map(|atom| key(&atom)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::StructureBuilder;
    use crate::core::models::chain::EntityType;
    use crate::core::models::structure::Structure;
    use nalgebra::Point3;

    fn ala_ala_gly() -> Structure {
        let mut b = StructureBuilder::new("FREQ");
        let chain = b.add_chain("A", EntityType::Polymer);
        for (i, (group, atom, element)) in [("ALA", "CA", "C"), ("ALA", "CA", "C"), ("GLY", "N", "N")]
            .into_iter()
            .enumerate()
        {
            let g = b.add_group(chain, group, i as i32, None);
            b.add_atom(g, i as i32 + 1, atom, element, 0, Point3::origin());
        }
        b.build()
    }

    #[test]
    fn group_and_atom_keys_are_counted() {
        let structure = ala_ala_gly();
        let table = count_frequencies(structure.atoms(), &KeyRule::GroupAndAtom);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("ALA,CA"), 2);
        assert_eq!(table.get("GLY,N"), 1);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn total_equals_input_length_for_every_rule() {
        let structure = ala_ala_gly();
        for rule in [
            KeyRule::AtomName,
            KeyRule::Element,
            KeyRule::GroupName,
            KeyRule::GroupAtomName,
            KeyRule::GroupAndAtom,
        ] {
            let table = count_frequencies(structure.atoms(), &rule);
            assert_eq!(table.total(), structure.atom_count(), "rule {rule}");
        }
    }

    #[test]
    fn element_rule_keys_by_element() {
        let structure = ala_ala_gly();
        let table = count_frequencies(structure.atoms(), &KeyRule::Element);
        assert_eq!(table.get("C"), 2);
        assert_eq!(table.get("N"), 1);
        assert_eq!(table.get("O"), 0);
    }

    #[test]
    fn count_by_accepts_tuple_keys() {
        let structure = ala_ala_gly();
        let table = count_by(structure.atoms(), |a| {
            (a.group().name().to_string(), a.name().to_string())
        });
        assert_eq!(table.get(&("ALA".to_string(), "CA".to_string())), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let table = count_frequencies(std::iter::empty(), &KeyRule::default());
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn merge_adds_counts_and_sorted_orders_by_count() {
        let mut a: FrequencyTable<String> = ["x", "y"].into_iter().map(String::from).collect();
        let b: FrequencyTable<String> = ["y", "y", "z"].into_iter().map(String::from).collect();
        a.merge(b);
        assert_eq!(a.total(), 5);
        let sorted: Vec<_> = a.sorted().into_iter().map(|(k, v)| (k.as_str(), v)).collect();
        assert_eq!(sorted, vec![("y", 3), ("x", 1), ("z", 1)]);
    }

    #[test]
    fn key_rules_parse_and_display() {
        assert_eq!("group_and_atom".parse::<KeyRule>().unwrap(), KeyRule::GroupAndAtom);
        assert_eq!("Element".parse::<KeyRule>().unwrap(), KeyRule::Element);
        assert!("bogus".parse::<KeyRule>().is_err());
        assert_eq!(KeyRule::GroupAtomName.to_string(), "group-atom-name");
        assert_eq!(KeyRule::default(), KeyRule::GroupAtomName);
    }
}
