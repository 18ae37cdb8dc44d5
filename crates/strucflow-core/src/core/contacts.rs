//! Grid-based contact search.
//!
//! Space is split into cubic cells whose edge equals the cutoff, so any two
//! atoms within the cutoff lie in the same or in adjacent cells. Each atom is
//! therefore compared only against the atoms of its own cell and its 26
//! neighbours, which keeps the work linear in the number of atoms for a
//! roughly uniform density.

use crate::core::models::ids::AtomId;
use crate::core::models::structure::{AtomRef, Structure};
use itertools::iproduct;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::trace;

type CellKey = (i32, i32, i32);

/// Identifies an atom across structures: ids are only unique within one arena.
type AtomKey = (*const Structure, AtomId);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContactError {
    #[error("Contact cutoff must be a positive, finite distance (got {0})")]
    InvalidCutoff(f64),
}

/// Two distinct atoms within the cutoff and the distance between them.
///
/// Pairs are unordered: `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, Copy)]
pub struct ContactPair<'a> {
    first: AtomRef<'a>,
    second: AtomRef<'a>,
    distance: f64,
}

impl<'a> ContactPair<'a> {
    pub fn first(&self) -> AtomRef<'a> {
        self.first
    }

    pub fn second(&self) -> AtomRef<'a> {
        self.second
    }

    /// Euclidean distance in Angstroms.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn involves(&self, atom: &AtomRef<'_>) -> bool {
        self.first == *atom || self.second == *atom
    }

    /// The other atom of the pair, if `atom` is one of its members.
    pub fn partner_of(&self, atom: &AtomRef<'_>) -> Option<AtomRef<'a>> {
        if self.first == *atom {
            Some(self.second)
        } else if self.second == *atom {
            Some(self.first)
        } else {
            None
        }
    }
}

impl PartialEq for ContactPair<'_> {
    fn eq(&self, other: &Self) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

/// The contacts found by one search, each unordered pair exactly once.
#[derive(Debug, Clone, Default)]
pub struct ContactSet<'a> {
    pairs: Vec<ContactPair<'a>>,
}

impl<'a> ContactSet<'a> {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContactPair<'a>> {
        self.pairs.iter()
    }

    /// Whether `a` and `b` are in contact, in either order.
    pub fn contains(&self, a: &AtomRef<'_>, b: &AtomRef<'_>) -> bool {
        self.pairs
            .iter()
            .any(|p| (p.first == *a && p.second == *b) || (p.first == *b && p.second == *a))
    }

    /// All atoms in contact with `atom`.
    pub fn partners_of(&self, atom: &AtomRef<'_>) -> Vec<AtomRef<'a>> {
        self.pairs.iter().filter_map(|p| p.partner_of(atom)).collect()
    }
}

impl<'a> IntoIterator for ContactSet<'a> {
    type Item = ContactPair<'a>;
    type IntoIter = std::vec::IntoIter<ContactPair<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s ContactSet<'a> {
    type Item = &'s ContactPair<'a>;
    type IntoIter = std::slice::Iter<'s, ContactPair<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Contact search with a fixed distance cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGrid {
    cutoff: f64,
}

impl ContactGrid {
    /// Creates a grid whose cells are cubes of edge `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidCutoff`] unless `cutoff` is positive and finite.
    pub fn new(cutoff: f64) -> Result<Self, ContactError> {
        if cutoff.is_finite() && cutoff > 0.0 {
            Ok(Self { cutoff })
        } else {
            Err(ContactError::InvalidCutoff(cutoff))
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Finds every pair of distinct atoms of `atoms` within the cutoff.
    ///
    /// Each unordered pair is reported once, ordered by the position of its
    /// atoms in `atoms`. An atom listed twice is never paired with itself.
    pub fn contacts<'a>(&self, atoms: &[AtomRef<'a>]) -> ContactSet<'a> {
        let cells = self.index(atoms);
        let cutoff_sq = self.cutoff * self.cutoff;
        let mut found: Vec<(usize, usize, f64)> = Vec::new();

        for (&cell, members) in &cells {
            for (k, &i) in members.iter().enumerate() {
                for &j in &members[k + 1..] {
                    test_pair(atoms, i, j, cutoff_sq, &mut found);
                }
            }
            for offset in forward_offsets() {
                let Some(neighbours) = cells.get(&shift(cell, offset)) else {
                    continue;
                };
                for &i in members {
                    for &j in neighbours {
                        test_pair(atoms, i, j, cutoff_sq, &mut found);
                    }
                }
            }
        }

        for entry in &mut found {
            if entry.0 > entry.1 {
                std::mem::swap(&mut entry.0, &mut entry.1);
            }
        }
        found.sort_unstable_by_key(|&(i, j, _)| (i, j));
        let mut seen: HashSet<(AtomKey, AtomKey)> = HashSet::new();
        found.retain(|&(i, j, _)| seen.insert(unordered_key(&atoms[i], &atoms[j])));

        trace!(
            atoms = atoms.len(),
            cells = cells.len(),
            contacts = found.len(),
            "Single-list contact search finished."
        );
        ContactSet {
            pairs: found
                .into_iter()
                .map(|(i, j, distance)| ContactPair {
                    first: atoms[i],
                    second: atoms[j],
                    distance,
                })
                .collect(),
        }
    }

    /// Finds every pair `(a, b)` with `a` from `one` and `b` from `two` within
    /// the cutoff.
    ///
    /// Pairs inside a single list are never reported. When the lists share
    /// atoms, an atom is not paired with itself and each unordered pair is
    /// reported once. Atoms from different structures are always distinct.
    pub fn contacts_between<'a>(
        &self,
        one: &[AtomRef<'a>],
        two: &[AtomRef<'a>],
    ) -> ContactSet<'a> {
        if one.is_empty() || two.is_empty() {
            return ContactSet::default();
        }

        let cells = self.index(two);
        let cutoff_sq = self.cutoff * self.cutoff;
        let mut seen: HashSet<(AtomKey, AtomKey)> = HashSet::new();
        let mut pairs = Vec::new();

        for a in one {
            let home = self.cell_of(a);
            for offset in all_offsets() {
                let Some(neighbours) = cells.get(&shift(home, offset)) else {
                    continue;
                };
                for &j in neighbours {
                    let b = two[j];
                    if *a == b {
                        continue;
                    }
                    let distance_sq = (a.position() - b.position()).norm_squared();
                    if distance_sq > cutoff_sq {
                        continue;
                    }
                    if seen.insert(unordered_key(a, &b)) {
                        pairs.push((j, ContactPair {
                            first: *a,
                            second: b,
                            distance: distance_sq.sqrt(),
                        }));
                    }
                }
            }
        }

        // Atoms of `one` are visited in order; order partners by their index in `two`.
        let mut ordered = Vec::with_capacity(pairs.len());
        for chunk in pairs.chunk_by(|x, y| x.1.first == y.1.first) {
            let mut chunk = chunk.to_vec();
            chunk.sort_unstable_by_key(|&(j, _)| j);
            ordered.extend(chunk.into_iter().map(|(_, pair)| pair));
        }

        trace!(
            first = one.len(),
            second = two.len(),
            contacts = ordered.len(),
            "Two-list contact search finished."
        );
        ContactSet { pairs: ordered }
    }

    fn cell_of(&self, atom: &AtomRef<'_>) -> CellKey {
        let p = atom.position();
        (
            (p.x / self.cutoff).floor() as i32,
            (p.y / self.cutoff).floor() as i32,
            (p.z / self.cutoff).floor() as i32,
        )
    }

    fn index(&self, atoms: &[AtomRef<'_>]) -> HashMap<CellKey, Vec<usize>> {
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (i, atom) in atoms.iter().enumerate() {
            cells.entry(self.cell_of(atom)).or_default().push(i);
        }
        cells
    }
}

fn test_pair(
    atoms: &[AtomRef<'_>],
    i: usize,
    j: usize,
    cutoff_sq: f64,
    found: &mut Vec<(usize, usize, f64)>,
) {
    if atoms[i] == atoms[j] {
        return;
    }
    let distance_sq = (atoms[i].position() - atoms[j].position()).norm_squared();
    if distance_sq <= cutoff_sq {
        found.push((i, j, distance_sq.sqrt()));
    }
}

fn atom_key(atom: &AtomRef<'_>) -> AtomKey {
    (std::ptr::from_ref(atom.structure()), atom.id())
}

fn unordered_key(a: &AtomRef<'_>, b: &AtomRef<'_>) -> (AtomKey, AtomKey) {
    let (a, b) = (atom_key(a), atom_key(b));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn shift(cell: CellKey, offset: CellKey) -> CellKey {
    (
        cell.0.saturating_add(offset.0),
        cell.1.saturating_add(offset.1),
        cell.2.saturating_add(offset.2),
    )
}

fn all_offsets() -> impl Iterator<Item = CellKey> {
    iproduct!(-1..=1, -1..=1, -1..=1)
}

/// The 13 neighbour offsets lexicographically after the home cell, so every
/// unordered pair of neighbouring cells is visited from exactly one side.
fn forward_offsets() -> impl Iterator<Item = CellKey> {
    all_offsets().filter(|&offset| offset > (0, 0, 0))
}
