use crate::core::models::structure::Structure;
use crate::core::sequence::group_letter;
use nalgebra::Point3;
use std::ops::Range;

/// A contiguous window of backbone points and its offset in the source trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub start: usize,
    pub points: Vec<Point3<f64>>,
}

impl Fragment {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Offsets covered in the source trace.
    pub fn span(&self) -> Range<usize> {
        self.start..self.start + self.points.len()
    }
}

/// One representative point per group of a polymer chain, in decode order.
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneTrace {
    pub chain_id: String,
    /// Residue number of the group behind each point.
    pub group_numbers: Vec<i32>,
    /// One-letter code of the group behind each point.
    pub sequence: String,
    pub points: Vec<Point3<f64>>,
}

impl BackboneTrace {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn fragments(&self, length: Option<i64>) -> Vec<Fragment> {
        extract_fragments(&self.points, length)
    }
}

/// Window ranges for a trace of `n` points.
///
/// A positive `length` gives every window of that size sliding by one, which
/// is `max(0, n - length + 1)` windows. A missing or non-positive `length`
/// gives a single window over the whole trace.
pub fn fragment_windows(n: usize, length: Option<i64>) -> Vec<Range<usize>> {
    if n == 0 {
        return Vec::new();
    }
    match length.and_then(|l| usize::try_from(l).ok()).filter(|&l| l > 0) {
        None => vec![0..n],
        Some(w) if w > n => Vec::new(),
        Some(w) => (0..=n - w).map(|start| start..start + w).collect(),
    }
}

/// Cuts `points` into overlapping fragments, see [`fragment_windows`].
pub fn extract_fragments(points: &[Point3<f64>], length: Option<i64>) -> Vec<Fragment> {
    fragment_windows(points.len(), length)
        .into_iter()
        .map(|range| Fragment {
            start: range.start,
            points: points[range].to_vec(),
        })
        .collect()
}

/// Traces of every polymer chain through the atom named `atom_name`.
///
/// Groups without such an atom are skipped, and so are chains left with no
/// point at all.
pub fn backbone_traces(structure: &Structure, atom_name: &str) -> Vec<BackboneTrace> {
    structure
        .polymer_chains()
        .filter_map(|(chain_id, chain)| {
            let mut trace = BackboneTrace {
                chain_id: chain.id().to_string(),
                group_numbers: Vec::new(),
                sequence: String::new(),
                points: Vec::new(),
            };
            for (_, group) in structure.groups_of(chain_id) {
                let Some(atom) = group
                    .atom_id_by_name(atom_name)
                    .and_then(|id| structure.atom(id))
                else {
                    continue;
                };
                trace.group_numbers.push(group.number());
                trace.sequence.push(group_letter(group));
                trace.points.push(*atom.position());
            }
            (!trace.is_empty()).then_some(trace)
        })
        .collect()
}
