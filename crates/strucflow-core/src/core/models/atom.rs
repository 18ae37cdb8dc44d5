use super::ids::GroupId;
use nalgebra::Point3;

/// Represents a single decoded atom of a structure record.
///
/// Atoms are created once by the decoder and never mutated afterwards. The
/// owning group is referenced by id only; the [`Structure`](super::structure::Structure)
/// arena owns every atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub(crate) serial: i32,
    pub(crate) name: String,
    pub(crate) element: String,
    pub(crate) charge: i32,
    pub(crate) position: Point3<f64>,
    pub(crate) group_id: GroupId,
}

impl Atom {
    pub(crate) fn new(
        serial: i32,
        name: &str,
        element: &str,
        charge: i32,
        position: Point3<f64>,
        group_id: GroupId,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: element.to_string(),
            charge,
            position,
            group_id,
        }
    }

    /// The serial number carried by the record (unique within a structure).
    pub fn serial(&self) -> i32 {
        self.serial
    }

    /// The atom name (e.g. "CA", "OG1").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element symbol as written in the record (e.g. "C", "Zn").
    pub fn element(&self) -> &str {
        &self.element
    }

    /// The formal charge in elementary charge units.
    pub fn charge(&self) -> i32 {
        self.charge
    }

    /// Whether the atom carries a non-zero formal charge.
    pub fn is_charged(&self) -> bool {
        self.charge != 0
    }

    /// Cartesian coordinates in Angstroms.
    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// The id of the owning group.
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Euclidean distance to another atom.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}
