use crate::core::models::group::Group;
use crate::core::models::ids::ChainId;
use crate::core::models::structure::Structure;
use phf::{Map, Set, phf_map, phf_set};
use std::fmt;
use thiserror::Error;

/// Letter emitted for groups whose residue has no known one-letter code.
pub const UNKNOWN_RESIDUE: char = 'X';

#[rustfmt::skip]
static THREE_TO_ONE: Map<&'static str, char> = phf_map! {
    // --- Standard amino acids ---
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',

    // --- Non-standard and ambiguous ---
    "SEC" => 'U', "PYL" => 'O', "ASX" => 'B', "GLX" => 'Z', "XLE" => 'J',
    "UNK" => 'X',

    // --- Common modified residues and protonation variants ---
    "MSE" => 'M', "HID" => 'H', "HIE" => 'H', "HIP" => 'H', "HSD" => 'H',
    "HSE" => 'H', "HSP" => 'H', "CYX" => 'C', "CYM" => 'C', "ASH" => 'D',
    "GLH" => 'E', "LYN" => 'K',
};

#[rustfmt::skip]
static AMINO_ACID_LETTERS: Set<char> = phf_set! {
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I',
    'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y', 'V',
    'B', 'Z', 'J', 'X', 'U', 'O',
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidSequenceError {
    #[error("Sequence is empty")]
    Empty,
    #[error("Invalid residue letter '{letter}' at position {position}")]
    InvalidLetter { letter: char, position: usize },
}

/// A validated amino-acid sequence in upper case one-letter form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProteinSequence(String);

impl ProteinSequence {
    /// Validates `sequence` against the amino-acid alphabet.
    ///
    /// Lower case letters are accepted and stored upper case. Anything else
    /// outside the alphabet, including gaps and whitespace, is rejected.
    pub fn new(sequence: &str) -> Result<Self, InvalidSequenceError> {
        if sequence.is_empty() {
            return Err(InvalidSequenceError::Empty);
        }
        let mut letters = String::with_capacity(sequence.len());
        for (position, c) in sequence.chars().enumerate() {
            let upper = c.to_ascii_uppercase();
            if !AMINO_ACID_LETTERS.contains(&upper) {
                return Err(InvalidSequenceError::InvalidLetter {
                    letter: c,
                    position,
                });
            }
            letters.push(upper);
        }
        Ok(Self(letters))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProteinSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProteinSequence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One-letter code for a three-letter residue name, if it is known.
pub fn one_letter_code(residue_name: &str) -> Option<char> {
    THREE_TO_ONE.get(residue_name.to_ascii_uppercase().as_str()).copied()
}

/// The one-letter code of a group: its own code if the record carried one,
/// otherwise a lookup by name, otherwise [`UNKNOWN_RESIDUE`].
pub fn group_letter(group: &Group) -> char {
    group
        .single_letter_code()
        .or_else(|| one_letter_code(group.name()))
        .unwrap_or(UNKNOWN_RESIDUE)
}

impl Structure {
    /// One-letter sequence of every group of a chain, in decode order.
    pub fn chain_sequence(&self, chain_id: ChainId) -> String {
        self.groups_of(chain_id)
            .map(|(_, group)| group_letter(group))
            .collect()
    }
}
