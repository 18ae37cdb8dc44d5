//! # Core Models Module
//!
//! Data structures for a decoded macromolecular structure.
//!
//! ## Overview
//!
//! A [`structure::Structure`] owns every chain, group and atom of one record in
//! slot maps keyed by the ids from [`ids`]. Ownership is strictly tree-shaped:
//! chains list their groups, groups list their atoms, and the upward links
//! (atom → group, group → chain) are plain ids that never extend a lifetime.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom: name, element, charge, serial and position
//! - [`group`] - A residue-like group and its ordered atoms
//! - [`chain`] - A chain, its entity category and its ordered groups
//! - [`structure`] - The arena plus [`structure::AtomRef`] views used by the analyses
//! - [`ids`] - Slot map keys for atoms, groups and chains
//!
//! ## Usage
//!
//! Structures are produced by [`crate::core::decode::decode`]; there is no
//! public mutation API.
//!
//! ```ignore
//! use strucflow::core::decode::decode;
//!
//! let structure = decode(&record)?;
//! for atom in structure.atoms() {
//!     println!("{} {}", atom.chain().id(), atom.group_atom_name());
//! }
//! ```

pub mod atom;
pub(crate) mod builder;
pub mod chain;
pub mod group;
pub mod ids;
pub mod structure;
