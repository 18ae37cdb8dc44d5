//! # Core Module
//!
//! Stateless data and the pure per-record analyses of strucflow.
//!
//! ## Overview
//!
//! Everything in this module is a function of a single structure record. Nothing is
//! cached or shared between records, so any of these operations can be evaluated for
//! many records at once by the caller.
//!
//! ## Architecture
//!
//! - **Input** ([`record`]) - The columnar structure record
//! - **Molecular Representation** ([`models`]) - The decoded chain → group → atom arena
//! - **Decoding** ([`decode`]) - Validation of a record and assembly of its first model
//! - **Selection** ([`selection`]) - Conjunctive atom predicates
//! - **Contacts** ([`contacts`]) - Grid-based pair search within a distance cutoff
//! - **Statistics** ([`frequency`]) - Occurrence counts of atoms by a derived key
//! - **Backbone Windows** ([`fragments`]) - Representative-atom traces and sliding windows
//! - **Sequences** ([`sequence`], [`align`]) - Chain sequences and similarity to a reference
//!
//! ## Data Flow
//!
//! ```text
//! StructureRecord ──decode──▶ Structure ──select──▶ [AtomRef] ──┬─▶ ContactGrid
//!                                  │                            └─▶ count_frequencies
//!                                  └──backbone_traces──▶ BackboneTrace ──▶ extract_fragments
//! ```

pub mod align;
pub mod contacts;
pub mod decode;
pub mod fragments;
pub mod frequency;
pub mod models;
pub mod record;
pub mod selection;
pub mod sequence;
