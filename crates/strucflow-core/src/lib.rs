//! # strucflow Core Library
//!
//! Per-record analysis of macromolecular structures stored as columnar records.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the strict three-layer split of its sibling crates, so that each
//! layer can be tested on its own:
//!
//! - **[`core`]: The Foundation.** The columnar `StructureRecord`, the decoded `Structure`
//!   arena and the pure analyses over it: atom selection, grid-based contact search,
//!   frequency counting, backbone fragments and sequence similarity.
//!
//! - **[`engine`]: The Machinery.** Explicit configuration values, the `EngineError`
//!   type, progress reporting, the generic pipeline `Stage` and the `BatchRunner` that
//!   applies a stage to many records in parallel while isolating per-record failures.
//!
//! - **[`workflows`]: The Public API.** Record-level transforms that decode a record,
//!   run one analysis and return flat output rows, each also packaged as a `Stage`.
//!
//! ## Limitations
//!
//! Only the first model of a multi-model record is decoded. Later models are validated
//! but otherwise ignored.

pub mod core;
pub mod engine;
pub mod workflows;
