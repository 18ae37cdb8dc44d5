//! # Workflows Module
//!
//! Record-level transforms assembled from the core analyses.
//!
//! ## Overview
//!
//! Each workflow takes one [`crate::core::record::StructureRecord`] and a piece of the
//! [`crate::engine::config::AnalysisConfig`], decodes the record when it needs to, and
//! returns flat output rows. Every workflow also comes as a ready-made
//! [`crate::engine::stage::Stage`] so that it can be handed to the
//! [`crate::engine::batch::BatchRunner`] or to any other data-parallel runtime.
//!
//! ## Workflows
//!
//! - **Contacts** ([`contacts`]) - Atom pairs within a cutoff, one or two selections
//! - **Atoms** ([`atoms`]) - Selected atoms and their frequency tables
//! - **Fragments** ([`fragments`]) - Whole-chain segments and sliding backbone windows
//! - **Quality** ([`quality`]) - Resolution and R-free record filters
//! - **Similarity** ([`similarity`]) - Segments similar to a reference sequence
//!
//! ## Stage Shapes
//!
//! | Workflow    | Shape                    |
//! |-------------|--------------------------|
//! | quality     | record → optional record |
//! | frequency   | record → table           |
//! | contacts    | record → many rows       |
//! | atoms       | record → many rows       |
//! | fragments   | record → many rows       |
//! | similarity  | record → many segments   |

pub mod atoms;
pub mod contacts;
pub mod fragments;
pub mod quality;
pub mod similarity;
