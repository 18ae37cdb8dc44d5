//! # Engine Module
//!
//! Configuration, error handling and batch execution for the per-record analyses.
//!
//! ## Overview
//!
//! The analyses in [`crate::core`] know nothing about batches. This module supplies
//! what a caller needs to run them over many records: an explicit configuration value
//! built once, a single error type that can be tagged with a record id, a generic
//! pipeline [`stage::Stage`], and a [`batch::BatchRunner`] that applies a stage to every
//! record while keeping failures local to the record that caused them.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - `AnalysisConfig` and its builder
//! - **Error Handling** ([`error`]) - `EngineError`, aggregating every core error
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Pipeline Stages** ([`stage`]) - Map, filter and flat-map record transforms
//! - **Batch Execution** ([`batch`]) - Parallel application of a stage with per-record outcomes
//!
//! ## Concurrency
//!
//! With the `parallel` feature the batch runner distributes records over rayon's
//! thread pool. Records never share mutable state, so no locking is involved.

pub mod batch;
pub mod config;
pub mod error;
pub mod progress;
pub mod stage;
