//! Grid simulation engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`Simulator`](engine::Simulator) driver and the [`run`](engine::run) entry point
//! - [`ops`]: Per-operator semantics
//! - [`transaction`]: Staged removals, writes and warps for one step
//! - [`errors`]: Fatal error types
//!
//! # Execution Model
//!
//! Every step evaluates all operators against the same frozen snapshot. Their
//! effects are staged, validated, and only then resolved into either the next
//! snapshot or a rewritten past snapshot. Evaluation order never matters.

pub mod engine;
pub mod errors;
pub mod ops;
pub mod transaction;

pub use engine::{Outcome, RunReport, SimConfig, Simulator, StepSummary, run};
pub use errors::SimError;
