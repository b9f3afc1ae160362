//! Baton Gate
//!
//! The pre-write quality gate. Before a gated tool call runs, the gate
//! verifies that every artifact recorded by previously completed nodes
//! still exists on disk — files can be deleted after being recorded, so
//! history is re-checked, not trusted. A missing prerequisite hard-blocks
//! the call with a structured diagnostic; everything else is advisory.
//!
//! The gate's own failures are never allowed to become a liveness hazard:
//! a [`GateOutcome::Indeterminate`] result maps to allowed at the
//! boundary, with the cause logged.

mod gate;
mod outcome;
mod prereq;

pub use gate::QualityGate;
pub use outcome::{GateError, GateOutcome, Verdict};
pub use prereq::{MissingPrerequisite, missing_prerequisites};
