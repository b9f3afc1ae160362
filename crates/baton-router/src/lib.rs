//! Baton Router
//!
//! The workflow state machine. On a session-stop trigger the router checks
//! whether the current node finished its obligations, records the
//! completion, resolves the next node from the graph, rewrites the state
//! for the transition, persists it, and only then emits a handoff — state
//! and presentation must never diverge.
//!
//! Artifact intake is the separate post-write path: it marks obligations
//! created but never advances the workflow, so artifacts may arrive in any
//! order and across any number of writes before the session ends.
//!
//! The [`Presenter`] is the read-only projection used at session start.

mod briefing;
mod error;
mod handoff;
mod router;

pub use briefing::Presenter;
pub use error::RouterError;
pub use handoff::Handoff;
pub use router::{IntakeOutcome, Router, SUBGRAPH_SUFFIXES, is_subgraph_entry};
