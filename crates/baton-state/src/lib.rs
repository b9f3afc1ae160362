//! Baton State
//!
//! This crate provides the workflow state aggregate and its persistence.
//! The state is a single JSON document read and rewritten on every hook
//! event; a missing or unparsable document means "no active workflow" to
//! every consumer, which is the one and only corruption-recovery mechanism.
//!
//! The [`StateStore`] trait defines the load/save contract. The design
//! assumes a single writer: at most one authoring session is active at a
//! time, and each hook invocation runs to completion before the next fires.

mod layout;
mod state;
mod store;

pub use layout::WorkspaceLayout;
pub use state::{
  ArtifactObligation, CompletionRecord, CurrentWorkflow, Metadata, ObligationStatus,
  SubgraphFrame, WorkflowContext, WorkflowState, WorkflowStatus,
};
pub use store::{JsonStateStore, StateStore, StoreError};
