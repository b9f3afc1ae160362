use std::path::Path;

use chrono::{DateTime, Utc};

use baton_artifact::{ArtifactKind, QualityIssue, classify, validate};
use baton_graph::{GraphError, GraphSource, NextNode, NodeTable, TERMINAL, next_node};
use baton_state::{
  ArtifactObligation, CompletionRecord, ObligationStatus, StateStore, WorkflowState,
  WorkflowStatus, WorkspaceLayout,
};

use crate::error::RouterError;
use crate::handoff::Handoff;

/// Name suffixes that mark a node as a nested-workflow entry.
pub const SUBGRAPH_SUFFIXES: [&str; 3] = ["-Subgraph", "-Workflow", "-Setup"];

/// Whether a node delegates to a nested workflow.
///
/// Recognized purely by naming convention. The reclassification lives here
/// rather than in edge resolution because it changes state shape, not which
/// edge is taken.
pub fn is_subgraph_entry(node_name: &str) -> bool {
  SUBGRAPH_SUFFIXES
    .iter()
    .any(|suffix| node_name.ends_with(suffix))
}

/// Result of the artifact intake path.
#[derive(Debug, PartialEq, Eq)]
pub enum IntakeOutcome {
  /// The written file does not match any artifact pattern.
  NotAnArtifact,
  /// No active workflow, or the workflow is not tracking artifacts.
  Inactive,
  /// The artifact failed completeness validation and was not recorded.
  Rejected {
    kind: ArtifactKind,
    issue: QualityIssue,
  },
  /// A pending obligation was marked created.
  Recorded {
    kind: ArtifactKind,
    node_ready: bool,
  },
  /// The artifact matched no obligation; noted, never a failure.
  Unexpected { kind: ArtifactKind },
}

/// The orchestrator: routes session-stop events and ingests artifacts.
pub struct Router<S, G> {
  store: S,
  graphs: G,
}

impl<S: StateStore, G: GraphSource> Router<S, G> {
  pub fn new(store: S, graphs: G) -> Self {
    Self { store, graphs }
  }

  /// Handle a session-stop trigger.
  ///
  /// Returns `Ok(None)` when there is nothing to route: no state, a
  /// non-routable status, or an incomplete current node. Any error leaves
  /// the persisted state untouched, and a persist failure after the
  /// in-memory transition suppresses the handoff entirely.
  pub async fn route_session_stop(&self) -> Result<Option<Handoff>, RouterError> {
    let Some(mut state) = self.store.load().await? else {
      tracing::debug!("no workflow state found, nothing to route");
      return Ok(None);
    };

    let status = state.current_workflow.status;
    if !status.is_routable() {
      tracing::info!(status = %status, "workflow status needs no routing");
      return Ok(None);
    }

    if !state.is_node_complete() {
      tracing::info!(
        node = %state.current_workflow.current_node,
        "current node incomplete, not routing"
      );
      for obligation in state.open_obligations() {
        tracing::info!(
          artifact = %obligation.artifact_name,
          status = %obligation.status,
          "obligation still open"
        );
      }
      return Ok(None);
    }

    let now = Utc::now();
    record_completion(&mut state, now);

    let graph_name = state.current_workflow.graph_name.clone();
    let table = self.graphs.load_graph(&graph_name).await?;
    let next = next_node(&table, &state.current_workflow.current_node)?;

    let handoff = apply_transition(&mut state, next, &table, now)?;

    self.store.save(&state).await?;
    Ok(Some(handoff))
  }

  /// Handle a post-write trigger for one written file.
  ///
  /// Marks the matching obligation created (after completeness validation)
  /// and logs readiness; the actual transition only ever happens on
  /// session-stop, so writes may arrive in any order.
  pub async fn intake_artifact(&self, file_path: &str) -> Result<IntakeOutcome, RouterError> {
    let Some(filename) = file_name(file_path) else {
      return Ok(IntakeOutcome::NotAnArtifact);
    };
    let Some(kind) = classify(filename) else {
      return Ok(IntakeOutcome::NotAnArtifact);
    };

    tracing::info!(artifact = filename, kind = %kind, "detected workflow artifact");

    let Some(mut state) = self.store.load().await? else {
      tracing::debug!("no workflow state found, skipping artifact tracking");
      return Ok(IntakeOutcome::Inactive);
    };

    let status = state.current_workflow.status;
    if !status.is_routable() {
      tracing::info!(status = %status, "workflow not tracking artifacts");
      return Ok(IntakeOutcome::Inactive);
    }

    match validate(Path::new(file_path)).await {
      Ok(Some(issue)) => {
        tracing::warn!(
          artifact = filename,
          reason = %issue,
          "artifact failed completeness validation, not marking created"
        );
        return Ok(IntakeOutcome::Rejected { kind, issue });
      }
      Ok(None) => {}
      // Fail open: the validator exists to catch bad content, not to lose
      // track of artifacts it cannot read.
      Err(e) => {
        tracing::warn!(artifact = filename, error = %e, "could not validate artifact, proceeding");
      }
    }

    let now = Utc::now();
    let matched = state.mark_created(filename, now);
    if matched {
      tracing::info!(artifact = filename, "marked pending artifact as created");
    } else {
      tracing::info!(
        artifact = filename,
        "artifact not in pending list (unexpected artifact)"
      );
    }

    state.workflow_context.updated_at = Some(now);
    state.metadata.last_modified_by = Some("artifact-intake".to_string());

    let node_ready = state.has_obligations() && state.is_node_complete();
    if node_ready {
      tracing::info!(
        node = %state.current_workflow.current_node,
        "all artifacts created, node ready for transition on session stop"
      );
    }

    self.store.save(&state).await?;

    Ok(if matched {
      IntakeOutcome::Recorded { kind, node_ready }
    } else {
      IntakeOutcome::Unexpected { kind }
    })
  }
}

fn record_completion(state: &mut WorkflowState, now: DateTime<Utc>) {
  let node_name = state.current_workflow.current_node.clone();
  let agent = state
    .current_workflow
    .current_agent
    .clone()
    .unwrap_or_default();
  let artifacts_produced = state.created_artifacts();

  tracing::info!(node = %node_name, "recorded completion of node");
  state.completed_nodes.push(CompletionRecord {
    node_name,
    agent,
    completed_at: now,
    artifacts_produced,
  });
}

fn apply_transition(
  state: &mut WorkflowState,
  next: NextNode,
  table: &NodeTable,
  now: DateTime<Utc>,
) -> Result<Handoff, RouterError> {
  match next {
    NextNode::Terminal => {
      state.current_workflow.status = WorkflowStatus::Completed;
      state.current_workflow.current_node = TERMINAL.to_string();
      state.current_workflow.current_agent = None;
      state.pending_artifacts.clear();

      if state.subgraph_stack.is_empty() {
        state.workflow_context.completed_at = Some(now);
        tracing::info!("workflow completed");
      } else {
        // Return-to-parent is not implemented; the stack is left in place
        // so the open invocation stays visible in the state document.
        tracing::warn!(
          depth = state.subgraph_stack.len(),
          "subgraph complete, return to parent workflow not implemented"
        );
      }

      Ok(Handoff::Completed)
    }

    NextNode::Node(name) if is_subgraph_entry(&name) => {
      tracing::info!(subgraph = %name, "next step delegates to nested workflow");
      state.current_workflow.status = WorkflowStatus::WaitingSubgraph;
      state.current_workflow.pending_subgraph = Some(name.clone());
      state.workflow_context.updated_at = Some(now);
      // The nested workflow owns its own obligations; none are created here.
      Ok(Handoff::SubgraphLaunch { subgraph: name })
    }

    NextNode::Node(name) => {
      let def = table.get(&name).ok_or_else(|| GraphError::NodeNotFound {
        node: name.clone(),
      })?;

      state.current_workflow.current_node = def.node_name.clone();
      state.current_workflow.current_agent = Some(def.agent_type.clone());
      state.workflow_context.updated_at = Some(now);

      // Obligations are replaced wholesale, never merged with stale ones.
      state.pending_artifacts = def
        .outputs
        .iter()
        .map(|output| ArtifactObligation {
          artifact_name: output.clone(),
          expected_from: def.node_name.clone(),
          required_by: def.next_nodes.clone(),
          status: ObligationStatus::Pending,
          created_at: None,
        })
        .collect();

      tracing::info!(
        node = %def.node_name,
        agent = %def.agent_type,
        "transitioned to next node"
      );

      Ok(Handoff::Next {
        node: def.node_name.clone(),
        agent: def.agent_type.clone(),
        description: def.description.clone(),
        outputs: def.outputs.clone(),
        inputs: def.inputs.clone(),
      })
    }
  }
}

fn file_name(path: &str) -> Option<&str> {
  Path::new(path).file_name().and_then(|name| name.to_str())
}
