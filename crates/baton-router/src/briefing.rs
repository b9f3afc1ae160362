use std::fmt::Write as _;

use baton_state::{WorkflowState, WorkflowStatus, WorkspaceLayout};

/// How many completion records the history slice shows.
const HISTORY_WINDOW: usize = 3;

/// Read-only projection of workflow state for a newly started session.
///
/// Never mutates the aggregate; output is fully determined by the state
/// (plus the on-disk existence filter for input artifact paths), so it is
/// safe to call any number of times.
pub struct Presenter {
  layout: WorkspaceLayout,
}

impl Presenter {
  pub fn new(layout: WorkspaceLayout) -> Self {
    Self { layout }
  }

  /// Render the session-start context message.
  ///
  /// Returns `None` when the workflow is not in a presentable state or the
  /// position fields are incomplete.
  pub async fn briefing(&self, state: &WorkflowState) -> Option<String> {
    let status = state.current_workflow.status;
    if status == WorkflowStatus::Completed {
      return None;
    }

    let graph_name = &state.current_workflow.graph_name;
    let current_node = &state.current_workflow.current_node;
    let current_agent = state.current_workflow.current_agent.as_deref()?;
    if graph_name.is_empty() || current_node.is_empty() {
      return None;
    }

    let triggered_by = state
      .workflow_context
      .triggered_by
      .as_deref()
      .unwrap_or("unknown");
    let started_at = state
      .workflow_context
      .started_at
      .map(|at| at.to_rfc3339())
      .unwrap_or_else(|| "unknown".to_string());

    let mut msg = String::new();
    let _ = writeln!(
      msg,
      "\n╔═══════════════════════════════════════════════════════════════╗"
    );
    let _ = writeln!(
      msg,
      "║                    WORKFLOW CONTEXT LOADED                    ║"
    );
    let _ = writeln!(
      msg,
      "╚═══════════════════════════════════════════════════════════════╝\n"
    );
    let _ = writeln!(msg, "Current Workflow: {graph_name}");
    let _ = writeln!(msg, "Current Node: {current_node}");
    let _ = writeln!(msg, "Assigned Agent: {current_agent}");
    let _ = writeln!(msg, "Workflow Status: {status}\n");
    let _ = writeln!(msg, "Triggered By: {triggered_by}");
    let _ = writeln!(msg, "Started: {started_at}");
    let _ = writeln!(msg, "Nodes Completed: {}", state.completed_nodes.len());

    let obligations: Vec<_> = state.node_obligations().collect();
    if !obligations.is_empty() {
      let _ = writeln!(msg, "\nExpected Outputs from This Node:");
      for obligation in obligations {
        let _ = writeln!(
          msg,
          "  • {} [{}]",
          obligation.artifact_name, obligation.status
        );
      }
    }

    let input_paths = self.input_artifact_paths(state).await;
    if !input_paths.is_empty() {
      let _ = writeln!(msg, "\nAvailable Input Artifacts:");
      for path in input_paths {
        let _ = writeln!(msg, "  • {path}");
      }
    }

    if !state.completed_nodes.is_empty() {
      let _ = writeln!(msg, "\nRecent Workflow History:");
      let skip = state.completed_nodes.len().saturating_sub(HISTORY_WINDOW);
      for record in state.completed_nodes.iter().skip(skip) {
        let _ = write!(msg, "  • {} ({})", record.node_name, record.agent);
        if !record.artifacts_produced.is_empty() {
          let _ = write!(msg, " → {}", record.artifacts_produced.join(", "));
        }
        let _ = writeln!(msg);
      }
    }

    if let Some(frame) = state.subgraph_stack.last() {
      let _ = writeln!(
        msg,
        "\n⚠ Note: Currently in subgraph (depth {}), will return to {} when complete",
        state.subgraph_stack.len(),
        frame.parent_graph
      );
    }

    let _ = writeln!(msg, "\n{}", "═".repeat(65));

    Some(msg)
  }

  /// Status-specific guidance appended after the context message.
  pub fn guidance(&self, state: &WorkflowState) -> Option<String> {
    match state.current_workflow.status {
      WorkflowStatus::WaitingApproval => Some(
        "\n⏸ Workflow is awaiting human approval.\n  This node requires a human checkpoint before proceeding.\n  Complete your task and await approval to continue.\n"
          .to_string(),
      ),
      WorkflowStatus::WaitingSubgraph => {
        let pending = state
          .current_workflow
          .pending_subgraph
          .as_deref()
          .unwrap_or("the pending");
        Some(format!(
          "\n⏸ Workflow requires subgraph invocation.\n  Launch the {pending} workflow to proceed.\n  The main workflow will resume when the subgraph completes.\n"
        ))
      }
      WorkflowStatus::Active => {
        if state.open_obligations().next().is_some() {
          let node = &state.current_workflow.current_node;
          Some(format!(
            "\n✓ Workflow is active. Your task:\n  Create the required artifacts for node '{node}'.\n  When complete, the workflow will automatically advance.\n"
          ))
        } else {
          None
        }
      }
      _ => None,
    }
  }

  /// Paths of the most recently completed node's artifacts that still exist.
  async fn input_artifact_paths(&self, state: &WorkflowState) -> Vec<String> {
    let Some(last) = state.completed_nodes.last() else {
      return Vec::new();
    };

    let mut paths = Vec::new();
    for name in &last.artifacts_produced {
      let path = self.layout.artifact_path(name);
      if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        paths.push(path.display().to_string());
      }
    }
    paths
  }
}
