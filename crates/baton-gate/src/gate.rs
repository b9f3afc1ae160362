use std::fmt::Write as _;
use std::path::Path;

use baton_artifact::classify;
use baton_state::{StateStore, WorkflowState, WorkspaceLayout};
use baton_trigger::PreWriteEvent;

use crate::outcome::GateOutcome;
use crate::prereq::{MissingPrerequisite, missing_prerequisites};

/// The pre-write quality gate.
///
/// Loads the workflow state itself so a single `check` call carries the
/// whole policy: absent or inactive state disables gating, missing
/// prerequisites block, unexpected artifacts warn.
pub struct QualityGate<S> {
  store: S,
  layout: WorkspaceLayout,
}

impl<S: StateStore> QualityGate<S> {
  pub fn new(store: S, layout: WorkspaceLayout) -> Self {
    Self { store, layout }
  }

  /// Evaluate a pre-write event.
  pub async fn check(&self, event: &PreWriteEvent) -> GateOutcome {
    if !is_gated(event) {
      return GateOutcome::Allowed;
    }

    tracing::debug!(tool = %event.tool_name, "validating gated tool use");

    let state = match self.store.load().await {
      Ok(Some(state)) => state,
      Ok(None) => {
        tracing::debug!("no workflow state, allowing operation");
        return GateOutcome::Allowed;
      }
      Err(e) => return GateOutcome::Indeterminate(e.into()),
    };

    if !state.current_workflow.status.is_routable() {
      tracing::debug!(
        status = %state.current_workflow.status,
        "workflow not active, allowing operation"
      );
      return GateOutcome::Allowed;
    }

    // Prerequisite completeness takes precedence over every other check.
    match missing_prerequisites(&state, &self.layout).await {
      Err(e) => return GateOutcome::Indeterminate(e.into()),
      Ok(missing) if !missing.is_empty() => {
        return GateOutcome::Blocked(render_blocked(&state, &missing));
      }
      Ok(_) => {}
    }

    // Unexpected extra output never halts the workflow.
    if let Some(filename) = event.file_path().and_then(file_name)
      && classify(filename).is_some()
    {
      let expected: Vec<&str> = state
        .node_obligations()
        .map(|a| a.artifact_name.as_str())
        .collect();
      if !expected.is_empty() && !expected.contains(&filename) {
        tracing::warn!(
          artifact = filename,
          node = %state.current_workflow.current_node,
          expected = expected.join(", "),
          "artifact not among expected outputs for current node"
        );
      }
    }

    GateOutcome::Allowed
  }
}

/// Only `Write` calls that touch the state document or a classified
/// artifact are gated; everything else passes through untouched.
fn is_gated(event: &PreWriteEvent) -> bool {
  if !event.is_write() {
    return false;
  }
  let Some(path) = event.file_path() else {
    return false;
  };
  if path.contains("state.json") {
    return true;
  }
  file_name(path).and_then(classify).is_some()
}

fn file_name(path: &str) -> Option<&str> {
  Path::new(path).file_name().and_then(|name| name.to_str())
}

fn render_blocked(state: &WorkflowState, missing: &[MissingPrerequisite]) -> String {
  let mut msg = String::new();
  let _ = writeln!(
    msg,
    "\n╔═══════════════════════════════════════════════════════════════╗"
  );
  let _ = writeln!(
    msg,
    "║                    QUALITY GATE: BLOCKED                      ║"
  );
  let _ = writeln!(
    msg,
    "╚═══════════════════════════════════════════════════════════════╝\n"
  );
  let _ = writeln!(msg, "Current Node: {}", state.current_workflow.current_node);
  let _ = writeln!(
    msg,
    "Current Agent: {}\n",
    state.current_workflow.current_agent.as_deref().unwrap_or("none")
  );
  let _ = writeln!(msg, "ERROR: Missing required artifacts from previous nodes\n");
  let _ = writeln!(msg, "Missing Prerequisites:");
  for item in missing {
    let _ = writeln!(
      msg,
      "  • {} (from {} - {})",
      item.artifact_name, item.node_name, item.agent
    );
  }
  let _ = writeln!(msg, "\nAction Required:");
  let _ = writeln!(msg, "  1. Return to previous nodes and complete missing artifacts");
  let _ = writeln!(msg, "  2. Verify artifacts are in docs/workflow/artifacts/");
  let _ = writeln!(msg, "  3. Check artifact naming matches expected output");
  let _ = writeln!(
    msg,
    "\nThe workflow cannot proceed until all dependencies are satisfied."
  );
  let _ = writeln!(
    msg,
    "═══════════════════════════════════════════════════════════════"
  );
  msg
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::outcome::Verdict;
  use baton_state::{
    CompletionRecord, CurrentWorkflow, JsonStateStore, Metadata, WorkflowContext, WorkflowStatus,
  };
  use baton_trigger::parse_pre_write;
  use chrono::Utc;

  fn state_with_history(artifacts: &[&str]) -> WorkflowState {
    WorkflowState {
      current_workflow: CurrentWorkflow {
        graph_name: "PDLC".to_string(),
        current_node: "Features".to_string(),
        current_agent: Some("product-manager".to_string()),
        status: WorkflowStatus::Active,
        pending_subgraph: None,
      },
      pending_artifacts: Vec::new(),
      completed_nodes: vec![CompletionRecord {
        node_name: "Discovery".to_string(),
        agent: "analyst".to_string(),
        completed_at: Utc::now(),
        artifacts_produced: artifacts.iter().map(|a| a.to_string()).collect(),
      }],
      subgraph_stack: Vec::new(),
      workflow_context: WorkflowContext::default(),
      metadata: Metadata::default(),
    }
  }

  async fn gate_in(dir: &Path, state: Option<&WorkflowState>) -> QualityGate<JsonStateStore> {
    let layout = WorkspaceLayout::new(dir);
    let store = JsonStateStore::for_layout(&layout);
    if let Some(state) = state {
      store.save(state).await.unwrap();
    }
    QualityGate::new(store, layout)
  }

  fn write_event(path: &str) -> PreWriteEvent {
    parse_pre_write(&format!(
      r#"{{"tool_name":"Write","parameters":{{"file_path":"{path}"}}}}"#
    ))
    .unwrap()
  }

  #[tokio::test]
  async fn non_write_tools_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let gate = gate_in(dir.path(), None).await;
    let event = parse_pre_write(r#"{"tool_name":"Read"}"#).unwrap();
    assert!(matches!(gate.check(&event).await, GateOutcome::Allowed));
  }

  #[tokio::test]
  async fn missing_state_allows_artifact_writes() {
    let dir = tempfile::tempdir().unwrap();
    let gate = gate_in(dir.path(), None).await;
    let event = write_event("docs/workflow/artifacts/D01-scan.md");
    assert!(matches!(gate.check(&event).await, GateOutcome::Allowed));
  }

  #[tokio::test]
  async fn deleted_prerequisite_blocks_with_provenance() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with_history(&["D01-x.md"]);
    let gate = gate_in(dir.path(), Some(&state)).await;
    // D01-x.md was recorded but never lands on disk, as if deleted.

    let event = write_event("docs/workflow/artifacts/F01-prd.md");
    match gate.check(&event).await.into_verdict() {
      Verdict::Blocked(reason) => {
        assert!(reason.contains("D01-x.md"));
        assert!(reason.contains("Discovery"));
        assert!(reason.contains("analyst"));
      }
      Verdict::Allowed => panic!("expected block"),
    }
  }

  #[tokio::test]
  async fn intact_prerequisites_allow_the_write() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with_history(&["D01-x.md"]);
    let layout = WorkspaceLayout::new(dir.path());
    std::fs::create_dir_all(layout.artifacts_dir()).unwrap();
    std::fs::write(layout.artifact_path("D01-x.md"), "# content").unwrap();

    let gate = gate_in(dir.path(), Some(&state)).await;
    let event = write_event("docs/workflow/artifacts/F01-prd.md");
    assert!(matches!(gate.check(&event).await, GateOutcome::Allowed));
  }

  #[tokio::test]
  async fn inactive_workflow_is_not_gated() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_history(&["D01-x.md"]);
    state.current_workflow.status = WorkflowStatus::Completed;

    let gate = gate_in(dir.path(), Some(&state)).await;
    let event = write_event("docs/workflow/artifacts/F01-prd.md");
    assert!(matches!(gate.check(&event).await, GateOutcome::Allowed));
  }

  #[tokio::test]
  async fn unexpected_artifact_warns_but_allows() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_with_history(&[]);

    let gate = gate_in(dir.path(), Some(&state)).await;
    let event = write_event("docs/workflow/artifacts/R01-surprise.md");
    assert!(matches!(gate.check(&event).await, GateOutcome::Allowed));
  }
}
