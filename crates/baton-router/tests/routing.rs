use async_trait::async_trait;
use chrono::Utc;

use baton_graph::{GraphError, GraphSource, NodeDef, NodeTable};
use baton_router::{Handoff, IntakeOutcome, Router};
use baton_state::{
  ArtifactObligation, CurrentWorkflow, JsonStateStore, Metadata, ObligationStatus, StateStore,
  SubgraphFrame, WorkflowContext, WorkflowState, WorkflowStatus, WorkspaceLayout,
};

/// Graph source serving one in-memory table, in place of files on disk.
struct FixedGraphSource {
  table: Option<NodeTable>,
}

impl FixedGraphSource {
  fn new(nodes: Vec<NodeDef>) -> Self {
    Self {
      table: Some(nodes.into_iter().collect()),
    }
  }

  fn failing() -> Self {
    Self { table: None }
  }
}

#[async_trait]
impl GraphSource for FixedGraphSource {
  async fn load_graph(&self, graph_name: &str) -> Result<NodeTable, GraphError> {
    match &self.table {
      Some(table) => Ok(table.clone()),
      None => Err(GraphError::UnknownGraph(graph_name.to_string())),
    }
  }
}

fn node(name: &str, agent: &str, outputs: &str, next_nodes: &str) -> NodeDef {
  NodeDef {
    node_name: name.to_string(),
    agent_type: agent.to_string(),
    inputs: Vec::new(),
    outputs: outputs
      .split('|')
      .filter(|o| !o.is_empty())
      .map(String::from)
      .collect(),
    next_nodes: next_nodes.to_string(),
    description: format!("work on {name}"),
  }
}

fn obligation(name: &str, from: &str, status: ObligationStatus) -> ArtifactObligation {
  ArtifactObligation {
    artifact_name: name.to_string(),
    expected_from: from.to_string(),
    required_by: String::new(),
    status,
    created_at: None,
  }
}

fn active_state(node: &str, agent: &str, obligations: Vec<ArtifactObligation>) -> WorkflowState {
  WorkflowState {
    current_workflow: CurrentWorkflow {
      graph_name: "PDLC".to_string(),
      current_node: node.to_string(),
      current_agent: Some(agent.to_string()),
      status: WorkflowStatus::Active,
      pending_subgraph: None,
    },
    pending_artifacts: obligations,
    completed_nodes: Vec::new(),
    subgraph_stack: Vec::new(),
    workflow_context: WorkflowContext::default(),
    metadata: Metadata::default(),
  }
}

async fn seeded_store(dir: &std::path::Path, state: &WorkflowState) -> JsonStateStore {
  let layout = WorkspaceLayout::new(dir);
  let store = JsonStateStore::for_layout(&layout);
  store.save(state).await.unwrap();
  store
}

#[tokio::test]
async fn completed_node_advances_and_replaces_obligations() {
  let dir = tempfile::tempdir().unwrap();
  let state = active_state(
    "A",
    "analyst",
    vec![
      obligation("D01-x.md", "A", ObligationStatus::Created),
      obligation("D02-y.md", "A", ObligationStatus::Created),
    ],
  );
  let store = seeded_store(dir.path(), &state).await;
  let graphs = FixedGraphSource::new(vec![
    node("A", "analyst", "D01-x.md|D02-y.md", "B"),
    node("B", "product-manager", "F01-z.md", "__end__"),
  ]);

  let router = Router::new(store, graphs);
  let handoff = router.route_session_stop().await.unwrap().unwrap();

  match handoff {
    Handoff::Next { node, agent, .. } => {
      assert_eq!(node, "B");
      assert_eq!(agent, "product-manager");
    }
    other => panic!("expected Next handoff, got {other:?}"),
  }

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();

  assert_eq!(saved.current_workflow.current_node, "B");
  assert_eq!(
    saved.current_workflow.current_agent.as_deref(),
    Some("product-manager")
  );
  assert_eq!(saved.current_workflow.status, WorkflowStatus::Active);

  // Obligations replaced wholesale: exactly one entry, for the new node.
  assert_eq!(saved.pending_artifacts.len(), 1);
  assert_eq!(saved.pending_artifacts[0].artifact_name, "F01-z.md");
  assert_eq!(saved.pending_artifacts[0].expected_from, "B");
  assert_eq!(saved.pending_artifacts[0].status, ObligationStatus::Pending);

  // Completion recorded exactly the created artifacts.
  assert_eq!(saved.completed_nodes.len(), 1);
  assert_eq!(saved.completed_nodes[0].node_name, "A");
  assert_eq!(
    saved.completed_nodes[0].artifacts_produced,
    vec!["D01-x.md", "D02-y.md"]
  );
}

#[tokio::test]
async fn incomplete_node_does_not_route() {
  let dir = tempfile::tempdir().unwrap();
  let state = active_state(
    "A",
    "analyst",
    vec![
      obligation("D01-x.md", "A", ObligationStatus::Created),
      obligation("D02-y.md", "A", ObligationStatus::Pending),
    ],
  );
  let store = seeded_store(dir.path(), &state).await;
  let graphs = FixedGraphSource::new(vec![node("A", "analyst", "D01-x.md|D02-y.md", "B")]);

  let router = Router::new(store, graphs);
  assert!(router.route_session_stop().await.unwrap().is_none());

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();
  assert_eq!(saved.current_workflow.current_node, "A");
  assert!(saved.completed_nodes.is_empty());
}

#[tokio::test]
async fn terminal_edge_completes_the_workflow() {
  let dir = tempfile::tempdir().unwrap();
  let state = active_state(
    "Last",
    "release-manager",
    vec![obligation("R01-plan.md", "Last", ObligationStatus::Created)],
  );
  let store = seeded_store(dir.path(), &state).await;
  let graphs = FixedGraphSource::new(vec![node("Last", "release-manager", "R01-plan.md", "__end__")]);

  let router = Router::new(store, graphs);
  let handoff = router.route_session_stop().await.unwrap().unwrap();
  assert_eq!(handoff, Handoff::Completed);

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();
  assert_eq!(saved.current_workflow.status, WorkflowStatus::Completed);
  assert_eq!(saved.current_workflow.current_node, "__end__");
  assert!(saved.current_workflow.current_agent.is_none());
  assert!(saved.pending_artifacts.is_empty());
  assert!(saved.workflow_context.completed_at.is_some());
}

#[tokio::test]
async fn terminal_inside_subgraph_leaves_completion_unstamped() {
  let dir = tempfile::tempdir().unwrap();
  let mut state = active_state(
    "Last",
    "dev",
    vec![obligation("DEV-done", "Last", ObligationStatus::Created)],
  );
  state.subgraph_stack.push(SubgraphFrame {
    parent_graph: "PDLC".to_string(),
    parent_node: "Development-Subgraph".to_string(),
    entered_at: Some(Utc::now()),
  });
  let store = seeded_store(dir.path(), &state).await;
  let graphs = FixedGraphSource::new(vec![node("Last", "dev", "DEV-done", "__end__")]);

  let router = Router::new(store, graphs);
  assert_eq!(
    router.route_session_stop().await.unwrap(),
    Some(Handoff::Completed)
  );

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();
  // The parent resume transition is unimplemented: the stack survives and
  // the workflow-level completion timestamp is not stamped.
  assert_eq!(saved.subgraph_stack.len(), 1);
  assert!(saved.workflow_context.completed_at.is_none());
}

#[tokio::test]
async fn fan_out_follows_first_branch() {
  let dir = tempfile::tempdir().unwrap();
  let state = active_state("A", "analyst", Vec::new());
  let store = seeded_store(dir.path(), &state).await;
  let graphs = FixedGraphSource::new(vec![
    node("A", "analyst", "", "B|C"),
    node("B", "dev-b", "DEV-b", "__end__"),
    node("C", "dev-c", "DEV-c", "__end__"),
  ]);

  let router = Router::new(store, graphs);
  let handoff = router.route_session_stop().await.unwrap().unwrap();
  match handoff {
    Handoff::Next { node, .. } => assert_eq!(node, "B"),
    other => panic!("expected Next handoff, got {other:?}"),
  }
}

#[tokio::test]
async fn subgraph_entry_parks_the_workflow() {
  let dir = tempfile::tempdir().unwrap();
  let state = active_state(
    "A",
    "analyst",
    vec![obligation("D01-x.md", "A", ObligationStatus::Created)],
  );
  let store = seeded_store(dir.path(), &state).await;
  let graphs = FixedGraphSource::new(vec![node("A", "analyst", "D01-x.md", "Tech-Spec-Subgraph")]);

  let router = Router::new(store, graphs);
  let handoff = router.route_session_stop().await.unwrap().unwrap();
  assert_eq!(
    handoff,
    Handoff::SubgraphLaunch {
      subgraph: "Tech-Spec-Subgraph".to_string()
    }
  );

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();
  assert_eq!(
    saved.current_workflow.status,
    WorkflowStatus::WaitingSubgraph
  );
  assert_eq!(
    saved.current_workflow.pending_subgraph.as_deref(),
    Some("Tech-Spec-Subgraph")
  );
}

#[tokio::test]
async fn graph_failure_leaves_state_untouched() {
  let dir = tempfile::tempdir().unwrap();
  let state = active_state(
    "A",
    "analyst",
    vec![obligation("D01-x.md", "A", ObligationStatus::Created)],
  );
  let store = seeded_store(dir.path(), &state).await;

  let router = Router::new(store, FixedGraphSource::failing());
  assert!(router.route_session_stop().await.is_err());

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();
  // The in-memory completion record was never persisted.
  assert!(saved.completed_nodes.is_empty());
  assert_eq!(saved.current_workflow.current_node, "A");
}

#[tokio::test]
async fn completed_workflow_is_not_routed_again() {
  let dir = tempfile::tempdir().unwrap();
  let mut state = active_state("Last", "dev", Vec::new());
  state.current_workflow.status = WorkflowStatus::Completed;
  let store = seeded_store(dir.path(), &state).await;
  let graphs = FixedGraphSource::new(vec![node("Last", "dev", "", "__end__")]);

  let router = Router::new(store, graphs);
  assert!(router.route_session_stop().await.unwrap().is_none());
}

fn valid_artifact_body() -> String {
  let mut body = String::from("# Market Scan\n\n");
  while body.len() < 400 {
    body.push_str("Findings are written out in full detail for the next node. ");
  }
  body
}

#[tokio::test]
async fn intake_marks_obligation_and_reports_readiness() {
  let dir = tempfile::tempdir().unwrap();
  let layout = WorkspaceLayout::new(dir.path());
  let state = active_state(
    "A",
    "analyst",
    vec![obligation("D01-x.md", "A", ObligationStatus::Pending)],
  );
  let store = seeded_store(dir.path(), &state).await;

  std::fs::create_dir_all(layout.artifacts_dir()).unwrap();
  let artifact = layout.artifact_path("D01-x.md");
  std::fs::write(&artifact, valid_artifact_body()).unwrap();

  let router = Router::new(store, FixedGraphSource::failing());
  let outcome = router
    .intake_artifact(artifact.to_str().unwrap())
    .await
    .unwrap();

  match outcome {
    IntakeOutcome::Recorded { node_ready, .. } => assert!(node_ready),
    other => panic!("expected Recorded, got {other:?}"),
  }

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();
  assert_eq!(saved.pending_artifacts[0].status, ObligationStatus::Created);
  assert!(saved.pending_artifacts[0].created_at.is_some());
  assert_eq!(
    saved.metadata.last_modified_by.as_deref(),
    Some("artifact-intake")
  );
}

#[tokio::test]
async fn intake_rejects_placeholder_artifact() {
  let dir = tempfile::tempdir().unwrap();
  let layout = WorkspaceLayout::new(dir.path());
  let state = active_state(
    "A",
    "analyst",
    vec![obligation("D01-x.md", "A", ObligationStatus::Pending)],
  );
  let store = seeded_store(dir.path(), &state).await;

  std::fs::create_dir_all(layout.artifacts_dir()).unwrap();
  let artifact = layout.artifact_path("D01-x.md");
  let mut body = valid_artifact_body();
  body.push_str("\nTODO flesh this out\n");
  std::fs::write(&artifact, body).unwrap();

  let router = Router::new(store, FixedGraphSource::failing());
  let outcome = router
    .intake_artifact(artifact.to_str().unwrap())
    .await
    .unwrap();
  assert!(matches!(outcome, IntakeOutcome::Rejected { .. }));

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();
  assert_eq!(saved.pending_artifacts[0].status, ObligationStatus::Pending);
}

#[tokio::test]
async fn intake_notes_unexpected_artifact_without_failing() {
  let dir = tempfile::tempdir().unwrap();
  let layout = WorkspaceLayout::new(dir.path());
  let state = active_state(
    "A",
    "analyst",
    vec![obligation("D01-x.md", "A", ObligationStatus::Pending)],
  );
  let store = seeded_store(dir.path(), &state).await;

  std::fs::create_dir_all(layout.artifacts_dir()).unwrap();
  let artifact = layout.artifact_path("D99-extra.md");
  std::fs::write(&artifact, valid_artifact_body()).unwrap();

  let router = Router::new(store, FixedGraphSource::failing());
  let outcome = router
    .intake_artifact(artifact.to_str().unwrap())
    .await
    .unwrap();
  assert!(matches!(outcome, IntakeOutcome::Unexpected { .. }));

  let store = JsonStateStore::for_layout(&WorkspaceLayout::new(dir.path()));
  let saved = store.load().await.unwrap().unwrap();
  assert_eq!(saved.pending_artifacts[0].status, ObligationStatus::Pending);
}

#[tokio::test]
async fn intake_ignores_non_artifacts_and_missing_state() {
  let dir = tempfile::tempdir().unwrap();
  let layout = WorkspaceLayout::new(dir.path());
  let store = JsonStateStore::for_layout(&layout);

  let router = Router::new(store, FixedGraphSource::failing());
  assert_eq!(
    router.intake_artifact("README.md").await.unwrap(),
    IntakeOutcome::NotAnArtifact
  );
  assert_eq!(
    router.intake_artifact("D01-x.md").await.unwrap(),
    IntakeOutcome::Inactive
  );
}
