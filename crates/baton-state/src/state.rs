use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of the workflow as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
  Active,
  Waiting,
  WaitingApproval,
  WaitingSubgraph,
  Completed,
}

impl WorkflowStatus {
  /// Whether routing and artifact tracking act on this status.
  ///
  /// `waiting_subgraph` and `completed` are externally gated: the router
  /// leaves them untouched until a different event path changes them.
  pub fn is_routable(self) -> bool {
    matches!(self, Self::Active | Self::Waiting | Self::WaitingApproval)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Waiting => "waiting",
      Self::WaitingApproval => "waiting_approval",
      Self::WaitingSubgraph => "waiting_subgraph",
      Self::Completed => "completed",
    }
  }
}

impl std::fmt::Display for WorkflowStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Status of a single artifact obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationStatus {
  Pending,
  Created,
}

impl std::fmt::Display for ObligationStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Pending => f.write_str("pending"),
      Self::Created => f.write_str("created"),
    }
  }
}

/// One required output of the current node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactObligation {
  pub artifact_name: String,
  /// Node expected to produce this artifact. Always the current node; stale
  /// obligations are replaced wholesale on transition, never merged.
  pub expected_from: String,
  /// Raw edge spec of the producing node, recorded for diagnostics.
  #[serde(default)]
  pub required_by: String,
  pub status: ObligationStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
}

/// Append-only record of a node that finished its obligations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
  pub node_name: String,
  #[serde(default)]
  pub agent: String,
  pub completed_at: DateTime<Utc>,
  #[serde(default)]
  pub artifacts_produced: Vec<String>,
}

/// One open nested-workflow invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphFrame {
  pub parent_graph: String,
  pub parent_node: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub entered_at: Option<DateTime<Utc>>,
}

/// Position of the workflow: which graph, node, and agent are current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWorkflow {
  pub graph_name: String,
  pub current_node: String,
  pub current_agent: Option<String>,
  pub status: WorkflowStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pending_subgraph: Option<String>,
}

/// Launch context and timestamps for the workflow run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowContext {
  #[serde(default)]
  pub triggered_by: Option<String>,
  #[serde(default)]
  pub started_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub updated_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub completed_at: Option<DateTime<Utc>>,
}

/// Non-authoritative bookkeeping. Unknown fields written by other tooling
/// survive a rewrite via the flattened map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
  #[serde(default)]
  pub last_modified_by: Option<String>,
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The single persisted workflow aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
  pub current_workflow: CurrentWorkflow,
  #[serde(default)]
  pub pending_artifacts: Vec<ArtifactObligation>,
  #[serde(default)]
  pub completed_nodes: Vec<CompletionRecord>,
  #[serde(default)]
  pub subgraph_stack: Vec<SubgraphFrame>,
  #[serde(default)]
  pub workflow_context: WorkflowContext,
  #[serde(default)]
  pub metadata: Metadata,
}

impl WorkflowState {
  /// Obligations belonging to the current node.
  pub fn node_obligations(&self) -> impl Iterator<Item = &ArtifactObligation> {
    let node = self.current_workflow.current_node.as_str();
    self
      .pending_artifacts
      .iter()
      .filter(move |a| a.expected_from == node)
  }

  /// Obligations of the current node that are not yet created.
  pub fn open_obligations(&self) -> impl Iterator<Item = &ArtifactObligation> {
    self
      .node_obligations()
      .filter(|a| a.status != ObligationStatus::Created)
  }

  /// True when the current node carries any obligations at all.
  pub fn has_obligations(&self) -> bool {
    self.node_obligations().next().is_some()
  }

  /// True iff every obligation of the current node has been created.
  ///
  /// Vacuously true for a node without obligations; the router relies on
  /// that to advance through nodes that declare no outputs.
  pub fn is_node_complete(&self) -> bool {
    self.open_obligations().next().is_none()
  }

  /// Names of the current node's artifacts with status `created`.
  pub fn created_artifacts(&self) -> Vec<String> {
    self
      .node_obligations()
      .filter(|a| a.status == ObligationStatus::Created)
      .map(|a| a.artifact_name.clone())
      .collect()
  }

  /// Mark the obligation with this exact artifact name as created.
  ///
  /// Returns false when no obligation matches (an unexpected artifact);
  /// completion is monotonic, so marking extra artifacts never reverts it.
  pub fn mark_created(&mut self, artifact_name: &str, now: DateTime<Utc>) -> bool {
    for obligation in &mut self.pending_artifacts {
      if obligation.artifact_name == artifact_name {
        obligation.status = ObligationStatus::Created;
        obligation.created_at = Some(now);
        return true;
      }
    }
    false
  }
}
