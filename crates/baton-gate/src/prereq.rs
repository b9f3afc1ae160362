use baton_state::{WorkflowState, WorkspaceLayout};

/// A recorded artifact that no longer exists on disk, with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPrerequisite {
  pub artifact_name: String,
  pub node_name: String,
  pub agent: String,
}

/// Re-check that every artifact recorded by completed nodes still exists.
///
/// Returns the full missing list so the diagnostic can name each artifact
/// with the node and agent that produced it.
pub async fn missing_prerequisites(
  state: &WorkflowState,
  layout: &WorkspaceLayout,
) -> std::io::Result<Vec<MissingPrerequisite>> {
  let mut missing = Vec::new();

  for record in &state.completed_nodes {
    for artifact_name in &record.artifacts_produced {
      let path = layout.artifact_path(artifact_name);
      if !tokio::fs::try_exists(&path).await? {
        missing.push(MissingPrerequisite {
          artifact_name: artifact_name.clone(),
          node_name: record.node_name.clone(),
          agent: record.agent.clone(),
        });
      }
    }
  }

  Ok(missing)
}
