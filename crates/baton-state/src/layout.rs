use std::path::{Path, PathBuf};

/// Filesystem layout of a workflow-managed project.
///
/// Everything the hooks touch lives under `docs/workflow/` relative to the
/// project root: the state document, the produced artifacts, and the graph
/// definition tables. Artifact kind is determined purely by filename shape,
/// so this layout is the only coupling between the filesystem and the state
/// machine.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
  root: PathBuf,
}

impl WorkspaceLayout {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Path of the persisted workflow state document.
  pub fn state_path(&self) -> PathBuf {
    self.root.join("docs").join("workflow").join("state.json")
  }

  /// Directory holding produced artifacts.
  pub fn artifacts_dir(&self) -> PathBuf {
    self.root.join("docs").join("workflow").join("artifacts")
  }

  /// Full path for a named artifact.
  pub fn artifact_path(&self, artifact_name: &str) -> PathBuf {
    self.artifacts_dir().join(artifact_name)
  }

  /// Directory holding graph definition tables and the graph registry.
  pub fn graphs_dir(&self) -> PathBuf {
    self.root.join("docs").join("workflow").join("graphs")
  }
}
