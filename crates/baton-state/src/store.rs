use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::WorkspaceLayout;
use crate::state::WorkflowState;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to access state document: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to encode state document: {0}")]
  Encode(#[from] serde_json::Error),
}

/// Load/save contract for the workflow state document.
///
/// `load` returning `Ok(None)` means "no active workflow": both a missing
/// document and an unparsable one map there. Save failures are returned,
/// never retried; the caller decides whether to abort its transition.
#[async_trait]
pub trait StateStore: Send + Sync {
  async fn load(&self) -> Result<Option<WorkflowState>, StoreError>;
  async fn save(&self, state: &WorkflowState) -> Result<(), StoreError>;
}

/// JSON-file-backed state store.
pub struct JsonStateStore {
  path: PathBuf,
}

impl JsonStateStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn for_layout(layout: &WorkspaceLayout) -> Self {
    Self::new(layout.state_path())
  }
}

#[async_trait]
impl StateStore for JsonStateStore {
  async fn load(&self) -> Result<Option<WorkflowState>, StoreError> {
    let raw = match tokio::fs::read_to_string(&self.path).await {
      Ok(raw) => raw,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
    };

    match serde_json::from_str(&raw) {
      Ok(state) => Ok(Some(state)),
      Err(e) => {
        // Corruption disables routing and gating rather than crashing any
        // caller; the document stays on disk for manual inspection.
        tracing::warn!(
          path = %self.path.display(),
          error = %e,
          "state document unparsable, treating as no active workflow"
        );
        Ok(None)
      }
    }
  }

  async fn save(&self, state: &WorkflowState) -> Result<(), StoreError> {
    let encoded = serde_json::to_string_pretty(state)?;

    if let Some(parent) = self.path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(&self.path, encoded).await?;
    Ok(())
  }
}
