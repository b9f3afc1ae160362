use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::GraphError;
use crate::node::{NodeRow, NodeTable};

/// Optional registry file mapping graph names to definition filenames.
pub const GRAPH_REGISTRY_FILE: &str = "graphs.json";

/// Built-in registry covering the stock authoring graphs.
fn default_registry() -> HashMap<String, String> {
  [
    ("PDLC", "01-pdlc.json"),
    ("Feature-Refinement", "02-feature-refinement.json"),
    ("Story-Elaboration-Subgraph", "03-story-elaboration.json"),
    ("Prototyping-Subgraph", "04-prototyping.json"),
    ("Tech-Spec-Subgraph", "05-tech-spec.json"),
    ("Development-Subgraph", "06-development.json"),
    ("Infrastructure-Setup", "07-infrastructure.json"),
    ("Software-Development-Lifecycle", "08-release.json"),
  ]
  .into_iter()
  .map(|(name, file)| (name.to_string(), file.to_string()))
  .collect()
}

/// Source of graph definition tables.
#[async_trait]
pub trait GraphSource: Send + Sync {
  /// Load the node table for a named graph.
  ///
  /// An unknown graph name or a missing/unparsable definition file is an
  /// error; the caller aborts routing for the current event without any
  /// partial state mutation.
  async fn load_graph(&self, graph_name: &str) -> Result<NodeTable, GraphError>;
}

/// Filesystem-backed graph source.
///
/// Graph tables are JSON arrays of node rows in `dir`. The built-in
/// registry can be extended or overridden by a `graphs.json` mapping in the
/// same directory, keeping the name-to-file wiring a versioned, editable
/// configuration artifact.
pub struct FsGraphSource {
  dir: PathBuf,
}

impl FsGraphSource {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  async fn registry(&self) -> HashMap<String, String> {
    let mut registry = default_registry();

    let path = self.dir.join(GRAPH_REGISTRY_FILE);
    match tokio::fs::read_to_string(&path).await {
      Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
        Ok(overrides) => registry.extend(overrides),
        Err(e) => {
          tracing::warn!(path = %path.display(), error = %e, "graph registry unparsable, using defaults");
        }
      },
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => {
        tracing::warn!(path = %path.display(), error = %e, "graph registry unreadable, using defaults");
      }
    }

    registry
  }
}

#[async_trait]
impl GraphSource for FsGraphSource {
  async fn load_graph(&self, graph_name: &str) -> Result<NodeTable, GraphError> {
    let registry = self.registry().await;
    let filename = registry
      .get(graph_name)
      .ok_or_else(|| GraphError::UnknownGraph(graph_name.to_string()))?;

    let path = self.dir.join(filename);
    let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        GraphError::DefinitionNotFound { path: path.clone() }
      } else {
        GraphError::Io(e)
      }
    })?;

    let rows: Vec<NodeRow> = serde_json::from_str(&raw).map_err(|e| GraphError::Parse {
      graph: graph_name.to_string(),
      source: e,
    })?;

    Ok(NodeTable::from_rows(rows))
  }
}
