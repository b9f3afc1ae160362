use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
  #[error("unknown workflow graph: {0}")]
  UnknownGraph(String),

  #[error("graph definition not found: {}", path.display())]
  DefinitionNotFound { path: PathBuf },

  #[error("failed to read graph definition: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse graph definition for '{graph}': {source}")]
  Parse {
    graph: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("node not found in graph: {node}")]
  NodeNotFound { node: String },

  #[error("no next_nodes defined for node: {node}")]
  MissingEdges { node: String },
}
