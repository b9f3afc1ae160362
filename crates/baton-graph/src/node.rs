use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Raw node row as stored in a graph definition table.
///
/// `inputs` and `outputs` are `|`-delimited artifact-name lists and
/// `next_nodes` is the raw edge spec, keeping the table human-editable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NodeRow {
  pub node_name: String,
  pub agent_type: String,
  #[serde(default)]
  pub inputs: String,
  #[serde(default)]
  pub outputs: String,
  #[serde(default)]
  pub next_nodes: String,
  #[serde(default)]
  pub description: String,
}

/// A node definition, typed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDef {
  pub node_name: String,
  pub agent_type: String,
  pub inputs: Vec<String>,
  pub outputs: Vec<String>,
  /// Raw outgoing edge spec: the terminal marker, a single node name, or a
  /// `|`-delimited candidate set.
  pub next_nodes: String,
  pub description: String,
}

impl From<NodeRow> for NodeDef {
  fn from(row: NodeRow) -> Self {
    Self {
      node_name: row.node_name,
      agent_type: row.agent_type,
      inputs: split_list(&row.inputs),
      outputs: split_list(&row.outputs),
      next_nodes: row.next_nodes.trim().to_string(),
      description: row.description,
    }
  }
}

/// Split a `|`-delimited list, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
  raw
    .split('|')
    .map(str::trim)
    .filter(|entry| !entry.is_empty())
    .map(String::from)
    .collect()
}

/// A loaded graph: node name to definition.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
  nodes: HashMap<String, NodeDef>,
}

impl NodeTable {
  pub(crate) fn from_rows(rows: Vec<NodeRow>) -> Self {
    let nodes = rows
      .into_iter()
      .map(NodeDef::from)
      .map(|def| (def.node_name.clone(), def))
      .collect();
    Self { nodes }
  }

  pub fn get(&self, node_name: &str) -> Option<&NodeDef> {
    self.nodes.get(node_name)
  }

  pub fn contains(&self, node_name: &str) -> bool {
    self.nodes.contains_key(node_name)
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}

impl FromIterator<NodeDef> for NodeTable {
  fn from_iter<I: IntoIterator<Item = NodeDef>>(iter: I) -> Self {
    let nodes = iter
      .into_iter()
      .map(|def| (def.node_name.clone(), def))
      .collect();
    Self { nodes }
  }
}
