use crate::error::GraphError;
use crate::node::{NodeTable, split_list};

/// Literal marker for a terminal edge spec.
pub const TERMINAL: &str = "__end__";

/// Result of resolving a node's outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextNode {
  /// The workflow ends after the current node.
  Terminal,
  /// A single named successor.
  Node(String),
}

/// Resolve the next node from the current node's edge spec.
///
/// A `|`-delimited spec is a fan-out; only the first candidate is pursued
/// and the selection is logged. True parallel branch execution is not
/// implemented.
pub fn next_node(table: &NodeTable, current: &str) -> Result<NextNode, GraphError> {
  let def = table.get(current).ok_or_else(|| GraphError::NodeNotFound {
    node: current.to_string(),
  })?;

  let spec = def.next_nodes.as_str();
  if spec.is_empty() {
    return Err(GraphError::MissingEdges {
      node: current.to_string(),
    });
  }

  if spec == TERMINAL {
    return Ok(NextNode::Terminal);
  }

  if spec.contains('|') {
    let candidates = split_list(spec);
    let first = candidates
      .first()
      .cloned()
      .ok_or_else(|| GraphError::MissingEdges {
        node: current.to_string(),
      })?;
    tracing::info!(
      node = current,
      candidates = ?candidates,
      selected = %first,
      "fan-out edge spec, following first branch only"
    );
    return Ok(NextNode::Node(first));
  }

  Ok(NextNode::Node(spec.to_string()))
}
