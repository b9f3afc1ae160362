//! Baton Graph
//!
//! Node graph definition tables and next-node resolution. A graph is a
//! mapping from node name to [`NodeDef`] (agent type, input/output artifact
//! lists, outgoing edge spec, description), loaded from a JSON node table
//! named by the graph registry.
//!
//! Edge resolution recognizes the terminal marker and `|`-delimited fan-out
//! specs; fan-out deterministically follows the first candidate only, a
//! documented limitation. Subgraph entries are a naming convention applied
//! by the router, not here: they affect state shape, not edge resolution.

mod edge;
mod error;
mod node;
mod source;

pub use edge::{NextNode, TERMINAL, next_node};
pub use error::GraphError;
pub use node::{NodeDef, NodeTable, split_list};
pub use source::{FsGraphSource, GRAPH_REGISTRY_FILE, GraphSource};
