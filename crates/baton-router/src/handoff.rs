use std::fmt::Write as _;

/// Structured description of what should happen after a routing transition.
///
/// A pure projection of already-persisted state: rendering it has no side
/// effects and regenerating it is always safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handoff {
  /// The workflow reached its terminal marker.
  Completed,
  /// The next step delegates to a nested workflow that must be launched.
  SubgraphLaunch { subgraph: String },
  /// An ordinary transition to the next node.
  Next {
    node: String,
    agent: String,
    description: String,
    outputs: Vec<String>,
    inputs: Vec<String>,
  },
}

impl Handoff {
  /// Render the banner text shown to the next session.
  pub fn render(&self) -> String {
    match self {
      Self::Completed => {
        "\n=== WORKFLOW COMPLETE ===\nAll nodes in this workflow have been executed.\n".to_string()
      }
      Self::SubgraphLaunch { subgraph } => format!(
        "\n=== SUBGRAPH LAUNCH REQUIRED ===\nWorkflow requires launching subgraph: {subgraph}\n"
      ),
      Self::Next {
        node,
        agent,
        description,
        outputs,
        inputs,
      } => {
        let mut msg = String::new();
        let _ = writeln!(msg, "\n=== WORKFLOW HANDOFF ===\n");
        let _ = writeln!(msg, "Next Agent: {agent}");
        let _ = writeln!(msg, "Current Node: {node}\n");
        let _ = writeln!(msg, "Task: {description}\n");
        let _ = writeln!(msg, "Required Outputs:");
        for output in outputs {
          let _ = writeln!(msg, "  - {output}");
        }
        let _ = writeln!(msg, "\nAvailable Inputs:");
        for input in inputs {
          let _ = writeln!(msg, "  - {input}");
        }
        let _ = writeln!(
          msg,
          "\nTo proceed: Launch the {agent} agent with context about node {node}."
        );
        let _ = writeln!(
          msg,
          "The agent should create the required outputs, which will trigger the next workflow step."
        );
        let _ = writeln!(msg, "\n=========================");
        msg
      }
    }
  }
}
