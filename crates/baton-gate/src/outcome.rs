use thiserror::Error;

use baton_state::StoreError;

#[derive(Debug, Error)]
pub enum GateError {
  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("failed to inspect artifacts: {0}")]
  Io(#[from] std::io::Error),
}

/// Result of evaluating the gate for one pre-write event.
#[derive(Debug)]
pub enum GateOutcome {
  /// The action may proceed.
  Allowed,
  /// The action is blocked; the string is the rendered diagnostic.
  Blocked(String),
  /// The gate could not evaluate its own bookkeeping.
  Indeterminate(GateError),
}

/// Boundary verdict after the fail-open policy is applied.
#[derive(Debug, PartialEq, Eq)]
pub enum Verdict {
  Allowed,
  Blocked(String),
}

impl GateOutcome {
  /// Collapse to the boundary verdict. Indeterminate outcomes allow the
  /// action: the gate exists to catch a known bad state, not to block the
  /// host when its own bookkeeping is unreadable.
  pub fn into_verdict(self) -> Verdict {
    match self {
      Self::Allowed => Verdict::Allowed,
      Self::Blocked(reason) => Verdict::Blocked(reason),
      Self::Indeterminate(error) => {
        tracing::warn!(error = %error, "gate indeterminate, allowing action");
        Verdict::Allowed
      }
    }
  }
}
