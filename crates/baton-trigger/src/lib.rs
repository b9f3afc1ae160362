//! Baton Trigger
//!
//! Typed payloads for the tool-call hook triggers. Session start/stop
//! payloads are opaque to the state machine and have no types here.
//! Deserialization is
//! deliberately lenient: every field is defaulted, unknown fields are
//! ignored, and parse errors are surfaced as a value the boundary maps to
//! fail-open — a malformed event must never hard-crash the host
//! interaction.

mod types;

pub use types::{
  PostWriteEvent, PreWriteEvent, ToolInput, ToolOutput, TriggerParseError, WRITE_TOOL,
  parse_post_write, parse_pre_write,
};
