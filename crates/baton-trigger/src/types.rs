use serde::Deserialize;
use thiserror::Error;

/// The only tool whose writes are gated and tracked.
pub const WRITE_TOOL: &str = "Write";

#[derive(Debug, Error)]
#[error("failed to parse trigger payload: {0}")]
pub struct TriggerParseError(#[from] serde_json::Error);

/// Arguments of a pending tool call, as seen before it runs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
  #[serde(default)]
  pub file_path: Option<String>,
}

/// Result of a finished tool call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolOutput {
  #[serde(default)]
  pub file_path: Option<String>,
}

/// Pre-write check payload: `{tool_name, parameters: {file_path}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreWriteEvent {
  #[serde(default)]
  pub tool_name: String,
  #[serde(default)]
  pub parameters: ToolInput,
}

impl PreWriteEvent {
  pub fn is_write(&self) -> bool {
    self.tool_name == WRITE_TOOL
  }

  pub fn file_path(&self) -> Option<&str> {
    self.parameters.file_path.as_deref()
  }
}

/// Post-write intake payload: `{tool_name, result: {file_path}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostWriteEvent {
  #[serde(default)]
  pub tool_name: String,
  #[serde(default)]
  pub result: ToolOutput,
}

impl PostWriteEvent {
  pub fn is_write(&self) -> bool {
    self.tool_name == WRITE_TOOL
  }

  pub fn file_path(&self) -> Option<&str> {
    self.result.file_path.as_deref()
  }
}

pub fn parse_pre_write(raw: &str) -> Result<PreWriteEvent, TriggerParseError> {
  Ok(serde_json::from_str(raw)?)
}

pub fn parse_post_write(raw: &str) -> Result<PostWriteEvent, TriggerParseError> {
  Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_pre_write_payload() {
    let event = parse_pre_write(
      r#"{"tool_name":"Write","parameters":{"file_path":"docs/workflow/artifacts/D01-scan.md"}}"#,
    )
    .unwrap();
    assert!(event.is_write());
    assert_eq!(
      event.file_path(),
      Some("docs/workflow/artifacts/D01-scan.md")
    );
  }

  #[test]
  fn parses_post_write_payload() {
    let event =
      parse_post_write(r#"{"tool_name":"Write","result":{"file_path":"D01-scan.md"}}"#).unwrap();
    assert!(event.is_write());
    assert_eq!(event.file_path(), Some("D01-scan.md"));
  }

  #[test]
  fn missing_fields_default() {
    let event = parse_pre_write(r#"{"tool_name":"Read"}"#).unwrap();
    assert!(!event.is_write());
    assert_eq!(event.file_path(), None);
  }

  #[test]
  fn unknown_fields_are_ignored() {
    let event = parse_post_write(r#"{"tool_name":"Write","result":{},"session_id":"x"}"#).unwrap();
    assert!(event.is_write());
  }

  #[test]
  fn malformed_payload_is_a_parse_error() {
    assert!(parse_pre_write("{nope").is_err());
  }
}
