use std::path::Path;

use thiserror::Error;

/// Minimum artifact size in bytes; smaller files are treated as empty.
pub const MIN_ARTIFACT_BYTES: u64 = 100;

/// Minimum trimmed content length in characters.
pub const MIN_CONTENT_CHARS: usize = 200;

/// Placeholder markers that mark an artifact as unfinished.
const PLACEHOLDER_MARKERS: [&str; 3] = ["TODO", "[Fill in]", "..."];

/// Reason an artifact failed the completeness check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualityIssue {
  #[error("file too small ({size} bytes), appears empty or incomplete")]
  TooSmall { size: u64 },

  #[error("contains placeholder marker {marker:?}")]
  Placeholder { marker: &'static str },

  #[error("missing markdown header structure")]
  MissingHeader,

  #[error("content too brief ({chars} chars), appears incomplete")]
  TooBrief { chars: usize },
}

/// Validate that an artifact file is structurally complete.
///
/// Checks run in order and the first failure wins. Returns `Ok(None)` for a
/// valid artifact. I/O errors are returned to the caller, which applies the
/// fail-open policy; this function never repairs or coerces content.
pub async fn validate(path: &Path) -> std::io::Result<Option<QualityIssue>> {
  let size = tokio::fs::metadata(path).await?.len();
  if size < MIN_ARTIFACT_BYTES {
    return Ok(Some(QualityIssue::TooSmall { size }));
  }

  let content = tokio::fs::read_to_string(path).await?;

  for marker in PLACEHOLDER_MARKERS {
    if content.contains(marker) {
      return Ok(Some(QualityIssue::Placeholder { marker }));
    }
  }

  let trimmed = content.trim();
  if !trimmed.starts_with('#') {
    return Ok(Some(QualityIssue::MissingHeader));
  }

  let chars = trimmed.chars().count();
  if chars < MIN_CONTENT_CHARS {
    return Ok(Some(QualityIssue::TooBrief { chars }));
  }

  Ok(None)
}
