use std::sync::LazyLock;

use regex::Regex;

/// Kind of workflow artifact, derived from the filename alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
  Discovery,
  Feature,
  Technical,
  Development,
  Release,
}

impl ArtifactKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Discovery => "discovery",
      Self::Feature => "feature",
      Self::Technical => "technical",
      Self::Development => "development",
      Self::Release => "release",
    }
  }
}

impl std::fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Ordered pattern table; first match wins.
///
/// All kinds except `development` require a two-digit numeric code and a
/// `.md` suffix; development artifacts are recognized by literal prefix.
static PATTERNS: LazyLock<Vec<(ArtifactKind, Regex)>> = LazyLock::new(|| {
  [
    (ArtifactKind::Discovery, r"^D\d{2}-.*\.md$"),
    (ArtifactKind::Feature, r"^F\d{2}-.*\.md$"),
    (ArtifactKind::Technical, r"^T\d{2}-.*\.md$"),
    (ArtifactKind::Development, r"^DEV-.*"),
    (ArtifactKind::Release, r"^R\d{2}-.*\.md$"),
  ]
  .into_iter()
  .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("artifact pattern is valid")))
  .collect()
});

/// Classify a filename against the artifact pattern table.
///
/// Total and deterministic: any filename maps to at most one kind, and
/// repeated calls always agree.
pub fn classify(filename: &str) -> Option<ArtifactKind> {
  PATTERNS
    .iter()
    .find(|(_, pattern)| pattern.is_match(filename))
    .map(|(kind, _)| *kind)
}
