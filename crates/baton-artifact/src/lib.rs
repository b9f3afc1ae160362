//! Baton Artifact
//!
//! Artifact classification and completeness validation. An artifact's kind
//! is determined purely by filename shape against an ordered pattern table;
//! completeness is a set of structural heuristics (size, placeholders,
//! header, length), not a semantic check of the content.

mod kind;
mod quality;

pub use kind::{ArtifactKind, classify};
pub use quality::{MIN_ARTIFACT_BYTES, MIN_CONTENT_CHARS, QualityIssue, validate};
