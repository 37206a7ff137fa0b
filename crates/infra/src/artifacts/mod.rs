//! Artifact resolution boundary.
//!
//! Offline training leaves three JSON artifacts behind: the classifier, the feature scaler
//! and the ordered feature list. This module finds them across an ordered list of candidate
//! sources, deserializes and validates them, and hands the result to the inference engine.

use std::path::PathBuf;

use thiserror::Error;

pub mod resolver;
pub mod source;

pub use resolver::{ArtifactOrigin, ArtifactResolver, LoadedArtifacts, load_artifacts};
pub use source::{ArtifactSource, LEGACY_MODEL_FILE, MODEL_FILE, SCALER_FILE, SCHEMA_FILE};

/// The three persisted training outputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Model,
    Scaler,
    Schema,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::Schema => "feature_names",
        }
    }
}

impl core::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal artifact failures. A *missing* artifact is never an error here.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The file exists but does not hold a usable artifact.
    #[error("{artifact} artifact at {} is corrupt: {reason}", path.display())]
    Corrupt {
        artifact: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    /// The file exists but could not be read.
    #[error("failed to read {artifact} artifact at {}: {source}", path.display())]
    Io {
        artifact: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
