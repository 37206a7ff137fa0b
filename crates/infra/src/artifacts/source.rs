use std::path::PathBuf;

use super::ArtifactKind;

pub const MODEL_FILE: &str = "best_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const SCHEMA_FILE: &str = "feature_names.json";

/// Model file name used by older training runs that wrote to the project root.
pub const LEGACY_MODEL_FILE: &str = "best_model_random_forest_(tuned).json";

/// One candidate location for the training artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSource {
    /// Name reported in logs (e.g. `primary`, `legacy`).
    pub label: String,
    pub dir: PathBuf,
    pub model_file: String,
    pub scaler_file: String,
    pub schema_file: String,
}

impl ArtifactSource {
    pub fn new(label: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            dir: dir.into(),
            model_file: MODEL_FILE.to_string(),
            scaler_file: SCALER_FILE.to_string(),
            schema_file: SCHEMA_FILE.to_string(),
        }
    }

    /// The training output directory.
    pub fn primary(dir: impl Into<PathBuf>) -> Self {
        Self::new("primary", dir)
    }

    /// Project-root layout left by older training runs.
    pub fn legacy(dir: impl Into<PathBuf>) -> Self {
        Self::new("legacy", dir).with_file(ArtifactKind::Model, LEGACY_MODEL_FILE)
    }

    pub fn with_file(mut self, kind: ArtifactKind, file: impl Into<String>) -> Self {
        let file = file.into();
        match kind {
            ArtifactKind::Model => self.model_file = file,
            ArtifactKind::Scaler => self.scaler_file = file,
            ArtifactKind::Schema => self.schema_file = file,
        }
        self
    }

    pub fn file_for(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Model => &self.model_file,
            ArtifactKind::Scaler => &self.scaler_file,
            ArtifactKind::Schema => &self.schema_file,
        }
    }

    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        self.dir.join(self.file_for(kind))
    }
}
