use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use heartrisk_ai::{InferenceEngine, ModelArtifact, StandardScaler};
use heartrisk_core::FeatureSchema;

use super::{ArtifactError, ArtifactKind, ArtifactSource};

/// Where a resolved artifact came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOrigin {
    /// Loaded from the source with this label.
    Source { label: String, path: PathBuf },
    /// Not found anywhere; the built-in default was used (schema only).
    Default,
    /// Not found anywhere and no default exists.
    Missing,
}

/// Everything the resolver found. Model and scaler may be absent; the schema never is.
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub model: Option<ModelArtifact>,
    pub scaler: Option<StandardScaler>,
    pub schema: FeatureSchema,
    pub origins: Vec<(ArtifactKind, ArtifactOrigin)>,
}

impl LoadedArtifacts {
    pub fn origin(&self, kind: ArtifactKind) -> Option<&ArtifactOrigin> {
        self.origins.iter().find(|(k, _)| *k == kind).map(|(_, o)| o)
    }

    /// Build the shared inference context.
    pub fn into_engine(self) -> InferenceEngine {
        let mut engine = InferenceEngine::new(self.schema);
        if let Some(model) = self.model {
            engine = engine.with_classifier(model.into_classifier());
        }
        if let Some(scaler) = self.scaler {
            engine = engine.with_scaler(Arc::new(scaler));
        }
        engine
    }
}

/// Probes an ordered list of [`ArtifactSource`]s, first hit wins per artifact.
///
/// Each artifact is resolved independently, so the model may come from the primary
/// directory while the scaler comes from a legacy location.
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    sources: Vec<ArtifactSource>,
}

impl ArtifactResolver {
    pub fn new(sources: Vec<ArtifactSource>) -> Self {
        Self { sources }
    }

    /// `primary_dir` first, then the legacy project-root layout in `legacy_dir`.
    pub fn with_legacy_fallback(
        primary_dir: impl Into<PathBuf>,
        legacy_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::new(vec![
            ArtifactSource::primary(primary_dir),
            ArtifactSource::legacy(legacy_dir),
        ])
    }

    pub fn load(&self) -> Result<LoadedArtifacts, ArtifactError> {
        let mut origins = Vec::with_capacity(3);

        let model = match self.locate(ArtifactKind::Model) {
            Some((source, path)) => {
                let artifact: ModelArtifact = read_json(ArtifactKind::Model, &path)?;
                artifact
                    .validate()
                    .map_err(|e| corrupt(ArtifactKind::Model, &path, e.to_string()))?;
                origins.push((ArtifactKind::Model, loaded(ArtifactKind::Model, source, path)));
                Some(artifact)
            }
            None => {
                warn!(
                    artifact = %ArtifactKind::Model,
                    "no trained model found; predictions will fail"
                );
                origins.push((ArtifactKind::Model, ArtifactOrigin::Missing));
                None
            }
        };

        let scaler = match self.locate(ArtifactKind::Scaler) {
            Some((source, path)) => {
                let scaler: StandardScaler = read_json(ArtifactKind::Scaler, &path)?;
                scaler
                    .validate()
                    .map_err(|e| corrupt(ArtifactKind::Scaler, &path, e.to_string()))?;
                origins.push((ArtifactKind::Scaler, loaded(ArtifactKind::Scaler, source, path)));
                Some(scaler)
            }
            None => {
                warn!(
                    artifact = %ArtifactKind::Scaler,
                    "no scaler found; using unscaled features"
                );
                origins.push((ArtifactKind::Scaler, ArtifactOrigin::Missing));
                None
            }
        };

        let schema = match self.locate(ArtifactKind::Schema) {
            Some((source, path)) => {
                // Empty / duplicate lists fail `FeatureSchema`'s own invariants here.
                let schema: FeatureSchema = read_json(ArtifactKind::Schema, &path)?;
                origins.push((ArtifactKind::Schema, loaded(ArtifactKind::Schema, source, path)));
                schema
            }
            None => {
                info!(artifact = %ArtifactKind::Schema, "using default feature schema");
                origins.push((ArtifactKind::Schema, ArtifactOrigin::Default));
                FeatureSchema::canonical()
            }
        };

        check_widths(&schema, model.as_ref(), scaler.as_ref());

        Ok(LoadedArtifacts {
            model,
            scaler,
            schema,
            origins,
        })
    }

    fn locate(&self, kind: ArtifactKind) -> Option<(&ArtifactSource, PathBuf)> {
        self.sources.iter().find_map(|source| {
            let path = source.path_for(kind);
            path.is_file().then_some((source, path))
        })
    }
}

/// Resolve artifacts from `primary_dir`, falling back to the legacy layout in the
/// current working directory.
pub fn load_artifacts(primary_dir: impl AsRef<Path>) -> Result<LoadedArtifacts, ArtifactError> {
    ArtifactResolver::with_legacy_fallback(primary_dir.as_ref(), ".").load()
}

fn loaded(kind: ArtifactKind, source: &ArtifactSource, path: PathBuf) -> ArtifactOrigin {
    info!(
        artifact = %kind,
        source = %source.label,
        path = %path.display(),
        "artifact loaded"
    );
    ArtifactOrigin::Source {
        label: source.label.clone(),
        path,
    }
}

fn read_json<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        artifact: kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| corrupt(kind, path, e.to_string()))
}

fn corrupt(kind: ArtifactKind, path: &Path, reason: String) -> ArtifactError {
    ArtifactError::Corrupt {
        artifact: kind,
        path: path.to_path_buf(),
        reason,
    }
}

/// Width disagreements are not fatal at load time; each prediction reports them instead.
fn check_widths(
    schema: &FeatureSchema,
    model: Option<&ModelArtifact>,
    scaler: Option<&StandardScaler>,
) {
    if let Some(model) = model {
        if model.n_features() != schema.len() {
            warn!(
                model_features = model.n_features(),
                schema_features = schema.len(),
                "model width does not match feature schema"
            );
        }
    }
    if let Some(scaler) = scaler {
        if scaler.mean.len() != schema.len() {
            warn!(
                scaler_features = scaler.mean.len(),
                schema_features = schema.len(),
                "scaler width does not match feature schema"
            );
        }
    }
}
