//! Service configuration, read from the environment.

use std::path::PathBuf;

use tracing::warn;

use crate::artifacts::ArtifactSource;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_DIR: &str = "models/trained_models";
pub const DEFAULT_LEGACY_MODEL_DIR: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Primary artifact directory (`MODEL_DIR`).
    pub model_dir: PathBuf,
    /// Legacy project-root artifact directory (`LEGACY_MODEL_DIR`).
    pub legacy_model_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            legacy_model_dir: PathBuf::from(DEFAULT_LEGACY_MODEL_DIR),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take defaults; an unparsable `PORT`
    /// is logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!(port = %raw, "PORT is not a valid port; using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            model_dir: lookup("MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            legacy_model_dir: lookup("LEGACY_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.legacy_model_dir),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Candidate artifact locations, in probe order.
    pub fn artifact_sources(&self) -> Vec<ArtifactSource> {
        vec![
            ArtifactSource::primary(&self.model_dir),
            ArtifactSource::legacy(&self.legacy_model_dir),
        ]
    }
}
