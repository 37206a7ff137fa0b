//! Infrastructure layer: artifact loading and service configuration.

pub mod artifacts;
pub mod config;

pub use artifacts::{
    ArtifactError, ArtifactKind, ArtifactOrigin, ArtifactResolver, ArtifactSource,
    LoadedArtifacts, load_artifacts,
};
pub use config::ServiceConfig;
