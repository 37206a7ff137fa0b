use std::sync::Arc;

use anyhow::Context;

use heartrisk_infra::{ArtifactResolver, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    heartrisk_observability::init();

    let config = ServiceConfig::from_env();

    // Artifacts load once, before the listener accepts anything.
    let artifacts = ArtifactResolver::new(config.artifact_sources())
        .load()
        .context("failed to load model artifacts")?;
    let engine = Arc::new(artifacts.into_engine());
    if !engine.has_model() {
        tracing::warn!("starting without a trained model; /api/predict will return 503");
    }

    let app = heartrisk_api::app::build_app(engine);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
