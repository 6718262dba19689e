use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gke_catalog_provider::{
    catalog::{CatalogSink, HttpCatalogSink, StdoutSink},
    config::ProviderConfig,
    scheduler::TokioScheduler,
    GkeEntityProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout is reserved for the dry-run sink
    let json_logs = std::env::var("LOG_FORMAT").map(|f| f == "json").unwrap_or(false);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    tracing::info!("Starting GKE catalog provider");

    // Load configuration
    let config = ProviderConfig::load()?;
    tracing::info!(parents = ?config.parents, "Configuration loaded");

    if let Some(port) = config.metrics_port {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        PrometheusBuilder::new().with_http_listener(addr).install()?;
        tracing::info!("Serving metrics on {}", addr);
    }

    let scheduler = Arc::new(TokioScheduler::new());
    let provider = Arc::new(GkeEntityProvider::from_config(&config, scheduler.clone())?);

    let sink: Arc<dyn CatalogSink> = match &config.catalog_url {
        Some(url) => {
            tracing::info!(url = %url, "Submitting mutations to catalog");
            Arc::new(HttpCatalogSink::new(
                url,
                config.catalog_token.clone(),
                config.request_timeout(),
            )?)
        }
        None => {
            tracing::info!("No catalog_url configured, writing mutations to stdout");
            Arc::new(StdoutSink)
        }
    };

    provider.connect(sink).await;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    scheduler.shutdown();

    Ok(())
}
