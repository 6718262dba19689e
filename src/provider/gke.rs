//! GKE entity provider
//!
//! Periodically lists clusters under every configured parent and submits
//! them to the catalog as one full snapshot.

use futures::future::try_join_all;
use futures::FutureExt;
use metrics::{counter, gauge};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use super::mapping::cluster_to_resource;
use crate::catalog::{CatalogSink, DeferredEntity, EntityMutation};
use crate::config::ProviderConfig;
use crate::error::{AppError, AppResult};
use crate::gke::{ClusterManager, GkeClient};
use crate::scheduler::{ScheduleDefinition, Scheduler, TaskFn};

/// Source tag for mutations and prefix for location keys
pub const PROVIDER_NAME: &str = "gcp-gke";

/// Provider that ingests GKE clusters as catalog `Resource` entities
pub struct GkeEntityProvider {
    parents: Vec<String>,
    schedule: ScheduleDefinition,
    client: Arc<dyn ClusterManager>,
    scheduler: Arc<dyn Scheduler>,
    connection: RwLock<Option<Arc<dyn CatalogSink>>>,
    scheduled: AtomicBool,
}

impl GkeEntityProvider {
    /// Create a provider with an explicit cluster client
    pub fn new(
        parents: Vec<String>,
        schedule: ScheduleDefinition,
        client: Arc<dyn ClusterManager>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            parents,
            schedule,
            client,
            scheduler,
            connection: RwLock::new(None),
            scheduled: AtomicBool::new(false),
        }
    }

    /// Create a provider talking to the GKE API as configured
    pub fn from_config(config: &ProviderConfig, scheduler: Arc<dyn Scheduler>) -> AppResult<Self> {
        config.validate()?;
        let schedule = config.schedule.to_definition()?;
        let client = GkeClient::from_config(config)?;

        info!(
            parents = config.parents.len(),
            api = %client.base_url(),
            "GKE provider configured"
        );

        Ok(Self::new(
            config.parents.clone(),
            schedule,
            Arc::new(client),
            scheduler,
        ))
    }

    pub fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Id of the recurring job registered by [`connect`](Self::connect)
    pub fn task_id(&self) -> String {
        format!("{}-refresh", PROVIDER_NAME)
    }

    /// Attach the catalog sink and register the recurring refresh job.
    ///
    /// The job holds a weak reference: once the provider is dropped its runs
    /// become no-ops.
    pub async fn connect(self: &Arc<Self>, sink: Arc<dyn CatalogSink>) {
        let previous = self.connection.write().await.replace(sink);
        if previous.is_some() {
            warn!(provider = PROVIDER_NAME, "Provider reconnected, replacing catalog sink");
        }

        if self.scheduled.swap(true, Ordering::SeqCst) {
            return;
        }

        let task = refresh_task(Arc::downgrade(self));
        self.scheduler
            .schedule_task(&self.task_id(), &self.schedule, task);
        info!(provider = PROVIDER_NAME, task = %self.task_id(), "Provider connected");
    }

    /// Enumerate clusters under every parent and submit them as a full mutation.
    ///
    /// A failed listing for any parent aborts the cycle without touching the
    /// catalog; this is logged and reported as `Ok`. Errors are returned only
    /// when the provider is not connected or the sink rejects the mutation.
    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    pub async fn refresh(&self) -> AppResult<()> {
        let sink = self
            .connection
            .read()
            .await
            .clone()
            .ok_or(AppError::NotConnected)?;

        info!(parents = self.parents.len(), "Refreshing GKE clusters");

        let listings = self
            .parents
            .iter()
            .map(|parent| self.client.list_clusters(parent));

        let results = match try_join_all(listings).await {
            Ok(results) => results,
            Err(e) => {
                error!(error = %e, "Failed to list GKE clusters, skipping this cycle");
                counter!("gke_provider_refresh_total", 1, "outcome" => "failure");
                return Ok(());
            }
        };

        let clusters: Vec<_> = results.into_iter().flatten().flatten().collect();
        let entities: Vec<DeferredEntity> = clusters
            .iter()
            .filter_map(|cluster| cluster_to_resource(PROVIDER_NAME, cluster))
            .collect();

        let ignored = clusters.len() - entities.len();
        let count = entities.len();

        if let Err(e) = sink
            .apply_mutation(PROVIDER_NAME, EntityMutation::full(entities))
            .await
        {
            counter!("gke_provider_refresh_total", 1, "outcome" => "failure");
            return Err(e);
        }

        counter!("gke_provider_refresh_total", 1, "outcome" => "success");
        counter!("gke_provider_clusters_ignored_total", ignored as u64);
        gauge!("gke_provider_entities", count as f64);
        info!(entities = count, ignored, "Submitted GKE clusters to catalog");

        Ok(())
    }
}

fn refresh_task(provider: Weak<GkeEntityProvider>) -> TaskFn {
    Arc::new(move || {
        let provider = provider.clone();
        async move {
            let Some(provider) = provider.upgrade() else {
                return Ok(());
            };
            if let Err(e) = provider.refresh().await {
                error!(provider = PROVIDER_NAME, error = %e, "GKE refresh failed");
            }
            Ok::<_, anyhow::Error>(())
        }
        .boxed()
    })
}
