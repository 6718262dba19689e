//! GKE API client
//!
//! Handles listing clusters under a parent through the Container Engine
//! REST API (`GET /v1/{parent}/clusters`).

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::types::{AccessToken, ClusterRecord, GoogleErrorEnvelope, ListClustersResponse};
use crate::config::ProviderConfig;
use crate::error::{AppError, AppResult};

/// Default GCE metadata server token endpoint
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Capability for enumerating clusters under a parent
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterManager: Send + Sync {
    /// List the clusters visible under `parent`.
    ///
    /// `None` entries mirror `null` entries in the upstream payload.
    async fn list_clusters(&self, parent: &str) -> AppResult<Vec<Option<ClusterRecord>>>;
}

/// Where bearer tokens come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// A token supplied up front
    Static(String),
    /// Fetched from the metadata server on every request
    MetadataServer { url: String },
}

impl TokenSource {
    pub fn metadata_server() -> Self {
        Self::MetadataServer {
            url: METADATA_TOKEN_URL.to_string(),
        }
    }
}

/// GKE API client wrapper
#[derive(Clone)]
pub struct GkeClient {
    http: reqwest::Client,
    base_url: String,
    token_source: TokenSource,
}

impl GkeClient {
    /// Create a new GkeClient
    pub fn new(base_url: &str, token_source: TokenSource, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gke-catalog-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::config(&format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_source,
        })
    }

    /// Create a client from provider configuration
    pub fn from_config(config: &ProviderConfig) -> AppResult<Self> {
        let token_source = match &config.access_token {
            Some(token) if !token.trim().is_empty() => TokenSource::Static(token.clone()),
            _ => TokenSource::metadata_server(),
        };
        Self::new(&config.api_base_url, token_source, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_source(&self) -> &TokenSource {
        &self.token_source
    }

    async fn access_token(&self) -> AppResult<String> {
        match &self.token_source {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::MetadataServer { url } => {
                let response = self
                    .http
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| AppError::token(&format!("Metadata server unreachable: {}", e)))?;

                if !response.status().is_success() {
                    return Err(AppError::token(&format!(
                        "Metadata server returned {}",
                        response.status()
                    )));
                }

                let token: AccessToken = response
                    .json()
                    .await
                    .map_err(|e| AppError::token(&format!("Invalid token response: {}", e)))?;
                Ok(token.access_token)
            }
        }
    }
}

#[async_trait]
impl ClusterManager for GkeClient {
    #[instrument(skip(self))]
    async fn list_clusters(&self, parent: &str) -> AppResult<Vec<Option<ClusterRecord>>> {
        let url = format!("{}/v1/{}/clusters", self.base_url, parent.trim_matches('/'));
        let token = self.access_token().await?;

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let body: ListClustersResponse = response.json().await?;

        if !body.missing_zones.is_empty() {
            warn!(
                parent,
                missing_zones = ?body.missing_zones,
                "Some zones could not be reached while listing clusters"
            );
        }

        debug!(parent, count = body.clusters.len(), "Listed clusters");
        Ok(body.clusters)
    }
}

fn api_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<GoogleErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    AppError::Api {
        status: status.as_u16(),
        message,
    }
}
