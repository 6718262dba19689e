//! Catalog sinks
//!
//! A sink receives complete mutations from a provider and owns everything
//! that happens afterwards: diffing, retention and deletion.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, instrument};

use super::entity::EntityMutation;
use crate::error::{AppError, AppResult};

/// Capability for ingesting provider mutations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSink: Send + Sync {
    /// Apply `mutation` as coming from the provider named `source`
    async fn apply_mutation(&self, source: &str, mutation: EntityMutation) -> AppResult<()>;
}

/// Wire shape shared by the HTTP and stdout sinks
#[derive(Debug, Serialize)]
pub struct MutationRequest<'a> {
    pub source: &'a str,
    #[serde(flatten)]
    pub mutation: &'a EntityMutation,
}

/// Posts mutations as JSON to a catalog endpoint
#[derive(Clone)]
pub struct HttpCatalogSink {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpCatalogSink {
    pub fn new(url: &str, token: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(&format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.to_string(),
            token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSink for HttpCatalogSink {
    #[instrument(skip(self, mutation), fields(url = %self.url))]
    async fn apply_mutation(&self, source: &str, mutation: EntityMutation) -> AppResult<()> {
        let request = MutationRequest {
            source,
            mutation: &mutation,
        };

        let mut builder = self.http.post(&self.url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::sink(&format!("Failed to reach catalog: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(
                source,
                entities = mutation.entities().len(),
                "Catalog accepted mutation"
            );
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!(source, status = status.as_u16(), "Catalog rejected mutation");
            Err(AppError::sink(&format!(
                "Catalog returned {}: {}",
                status,
                body.trim()
            )))
        }
    }
}

/// Prints mutations as YAML documents, for dry runs
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn render(source: &str, mutation: &EntityMutation) -> AppResult<String> {
        let request = MutationRequest { source, mutation };
        serde_yaml::to_string(&request)
            .map_err(|e| AppError::serialization(&format!("Failed to render mutation: {}", e)))
    }
}

#[async_trait]
impl CatalogSink for StdoutSink {
    async fn apply_mutation(&self, source: &str, mutation: EntityMutation) -> AppResult<()> {
        let document = Self::render(source, &mutation)?;
        println!("---\n{}", document);
        Ok(())
    }
}
