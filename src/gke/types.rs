use serde::{Deserialize, Serialize};

/// A cluster as returned by the GKE `projects.locations.clusters.list` call.
///
/// Only the fields the provider reads are modelled; everything else in the
/// payload is ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub self_link: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub master_auth: Option<MasterAuth>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterAuth {
    #[serde(default)]
    pub cluster_ca_certificate: Option<String>,
}

impl ClusterRecord {
    /// Base64 CA certificate of the cluster's API server, if reported
    pub fn ca_certificate(&self) -> Option<&str> {
        self.master_auth
            .as_ref()
            .and_then(|auth| auth.cluster_ca_certificate.as_deref())
    }
}

/// Body of a list clusters response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClustersResponse {
    /// Entries may be `null` in the payload
    #[serde(default)]
    pub clusters: Vec<Option<ClusterRecord>>,
    /// Zones that could not be reached while listing
    #[serde(default)]
    pub missing_zones: Vec<String>,
}

/// Standard Google API error envelope
#[derive(Debug, Deserialize)]
pub(crate) struct GoogleErrorEnvelope {
    pub error: GoogleError,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleError {
    #[serde(default)]
    pub message: String,
}

/// Metadata server token response
#[derive(Debug, Deserialize)]
pub(crate) struct AccessToken {
    pub access_token: String,
}
