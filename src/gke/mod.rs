//! Google Kubernetes Engine integration
//!
//! Lists clusters through the Container Engine API:
//! - Cluster record types as returned on the wire
//! - The `ClusterManager` capability the provider depends on
//! - An HTTP implementation with static or metadata-server tokens

mod client;
mod types;

pub use client::{ClusterManager, GkeClient, TokenSource, METADATA_TOKEN_URL};
#[cfg(test)]
pub use client::MockClusterManager;
pub use types::{ClusterRecord, ListClustersResponse, MasterAuth};
