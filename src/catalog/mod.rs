//! Catalog side of the provider
//!
//! Entity shapes handed to the catalog, the mutation envelope, and the sinks
//! that deliver mutations.

mod entity;
mod sink;

pub use entity::{DeferredEntity, Entity, EntityMetadata, EntityMutation, ResourceSpec};
#[cfg(test)]
pub use sink::MockCatalogSink;
pub use sink::{CatalogSink, HttpCatalogSink, MutationRequest, StdoutSink};

pub const ANNOTATION_KUBERNETES_API_SERVER: &str = "kubernetes.io/api-server";
pub const ANNOTATION_KUBERNETES_API_SERVER_CA: &str =
    "kubernetes.io/api-server-certificate-authority";
pub const ANNOTATION_KUBERNETES_AUTH_PROVIDER: &str = "kubernetes.io/auth-provider";
pub const ANNOTATION_LOCATION: &str = "backstage.io/managed-by-location";
pub const ANNOTATION_ORIGIN_LOCATION: &str = "backstage.io/managed-by-origin-location";
