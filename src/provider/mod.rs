//! Entity providers
//!
//! A provider turns an external inventory into catalog entities on a
//! schedule. GKE is the only inventory implemented.

mod gke;
mod mapping;

pub use gke::{GkeEntityProvider, PROVIDER_NAME};
pub use mapping::cluster_to_resource;
