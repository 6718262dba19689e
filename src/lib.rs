//! GKE Catalog Provider Library
//!
//! Lists Google Kubernetes Engine clusters on a schedule and submits them to
//! a software catalog as `Resource` entities.

pub mod catalog;
pub mod config;
pub mod error;
pub mod gke;
pub mod provider;
pub mod scheduler;

pub use error::{AppError, AppResult};
pub use provider::{GkeEntityProvider, PROVIDER_NAME};
