//! Cluster record to catalog entity mapping

use std::collections::BTreeMap;
use tracing::warn;

use crate::catalog::{
    DeferredEntity, Entity, EntityMetadata, ResourceSpec, ANNOTATION_KUBERNETES_API_SERVER,
    ANNOTATION_KUBERNETES_API_SERVER_CA, ANNOTATION_KUBERNETES_AUTH_PROVIDER, ANNOTATION_LOCATION,
    ANNOTATION_ORIGIN_LOCATION,
};
use crate::gke::ClusterRecord;

pub const ENTITY_API_VERSION: &str = "backstage.io/v1alpha1";
pub const ENTITY_KIND: &str = "Resource";
pub const ENTITY_NAMESPACE: &str = "default";
pub const RESOURCE_TYPE: &str = "kubernetes-cluster";
pub const RESOURCE_OWNER: &str = "unknown";
pub const AUTH_PROVIDER: &str = "google";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Build the catalog entity for a cluster.
///
/// Returns `None`, after logging a warning, when any of `name`, `selfLink`,
/// `location` or `endpoint` is missing or empty.
pub fn cluster_to_resource(provider_name: &str, cluster: &ClusterRecord) -> Option<DeferredEntity> {
    let (Some(name), Some(_), Some(location), Some(endpoint)) = (
        non_empty(&cluster.name),
        non_empty(&cluster.self_link),
        non_empty(&cluster.location),
        non_empty(&cluster.endpoint),
    ) else {
        warn!(
            name = ?cluster.name,
            self_link = ?cluster.self_link,
            location = ?cluster.location,
            endpoint = ?cluster.endpoint,
            "Ignoring partial cluster, a required field is missing"
        );
        return None;
    };

    let location_key = format!("{}:{}", provider_name, location);

    let annotations = BTreeMap::from([
        (
            ANNOTATION_KUBERNETES_API_SERVER.to_string(),
            format!("https://{}", endpoint),
        ),
        (
            ANNOTATION_KUBERNETES_API_SERVER_CA.to_string(),
            cluster.ca_certificate().unwrap_or_default().to_string(),
        ),
        (
            ANNOTATION_KUBERNETES_AUTH_PROVIDER.to_string(),
            AUTH_PROVIDER.to_string(),
        ),
        (ANNOTATION_LOCATION.to_string(), location_key.clone()),
        (ANNOTATION_ORIGIN_LOCATION.to_string(), location_key.clone()),
    ]);

    Some(DeferredEntity {
        location_key,
        entity: Entity {
            api_version: ENTITY_API_VERSION.to_string(),
            kind: ENTITY_KIND.to_string(),
            metadata: EntityMetadata {
                name: name.to_string(),
                namespace: ENTITY_NAMESPACE.to_string(),
                annotations,
            },
            spec: ResourceSpec {
                resource_type: RESOURCE_TYPE.to_string(),
                owner: RESOURCE_OWNER.to_string(),
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gke::MasterAuth;

    fn cluster() -> ClusterRecord {
        ClusterRecord {
            name: Some("a".to_string()),
            self_link: Some("s".to_string()),
            location: Some("us".to_string()),
            endpoint: Some("1.2.3.4".to_string()),
            master_auth: None,
        }
    }

    #[test]
    fn test_complete_cluster_maps_to_resource() {
        let resource = cluster_to_resource("gcp-gke", &cluster()).unwrap();
        let annotations = &resource.entity.metadata.annotations;

        assert_eq!(resource.location_key, "gcp-gke:us");
        assert_eq!(resource.entity.api_version, "backstage.io/v1alpha1");
        assert_eq!(resource.entity.kind, "Resource");
        assert_eq!(resource.entity.metadata.name, "a");
        assert_eq!(resource.entity.metadata.namespace, "default");
        assert_eq!(resource.entity.spec.resource_type, "kubernetes-cluster");
        assert_eq!(resource.entity.spec.owner, "unknown");
        assert_eq!(annotations[ANNOTATION_KUBERNETES_API_SERVER], "https://1.2.3.4");
        assert_eq!(annotations[ANNOTATION_KUBERNETES_API_SERVER_CA], "");
        assert_eq!(annotations[ANNOTATION_KUBERNETES_AUTH_PROVIDER], "google");
        assert_eq!(annotations[ANNOTATION_LOCATION], "gcp-gke:us");
        assert_eq!(annotations[ANNOTATION_ORIGIN_LOCATION], "gcp-gke:us");
    }

    #[test]
    fn test_ca_certificate_annotation() {
        let mut record = cluster();
        record.master_auth = Some(MasterAuth {
            cluster_ca_certificate: Some("LS0tLS1CRUdJTg==".to_string()),
        });

        let resource = cluster_to_resource("gcp-gke", &record).unwrap();
        assert_eq!(
            resource.entity.metadata.annotations[ANNOTATION_KUBERNETES_API_SERVER_CA],
            "LS0tLS1CRUdJTg=="
        );
    }

    #[test]
    fn test_missing_required_fields_are_dropped() {
        let strip: [fn(&mut ClusterRecord); 4] = [
            |c| c.name = None,
            |c| c.self_link = None,
            |c| c.location = None,
            |c| c.endpoint = None,
        ];

        for remove in strip {
            let mut record = cluster();
            remove(&mut record);
            assert!(cluster_to_resource("gcp-gke", &record).is_none());
        }
    }

    #[test]
    fn test_empty_required_field_is_dropped() {
        let mut record = cluster();
        record.endpoint = Some(String::new());
        assert!(cluster_to_resource("gcp-gke", &record).is_none());
    }
}
