use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Catalog entity together with the key its owner groups it by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredEntity {
    /// `<provider>:<location>`; entities sharing a key share an owner
    pub location_key: String,
    pub entity: Entity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub api_version: String,
    pub kind: String,
    pub metadata: EntityMetadata,
    pub spec: ResourceSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub owner: String,
}

/// A change submitted to the catalog on behalf of one provider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityMutation {
    /// Replace everything previously submitted by the provider
    Full { entities: Vec<DeferredEntity> },
}

impl EntityMutation {
    pub fn full(entities: Vec<DeferredEntity>) -> Self {
        Self::Full { entities }
    }

    pub fn entities(&self) -> &[DeferredEntity] {
        match self {
            Self::Full { entities } => entities,
        }
    }
}
