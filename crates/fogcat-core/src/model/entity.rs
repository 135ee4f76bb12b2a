//! Composite entities: a set of deployable units wired by virtual links.
//!
//! Constituents are referenced by id (and index), never embedded, so each
//! can be looked up or replaced on its own.

use serde::{Deserialize, Serialize};

use crate::kind::{Catalogued, Descriptor, Record, ResourceKind};
use crate::status::{InstanceStatus, UnknownVocabulary};

/// Entity kinds as used in [`EntityDescriptor::kind`].
pub mod entity_kind {
    pub const FIM: &str = "FIM";
    pub const CLOUD: &str = "CLOUD";
}

/// Metrics a scaling policy can watch.
pub mod scaling_metric {
    pub const CPU: &str = "CPU";
    pub const MEMORY: &str = "MEMORY";
    pub const DISK: &str = "DISK";
    pub const CUSTOM: &str = "CUSTOM";
}

/// Reference to a deployable unit that is part of an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstituentFdu {
    pub id: String,
    pub index: u8,
}

/// Reference to one running instance of a constituent unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstituentFduRecord {
    pub id: String,
    pub uuid: String,
    pub index: u8,
}

/// Reference to one running instance of a constituent virtual link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstituentVirtualLinkRecord {
    pub id: String,
    pub uuid: String,
}

/// Scaling rule for one constituent unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityScalingPolicy {
    pub metric: String,
    pub scale_up_threshold: f32,
    pub scale_down_threshold: f32,
    pub threshold_sensibility: f32,
    pub min_replicas: u8,
    pub max_replicas: u8,
    pub fdu_id: String,
}

/// Declared composition of an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub id: String,
    pub version: String,
    pub entity_version: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fdus: Option<Vec<ConstituentFdu>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_policies: Option<Vec<EntityScalingPolicy>>,
    /// Ids of the virtual link descriptors this entity attaches to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_descriptor: Option<String>,
}

impl Catalogued for EntityDescriptor {
    const KIND: ResourceKind = ResourceKind::Entity;
}

impl Descriptor for EntityDescriptor {
    fn descriptor_id(&self) -> &str {
        &self.id
    }
}

/// Observed state of one instantiated entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityRecord {
    pub uuid: String,
    /// Id of the [`EntityDescriptor`] this is an instance of.
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fdus: Option<Vec<ConstituentFduRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_links: Option<Vec<ConstituentVirtualLinkRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_record: Option<String>,
}

impl EntityRecord {
    pub fn state(&self) -> Result<InstanceStatus, UnknownVocabulary> {
        self.status.parse()
    }
}

impl Catalogued for EntityRecord {
    const KIND: ResourceKind = ResourceKind::Entity;
}

impl Record for EntityRecord {
    fn descriptor_id(&self) -> &str {
        &self.id
    }

    fn instance_id(&self) -> &str {
        &self.uuid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> EntityDescriptor {
        EntityDescriptor {
            uuid: None,
            id: "e1".to_string(),
            version: "0.1".to_string(),
            entity_version: "1".to_string(),
            kind: entity_kind::FIM.to_string(),
            description: None,
            fdus: Some(vec![ConstituentFdu {
                id: "f1".to_string(),
                index: 0,
            }]),
            scaling_policies: None,
            virtual_links: Some(vec![]),
            cloud_descriptor: None,
        }
    }

    #[test]
    fn absent_and_empty_stay_distinct() {
        let text = descriptor().encode().unwrap();
        assert!(!text.contains("description"));
        assert!(text.contains("\"virtual_links\":[]"));

        let decoded = EntityDescriptor::decode(&text).unwrap();
        assert_eq!(decoded.virtual_links, Some(vec![]));
        assert_eq!(decoded.scaling_policies, None);
        assert_eq!(decoded, descriptor());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let text = r#"{"uuid":"u1","id":"e2","status":"RUNNING","placement":"edge-7"}"#;
        let record = EntityRecord::decode(text).unwrap();
        assert_eq!(record.instance_id(), "u1");
        assert_eq!(record.state().unwrap(), InstanceStatus::Running);
        assert!(record.fdus.is_none());
    }

    #[test]
    fn missing_mandatory_field_fails() {
        assert!(EntityRecord::decode(r#"{"uuid":"u1","id":"e2"}"#).is_err());
    }
}
