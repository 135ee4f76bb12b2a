//! Virtual links: layer-2/3 networks that connect deployable units.

use serde::{Deserialize, Serialize};

use crate::kind::{Catalogued, Descriptor, Record, ResourceKind};

/// Addressing for a virtual link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpConfiguration {
    /// `IPV4` or `IPV6`.
    pub ip_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VirtualLinkDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_mgmt: bool,
    /// `ELINE`, `ELAN`, ...
    pub link_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_configuration: Option<IpConfiguration>,
}

impl Catalogued for VirtualLinkDescriptor {
    const KIND: ResourceKind = ResourceKind::VirtualLink;
}

impl Descriptor for VirtualLinkDescriptor {
    fn descriptor_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VirtualLinkRecord {
    pub uuid: String,
    /// Id of the [`VirtualLinkDescriptor`] this is an instance of.
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_configuration: Option<IpConfiguration>,
    /// Connection point instances currently attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_points: Option<Vec<String>>,
}

impl Catalogued for VirtualLinkRecord {
    const KIND: ResourceKind = ResourceKind::VirtualLink;
}

impl Record for VirtualLinkRecord {
    fn descriptor_id(&self) -> &str {
        &self.id
    }

    fn instance_id(&self) -> &str {
        &self.uuid
    }
}
