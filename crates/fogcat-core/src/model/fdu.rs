//! Deployable units (FDUs): the orchestrator's unit of compute deployment.
//!
//! A unit may be a VM, a container, a unikernel, a microcontroller image or
//! a script, selected by [`FduDescriptor::hypervisor`].

use serde::{Deserialize, Serialize};

use crate::kind::{Catalogued, Descriptor, Record, ResourceKind};
use crate::status::{InstanceStatus, UnknownVocabulary};

pub mod hypervisor {
    pub const BARE: &str = "BARE";
    pub const KVM: &str = "KVM";
    pub const KVM_UK: &str = "KVM_UK";
    pub const XEN: &str = "XEN";
    pub const XEN_UK: &str = "XEN_UK";
    pub const LXD: &str = "LXD";
    pub const DOCKER: &str = "DOCKER";
    pub const MCU: &str = "MCU";
}

pub mod migration_kind {
    pub const LIVE: &str = "LIVE";
    pub const COLD: &str = "COLD";
}

pub mod configuration_kind {
    pub const SCRIPT: &str = "SCRIPT";
    pub const CLOUD_INIT: &str = "CLOUD_INIT";
    pub const ENV: &str = "ENV";
}

pub mod interface_kind {
    pub const INTERNAL: &str = "INTERNAL";
    pub const EXTERNAL: &str = "EXTERNAL";
    pub const WLAN: &str = "WLAN";
    pub const BLUETOOTH: &str = "BLUETOOTH";
}

pub mod virtual_interface_kind {
    pub const VIRTUAL: &str = "VIRTUAL";
    pub const VIRTIO: &str = "VIRTIO";
    pub const PARAVIRT: &str = "PARAVIRT";
    pub const FOS_MGMT: &str = "FOS_MGMT";
    pub const PCI_PASSTHROUGH: &str = "PCI_PASSTHROUGH";
    pub const SR_IOV: &str = "SR_IOV";
    pub const E1000: &str = "E1000";
    pub const RTL8139: &str = "RTL8139";
    pub const PHYSICAL: &str = "PHYSICAL";
    pub const BRIDGED: &str = "BRIDGED";
}

pub mod io_kind {
    pub const GPIO: &str = "GPIO";
    pub const I2C: &str = "I2C";
    pub const BUS: &str = "BUS";
    pub const COM: &str = "COM";
    pub const CAN: &str = "CAN";
}

pub mod storage_kind {
    pub const BLOCK: &str = "BLOCK";
    pub const FILE: &str = "FILE";
    pub const OBJECT: &str = "OBJECT";
}

// ── Descriptor parts ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FduImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub uri: String,
    /// SHA-256 of the image.
    pub checksum: String,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputationalRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub cpu_arch: String,
    #[serde(rename = "cpu_min_freq")]
    pub cpu_min_frequency: u32,
    pub cpu_min_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_min_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fpga_min_count: Option<u32>,
    pub ram_size_mb: u32,
    pub storage_size_mb: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    #[serde(rename = "lat")]
    pub latitude: String,
    #[serde(rename = "lon")]
    pub longitude: String,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proximity {
    #[serde(rename = "neighbour")]
    pub neighbor: String,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeographicalRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<Proximity>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FduConfiguration {
    pub conf_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// `VAR=VALUE` pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_keys: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VirtualInterface {
    #[serde(rename = "vif_kind")]
    pub kind: String,
    /// PCI address, bridge name or host interface name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    pub virtual_interface: VirtualInterface,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionPointDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: String,
    pub id: String,
    /// Id of the virtual link this point attaches to.
    pub vld_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageDescriptor {
    pub id: String,
    pub storage_type: String,
    pub size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FduScalingPolicy {
    pub metric: String,
    pub scale_up_threshold: f32,
    pub scale_down_threshold: f32,
    pub threshold_sensibility: f32,
    pub probe_interval: f32,
    pub min_replicas: u8,
    pub max_replicas: u8,
}

// ── Descriptor ─────────────────────────────────────────────────────

/// Declared configuration of a deployable unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FduDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub id: String,
    pub name: String,
    pub version: String,
    pub fdu_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hypervisor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<FduImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_specific: Option<String>,
    pub computation_requirements: ComputationalRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geographical_requirements: Option<GeographicalRequirements>,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDescriptor>,
    #[serde(default)]
    pub storage: Vec<StorageDescriptor>,
    #[serde(default)]
    pub connection_points: Vec<ConnectionPointDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<FduConfiguration>,
    pub migration_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_policies: Option<Vec<FduScalingPolicy>>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl Catalogued for FduDescriptor {
    const KIND: ResourceKind = ResourceKind::Fdu;
}

impl Descriptor for FduDescriptor {
    fn descriptor_id(&self) -> &str {
        &self.id
    }
}

// ── Record parts ───────────────────────────────────────────────────

/// Virtual interface as reported by the hypervisor for a running instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachedVirtualInterface {
    #[serde(rename = "intf_type")]
    pub kind: String,
    pub vpci: String,
    pub bandwidth: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterfaceRecord {
    pub name: String,
    #[serde(default)]
    pub is_mgmt: bool,
    #[serde(rename = "if_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_interface: Option<AttachedVirtualInterface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp_id: Option<String>,
    /// External connection point the interface is exposed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_cp_id: Option<String>,
    #[serde(rename = "vintf_name")]
    pub virtual_interface_name: String,
    pub status: String,
    #[serde(rename = "phy_face", default, skip_serializing_if = "Option::is_none")]
    pub physical_face: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veth_face_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageRecord {
    pub uuid: String,
    pub storage_id: String,
    pub storage_type: String,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_system_protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionPointRecord {
    pub uuid: String,
    pub cp_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vld_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationProperties {
    pub destination: String,
    pub source: String,
}

// ── Record ─────────────────────────────────────────────────────────

/// Observed state of one running instance of a deployable unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FduRecord {
    pub uuid: String,
    pub fdu_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<FduImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computation_requirements: Option<ComputationalRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<FduConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<InterfaceRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Vec<StorageRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_points: Option<Vec<ConnectionPointRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_properties: Option<MigrationProperties>,
    /// Hypervisor-specific observed data, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypervisor_info: Option<serde_json::Value>,
}

impl FduRecord {
    /// Minimal record for a freshly reported instance.
    pub fn new(fdu_id: &str, uuid: &str, status: InstanceStatus) -> Self {
        FduRecord {
            uuid: uuid.to_string(),
            fdu_id: fdu_id.to_string(),
            status: status.as_str().to_string(),
            hypervisor: None,
            image: None,
            computation_requirements: None,
            migration_kind: None,
            configuration: None,
            interfaces: None,
            storage: None,
            connection_points: None,
            depends_on: None,
            error_code: None,
            error_msg: None,
            migration_properties: None,
            hypervisor_info: None,
        }
    }

    pub fn state(&self) -> Result<InstanceStatus, UnknownVocabulary> {
        self.status.parse()
    }
}

impl Catalogued for FduRecord {
    const KIND: ResourceKind = ResourceKind::Fdu;
}

impl Record for FduRecord {
    fn descriptor_id(&self) -> &str {
        &self.fdu_id
    }

    fn instance_id(&self) -> &str {
        &self.uuid
    }
}
