//! Connection information for infrastructure managers and clouds.

use serde::{Deserialize, Serialize};

use crate::kind::{Catalogued, Descriptor, ResourceKind};

/// How the orchestrator reaches one infrastructure manager (FIM).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FimInfo {
    pub uuid: String,
    /// Store locator of the FIM's own tuple space, e.g. `tcp/10.0.0.2:7447`.
    pub locator: String,
}

impl Catalogued for FimInfo {
    const KIND: ResourceKind = ResourceKind::Fim;
}

impl Descriptor for FimInfo {
    fn descriptor_id(&self) -> &str {
        &self.uuid
    }
}

/// How the orchestrator reaches one cloud back-end (e.g. a Kubernetes cluster).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudInfo {
    pub uuid: String,
    /// Back-end specific configuration document (kubeconfig and similar).
    pub config: String,
}

impl Catalogued for CloudInfo {
    const KIND: ResourceKind = ResourceKind::Cloud;
}

impl Descriptor for CloudInfo {
    fn descriptor_id(&self) -> &str {
        &self.uuid
    }
}
