//! Resource kinds and the identity traits shared by every catalog entry.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Resource kinds partitioning the catalog namespace.
///
/// Each kind owns a fixed path segment directly below the tenant scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Job,
    Fim,
    Cloud,
    Entity,
    VirtualLink,
    Fdu,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Job,
        ResourceKind::Fim,
        ResourceKind::Cloud,
        ResourceKind::Entity,
        ResourceKind::VirtualLink,
        ResourceKind::Fdu,
    ];

    /// The namespace segment for this kind.
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceKind::Job => "job",
            ResourceKind::Fim => "fim",
            ResourceKind::Cloud => "cloud",
            ResourceKind::Entity => "entity",
            ResourceKind::VirtualLink => "vl",
            ResourceKind::Fdu => "fdu",
        }
    }

    /// Reverse lookup of [`ResourceKind::segment`].
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.segment() == segment)
    }

    /// Whether instances of this kind report records.
    pub fn has_records(&self) -> bool {
        matches!(
            self,
            ResourceKind::Entity | ResourceKind::VirtualLink | ResourceKind::Fdu
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// A value that can be stored in the catalog.
///
/// Encoding is self-describing JSON text. Unknown fields are ignored on
/// decode and absent optional fields decode as `None`.
pub trait Catalogued: Serialize + DeserializeOwned + Send + 'static {
    /// The kind whose namespace this value lives under.
    const KIND: ResourceKind;

    fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Declared, desired configuration of a resource.
///
/// Stored at `.../<kind>/<descriptor_id>/info`.
pub trait Descriptor: Catalogued {
    fn descriptor_id(&self) -> &str;
}

/// Observed state of one running instance of a descriptor.
///
/// Stored at `.../<kind>/<descriptor_id>/record/<instance_id>/info`.
pub trait Record: Catalogued {
    fn descriptor_id(&self) -> &str;
    fn instance_id(&self) -> &str;
}
