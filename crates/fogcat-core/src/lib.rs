//! fogcat-core — shared types for the fog orchestration catalog.
//!
//! Holds the entity model (descriptor/record pairs for every managed
//! resource kind), the instance status and lifecycle-action vocabularies,
//! and the `fogcat.toml` configuration.

pub mod config;
pub mod kind;
pub mod model;
pub mod status;

pub use config::{DEFAULT_ROOT, FogcatConfig, ScopeConfig, StoreBackend, StoreConfig};
pub use kind::{Catalogued, Descriptor, Record, ResourceKind};
pub use model::*;
pub use status::{InstanceStatus, LifecycleAction, UnknownVocabulary};
