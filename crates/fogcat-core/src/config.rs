//! fogcat.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default first segment of every catalog key.
pub const DEFAULT_ROOT: &str = "force";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogcatConfig {
    pub scope: ScopeConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// The `(system-id, tenant-id)` scope every generated key is prefixed with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScopeConfig {
    #[serde(default = "default_root")]
    pub root: String,
    pub system_id: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database file, required by the `redb` backend.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redb,
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

impl FogcatConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FogcatConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a config for one tenant with a persistent store at `path`.
    pub fn scaffold(system_id: &str, tenant_id: &str, path: &Path) -> Self {
        FogcatConfig {
            scope: ScopeConfig {
                root: default_root(),
                system_id: system_id.to_string(),
                tenant_id: tenant_id.to_string(),
            },
            store: StoreConfig {
                backend: StoreBackend::Redb,
                path: Some(path.to_path_buf()),
            },
        }
    }
}
