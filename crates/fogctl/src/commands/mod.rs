pub mod catalog;
pub mod init;

use std::path::Path;

use anyhow::Context;
use fogcat_catalog::Orchestrator;
use fogcat_core::FogcatConfig;

/// Load `config` and open the catalog it describes.
pub fn open(config: &Path) -> anyhow::Result<Orchestrator> {
    let config = FogcatConfig::from_file(config)
        .with_context(|| format!("reading {}", config.display()))?;
    Ok(Orchestrator::from_config(&config)?)
}
