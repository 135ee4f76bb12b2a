use std::path::Path;

use fogcat_core::FogcatConfig;

pub fn init(config: &Path, system: &str, tenant: &str, db: &Path) -> anyhow::Result<()> {
    if config.exists() {
        anyhow::bail!("{} already exists", config.display());
    }
    let scaffold = FogcatConfig::scaffold(system, tenant, db);
    std::fs::write(config, scaffold.to_toml_string()?)?;
    println!("✓ Generated {}", config.display());
    Ok(())
}
