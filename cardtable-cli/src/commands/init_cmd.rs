use std::path::{Path, PathBuf};

use cardtable_shared::{AppConfig, Preset};

use crate::project::CONFIG_FILE;

pub fn run(dir: PathBuf, preset: Preset, force: bool) -> anyhow::Result<()> {
    let path = write_config(&dir, preset, force)?;
    println!("Wrote {} ({preset} preset)", path.display());
    Ok(())
}

/// Write a cardtable.toml spelling out every setting of `preset`.
pub fn write_config(dir: &Path, preset: Preset, force: bool) -> anyhow::Result<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let config = AppConfig {
        preset: Some(preset),
        scene: Some(preset.config()),
        ..AppConfig::default()
    };
    let body = toml::to_string_pretty(&config)?;
    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, format!("# Cardtable demo configuration\n\n{body}"))?;
    Ok(path)
}
