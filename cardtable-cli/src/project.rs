use std::path::{Path, PathBuf};

use anyhow::Context;
use cardtable_shared::AppConfig;

pub const CONFIG_FILE: &str = "cardtable.toml";

/// The web runtime crate, relative to the workspace root.
pub const WEB_CRATE_DIR: &str = "cardtable-web";

/// A resolved configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// `None` when no file was found and the built-in defaults apply.
    pub path: Option<PathBuf>,
    pub config: AppConfig,
}

impl LoadedConfig {
    pub fn source(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "built-in defaults".to_string(),
        }
    }
}

/// Resolve the config: an explicit path wins, then the nearest cardtable.toml
/// from the current directory upward, then the defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<LoadedConfig> {
    load_config_from(explicit, &std::env::current_dir()?)
}

pub fn load_config_from(explicit: Option<&Path>, start: &Path) -> anyhow::Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_from(start),
    };
    let config = match &path {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    Ok(LoadedConfig { path, config })
}

/// Walk up from `start` looking for a cardtable.toml.
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

pub fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Find the workspace root (the directory holding the web runtime crate), walking up.
pub fn find_workspace_root_from(start: &Path) -> anyhow::Result<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(WEB_CRATE_DIR).join("Cargo.toml").exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            anyhow::bail!(
                "Could not find the Cardtable workspace.\n\
                 Run `cardtable build` from within the repository (the directory holding {WEB_CRATE_DIR}/)."
            );
        }
    }
}
