use cardtable_shared::{AppConfig, ConfigError, Preset};

/// Parse and validate an [`AppConfig`] handed over from JavaScript as JSON.
pub fn parse_config(json: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig =
        serde_json::from_str(json).map_err(|e| ConfigError::invalid("config", e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// The default script manifest with a named scene preset.
pub fn preset_config(name: &str) -> Result<AppConfig, ConfigError> {
    let preset: Preset = name.parse()?;
    Ok(AppConfig::from_preset(preset))
}
