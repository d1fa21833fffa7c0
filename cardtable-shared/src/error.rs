/// A single script that could not be loaded. Recovered by the sequencer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load script {url}: {reason}")]
pub struct LoadError {
    pub url: String,
    pub reason: String,
}

impl LoadError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by a call into the external engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("global `{0}` is not defined; was its script loaded?")]
    MissingGlobal(String),
    #[error("{call} failed: {reason}")]
    Call { call: String, reason: String },
}

impl EngineError {
    pub fn call(call: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Call {
            call: call.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that abort the scene bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    #[error("Canvas not found! (no element with id `{id}`)")]
    SurfaceNotFound { id: String },
    #[error("engine failed to initialize")]
    EngineUnavailable,
    #[error("no {0} available")]
    MissingCapability(&'static str),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from parsing or validating a scene configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: String, reason: String },
    #[error("unknown preset `{0}` (expected `classic` or `shadowed`)")]
    UnknownPreset(String),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
