//! Cardtable shared core
//!
//! Everything here is platform-independent: the script manifest and the
//! sequential loader, the scene configuration and its presets, the engine
//! capability trait with the bootstrapper that drives it, the launcher that
//! runs the two in turn, and a recording engine used by tests and by the
//! CLI's dry-run.
//!
//! The wasm runtime (`cardtable-web`) supplies the browser implementations
//! of [`sequencer::ScriptHost`] and [`engine::EngineApi`].

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod error;
pub mod launcher;
pub mod layout;
pub mod manifest;
pub mod sequencer;
pub mod trace;

pub use bootstrap::{Bootstrapper, FrameContext, GameLoop, IdleGameLoop, SceneContext};
pub use config::{AppConfig, PhysicsOrder, Preset, SceneConfig};
pub use engine::EngineApi;
pub use error::{BootstrapError, ConfigError, EngineError, LoadError};
pub use launcher::{launch, Launched};
pub use manifest::ScriptManifest;
pub use sequencer::{load_sequential, LoadReport, ScriptHost, ScriptOutcome};
