//! Cardtable WASM Web Runtime
//!
//! Injects the Babylon.js CDN bundle into the page one script at a time, then
//! builds the card-on-a-table physics scene through the `BABYLON` global and
//! leaves it running in the engine's render loop.

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod babylon;
#[cfg(target_arch = "wasm32")]
mod page;
#[cfg(target_arch = "wasm32")]
mod script_loader;
mod launch;

pub use launch::{parse_config, preset_config};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point — called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Cardtable Web Runtime initialized");
}

/// Load the Babylon.js scripts and build the classic scene.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn run() -> Result<app::App, JsValue> {
    app::App::launch(cardtable_shared::AppConfig::default()).await
}

/// Same as [`run`] with a named scene preset (`classic` or `shadowed`).
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn run_preset(name: String) -> Result<app::App, JsValue> {
    let config = preset_config(&name).map_err(|e| JsValue::from_str(&e.to_string()))?;
    app::App::launch(config).await
}

/// Same as [`run`] with a full configuration given as JSON.
///
/// Called from JavaScript, e.g. `await run_with_config(JSON.stringify(cfg))`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn run_with_config(json: String) -> Result<app::App, JsValue> {
    let config = parse_config(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    app::App::launch(config).await
}
