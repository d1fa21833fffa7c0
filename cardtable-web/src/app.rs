use cardtable_shared::{launch, AppConfig, LoadReport, Launched, SceneContext};
use wasm_bindgen::prelude::*;

use crate::babylon::BabylonApi;
use crate::page;
use crate::script_loader::DomScriptHost;

/// A running scene, returned to JavaScript once the render loop has started.
#[wasm_bindgen]
pub struct App {
    context: SceneContext<BabylonApi>,
    report: LoadReport,
}

impl App {
    /// Set up the page, load every script in order, then build the scene.
    pub async fn launch(config: AppConfig) -> Result<App, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        page::load_html(&document)?;
        page::load_stylesheet(&document)?;

        let host = DomScriptHost::new(document.clone());
        let Launched { report, context } =
            launch(&host, &config, || BabylonApi::from_globals(window, document))
                .await
                .map_err(to_js)?;

        Ok(App { context, report })
    }
}

#[wasm_bindgen]
impl App {
    pub fn scripts_loaded(&self) -> usize {
        self.report.loaded().count()
    }

    pub fn scripts_failed(&self) -> usize {
        self.report.failed().count()
    }

    /// URLs of the scripts that failed to load, in load order.
    pub fn failed_scripts(&self) -> Vec<String> {
        self.report.failed().map(|e| e.url.clone()).collect()
    }

    /// Get the canvas width.
    pub fn width(&self) -> u32 {
        self.context.surface.width()
    }

    /// Get the canvas height.
    pub fn height(&self) -> u32 {
        self.context.surface.height()
    }

    /// Tell the engine the surface size changed outside a window resize.
    pub fn resize(&self) {
        self.context.resize();
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
