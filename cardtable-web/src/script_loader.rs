use cardtable_shared::{LoadError, ScriptHost};
use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlScriptElement};

/// Loads scripts by appending `<script src=…>` elements to `<head>`.
pub struct DomScriptHost {
    document: Document,
}

impl DomScriptHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn inject(&self, url: &str) -> Result<Promise, JsValue> {
        let script = self
            .document
            .create_element("script")?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| "Element is not a script element")?;
        script.set_src(url);

        // Listeners go on before the element is attached so no event is missed.
        let settled = Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });

        self.document
            .head()
            .ok_or("No head")?
            .append_child(&script)?;
        Ok(settled)
    }
}

impl ScriptHost for DomScriptHost {
    async fn load(&self, url: &str) -> Result<(), LoadError> {
        let settled = self
            .inject(url)
            .map_err(|e| LoadError::new(url, describe(&e)))?;
        JsFuture::from(settled)
            .await
            .map(|_| ())
            .map_err(|e| LoadError::new(url, describe(&e)))
    }
}

fn describe(value: &JsValue) -> String {
    if let Some(event) = value.dyn_ref::<web_sys::Event>() {
        return format!("`{}` event", event.type_());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
