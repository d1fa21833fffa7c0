use cardtable_shared::layout::{CONTAINER_ID, STYLE_RULES, SURFACE_ID};
use wasm_bindgen::prelude::*;
use web_sys::{CssStyleSheet, Document, HtmlStyleElement};

/// Create `#canvasZone > canvas#renderCanvas` at the end of `<body>`.
/// Does nothing if the container already exists.
pub fn load_html(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id(CONTAINER_ID).is_some() {
        log::debug!("#{CONTAINER_ID} already present");
        return Ok(());
    }

    let zone = document.create_element("div")?;
    zone.set_id(CONTAINER_ID);

    let canvas = document.create_element("canvas")?;
    canvas.set_id(SURFACE_ID);

    zone.append_child(&canvas)?;
    document.body().ok_or("No body")?.append_child(&zone)?;
    Ok(())
}

/// Append a `<style>` element holding the full-viewport layout rules.
pub fn load_stylesheet(document: &Document) -> Result<(), JsValue> {
    let style = document
        .create_element("style")?
        .dyn_into::<HtmlStyleElement>()
        .map_err(|_| "Element is not a style element")?;
    document.head().ok_or("No head")?.append_child(&style)?;

    // The sheet only exists once the element is attached.
    let sheet = style
        .sheet()
        .ok_or("Style element has no sheet")?
        .dyn_into::<CssStyleSheet>()
        .map_err(|_| "Sheet is not a CSS style sheet")?;
    for (index, rule) in STYLE_RULES.iter().enumerate() {
        sheet.insert_rule_with_index(rule, index as u32)?;
    }
    Ok(())
}
