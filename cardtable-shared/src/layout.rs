//! Page layout constants shared by the web runtime and the CLI.

pub const CONTAINER_ID: &str = "canvasZone";
pub const SURFACE_ID: &str = "renderCanvas";

/// Stylesheet rules inserted, in this order, into a fresh `<style>` element.
/// Together they pin the render surface to the full viewport with no scrolling.
pub const STYLE_RULES: [&str; 3] = [
    "html, body { overflow: hidden; width: 100%; height: 100%; margin: 0; padding: 0; }",
    "#renderCanvas { width: 100%; height: 100%; touch-action: none; }",
    "#canvasZone { width: 100%; height: 100%; }",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_target_layout_ids() {
        assert!(STYLE_RULES[1].starts_with(&format!("#{SURFACE_ID} ")));
        assert!(STYLE_RULES[2].starts_with(&format!("#{CONTAINER_ID} ")));
    }

    #[test]
    fn test_body_rule_disables_scrolling() {
        assert!(STYLE_RULES[0].contains("overflow: hidden"));
        assert!(STYLE_RULES[1].contains("touch-action: none"));
    }
}
