use crate::constants::{ACTIVE_CLASS, PANEL_ATTR, PANEL_SECTION_ATTR};
use crate::core::Panel;
use crate::dom;
use crate::input;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Reflect the active panel in the DOM: sections, nav buttons and body state.
pub fn show(document: &web::Document, panel: Panel) {
    for section in dom::query_all(document, &format!("[{PANEL_SECTION_ATTR}]")) {
        let on = section.get_attribute(PANEL_SECTION_ATTR).as_deref() == Some(panel.slug());
        dom::set_class(&section, ACTIVE_CLASS, on);
        if on {
            _ = section.remove_attribute("hidden");
            _ = section.set_attribute("aria-hidden", "false");
        } else {
            _ = section.set_attribute("aria-hidden", "true");
        }
    }
    for button in dom::query_all(document, &format!("[{PANEL_ATTR}]")) {
        let on = button.get_attribute(PANEL_ATTR).as_deref() == Some(panel.slug());
        dom::set_class(&button, ACTIVE_CLASS, on);
        if on {
            _ = button.set_attribute("aria-current", "page");
        } else {
            _ = button.remove_attribute("aria-current");
        }
    }
    if let Some(body) = document.body() {
        _ = body.set_attribute("data-active-panel", panel.slug());
    }
}

/// Keep the address bar in sync without adding history entries.
pub fn replace_hash(window: &web::Window, panel: Panel) {
    let hash = input::hash_for_panel(panel);
    if window.location().hash().ok().as_deref() == Some(hash.as_str()) {
        return;
    }
    if let Ok(history) = window.history() {
        _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&hash));
    }
}

/// Panel named by the current location hash.
pub fn from_location(window: &web::Window) -> Panel {
    let hash = window.location().hash().unwrap_or_default();
    input::panel_from_hash(&hash)
}
