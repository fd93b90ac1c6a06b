use crate::core::{DeviceHints, NetworkHints};
use crate::dom;
use wasm_bindgen::JsValue;
use web_sys as web;

fn prop(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// Capability signals read once at startup.
pub fn device_hints(window: &web::Window) -> DeviceHints {
    let navigator = window.navigator();
    let memory = prop(navigator.as_ref(), "deviceMemory").and_then(|v| v.as_f64());
    let (viewport_width, _) = dom::viewport_size(window);
    DeviceHints {
        hardware_concurrency: navigator.hardware_concurrency() as u32,
        device_memory_gb: memory.map(|m| m as f32),
        device_pixel_ratio: window.device_pixel_ratio() as f32,
        prefers_reduced_motion: dom::media_matches(window, "(prefers-reduced-motion: reduce)"),
        coarse_pointer: dom::media_matches(window, "(pointer: coarse)"),
        viewport_width,
    }
}

/// `navigator.connection` signals; absent on browsers without the API.
pub fn network_hints(window: &web::Window) -> NetworkHints {
    let navigator = window.navigator();
    let Some(conn) = prop(navigator.as_ref(), "connection") else {
        return NetworkHints::default();
    };
    NetworkHints {
        save_data: prop(&conn, "saveData")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        effective_type: prop(&conn, "effectiveType").and_then(|v| v.as_string()),
    }
}

pub fn idle_callback_supported(window: &web::Window) -> bool {
    js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("requestIdleCallback"))
        .unwrap_or(false)
}
