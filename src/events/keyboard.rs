use crate::app::App;
use crate::input;
use std::rc::Weak;
use wasm_bindgen::JsCast;
use web_sys as web;

fn target_is_editable(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| {
            input::is_editable_tag(&el.tag_name())
                || el.get_attribute("contenteditable").is_some()
        })
        .unwrap_or(false)
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, app: &App) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    if let Some(event) = input::key_action(&ev.key(), target_is_editable(ev)) {
        app.dispatch(event);
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(window: &web::Window, app: Weak<App>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if let Some(app) = app.upgrade() {
            handle_global_keydown(&ev, &app);
        }
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
