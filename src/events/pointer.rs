use crate::app::App;
use crate::core::UiEvent;
use crate::input::Once;
use std::cell::Cell;
use std::rc::Weak;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer listeners for parallax and drag-to-orbit. Keeps its closures so
/// `destroy` can detach them.
pub struct PointerBinding {
    window: web::Window,
    canvas: web::HtmlCanvasElement,
    on_move: Closure<dyn FnMut(web::PointerEvent)>,
    on_touch: Closure<dyn FnMut(web::TouchEvent)>,
    on_down: Closure<dyn FnMut(web::PointerEvent)>,
    on_up: Closure<dyn FnMut(web::PointerEvent)>,
    on_cancel: Closure<dyn FnMut(web::PointerEvent)>,
    destroyed: Cell<Once>,
}

fn passive() -> web::AddEventListenerOptions {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(true);
    opts
}

impl PointerBinding {
    pub fn attach(window: &web::Window, canvas: &web::HtmlCanvasElement, app: Weak<App>) -> Self {
        let a = app.clone();
        let on_move = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if let Some(app) = a.upgrade() {
                app.dispatch(UiEvent::PointerMove {
                    x: ev.client_x() as f32,
                    y: ev.client_y() as f32,
                    id: Some(ev.pointer_id()),
                });
            }
        }) as Box<dyn FnMut(_)>);

        let a = app.clone();
        let on_touch = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
            let Some(t) = ev.touches().get(0) else { return };
            if let Some(app) = a.upgrade() {
                // Parallax only: touches carry no pointer id, so they never
                // steer a drag owned by a pointer.
                app.dispatch(UiEvent::PointerMove {
                    x: t.client_x() as f32,
                    y: t.client_y() as f32,
                    id: None,
                });
            }
        }) as Box<dyn FnMut(_)>);

        let a = app.clone();
        let target = canvas.clone();
        let on_down = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            if ev.button() != 0 {
                return;
            }
            _ = target.set_pointer_capture(ev.pointer_id());
            if let Some(app) = a.upgrade() {
                app.dispatch(UiEvent::PointerDown {
                    x: ev.client_x() as f32,
                    y: ev.client_y() as f32,
                    id: Some(ev.pointer_id()),
                });
            }
            ev.prevent_default();
        }) as Box<dyn FnMut(_)>);

        let a = app.clone();
        let target = canvas.clone();
        let on_up = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            _ = target.release_pointer_capture(ev.pointer_id());
            if let Some(app) = a.upgrade() {
                app.dispatch(UiEvent::PointerUp {
                    id: Some(ev.pointer_id()),
                });
            }
        }) as Box<dyn FnMut(_)>);

        let a = app;
        let target = canvas.clone();
        let on_cancel = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            _ = target.release_pointer_capture(ev.pointer_id());
            if let Some(app) = a.upgrade() {
                app.dispatch(UiEvent::PointerCancel {
                    id: Some(ev.pointer_id()),
                });
            }
        }) as Box<dyn FnMut(_)>);

        let opts = passive();
        _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            "pointermove",
            on_move.as_ref().unchecked_ref(),
            &opts,
        );
        _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            "touchmove",
            on_touch.as_ref().unchecked_ref(),
            &opts,
        );
        _ = canvas.add_event_listener_with_callback("pointerdown", on_down.as_ref().unchecked_ref());
        _ = canvas.add_event_listener_with_callback("pointerup", on_up.as_ref().unchecked_ref());
        _ = canvas
            .add_event_listener_with_callback("pointercancel", on_cancel.as_ref().unchecked_ref());

        Self {
            window: window.clone(),
            canvas: canvas.clone(),
            on_move,
            on_touch,
            on_down,
            on_up,
            on_cancel,
            destroyed: Cell::new(Once::default()),
        }
    }

    /// Detach every listener. Only the first call does anything.
    pub fn destroy(&self) -> bool {
        let mut once = self.destroyed.get();
        let first = once.first();
        self.destroyed.set(once);
        if !first {
            return false;
        }
        _ = self
            .window
            .remove_event_listener_with_callback("pointermove", self.on_move.as_ref().unchecked_ref());
        _ = self
            .window
            .remove_event_listener_with_callback("touchmove", self.on_touch.as_ref().unchecked_ref());
        _ = self
            .canvas
            .remove_event_listener_with_callback("pointerdown", self.on_down.as_ref().unchecked_ref());
        _ = self
            .canvas
            .remove_event_listener_with_callback("pointerup", self.on_up.as_ref().unchecked_ref());
        _ = self.canvas.remove_event_listener_with_callback(
            "pointercancel",
            self.on_cancel.as_ref().unchecked_ref(),
        );
        log::info!("[pointer] listeners removed");
        true
    }
}
