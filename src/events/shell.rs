use crate::app::App;
use crate::constants::{PANEL_ATTR, SLIDE_INDEX_ATTR, THEME_TOGGLE_ID};
use crate::core::{Panel, Theme, UiEvent};
use crate::dom;
use crate::input::ResizeCoalescer;
use crate::panels;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Page-level wiring: navigation, routing, resize, visibility, theme, hover
/// and teardown.
pub fn wire_shell(window: &web::Window, document: &web::Document, app: &Rc<App>) {
    wire_navigation(window, document, Rc::downgrade(app));
    wire_resize(window, Rc::downgrade(app));
    wire_visibility(document, Rc::downgrade(app));
    wire_theme_toggle(document, Rc::downgrade(app));
    wire_hover(document, Rc::downgrade(app));

    let a = Rc::downgrade(app);
    listen(window.as_ref(), "pagehide", move |_: web::Event| {
        if let Some(app) = a.upgrade() {
            app.teardown();
        }
    });
}

fn wire_navigation(window: &web::Window, document: &web::Document, app: Weak<App>) {
    let a = app.clone();
    listen(document.as_ref(), "click", move |ev: web::Event| {
        let Some(el) = ev
            .target()
            .and_then(|t| t.dyn_into::<web::Element>().ok())
            .and_then(|el| el.closest(&format!("[{PANEL_ATTR}]")).ok().flatten())
        else {
            return;
        };
        let Some(panel) = el.get_attribute(PANEL_ATTR).and_then(|s| Panel::from_slug(&s)) else {
            return;
        };
        ev.prevent_default();
        if let Some(app) = a.upgrade() {
            app.dispatch(UiEvent::Navigate(panel));
        }
    });

    let w = window.clone();
    listen(window.as_ref(), "hashchange", move |_: web::Event| {
        if let Some(app) = app.upgrade() {
            app.dispatch(UiEvent::Navigate(panels::from_location(&w)));
        }
    });
}

fn wire_resize(window: &web::Window, app: Weak<App>) {
    let pending = Rc::new(Cell::new(ResizeCoalescer::default()));
    let on_frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

    let p = pending.clone();
    let w = window.clone();
    *on_frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let mut c = p.get();
        let due = c.take();
        p.set(c);
        if !due {
            return;
        }
        let (width, height) = dom::viewport_size(&w);
        if let Some(app) = app.upgrade() {
            app.dispatch(UiEvent::Resize { width, height });
        }
    }) as Box<dyn FnMut()>));

    let w = window.clone();
    listen(window.as_ref(), "resize", move |_: web::Event| {
        let mut c = pending.get();
        let first = c.request();
        pending.set(c);
        if first {
            if let Some(cb) = on_frame.borrow().as_ref() {
                _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    });
}

fn wire_visibility(document: &web::Document, app: Weak<App>) {
    let doc = document.clone();
    listen(document.as_ref(), "visibilitychange", move |_: web::Event| {
        let visible = doc.visibility_state() == web::VisibilityState::Visible;
        if let Some(app) = app.upgrade() {
            app.dispatch(UiEvent::Visibility(visible));
        }
    });
}

/// Theme named on `<html data-theme>`, else the system preference.
pub fn initial_theme(window: &web::Window, document: &web::Document) -> Theme {
    document
        .document_element()
        .and_then(|el| el.get_attribute("data-theme"))
        .and_then(|name| Theme::from_name(&name))
        .unwrap_or_else(|| {
            if dom::media_matches(window, "(prefers-color-scheme: light)") {
                Theme::Light
            } else {
                Theme::Dark
            }
        })
}

fn wire_theme_toggle(document: &web::Document, app: Weak<App>) {
    let doc = document.clone();
    dom::add_click_listener(document, THEME_TOGGLE_ID, move || {
        let Some(root) = doc.document_element() else { return };
        let current = root
            .get_attribute("data-theme")
            .and_then(|n| Theme::from_name(&n))
            .unwrap_or_default();
        let next = current.toggled();
        _ = root.set_attribute("data-theme", next.name());
        log::info!("[theme] {}", next.name());
        if let Some(app) = app.upgrade() {
            app.dispatch(UiEvent::Theme(next));
        }
    });
}

fn slide_index(ev: &web::Event) -> Option<usize> {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .and_then(|el| el.closest(&format!("[{SLIDE_INDEX_ATTR}]")).ok().flatten())
        .and_then(|el| el.get_attribute(SLIDE_INDEX_ATTR))
        .and_then(|s| s.parse().ok())
}

fn wire_hover(document: &web::Document, app: Weak<App>) {
    for (enter, leave) in [("pointerover", "pointerout"), ("focusin", "focusout")] {
        let a = app.clone();
        listen(document.as_ref(), enter, move |ev: web::Event| {
            if let (Some(i), Some(app)) = (slide_index(&ev), a.upgrade()) {
                app.dispatch(UiEvent::Hover(Some(i)));
            }
        });
        let a = app.clone();
        listen(document.as_ref(), leave, move |ev: web::Event| {
            if slide_index(&ev).is_none() {
                return;
            }
            if let Some(app) = a.upgrade() {
                app.dispatch(UiEvent::Hover(None));
            }
        });
    }
}
