use crate::constants::{CONTACT_EMAIL, CONTACT_ENDPOINT, CONTACT_FALLBACK_ID, CONTACT_FORM_ID, CONTACT_STATUS_ID};
use crate::core::contact::{mailto_fallback, ContactForm, ContactReply};
use crate::dom;
use crate::input;
use gloo_net::http::Request;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

fn field_value(form: &web::HtmlFormElement, name: &str) -> Option<String> {
    let el = form.query_selector(&format!("[name=\"{name}\"]")).ok()??;
    if let Some(input) = el.dyn_ref::<web::HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(area) = el.dyn_ref::<web::HtmlTextAreaElement>() {
        return Some(area.value());
    }
    el.dyn_ref::<web::HtmlSelectElement>().map(|s| s.value())
}

fn read_form(form: &web::HtmlFormElement) -> ContactForm {
    ContactForm {
        name: field_value(form, "name"),
        email: field_value(form, "email"),
        budget: field_value(form, "budget"),
        message: field_value(form, "message"),
        website: field_value(form, "website"),
    }
}

/// Post the form to the relay. Transport failures surface as `send_failed`.
async fn submit(form: &ContactForm) -> ContactReply {
    let request = match Request::post(CONTACT_ENDPOINT).json(form) {
        Ok(r) => r,
        Err(e) => {
            log::error!("[contact] encode failed: {e}");
            return failed();
        }
    };
    match request.send().await {
        Ok(resp) => match resp.json::<ContactReply>().await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("[contact] unreadable reply status={}: {e}", resp.status());
                failed()
            }
        },
        Err(e) => {
            log::warn!("[contact] request failed: {e}");
            failed()
        }
    }
}

fn failed() -> ContactReply {
    ContactReply {
        ok: false,
        error: Some("send_failed".into()),
    }
}

fn show_fallback(document: &web::Document, form: &ContactForm) {
    if let Some(link) = document.get_element_by_id(CONTACT_FALLBACK_ID) {
        _ = link.set_attribute("href", &mailto_fallback(CONTACT_EMAIL, form));
        _ = link.remove_attribute("hidden");
    }
}

/// Intercept `#contact-form` submissions and send them as JSON.
pub fn wire(document: &web::Document) {
    let Some(form) = document
        .get_element_by_id(CONTACT_FORM_ID)
        .and_then(|el| el.dyn_into::<web::HtmlFormElement>().ok())
    else {
        return;
    };
    let in_flight = Rc::new(Cell::new(false));
    let doc = document.clone();
    let form_el = form.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        ev.prevent_default();
        if in_flight.replace(true) {
            return;
        }
        let data = read_form(&form_el);
        dom::set_text(&doc, CONTACT_STATUS_ID, "Sending…");
        let doc = doc.clone();
        let form_el = form_el.clone();
        let in_flight = in_flight.clone();
        spawn_local(async move {
            let reply = submit(&data).await;
            if reply.ok {
                log::info!("[contact] sent");
                form_el.reset();
            } else {
                log::warn!("[contact] rejected: {:?}", reply.error);
                if input::offers_mail_fallback(reply.error.as_deref()) {
                    show_fallback(&doc, &data);
                }
            }
            let text = input::contact_status_text(if reply.ok {
                None
            } else {
                Some(reply.error.as_deref().unwrap_or("send_failed"))
            });
            dom::set_text(&doc, CONTACT_STATUS_ID, text);
            in_flight.set(false);
        });
    }) as Box<dyn FnMut(web::Event)>);
    _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
    closure.forget();
}
