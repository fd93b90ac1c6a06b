// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;
use showroom_core::{Panel, UiEvent};

#[test]
fn arrow_and_page_keys_step_between_panels() {
    assert_eq!(key_action("ArrowRight", false), Some(UiEvent::NextPanel));
    assert_eq!(key_action("PageDown", false), Some(UiEvent::NextPanel));
    assert_eq!(key_action("ArrowUp", false), Some(UiEvent::PreviousPanel));
    assert_eq!(key_action("Home", false), Some(UiEvent::Navigate(Panel::Home)));
    assert_eq!(key_action("End", false), Some(UiEvent::Navigate(Panel::Contact)));
    assert_eq!(key_action("x", false), None);
}

#[test]
fn keys_typed_into_form_fields_are_ignored() {
    assert_eq!(key_action("ArrowRight", true), None);
    assert!(is_editable_tag("input"));
    assert!(is_editable_tag("TEXTAREA"));
    assert!(!is_editable_tag("BUTTON"));
}

#[test]
fn hash_routing_round_trips_and_defaults_home() {
    for panel in Panel::ALL {
        assert_eq!(panel_from_hash(&hash_for_panel(panel)), panel);
    }
    assert_eq!(hash_for_panel(Panel::Work), "#work");
    assert_eq!(panel_from_hash(""), Panel::Home);
    assert_eq!(panel_from_hash("#nope"), Panel::Home);
}

#[test]
fn canvas_backing_size_scales_and_never_collapses() {
    assert_eq!(canvas_backing_size(800.0, 450.0, 2.0), (1600, 900));
    assert_eq!(canvas_backing_size(333.7, 100.2, 1.25), (417, 125));
    assert_eq!(canvas_backing_size(0.0, 0.0, 2.0), (1, 1));
}

#[test]
fn resize_bursts_schedule_one_frame() {
    let mut c = ResizeCoalescer::default();
    assert!(c.request());
    assert!(!c.request());
    assert!(!c.request());
    assert!(c.take());
    assert!(!c.take());
    assert!(c.request());
}

#[test]
fn once_latch_fires_a_single_time() {
    let mut once = Once::default();
    assert!(!once.is_done());
    assert!(once.first());
    assert!(!once.first());
    assert!(once.is_done());
}

#[test]
fn contact_status_messages_follow_error_codes() {
    assert!(contact_status_text(None).starts_with("Thanks"));
    assert_ne!(
        contact_status_text(Some("invalid_email")),
        contact_status_text(Some("missing_required_fields"))
    );
    assert_eq!(
        contact_status_text(Some("send_failed")),
        contact_status_text(Some("missing_smtp_credentials"))
    );
}

#[test]
fn mail_fallback_only_for_delivery_failures() {
    assert!(offers_mail_fallback(Some("send_failed")));
    assert!(offers_mail_fallback(Some("missing_smtp_credentials")));
    assert!(!offers_mail_fallback(Some("missing_required_fields")));
    assert!(!offers_mail_fallback(Some("invalid_email")));
    assert!(!offers_mail_fallback(None));
}
