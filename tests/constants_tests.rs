// Host-side tests for front-end constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn post_and_shading_constants_are_sane() {
    assert!(BLOOM_STRENGTH > 0.0 && BLOOM_STRENGTH < 1.0);
    assert!(BLOOM_THRESHOLD > 0.0);
    assert!(EXPOSURE > 0.0);
    assert!(SPECULAR_POWER_MIN >= 1.0);
    assert!(SPECULAR_POWER_MAX > SPECULAR_POWER_MIN);
}

#[test]
fn image_sizes_breakpoint_matches_mobile_layout() {
    let px = format!("{}px", showroom_core::MOBILE_BREAKPOINT_PX as u32);
    assert!(MAIN_IMAGE_SIZES.contains(&px));
}

#[test]
fn endpoints_and_dom_hooks_are_well_formed() {
    assert!(CONTACT_ENDPOINT.starts_with('/'));
    assert!(MODEL_URL.ends_with(".glb"));
    assert!(CONTACT_EMAIL.contains('@'));
    for attr in [PANEL_ATTR, PANEL_SECTION_ATTR, SLIDE_INDEX_ATTR] {
        assert!(attr.starts_with("data-"));
    }
    let ids = [
        CANVAS_ID,
        THEME_TOGGLE_ID,
        WORK_TRACK_ID,
        WORK_THUMBS_ID,
        CONTACT_FORM_ID,
        CONTACT_STATUS_ID,
        CONTACT_FALLBACK_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty() && !a.contains(' '));
        assert!(ids[i + 1..].iter().all(|b| b != a), "duplicate id {a}");
    }
}
