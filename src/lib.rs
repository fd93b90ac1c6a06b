#![cfg(target_arch = "wasm32")]
use crate::constants::{CANVAS_ID, MODEL_URL};
use crate::core::{
    BeatTable, MediaConfig, ModelAsset, ModelError, PerfProfile, SceneController, Stage, UiEvent,
    WorkCatalog, MOBILE_BREAKPOINT_PX,
};
use glam::Vec2;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod carousel;
mod constants;
mod contact;
mod core;
mod dom;
mod events;
mod frame;
mod input;
mod panels;
mod perf;
mod render;

async fn fetch_model(url: &str) -> Result<ModelAsset, ModelError> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| ModelError::Fetch(e.to_string()))?;
    if !resp.ok() {
        return Err(ModelError::Fetch(format!("{url}: HTTP {}", resp.status())));
    }
    let bytes = resp
        .binary()
        .await
        .map_err(|e| ModelError::Fetch(e.to_string()))?;
    ModelAsset::from_glb(&bytes)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("showroom-web starting");

    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    // The form works even if the hero scene cannot start.
    contact::wire(&document);

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{CANVAS_ID}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let hints = perf::device_hints(&window);
    let profile = PerfProfile::detect(&hints);
    log::info!(
        "[perf] low_end={} reduced_motion={} dpr={:.2}",
        profile.is_low_end,
        profile.reduced_motion,
        profile.pixel_ratio
    );
    let network = perf::network_hints(&window);

    let initial = panels::from_location(&window);
    let theme = events::shell::initial_theme(&window, &document);
    let (vw, vh) = dom::viewport_size(&window);
    let viewport = Vec2::new(vw, vh);

    // Beat tables are immutable for the life of the page.
    let beats: &'static BeatTable = Box::leak(Box::new(BeatTable::default()));
    let first_beat = beats.compute_state(initial.progress(), vw < MOBILE_BREAKPOINT_PX);

    let model = fetch_model(MODEL_URL).await;
    let scene = SceneController::new(model, profile, theme, &first_beat);

    dom::sync_canvas_backing_size(&canvas, profile.pixel_ratio);
    let gpu = frame::init_gpu(&canvas, &scene, profile.bloom_enabled()).await;
    if gpu.is_none() {
        log::warn!("[gpu] unavailable; hero scene will not render");
    }

    let stage = Stage::new(beats, profile, scene, initial, viewport);
    let ctx = Rc::new(RefCell::new(frame::FrameContext {
        stage,
        gpu,
        canvas: canvas.clone(),
        pixel_ratio: profile.pixel_ratio,
        started: Instant::now(),
    }));

    let catalog = WorkCatalog::shuffled(&MediaConfig::default(), &mut rand::thread_rng());
    let carousel = carousel::Carousel::build(&document, &catalog);
    if let Some(c) = &carousel {
        c.wire();
        c.schedule_preload(&window, network);
    }

    let app = app::App::new(window.clone(), document.clone(), ctx, carousel);
    app.set_pointer_binding(events::PointerBinding::attach(
        &window,
        &canvas,
        Rc::downgrade(&app),
    ));
    events::wire_shell(&window, &document, &app);
    events::wire_global_keydown(&window, Rc::downgrade(&app));

    app.show_panel(initial);
    app.dispatch(UiEvent::Resize {
        width: vw,
        height: vh,
    });
    app.start();
    Ok(())
}
