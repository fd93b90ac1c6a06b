//! DOM bridge for the work carousel.
//!
//! Slides are built from the shuffled [`WorkCatalog`] as placeholders that
//! carry their real sources in `data-*` attributes. Which placeholders get a
//! real `src`, and at what fetch priority, is decided by the
//! [`HydrationController`]; this module only applies its commands and feeds
//! back load/error and scroll signals.

use crate::constants::{
    ACTIVE_CLASS, ERROR_CLASS, LOADED_CLASS, MAIN_IMAGE_SIZES, SLIDE_INDEX_ATTR, WORK_THUMBS_ID,
    WORK_TRACK_ID,
};
use crate::core::{
    active_slide, preload_schedule, HydrationCommand, HydrationController, ImageKind, ImageSource,
    NetworkHints, PreloadSchedule, WorkCatalog,
};
use crate::core::work::MAIN_WIDTHS;
use crate::dom;
use crate::input::ResizeCoalescer;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

const DATA_SRC: &str = "data-src";
const DATA_SRCSET: &str = "data-srcset";
const DATA_SIZES: &str = "data-sizes";
const DATA_FALLBACK: &str = "data-fallback";

struct ImageListeners {
    img: web::HtmlImageElement,
    load: Closure<dyn FnMut()>,
    error: Closure<dyn FnMut()>,
}

impl ImageListeners {
    fn detach(self) {
        _ = self
            .img
            .remove_event_listener_with_callback("load", self.load.as_ref().unchecked_ref());
        _ = self
            .img
            .remove_event_listener_with_callback("error", self.error.as_ref().unchecked_ref());
        // Detaching usually happens inside one of these callbacks; free them
        // after it has returned.
        spawn_local(async move {
            drop(self);
        });
    }
}

pub struct Carousel {
    track: web::Element,
    slides: Vec<web::Element>,
    thumb_buttons: Vec<web::Element>,
    mains: Vec<web::HtmlImageElement>,
    thumbs: Vec<web::HtmlImageElement>,
    controller: RefCell<HydrationController>,
    main_listeners: RefCell<Vec<Option<ImageListeners>>>,
    thumb_listeners: RefCell<Vec<Option<ImageListeners>>>,
    scroll: Cell<ResizeCoalescer>,
    scroll_frame: RefCell<Option<Closure<dyn FnMut()>>>,
    closures: RefCell<Vec<Closure<dyn FnMut(web::Event)>>>,
    this: Weak<Carousel>,
}

impl Carousel {
    /// Fill `#work-track` and `#work-thumbs` with placeholders for `catalog`.
    /// Returns None when the page has no carousel.
    pub fn build(document: &web::Document, catalog: &WorkCatalog) -> Option<Rc<Self>> {
        let track = document.get_element_by_id(WORK_TRACK_ID)?;
        let thumbs_root = document.get_element_by_id(WORK_THUMBS_ID);
        track.set_inner_html("");
        if let Some(root) = &thumbs_root {
            root.set_inner_html("");
        }

        let mut slides = Vec::with_capacity(catalog.len());
        let mut thumb_buttons = Vec::with_capacity(catalog.len());
        let mut mains = Vec::with_capacity(catalog.len());
        let mut thumbs = Vec::with_capacity(catalog.len());
        for (i, item) in catalog.items().iter().enumerate() {
            let index = i.to_string();
            let slide = document.create_element("figure").ok()?;
            _ = slide.set_attribute("class", "work-slide");
            _ = slide.set_attribute(SLIDE_INDEX_ATTR, &index);
            _ = slide.set_attribute("tabindex", "0");
            let img = placeholder(document, &item.title)?;
            _ = img.set_attribute(DATA_SRC, &item.main_url(MAIN_WIDTHS[0]));
            _ = img.set_attribute(DATA_SRCSET, &item.main_src_set());
            _ = img.set_attribute(DATA_SIZES, MAIN_IMAGE_SIZES);
            _ = img.set_attribute(DATA_FALLBACK, &item.original_url());
            _ = slide.append_child(&img);
            if let Ok(caption) = document.create_element("figcaption") {
                let year = item.year.map(|y| format!(" · {y}")).unwrap_or_default();
                caption.set_text_content(Some(&format!("{} · {}{}", item.title, item.category, year)));
                _ = slide.append_child(&caption);
            }
            _ = track.append_child(&slide);
            slides.push(slide);
            mains.push(img);

            if let Some(root) = &thumbs_root {
                let button = document.create_element("button").ok()?;
                _ = button.set_attribute("type", "button");
                _ = button.set_attribute("class", "work-thumb");
                _ = button.set_attribute(SLIDE_INDEX_ATTR, &index);
                _ = button.set_attribute("aria-label", &item.title);
                let thumb = placeholder(document, "")?;
                _ = thumb.set_attribute(DATA_SRC, &item.thumb_url());
                _ = thumb.set_attribute(DATA_FALLBACK, &item.original_url());
                _ = button.append_child(&thumb);
                _ = root.append_child(&button);
                thumb_buttons.push(button);
                thumbs.push(thumb);
            }
        }

        let controller = HydrationController::new(
            mains.iter().map(read_source).collect(),
            thumbs.iter().map(read_source).collect(),
        );
        log::info!(
            "[carousel] built slides={} thumbs={}",
            mains.len(),
            thumbs.len()
        );
        let main_count = mains.len();
        let thumb_count = thumbs.len();
        Some(Rc::new_cyclic(|this| Carousel {
            track,
            slides,
            thumb_buttons,
            mains,
            thumbs,
            controller: RefCell::new(controller),
            main_listeners: RefCell::new((0..main_count).map(|_| None).collect()),
            thumb_listeners: RefCell::new((0..thumb_count).map(|_| None).collect()),
            scroll: Cell::new(ResizeCoalescer::default()),
            scroll_frame: RefCell::new(None),
            closures: RefCell::new(Vec::new()),
            this: this.clone(),
        }))
    }

    /// Track scroll (coalesced to one check per frame) and thumbnail clicks.
    pub fn wire(&self) {
        let weak = self.this.clone();
        *self.scroll_frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if let Some(this) = weak.upgrade() {
                let mut s = this.scroll.get();
                let pending = s.take();
                this.scroll.set(s);
                if pending {
                    this.sync_active_from_scroll();
                }
            }
        }) as Box<dyn FnMut()>));

        let weak = self.this.clone();
        let on_scroll = Closure::wrap(Box::new(move |_ev: web::Event| {
            let Some(this) = weak.upgrade() else { return };
            let mut s = this.scroll.get();
            let first = s.request();
            this.scroll.set(s);
            if !first {
                return;
            }
            if let (Some(w), Some(cb)) = (web::window(), this.scroll_frame.borrow().as_ref()) {
                _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }) as Box<dyn FnMut(web::Event)>);
        _ = self
            .track
            .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref());
        self.closures.borrow_mut().push(on_scroll);

        for (i, button) in self.thumb_buttons.iter().enumerate() {
            let weak = self.this.clone();
            let on_click = Closure::wrap(Box::new(move |_ev: web::Event| {
                if let Some(this) = weak.upgrade() {
                    this.select(i);
                }
            }) as Box<dyn FnMut(web::Event)>);
            _ = button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            self.closures.borrow_mut().push(on_click);
        }
    }

    /// First eager hydration around the current slide; later calls are no-ops.
    pub fn prime(&self) {
        let active = self.controller.borrow().active();
        let cmds = self.controller.borrow_mut().prime(active);
        if !cmds.is_empty() {
            self.mark_active(active);
        }
        self.apply(cmds);
    }

    /// Scroll a slide into view and hydrate around it.
    pub fn select(&self, index: usize) {
        if let Some(slide) = self.slides.get(index) {
            slide.scroll_into_view();
        }
        self.set_active(index);
    }

    fn set_active(&self, index: usize) {
        let cmds = self.controller.borrow_mut().set_active(index);
        self.mark_active(self.controller.borrow().active());
        self.apply(cmds);
    }

    fn sync_active_from_scroll(&self) {
        let rect = self.track.get_bounding_client_rect();
        let viewport_center = (rect.left() + rect.width() / 2.0) as f32;
        let centers: Vec<f32> = self
            .slides
            .iter()
            .map(|s| {
                let r = s.get_bounding_client_rect();
                (r.left() + r.width() / 2.0) as f32
            })
            .collect();
        let Some(index) = active_slide(&centers, viewport_center) else {
            return;
        };
        if !self.controller.borrow().is_primed() {
            let cmds = self.controller.borrow_mut().prime(index);
            self.mark_active(index);
            self.apply(cmds);
        } else if index != self.controller.borrow().active() {
            self.set_active(index);
        }
    }

    fn mark_active(&self, active: usize) {
        for (i, el) in self.slides.iter().enumerate() {
            dom::set_class(el, ACTIVE_CLASS, i == active);
        }
        for (i, el) in self.thumb_buttons.iter().enumerate() {
            dom::set_class(el, ACTIVE_CLASS, i == active);
            _ = el.set_attribute("aria-pressed", if i == active { "true" } else { "false" });
        }
    }

    /// Queue low-priority hydration of everything else once the page is idle.
    pub fn schedule_preload(&self, window: &web::Window, network: NetworkHints) {
        let weak = self.this.clone();
        let run = move || {
            if let Some(this) = weak.upgrade() {
                let cmds = this.controller.borrow_mut().preload_all(&network);
                this.apply(cmds);
            }
        };
        let idle = crate::perf::idle_callback_supported(window);
        match preload_schedule(idle) {
            PreloadSchedule::Idle { timeout_ms } => {
                let cb = Closure::once_into_js(run);
                let opts = web::IdleRequestOptions::new();
                opts.set_timeout(timeout_ms);
                if let Err(e) = window.request_idle_callback_with_options(cb.unchecked_ref(), &opts) {
                    log::warn!("[carousel] requestIdleCallback failed: {:?}", e);
                }
            }
            PreloadSchedule::Delay { ms } => {
                let cb = Closure::once_into_js(run);
                _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    cb.unchecked_ref(),
                    ms as i32,
                );
            }
        }
    }

    fn image(&self, kind: ImageKind, index: usize) -> Option<&web::HtmlImageElement> {
        match kind {
            ImageKind::Main => self.mains.get(index),
            ImageKind::Thumb => self.thumbs.get(index),
        }
    }

    /// The slide or thumb button wrapping an image.
    fn container(&self, kind: ImageKind, index: usize) -> Option<&web::Element> {
        match kind {
            ImageKind::Main => self.slides.get(index),
            ImageKind::Thumb => self.thumb_buttons.get(index),
        }
    }

    fn listeners(&self, kind: ImageKind) -> &RefCell<Vec<Option<ImageListeners>>> {
        match kind {
            ImageKind::Main => &self.main_listeners,
            ImageKind::Thumb => &self.thumb_listeners,
        }
    }

    fn apply(&self, cmds: impl IntoIterator<Item = HydrationCommand>) {
        for cmd in cmds {
            match cmd {
                HydrationCommand::Assign {
                    kind,
                    index,
                    src,
                    src_set,
                    sizes,
                    priority,
                } => {
                    let Some(img) = self.image(kind, index) else { continue };
                    _ = img.set_attribute("fetchpriority", priority.as_str());
                    if let Some(sizes) = sizes {
                        img.set_sizes(&sizes);
                    }
                    if let Some(src_set) = src_set {
                        img.set_srcset(&src_set);
                    }
                    self.attach(kind, index);
                    img.set_src(&src);
                }
                HydrationCommand::AssignFallback { kind, index, src } => {
                    let Some(img) = self.image(kind, index) else { continue };
                    _ = img.remove_attribute("srcset");
                    _ = img.remove_attribute("sizes");
                    self.attach(kind, index);
                    img.set_src(&src);
                }
                HydrationCommand::MarkLoaded { kind, index } => {
                    if let Some(img) = self.image(kind, index) {
                        dom::set_class(img, LOADED_CLASS, true);
                        dom::set_class(img, ERROR_CLASS, false);
                    }
                    if let Some(holder) = self.container(kind, index) {
                        dom::set_class(holder, ERROR_CLASS, false);
                    }
                }
                HydrationCommand::MarkErrored { kind, index } => {
                    if let Some(img) = self.image(kind, index) {
                        dom::set_class(img, ERROR_CLASS, true);
                    }
                    if let Some(holder) = self.container(kind, index) {
                        dom::set_class(holder, ERROR_CLASS, true);
                    }
                }
                HydrationCommand::DetachListeners { kind, index } => {
                    let taken = self
                        .listeners(kind)
                        .borrow_mut()
                        .get_mut(index)
                        .and_then(Option::take);
                    if let Some(l) = taken {
                        l.detach();
                    }
                }
            }
        }
    }

    fn attach(&self, kind: ImageKind, index: usize) {
        let Some(img) = self.image(kind, index).cloned() else {
            return;
        };
        let weak = self.this.clone();
        let load = Closure::wrap(Box::new(move || {
            if let Some(this) = weak.upgrade() {
                let cmds = this.controller.borrow_mut().on_load(kind, index);
                this.apply(cmds);
            }
        }) as Box<dyn FnMut()>);
        let weak = self.this.clone();
        let error = Closure::wrap(Box::new(move || {
            if let Some(this) = weak.upgrade() {
                let cmds = this.controller.borrow_mut().on_error(kind, index);
                this.apply(cmds);
            }
        }) as Box<dyn FnMut()>);
        _ = img.add_event_listener_with_callback("load", load.as_ref().unchecked_ref());
        _ = img.add_event_listener_with_callback("error", error.as_ref().unchecked_ref());
        let previous = self
            .listeners(kind)
            .borrow_mut()
            .get_mut(index)
            .and_then(|slot| slot.replace(ImageListeners { img, load, error }));
        if let Some(old) = previous {
            old.detach();
        }
    }
}

fn placeholder(document: &web::Document, alt: &str) -> Option<web::HtmlImageElement> {
    let img = document
        .create_element("img")
        .ok()?
        .dyn_into::<web::HtmlImageElement>()
        .ok()?;
    img.set_alt(alt);
    _ = img.set_attribute("decoding", "async");
    Some(img)
}

fn read_source(img: &web::HtmlImageElement) -> ImageSource {
    ImageSource {
        src: img.get_attribute(DATA_SRC).unwrap_or_default(),
        src_set: img.get_attribute(DATA_SRCSET),
        sizes: img.get_attribute(DATA_SIZES),
        fallback: img.get_attribute(DATA_FALLBACK),
    }
}
