use crate::carousel::Carousel;
use crate::core::{Panel, StageEffect, UiEvent};
use crate::events::PointerBinding;
use crate::frame::{FrameContext, FrameLoop};
use crate::input::Once;
use crate::panels;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_sys as web;

/// Routes typed UI events into the stage and applies the resulting effects
/// to the DOM, the GPU surface and the frame loop.
pub struct App {
    pub window: web::Window,
    pub document: web::Document,
    ctx: Rc<RefCell<FrameContext<'static>>>,
    frame_loop: Rc<FrameLoop>,
    carousel: Option<Rc<Carousel>>,
    pointer: RefCell<Option<PointerBinding>>,
    teardown: Cell<Once>,
}

impl App {
    pub fn new(
        window: web::Window,
        document: web::Document,
        ctx: Rc<RefCell<FrameContext<'static>>>,
        carousel: Option<Rc<Carousel>>,
    ) -> Rc<Self> {
        let frame_loop = FrameLoop::new(ctx.clone());
        Rc::new(Self {
            window,
            document,
            ctx,
            frame_loop,
            carousel,
            pointer: RefCell::new(None),
            teardown: Cell::new(Once::default()),
        })
    }

    pub fn set_pointer_binding(&self, binding: PointerBinding) {
        if let Some(old) = self.pointer.borrow_mut().replace(binding) {
            old.destroy();
        }
    }

    pub fn dispatch(&self, event: UiEvent) {
        if self.teardown.get().is_done() {
            return;
        }
        let effects = match self.ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.stage.dispatch(event),
            Err(_) => {
                log::warn!("[app] dropped {:?} during frame", event);
                return;
            }
        };
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&self, effect: StageEffect) {
        match effect {
            StageEffect::PanelChanged(panel) => self.show_panel(panel),
            StageEffect::ResizeSurface { .. } => {
                if let Ok(mut ctx) = self.ctx.try_borrow_mut() {
                    ctx.sync_surface();
                }
            }
            StageEffect::StartLoop => self.frame_loop.start(),
        }
    }

    /// Panel DOM state, address bar and carousel priming for `panel`.
    pub fn show_panel(&self, panel: Panel) {
        log::info!("[panel] {}", panel.slug());
        panels::show(&self.document, panel);
        panels::replace_hash(&self.window, panel);
        if panel == Panel::Work {
            if let Some(c) = &self.carousel {
                c.prime();
            }
        }
    }

    pub fn start(&self) {
        self.frame_loop.start();
    }

    /// Stop the loop, detach pointer listeners and release GPU and scene
    /// resources. Runs once.
    pub fn teardown(&self) {
        let mut once = self.teardown.get();
        let first = once.first();
        self.teardown.set(once);
        if !first {
            return;
        }
        self.frame_loop.stop();
        if let Some(p) = self.pointer.borrow().as_ref() {
            p.destroy();
        }
        match self.ctx.try_borrow_mut() {
            Ok(mut ctx) => {
                ctx.dispose();
            }
            Err(_) => log::warn!("[app] teardown while a frame is running"),
        }
        log::info!("[app] torn down");
    }
}
