use crate::core::{FrameOutcome, Stage};
use crate::dom;
use crate::render;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub stage: Stage<'a>,
    pub gpu: Option<render::GpuState<'a>>,
    pub canvas: web::HtmlCanvasElement,
    pub pixel_ratio: f32,
    pub started: Instant,
}

impl<'a> FrameContext<'a> {
    /// One animation step: advance the stage, then draw.
    pub fn frame(&mut self) -> FrameOutcome {
        let elapsed = self.started.elapsed().as_secs_f32();
        let outcome = self.stage.frame(elapsed);
        if !self.stage.is_visible() || self.stage.scene().is_disposed() {
            return outcome;
        }
        let lens_glow = self.stage.last_state().map(|s| s.lens_glow).unwrap_or(0.0);
        if let Some(g) = &mut self.gpu {
            let (w, h) = (self.canvas.width(), self.canvas.height());
            g.resize_if_needed(w, h);
            match g.render(self.stage.scene(), lens_glow) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    log::warn!("[gpu] surface lost; reconfiguring next frame");
                }
                Err(e) => log::error!("render error: {:?}", e),
            }
        }
        outcome
    }

    /// Match the canvas to its laid-out size and reallocate GPU targets.
    pub fn sync_surface(&mut self) {
        if let Some((w, h)) = dom::sync_canvas_backing_size(&self.canvas, self.pixel_ratio) {
            if let Some(g) = &mut self.gpu {
                g.resize_if_needed(w, h);
            }
        }
    }

    /// Tear down scene and GPU resources. Safe to call more than once.
    pub fn dispose(&mut self) -> bool {
        let gpu = self.gpu.as_mut().map(|g| g.dispose()).unwrap_or(false);
        let scene = self.stage.dispose();
        gpu || scene
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    scene: &crate::core::SceneController,
    bloom_enabled: bool,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, scene, bloom_enabled).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// requestAnimationFrame loop that only stays scheduled while the stage
/// reports more work. `start` re-arms it after a suspension.
pub struct FrameLoop {
    ctx: Rc<RefCell<FrameContext<'static>>>,
    tick: Closure<dyn FnMut()>,
    scheduled: Cell<bool>,
    stopped: Cell<bool>,
}

impl FrameLoop {
    pub fn new(ctx: Rc<RefCell<FrameContext<'static>>>) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<FrameLoop>| {
            let weak = weak.clone();
            let tick = Closure::wrap(Box::new(move || {
                if let Some(this) = weak.upgrade() {
                    this.on_frame();
                }
            }) as Box<dyn FnMut()>);
            FrameLoop {
                ctx,
                tick,
                scheduled: Cell::new(false),
                stopped: Cell::new(false),
            }
        })
    }

    pub fn start(&self) {
        if self.scheduled.get() || self.stopped.get() {
            return;
        }
        let Some(w) = web::window() else { return };
        if w
            .request_animation_frame(self.tick.as_ref().unchecked_ref())
            .is_ok()
        {
            self.scheduled.set(true);
        }
    }

    fn on_frame(&self) {
        self.scheduled.set(false);
        if self.stopped.get() {
            return;
        }
        let outcome = match self.ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.frame(),
            Err(_) => {
                self.start();
                return;
            }
        };
        if outcome.keep_running {
            self.start();
        }
    }

    /// Permanent stop; a frame already requested becomes a no-op.
    pub fn stop(&self) {
        self.stopped.set(true);
    }
}
