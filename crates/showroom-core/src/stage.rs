//! Typed UI events and the stage that routes them to the panel timeline,
//! pointer tracker and scene controller.
//!
//! The platform layer turns DOM callbacks into [`UiEvent`]s and applies the
//! returned [`StageEffect`]s; everything in between is host-testable.

use crate::constants::{MOBILE_BREAKPOINT_PX, POINTER_DAMPING};
use crate::panel::{Panel, PanelController};
use crate::perf::PerfProfile;
use crate::pointer::PointerTracker;
use crate::scene::SceneController;
use crate::theme::Theme;
use crate::timeline::{BeatTable, TimelineState};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiEvent {
    Navigate(Panel),
    NextPanel,
    PreviousPanel,
    PointerMove { x: f32, y: f32, id: Option<i32> },
    PointerDown { x: f32, y: f32, id: Option<i32> },
    PointerUp { id: Option<i32> },
    PointerCancel { id: Option<i32> },
    Hover(Option<usize>),
    Resize { width: f32, height: f32 },
    Visibility(bool),
    Theme(Theme),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StageEffect {
    PanelChanged(Panel),
    ResizeSurface { width: f32, height: f32 },
    StartLoop,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutcome {
    pub keep_running: bool,
    pub progress: f32,
}

pub struct Stage<'a> {
    beats: &'a BeatTable,
    profile: PerfProfile,
    panels: PanelController,
    pointer: PointerTracker,
    scene: SceneController,
    viewport: Vec2,
    visible: bool,
    running: bool,
    last_state: Option<TimelineState>,
}

impl<'a> Stage<'a> {
    pub fn new(
        beats: &'a BeatTable,
        profile: PerfProfile,
        scene: SceneController,
        initial: Panel,
        viewport: Vec2,
    ) -> Self {
        let mut stage = Self {
            beats,
            profile,
            panels: PanelController::new(initial),
            pointer: PointerTracker::new(),
            scene,
            viewport,
            visible: true,
            running: false,
            last_state: None,
        };
        stage.scene.resize(viewport.x, viewport.y);
        stage
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport.x < MOBILE_BREAKPOINT_PX
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Vec<StageEffect> {
        let mut effects = Vec::new();
        match event {
            UiEvent::Navigate(panel) => {
                if let Some(change) = self.panels.navigate(panel) {
                    effects.push(StageEffect::PanelChanged(change.to));
                }
            }
            UiEvent::NextPanel => {
                if let Some(change) = self.panels.next() {
                    effects.push(StageEffect::PanelChanged(change.to));
                }
            }
            UiEvent::PreviousPanel => {
                if let Some(change) = self.panels.previous() {
                    effects.push(StageEffect::PanelChanged(change.to));
                }
            }
            UiEvent::PointerMove { x, y, id } => {
                self.pointer
                    .set_target_from_client(x, y, self.viewport.x, self.viewport.y);
                self.scene.drag_to(x, y, id);
            }
            UiEvent::PointerDown { x, y, id } => {
                self.scene.begin_drag(x, y, id);
            }
            UiEvent::PointerUp { id } | UiEvent::PointerCancel { id } => {
                self.scene.end_drag(id);
            }
            UiEvent::Hover(index) => self.scene.set_hover(index),
            UiEvent::Resize { width, height } => {
                if width > 0.0 && height > 0.0 {
                    self.viewport = Vec2::new(width, height);
                    self.scene.resize(width, height);
                    effects.push(StageEffect::ResizeSurface { width, height });
                }
            }
            UiEvent::Visibility(visible) => {
                self.visible = visible;
                if !visible {
                    self.running = false;
                    // A hidden page never delivers pointerup.
                    self.scene.end_drag(self.scene.drag_state().pointer_id);
                }
            }
            UiEvent::Theme(theme) => self.scene.set_theme(theme),
        }
        if self.visible && !self.running {
            self.running = true;
            effects.push(StageEffect::StartLoop);
        }
        effects
    }

    /// One animation step. The loop should stop when `keep_running` is false
    /// and be restarted on the next `StartLoop` effect.
    pub fn frame(&mut self, elapsed: f32) -> FrameOutcome {
        if !self.visible || self.scene.is_disposed() {
            self.running = false;
            return FrameOutcome {
                keep_running: false,
                progress: self.panels.progress(),
            };
        }
        let progress = self.panels.step(self.profile.reduced_motion);
        let state = self.beats.compute_state(progress, self.is_mobile());
        let pointer = self.pointer.update(POINTER_DAMPING);
        self.scene.update(&state, pointer, elapsed);
        self.last_state = Some(state);

        let keep_running = !self.panels.is_settled()
            || !self.pointer.is_settled(1e-4)
            || self.scene.requires_continuous_render();
        self.running = keep_running;
        FrameOutcome {
            keep_running,
            progress,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn active_panel(&self) -> Panel {
        self.panels.active()
    }

    pub fn progress(&self) -> f32 {
        self.panels.progress()
    }

    pub fn last_state(&self) -> Option<&TimelineState> {
        self.last_state.as_ref()
    }

    pub fn scene(&self) -> &SceneController {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneController {
        &mut self.scene
    }

    pub fn dispose(&mut self) -> bool {
        self.running = false;
        self.scene.dispose()
    }
}
