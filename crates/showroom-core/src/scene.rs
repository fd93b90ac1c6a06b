//! Scene controller: model, material registry, light rig, drag orbit and the
//! per-frame reactive update.
//!
//! Every easing below moves a fixed fraction of the remaining distance per
//! call, so the controller settles without overshoot. The renderer only reads
//! the resulting camera, rotation, lights and material values.

use crate::constants::*;
use crate::drag::DragState;
use crate::materials::{MaterialRegistry, MaterialRegistryEntry};
use crate::model::{CpuMesh, ModelAsset, ModelError};
use crate::perf::PerfProfile;
use crate::state::{Camera, HoverState, Light, LightRig};
use crate::theme::Theme;
use crate::timeline::SceneBeat;
use glam::{Mat4, Vec2, Vec3};

/// Longest horizontal extent the hero model is normalized to.
const MODEL_LENGTH: f32 = 4.6;

/// Sky/ground gradient sampled by the renderer for reflections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvLookup {
    pub zenith: Vec3,
    pub horizon: Vec3,
    pub ground: Vec3,
}

impl EnvLookup {
    fn from_background(background: Vec3, key_color: Vec3) -> Self {
        Self {
            zenith: background * 0.6 + key_color * 0.25,
            horizon: background * 0.4 + key_color * 0.6,
            ground: background * 0.3,
        }
    }
}

pub struct SceneController {
    profile: PerfProfile,
    meshes: Vec<CpuMesh>,
    materials: MaterialRegistry,
    procedural: bool,
    env: Option<EnvLookup>,
    camera: Camera,
    rotation: Vec2,
    lift: f32,
    drag: DragState,
    hover: HoverState,
    theme: Theme,
    lights: LightRig,
    background: Vec3,
    viewport: Vec2,
    settled: bool,
    disposed: bool,
}

impl SceneController {
    /// Build the scene. A failed model load is replaced by the procedural rig.
    pub fn new(
        model: Result<ModelAsset, ModelError>,
        profile: PerfProfile,
        theme: Theme,
        initial: &SceneBeat,
    ) -> Self {
        let mut model = match model {
            Ok(m) if !m.meshes.is_empty() => m,
            Ok(_) => {
                log::warn!("[scene] model has no meshes; using procedural rig");
                ModelAsset::procedural_car_rig()
            }
            Err(e) => {
                log::warn!("[scene] model load failed ({e}); using procedural rig");
                ModelAsset::procedural_car_rig()
            }
        };
        model.fit_to_length(MODEL_LENGTH);

        let mut materials = MaterialRegistry::new();
        for mesh in &model.meshes {
            let Some(id) = mesh.material else { continue };
            if materials.slot_of(id).is_some() {
                continue;
            }
            if let Some(desc) = model.material(id) {
                materials.register(desc);
            }
        }
        log::info!(
            "[scene] meshes={} materials={} procedural={}",
            model.meshes.len(),
            materials.len(),
            model.procedural
        );

        let preset = theme.preset();
        let mut lights = LightRig::default();
        lights.key.color = initial.key_color;
        lights.fill.color = initial.fill_color;
        lights.rim.color = initial.rim_color;
        lights.key.intensity *= preset.key;
        lights.fill.intensity *= preset.fill;
        lights.rim.intensity *= preset.rim;
        lights.ambient = initial.ambient_intensity * preset.ambient;

        Self {
            profile,
            meshes: model.meshes,
            materials,
            procedural: model.procedural,
            env: Some(EnvLookup::from_background(preset.background, initial.key_color)),
            camera: Camera::new(initial.camera_pos, initial.target, 16.0 / 9.0),
            rotation: Vec2::new(BASE_YAW, BASE_PITCH),
            lift: 0.0,
            drag: DragState::default(),
            hover: HoverState::default(),
            theme,
            lights,
            background: preset.background,
            viewport: Vec2::new(1280.0, 720.0),
            settled: false,
            disposed: false,
        }
    }

    /// Record the highlighted work item; visuals follow on later updates.
    pub fn set_hover(&mut self, index: Option<usize>) {
        self.hover.highlighted = index;
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    /// Switch theme; background and light multipliers ease in on update.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            log::info!("[scene] theme -> {}", theme.name());
            self.theme = theme;
            self.settled = false;
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn begin_drag(&mut self, x: f32, y: f32, pointer_id: Option<i32>) -> bool {
        let started = self.drag.begin(x, y, pointer_id);
        if started {
            self.settled = false;
        }
        started
    }

    pub fn drag_to(&mut self, x: f32, y: f32, pointer_id: Option<i32>) -> bool {
        self.drag
            .drag_to(x, y, pointer_id, self.viewport.x, self.viewport.y)
    }

    pub fn end_drag(&mut self, pointer_id: Option<i32>) -> bool {
        self.drag.end(pointer_id)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Recompute the camera aspect. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.viewport = Vec2::new(width, height);
            self.camera.aspect = width / height;
            self.settled = false;
        }
    }

    /// One reactive step at render cadence.
    pub fn update(&mut self, state: &SceneBeat, pointer: Vec2, elapsed: f32) {
        if self.disposed {
            return;
        }
        let mut moved = 0.0_f32;

        // Hover glow
        let glow_target = if self.hover.highlighted.is_some() { 1.0 } else { 0.0 };
        moved = moved.max(ease(&mut self.hover.glow, glow_target, HOVER_GLOW_RATE));
        let glow = self.hover.glow;

        // Idle float
        let strength = self.profile.motion_strength();
        let idle_yaw = (elapsed * IDLE_YAW_FREQUENCY).sin() * IDLE_YAW_AMPLITUDE * strength;
        let idle_pitch = (elapsed * IDLE_PITCH_FREQUENCY).cos() * IDLE_PITCH_AMPLITUDE * strength;
        self.lift = (elapsed * IDLE_PITCH_FREQUENCY).sin() * IDLE_LIFT_AMPLITUDE * strength;

        // Inertial coast once released
        self.drag.coast();

        // Rotation
        let parallax = if self.drag.active {
            PARALLAX_DRAG_WEIGHT
        } else {
            1.0
        };
        let target_rot = Vec2::new(
            BASE_YAW + self.drag.yaw + pointer.x * PARALLAX_YAW * parallax + idle_yaw,
            BASE_PITCH + self.drag.pitch - pointer.y * PARALLAX_PITCH * parallax + idle_pitch,
        );
        moved = moved.max(ease_vec2(&mut self.rotation, target_rot, ROTATION_EASE));

        // Lights
        let preset = self.theme.preset();
        let defaults = LightRig::default();
        let boost = 1.0 + glow * HOVER_LIGHT_BOOST;
        moved = moved.max(ease_light(
            &mut self.lights.key,
            state.key_color,
            defaults.key.intensity * preset.key * boost,
        ));
        moved = moved.max(ease_light(
            &mut self.lights.fill,
            state.fill_color,
            defaults.fill.intensity * preset.fill,
        ));
        moved = moved.max(ease_light(
            &mut self.lights.rim,
            state.rim_color,
            defaults.rim.intensity * preset.rim * boost,
        ));
        moved = moved.max(ease(
            &mut self.lights.ambient,
            state.ambient_intensity * preset.ambient,
            LIGHT_EASE,
        ));
        moved = moved.max(ease_vec3(&mut self.background, preset.background, LIGHT_EASE));
        if self.env.is_some() {
            self.env = Some(EnvLookup::from_background(self.background, self.lights.key.color));
        }

        // Materials, always against each entry's recorded baseline
        for entry in self.materials.entries_mut() {
            let (roughness, env) = material_targets(entry, state, glow);
            moved = moved.max(ease(&mut entry.live.roughness, roughness, MATERIAL_EASE));
            moved = moved.max(ease(&mut entry.live.env_intensity, env, MATERIAL_EASE));
        }

        // Camera
        let eye_target = state.camera_pos
            + Vec3::new(
                pointer.x * PARALLAX_CAMERA * parallax,
                pointer.y * PARALLAX_CAMERA * 0.5 * parallax + self.lift,
                0.0,
            );
        let look_target = state.target + Vec3::new(0.0, self.lift * 0.5, 0.0);
        moved = moved.max(ease_vec3(&mut self.camera.eye, eye_target, CAMERA_EASE));
        moved = moved.max(ease_vec3(&mut self.camera.target, look_target, CAMERA_EASE));

        self.settled = moved < SETTLE_EPSILON && !self.drag.active && !self.drag.is_coasting();
    }

    /// Whether frames must keep coming even when the timeline is at rest.
    pub fn requires_continuous_render(&self) -> bool {
        if self.disposed {
            return false;
        }
        !self.settled
            || self.drag.active
            || self.drag.is_coasting()
            || self.profile.motion_strength() > 0.0
    }

    /// Release geometry, materials and the environment lookup. Safe to call
    /// more than once; returns whether anything was released.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let meshes = self.meshes.len();
        self.meshes = Vec::new();
        let materials = self.materials.clear();
        self.env = None;
        self.disposed = true;
        log::info!("[scene] disposed meshes={meshes} materials={materials}");
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current (yaw, pitch) of the rig.
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.lift, 0.0))
            * Mat4::from_rotation_y(self.rotation.x)
            * Mat4::from_rotation_x(self.rotation.y)
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn background(&self) -> Vec3 {
        self.background
    }

    pub fn env(&self) -> Option<&EnvLookup> {
        self.env.as_ref()
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn meshes(&self) -> &[CpuMesh] {
        &self.meshes
    }

    pub fn is_procedural(&self) -> bool {
        self.procedural
    }

    pub fn profile(&self) -> &PerfProfile {
        &self.profile
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }
}

/// Roughness and environment-intensity targets for one material.
pub fn material_targets(entry: &MaterialRegistryEntry, state: &SceneBeat, glow: f32) -> (f32, f32) {
    let base_roughness = entry.base_roughness.unwrap_or(state.material_roughness);
    let roughness = (base_roughness
        + (state.material_roughness - base_roughness) * ROUGHNESS_BEAT_WEIGHT
        - glow * ROUGHNESS_HOVER_DROP)
        .clamp(ROUGHNESS_MIN, 1.0);
    let base_env = entry.base_env_intensity.unwrap_or(1.0) * ENV_INTENSITY_BOOST;
    let env = base_env * (0.85 + state.lens_glow * 0.35 + glow * 0.2);
    (roughness, env)
}

#[inline]
fn ease(current: &mut f32, target: f32, rate: f32) -> f32 {
    let delta = (target - *current) * rate;
    *current += delta;
    delta.abs()
}

#[inline]
fn ease_vec2(current: &mut Vec2, target: Vec2, rate: f32) -> f32 {
    let delta = (target - *current) * rate;
    *current += delta;
    delta.abs().max_element()
}

#[inline]
fn ease_vec3(current: &mut Vec3, target: Vec3, rate: f32) -> f32 {
    let delta = (target - *current) * rate;
    *current += delta;
    delta.abs().max_element()
}

fn ease_light(light: &mut Light, color: Vec3, intensity: f32) -> f32 {
    ease_vec3(&mut light.color, color, LIGHT_EASE).max(ease(&mut light.intensity, intensity, LIGHT_EASE))
}
