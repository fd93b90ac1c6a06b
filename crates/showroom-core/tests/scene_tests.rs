// Host-side tests for the scene controller's reactive update.

use glam::Vec2;
use showroom_core::constants::*;
use showroom_core::model::{MaterialDesc, MaterialId};
use showroom_core::scene::material_targets;
use showroom_core::*;

fn profile(reduced_motion: bool) -> PerfProfile {
    PerfProfile {
        reduced_motion,
        is_low_end: false,
        pixel_ratio: 1.0,
    }
}

fn make_scene(reduced_motion: bool) -> (BeatTable, SceneController) {
    let beats = BeatTable::default();
    let scene = SceneController::new(
        Err(ModelError::Fetch("offline".into())),
        profile(reduced_motion),
        Theme::Dark,
        &beats.desktop.home,
    );
    (beats, scene)
}

#[test]
fn load_failure_falls_back_to_procedural_rig() {
    let (_, scene) = make_scene(false);
    assert!(scene.is_procedural());
    assert!(!scene.meshes().is_empty());
    // Four tires and four rims share two materials.
    assert_eq!(scene.materials().len(), 5);
}

#[test]
fn empty_model_also_falls_back() {
    let beats = BeatTable::default();
    let scene = SceneController::new(
        Ok(ModelAsset::default()),
        profile(false),
        Theme::Light,
        &beats.desktop.home,
    );
    assert!(scene.is_procedural());
}

#[test]
fn shared_materials_register_once() {
    let mut asset = ModelAsset::procedural_car_rig();
    asset.procedural = false;
    let beats = BeatTable::default();
    let scene = SceneController::new(Ok(asset), profile(false), Theme::Dark, &beats.desktop.home);
    let mut ids: Vec<MaterialId> = scene.materials().entries().iter().map(|e| e.id).collect();
    let n = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), n);
    assert!(!scene.is_procedural());
}

#[test]
fn hover_glow_eases_up_and_back_down() {
    let (beats, mut scene) = make_scene(true);
    let state = beats.desktop.home;
    scene.set_hover(Some(2));
    assert_eq!(scene.hover().glow, 0.0);
    scene.update(&state, Vec2::ZERO, 0.0);
    assert!((scene.hover().glow - HOVER_GLOW_RATE).abs() < 1e-6);
    for _ in 0..200 {
        scene.update(&state, Vec2::ZERO, 0.0);
    }
    assert!(scene.hover().glow > 0.99);
    scene.set_hover(None);
    for _ in 0..200 {
        scene.update(&state, Vec2::ZERO, 0.0);
    }
    assert!(scene.hover().glow < 0.01);
}

#[test]
fn drag_rotates_rig_and_parallax_is_damped_while_dragging() {
    let (beats, mut scene) = make_scene(true);
    scene.resize(1000.0, 500.0);
    let state = beats.desktop.home;
    let settle = |scene: &mut SceneController, pointer: Vec2| {
        for _ in 0..600 {
            scene.update(&state, pointer, 0.0);
        }
    };
    settle(&mut scene, Vec2::new(1.0, 0.0));
    let free = scene.rotation().x - BASE_YAW;
    assert!((free - PARALLAX_YAW).abs() < 1e-3);

    assert!(scene.begin_drag(0.0, 0.0, Some(4)));
    settle(&mut scene, Vec2::new(1.0, 0.0));
    let damped = scene.rotation().x - BASE_YAW;
    assert!((damped - PARALLAX_YAW * PARALLAX_DRAG_WEIGHT).abs() < 1e-3);

    assert!(scene.drag_to(500.0, 0.0, Some(4)));
    assert!(!scene.drag_to(900.0, 0.0, Some(5)));
    assert!((scene.drag_state().yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    assert!(scene.end_drag(Some(4)));
    assert!(!scene.is_dragging());
}

#[test]
fn theme_change_eases_background() {
    let (beats, mut scene) = make_scene(true);
    let state = beats.desktop.home;
    let dark = Theme::Dark.preset().background;
    let light = Theme::Light.preset().background;
    assert_eq!(scene.background(), dark);
    scene.set_theme(Theme::Light);
    assert_eq!(scene.background(), dark);
    scene.update(&state, Vec2::ZERO, 0.0);
    let first = scene.background();
    assert!(first.x > dark.x && first.x < light.x);
    for _ in 0..600 {
        scene.update(&state, Vec2::ZERO, 0.0);
    }
    assert!((scene.background() - light).length() < 1e-3);
}

#[test]
fn materials_converge_to_baseline_targets_without_drift() {
    let (beats, mut scene) = make_scene(true);
    let state = beats.desktop.work;
    for _ in 0..2000 {
        scene.update(&state, Vec2::ZERO, 0.0);
    }
    for entry in scene.materials().entries() {
        let (r, env) = material_targets(entry, &state, 0.0);
        assert!((entry.live.roughness - r).abs() < 1e-4, "{}", entry.name);
        assert!((entry.live.env_intensity - env).abs() < 1e-4, "{}", entry.name);
    }
    // Another long run must not move the values: targets come from baselines.
    let snapshot: Vec<_> = scene.materials().entries().iter().map(|e| e.live).collect();
    for _ in 0..2000 {
        scene.update(&state, Vec2::ZERO, 0.0);
    }
    for (before, entry) in snapshot.iter().zip(scene.materials().entries()) {
        assert!((before.roughness - entry.live.roughness).abs() < 1e-5);
        assert!((before.env_intensity - entry.live.env_intensity).abs() < 1e-5);
    }
}

#[test]
fn material_target_uses_beat_when_no_baseline() {
    let mut registry = MaterialRegistry::new();
    registry.register(&MaterialDesc {
        id: MaterialId(9),
        name: "plain".into(),
        base_color: glam::Vec3::ONE,
        metallic: 0.0,
        roughness: None,
        env_intensity: None,
        clearcoat: 0.0,
    });
    let beats = BeatTable::default();
    let entry = &registry.entries()[0];
    let (r, _) = material_targets(entry, &beats.desktop.work, 0.0);
    assert!((r - beats.desktop.work.material_roughness).abs() < 1e-6);
    let (r_hover, _) = material_targets(entry, &beats.desktop.work, 1.0);
    assert!(r_hover < r);
}

#[test]
fn camera_follows_timeline_state() {
    let (beats, mut scene) = make_scene(true);
    let state = beats.desktop.contact;
    for _ in 0..1500 {
        scene.update(&state, Vec2::ZERO, 0.0);
    }
    assert!((scene.camera().eye - state.camera_pos).length() < 1e-3);
    assert!((scene.camera().target - state.target).length() < 1e-3);
}

#[test]
fn resize_updates_aspect_and_ignores_zero() {
    let (_, mut scene) = make_scene(true);
    scene.resize(800.0, 400.0);
    assert_eq!(scene.camera().aspect, 2.0);
    scene.resize(0.0, 400.0);
    assert_eq!(scene.camera().aspect, 2.0);
}

#[test]
fn settles_with_reduced_motion_but_not_with_idle_float() {
    let (beats, mut still) = make_scene(true);
    let state = beats.desktop.home;
    for _ in 0..3000 {
        still.update(&state, Vec2::ZERO, 0.0);
    }
    assert!(!still.requires_continuous_render());

    let (_, mut floating) = make_scene(false);
    for i in 0..3000 {
        floating.update(&state, Vec2::ZERO, i as f32 / 60.0);
    }
    assert!(floating.requires_continuous_render());
}

#[test]
fn dispose_is_idempotent() {
    let (beats, mut scene) = make_scene(true);
    assert!(scene.dispose());
    assert!(scene.meshes().is_empty());
    assert!(scene.materials().is_empty());
    assert!(scene.env().is_none());
    assert!(!scene.dispose());
    scene.update(&beats.desktop.home, Vec2::ZERO, 0.0);
    assert!(!scene.requires_continuous_render());
}
