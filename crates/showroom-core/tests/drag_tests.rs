// Host-side tests for the drag-orbit state machine.

use rand::prelude::*;
use showroom_core::constants::PITCH_LIMIT;
use showroom_core::DragState;

const W: f32 = 1280.0;
const H: f32 = 720.0;

#[test]
fn drag_accumulates_yaw_from_horizontal_motion() {
    let mut d = DragState::default();
    assert!(d.begin(100.0, 100.0, Some(7)));
    assert!(d.drag_to(100.0 + W / 2.0, 100.0, Some(7), W, H));
    assert!((d.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    assert_eq!(d.pitch, 0.0);
    assert!(d.velocity_yaw > 0.0);
}

// Property: pitch never leaves [-0.38, 0.38] for any sequence of moves.
#[test]
fn pitch_is_always_clamped() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut d = DragState::default();
    d.begin(0.0, 0.0, Some(1));
    let (mut x, mut y) = (0.0_f32, 0.0_f32);
    for _ in 0..5000 {
        x += rng.gen_range(-4000.0..4000.0);
        y += rng.gen_range(-4000.0..4000.0);
        d.drag_to(x, y, Some(1), W, H);
        assert!(d.pitch >= -PITCH_LIMIT && d.pitch <= PITCH_LIMIT, "pitch {}", d.pitch);
    }
    d.end(Some(1));
    for _ in 0..200 {
        d.coast();
        assert!(d.pitch.abs() <= PITCH_LIMIT);
    }
}

#[test]
fn huge_delta_clamps_pitch_in_one_step() {
    let mut d = DragState::default();
    d.begin(0.0, 0.0, None);
    d.drag_to(0.0, 1.0e6, None, W, H);
    assert_eq!(d.pitch, PITCH_LIMIT);
    d.drag_to(0.0, -1.0e7, None, W, H);
    assert_eq!(d.pitch, -PITCH_LIMIT);
}

#[test]
fn foreign_pointer_is_ignored_until_owner_returns() {
    let mut d = DragState::default();
    d.begin(0.0, 0.0, Some(1));
    let before = d;
    assert!(!d.drag_to(500.0, 200.0, Some(2), W, H));
    assert!(!d.end(Some(2)));
    assert_eq!(d, before);
    assert!(d.active);

    assert!(d.drag_to(50.0, 0.0, Some(1), W, H));
    assert!(d.yaw > 0.0);
    assert!(d.end(Some(1)));
    assert!(!d.active);
    assert_eq!(d.pointer_id, None);
}

#[test]
fn moves_without_session_are_ignored() {
    let mut d = DragState::default();
    assert!(!d.drag_to(10.0, 10.0, Some(1), W, H));
    assert!(!d.end(Some(1)));
    assert_eq!(d, DragState::default());
}

#[test]
fn begin_zeroes_velocity() {
    let mut d = DragState::default();
    d.begin(0.0, 0.0, Some(1));
    d.drag_to(200.0, 50.0, Some(1), W, H);
    d.end(Some(1));
    assert!(d.is_coasting());
    d.begin(0.0, 0.0, Some(3));
    assert_eq!(d.velocity_yaw, 0.0);
    assert_eq!(d.velocity_pitch, 0.0);
}

#[test]
fn coast_decays_geometrically() {
    let mut d = DragState {
        velocity_yaw: 0.1,
        velocity_pitch: 0.1,
        ..Default::default()
    };
    d.coast();
    assert!((d.velocity_yaw - 0.093).abs() < 1e-6);
    assert!((d.velocity_pitch - 0.09).abs() < 1e-6);
    assert!((d.yaw - 0.093).abs() < 1e-6);
}

#[test]
fn no_coast_while_dragging() {
    let mut d = DragState::default();
    d.begin(0.0, 0.0, Some(1));
    d.drag_to(100.0, 0.0, Some(1), W, H);
    let yaw = d.yaw;
    d.coast();
    assert_eq!(d.yaw, yaw);
}
