//! Panel timeline: named scene beats and their interpolation.
//!
//! A beat is a keyframe of camera, lighting and material parameters. The three
//! beats sit at progress 0, 0.5 and 1 and [`compute_state`] blends the two
//! adjacent ones with a smoothstep so motion eases in and out of every panel.

use glam::Vec3;

/// Keyframe of scene parameters associated with a UI panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneBeat {
    pub camera_pos: Vec3,
    pub target: Vec3,
    pub key_color: Vec3,
    pub fill_color: Vec3,
    pub rim_color: Vec3,
    pub lens_glow: f32,
    pub material_roughness: f32,
    pub ambient_intensity: f32,
    // Layout hints kept in the interpolation contract; the renderer ignores them.
    pub frame_spread: f32,
    pub frame_depth: f32,
    pub frame_gridness: f32,
}

/// Interpolated beat produced for one frame.
pub type TimelineState = SceneBeat;

impl SceneBeat {
    /// Field-by-field blend; `t` is expected in [0, 1].
    pub fn lerp(&self, other: &SceneBeat, t: f32) -> SceneBeat {
        SceneBeat {
            camera_pos: lerp_vec3(self.camera_pos, other.camera_pos, t),
            target: lerp_vec3(self.target, other.target, t),
            key_color: lerp_vec3(self.key_color, other.key_color, t),
            fill_color: lerp_vec3(self.fill_color, other.fill_color, t),
            rim_color: lerp_vec3(self.rim_color, other.rim_color, t),
            lens_glow: lerp(self.lens_glow, other.lens_glow, t),
            material_roughness: lerp(self.material_roughness, other.material_roughness, t),
            ambient_intensity: lerp(self.ambient_intensity, other.ambient_intensity, t),
            frame_spread: lerp(self.frame_spread, other.frame_spread, t),
            frame_depth: lerp(self.frame_depth, other.frame_depth, t),
            frame_gridness: lerp(self.frame_gridness, other.frame_gridness, t),
        }
    }
}

/// Beat presets for one device class, ordered home, work, contact.
#[derive(Clone, Debug, PartialEq)]
pub struct BeatSet {
    pub home: SceneBeat,
    pub work: SceneBeat,
    pub contact: SceneBeat,
}

impl BeatSet {
    pub fn as_array(&self) -> [&SceneBeat; 3] {
        [&self.home, &self.work, &self.contact]
    }
}

/// Desktop and mobile beat presets. Built once and passed by reference.
#[derive(Clone, Debug, PartialEq)]
pub struct BeatTable {
    pub desktop: BeatSet,
    pub mobile: BeatSet,
}

impl BeatTable {
    pub fn select(&self, mobile: bool) -> &BeatSet {
        if mobile {
            &self.mobile
        } else {
            &self.desktop
        }
    }

    pub fn compute_state(&self, progress: f32, mobile: bool) -> TimelineState {
        compute_state(progress, mobile, self)
    }
}

impl Default for BeatTable {
    fn default() -> Self {
        let home = SceneBeat {
            camera_pos: Vec3::new(3.6, 1.35, 5.2),
            target: Vec3::new(0.0, 0.45, 0.0),
            key_color: Vec3::new(1.0, 0.93, 0.84),
            fill_color: Vec3::new(0.42, 0.55, 0.86),
            rim_color: Vec3::new(0.95, 0.46, 0.30),
            lens_glow: 0.55,
            material_roughness: 0.32,
            ambient_intensity: 0.42,
            frame_spread: 0.0,
            frame_depth: 0.0,
            frame_gridness: 0.0,
        };
        let work = SceneBeat {
            camera_pos: Vec3::new(-4.4, 1.9, 4.1),
            target: Vec3::new(0.35, 0.3, 0.0),
            key_color: Vec3::new(0.88, 0.94, 1.0),
            fill_color: Vec3::new(0.30, 0.38, 0.62),
            rim_color: Vec3::new(0.48, 0.78, 1.0),
            lens_glow: 0.3,
            material_roughness: 0.18,
            ambient_intensity: 0.3,
            frame_spread: 1.0,
            frame_depth: 0.6,
            frame_gridness: 1.0,
        };
        let contact = SceneBeat {
            camera_pos: Vec3::new(0.4, 3.2, 6.4),
            target: Vec3::new(0.0, 0.2, 0.0),
            key_color: Vec3::new(1.0, 0.86, 0.72),
            fill_color: Vec3::new(0.52, 0.44, 0.70),
            rim_color: Vec3::new(1.0, 0.62, 0.42),
            lens_glow: 0.8,
            material_roughness: 0.46,
            ambient_intensity: 0.55,
            frame_spread: 0.4,
            frame_depth: 1.0,
            frame_gridness: 0.2,
        };
        // Mobile pulls the camera back and up so the rig fits a portrait viewport.
        let mobile_variant = |b: &SceneBeat| SceneBeat {
            camera_pos: b.camera_pos * 1.35 + Vec3::new(0.0, 0.6, 0.0),
            target: b.target + Vec3::new(0.0, 0.25, 0.0),
            lens_glow: b.lens_glow * 0.8,
            frame_spread: b.frame_spread * 0.5,
            ..*b
        };
        let desktop = BeatSet { home, work, contact };
        let mobile = BeatSet {
            home: mobile_variant(&desktop.home),
            work: mobile_variant(&desktop.work),
            contact: mobile_variant(&desktop.contact),
        };
        Self { desktop, mobile }
    }
}

/// Ease-in/ease-out curve with zero slope at both ends.
#[inline]
pub fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Linear blend, held inside `[min(a, b), max(a, b)]` so rounding never
/// overshoots either endpoint.
#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (a + (b - a) * t).max(a.min(b)).min(a.max(b))
}

#[inline]
fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    Vec3::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t), lerp(a.z, b.z, t))
}

/// Map a timeline progress value to the blended scene beat.
///
/// Progress is clamped to [0, 1] (NaN is treated as 0). Beats are control
/// points at 0, 0.5 and 1; the pair around `progress` is blended with
/// `smoothstep` of the local parameter. Pure and deterministic.
pub fn compute_state(progress: f32, mobile: bool, table: &BeatTable) -> TimelineState {
    let beats = table.select(mobile).as_array();
    let last = beats.len() - 1;
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let scaled = progress * last as f32;
    let from = (scaled.floor() as usize).min(last);
    let to = (from + 1).min(last);
    let t = smoothstep(scaled - from as f32);
    beats[from].lerp(beats[to], t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_has_fixed_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
    }

    #[test]
    fn mobile_beats_differ_from_desktop() {
        let table = BeatTable::default();
        assert_ne!(table.desktop.home.camera_pos, table.mobile.home.camera_pos);
        assert_eq!(
            table.desktop.work.material_roughness,
            table.mobile.work.material_roughness
        );
    }

    #[test]
    fn lerp_never_leaves_its_endpoints() {
        let pairs = [(0.1_f32, 0.7_f32), (0.7, 0.1), (-3.3, 2.9), (1e-3, 0.9999), (0.35, 0.35)];
        for (a, b) in pairs {
            for i in 0..=10_000 {
                let t = smoothstep(i as f32 / 10_000.0);
                let v = lerp(a, b, t);
                assert!(v >= a.min(b) && v <= a.max(b), "{a}->{b} t={t}: {v}");
            }
            assert_eq!(lerp(a, b, 0.0), a);
        }
    }

    #[test]
    fn nan_progress_is_home() {
        let table = BeatTable::default();
        assert_eq!(compute_state(f32::NAN, false, &table), table.desktop.home);
    }
}
