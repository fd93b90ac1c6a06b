//! Visual-side state types shared with the web frontend.
//!
//! These types avoid platform APIs. The renderer reads them every frame to
//! build camera matrices and light uniforms.

use crate::constants::{CAMERA_FOVY_DEGREES, CAMERA_ZFAR, CAMERA_ZNEAR};
use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3, aspect: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOVY_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect.max(1e-3), self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Which work item is highlighted and how strongly the scene reacts to it.
///
/// `glow` eases toward 1 while an item is hovered or focused, toward 0 otherwise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HoverState {
    pub highlighted: Option<usize>,
    pub glow: f32,
}

/// One light of the rig; `intensity` already includes theme and hover boosts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

/// Key, fill and rim directional lights plus ambient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightRig {
    pub key: Light,
    pub fill: Light,
    pub rim: Light,
    pub ambient: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            key: Light {
                direction: Vec3::new(-0.5, -0.8, -0.35).normalize(),
                color: Vec3::ONE,
                intensity: 2.4,
            },
            fill: Light {
                direction: Vec3::new(0.7, -0.35, 0.6).normalize(),
                color: Vec3::ONE,
                intensity: 0.9,
            },
            rim: Light {
                direction: Vec3::new(0.1, -0.25, 1.0).normalize(),
                color: Vec3::ONE,
                intensity: 1.6,
            },
            ambient: 0.4,
        }
    }
}
