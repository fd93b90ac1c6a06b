// Shared scene/interaction tuning constants used by the web frontend and tests.
//
// Easing rates are fractions of the remaining distance covered per rendered
// frame and assume a ~60Hz cadence.

// Hover glow
pub const HOVER_GLOW_RATE: f32 = 0.12;
pub const HOVER_LIGHT_BOOST: f32 = 0.35; // extra key/rim intensity at full glow

// Rotation easing toward the blended target
pub const ROTATION_EASE: f32 = 0.055;
pub const LIGHT_EASE: f32 = 0.08;
pub const MATERIAL_EASE: f32 = 0.08;
pub const CAMERA_EASE: f32 = 0.06;

// Drag orbit
pub const DRAG_YAW_SPEED: f32 = std::f32::consts::PI; // radians per full viewport width
pub const DRAG_PITCH_SPEED: f32 = std::f32::consts::FRAC_PI_2; // radians per full viewport height
pub const PITCH_LIMIT: f32 = 0.38;
pub const YAW_COAST_DECAY: f32 = 0.93;
pub const PITCH_COAST_DECAY: f32 = 0.9;
pub const COAST_EPSILON: f32 = 1e-5;

// Pointer parallax
pub const PARALLAX_YAW: f32 = 0.22;
pub const PARALLAX_PITCH: f32 = 0.12;
pub const PARALLAX_CAMERA: f32 = 0.18;
pub const PARALLAX_DRAG_WEIGHT: f32 = 0.16;
pub const POINTER_DAMPING: f32 = 0.08;

// Idle float
pub const IDLE_YAW_AMPLITUDE: f32 = 0.04;
pub const IDLE_PITCH_AMPLITUDE: f32 = 0.025;
pub const IDLE_LIFT_AMPLITUDE: f32 = 0.05;
pub const IDLE_YAW_FREQUENCY: f32 = 0.6;
pub const IDLE_PITCH_FREQUENCY: f32 = 0.45;

// Base orientation of the rig (three-quarter view)
pub const BASE_YAW: f32 = -0.52;
pub const BASE_PITCH: f32 = 0.0;

// Material look
pub const CLEARCOAT_FLOOR: f32 = 0.65;
pub const ENV_INTENSITY_BOOST: f32 = 1.35;
pub const ROUGHNESS_MIN: f32 = 0.04;
pub const ROUGHNESS_BEAT_WEIGHT: f32 = 0.5;
pub const ROUGHNESS_HOVER_DROP: f32 = 0.08;

// Panel timeline
pub const PANEL_EASE: f32 = 0.085;
pub const PROGRESS_EPSILON: f32 = 1e-4;
pub const SETTLE_EPSILON: f32 = 5e-5;

// Viewport classification
pub const MOBILE_BREAKPOINT_PX: f32 = 760.0;

// Camera
pub const CAMERA_FOVY_DEGREES: f32 = 38.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Image hydration
pub const MAIN_HYDRATION_RADIUS: usize = 1;
pub const THUMB_HYDRATION_RADIUS: usize = 4;
pub const PRELOAD_FALLBACK_DELAY_MS: u32 = 1200;
pub const PRELOAD_IDLE_TIMEOUT_MS: u32 = 2000;
