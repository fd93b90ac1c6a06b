// Front-end wiring constants: asset URLs, DOM hooks and post-processing
// defaults. Scene tuning lives in `showroom_core::constants`.

// Assets and endpoints
pub const MODEL_URL: &str = "/models/showroom-rig.glb";
pub const CONTACT_ENDPOINT: &str = "/api/contact";
pub const CONTACT_EMAIL: &str = "studio@example.com";

// DOM hooks
pub const CANVAS_ID: &str = "hero-canvas";
pub const THEME_TOGGLE_ID: &str = "theme-toggle";
pub const WORK_TRACK_ID: &str = "work-track";
pub const WORK_THUMBS_ID: &str = "work-thumbs";
pub const CONTACT_FORM_ID: &str = "contact-form";
pub const CONTACT_STATUS_ID: &str = "contact-status";
pub const CONTACT_FALLBACK_ID: &str = "contact-mailto";
pub const PANEL_ATTR: &str = "data-panel";
pub const PANEL_SECTION_ATTR: &str = "data-panel-id";
pub const SLIDE_INDEX_ATTR: &str = "data-index";

// State classes written back to the DOM
pub const ACTIVE_CLASS: &str = "is-active";
pub const LOADED_CLASS: &str = "is-loaded";
pub const ERROR_CLASS: &str = "is-error";

/// `sizes` attribute for full-width carousel images.
pub const MAIN_IMAGE_SIZES: &str = "(max-width: 760px) 100vw, 70vw";

// Post-processing defaults
pub const BLOOM_STRENGTH: f32 = 0.55;
pub const BLOOM_THRESHOLD: f32 = 0.85;
pub const EXPOSURE: f32 = 1.1;

// Scene shading
pub const SPECULAR_POWER_MIN: f32 = 8.0;
pub const SPECULAR_POWER_MAX: f32 = 256.0;
