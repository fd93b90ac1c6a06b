use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn preset(self) -> ThemePreset {
        match self {
            Theme::Light => ThemePreset {
                background: Vec3::new(0.91, 0.91, 0.89),
                key: 1.0,
                fill: 1.15,
                rim: 0.7,
                ambient: 1.3,
            },
            Theme::Dark => ThemePreset {
                background: Vec3::new(0.035, 0.04, 0.06),
                key: 1.1,
                fill: 0.8,
                rim: 1.3,
                ambient: 0.75,
            },
        }
    }
}

/// Background color and per-light intensity multipliers for a theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemePreset {
    pub background: Vec3,
    pub key: f32,
    pub fill: f32,
    pub rim: f32,
    pub ambient: f32,
}
