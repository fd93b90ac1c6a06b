/// Raw device signals gathered once at startup by the platform layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceHints {
    pub hardware_concurrency: u32,
    pub device_memory_gb: Option<f32>,
    pub device_pixel_ratio: f32,
    pub prefers_reduced_motion: bool,
    pub coarse_pointer: bool,
    pub viewport_width: f32,
}

impl Default for DeviceHints {
    fn default() -> Self {
        Self {
            hardware_concurrency: 8,
            device_memory_gb: None,
            device_pixel_ratio: 1.0,
            prefers_reduced_motion: false,
            coarse_pointer: false,
            viewport_width: 1440.0,
        }
    }
}

const LOW_END_CORES: u32 = 4;
const LOW_END_MEMORY_GB: f32 = 4.0;
const SMALL_TOUCH_VIEWPORT: f32 = 820.0;
const LOW_END_MAX_DPR: f32 = 1.25;
const MAX_DPR: f32 = 2.0;

/// Immutable capability descriptor; drives renderer quality and motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerfProfile {
    pub reduced_motion: bool,
    pub is_low_end: bool,
    pub pixel_ratio: f32,
}

impl PerfProfile {
    pub fn detect(hints: &DeviceHints) -> Self {
        let few_cores = hints.hardware_concurrency > 0 && hints.hardware_concurrency <= LOW_END_CORES;
        let little_memory = hints
            .device_memory_gb
            .map(|gb| gb <= LOW_END_MEMORY_GB)
            .unwrap_or(false);
        let small_touch = hints.coarse_pointer && hints.viewport_width < SMALL_TOUCH_VIEWPORT;
        let is_low_end = few_cores || little_memory || small_touch;

        let dpr = if hints.device_pixel_ratio.is_finite() && hints.device_pixel_ratio > 0.0 {
            hints.device_pixel_ratio
        } else {
            1.0
        };
        let cap = if is_low_end { LOW_END_MAX_DPR } else { MAX_DPR };
        let profile = Self {
            reduced_motion: hints.prefers_reduced_motion,
            is_low_end,
            pixel_ratio: dpr.min(cap).max(1.0),
        };
        log::info!(
            "[perf] low_end={} reduced_motion={} pixel_ratio={:.2}",
            profile.is_low_end,
            profile.reduced_motion,
            profile.pixel_ratio
        );
        profile
    }

    /// Scale applied to idle float motion.
    pub fn motion_strength(&self) -> f32 {
        if self.reduced_motion {
            0.0
        } else if self.is_low_end {
            0.6
        } else {
            1.0
        }
    }

    pub fn bloom_enabled(&self) -> bool {
        !self.is_low_end
    }
}

impl Default for PerfProfile {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            is_low_end: false,
            pixel_ratio: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capable_desktop_keeps_retina_ratio() {
        let p = PerfProfile::detect(&DeviceHints {
            device_pixel_ratio: 3.0,
            ..Default::default()
        });
        assert!(!p.is_low_end);
        assert_eq!(p.pixel_ratio, 2.0);
        assert_eq!(p.motion_strength(), 1.0);
    }

    #[test]
    fn small_touch_device_is_low_end() {
        let p = PerfProfile::detect(&DeviceHints {
            coarse_pointer: true,
            viewport_width: 390.0,
            device_pixel_ratio: 3.0,
            ..Default::default()
        });
        assert!(p.is_low_end);
        assert_eq!(p.pixel_ratio, LOW_END_MAX_DPR);
        assert!(!p.bloom_enabled());
    }

    #[test]
    fn reduced_motion_disables_idle_float() {
        let p = PerfProfile::detect(&DeviceHints {
            prefers_reduced_motion: true,
            device_memory_gb: Some(2.0),
            ..Default::default()
        });
        assert!(p.is_low_end);
        assert_eq!(p.motion_strength(), 0.0);
    }
}
