use glam::Vec2;

/// Damped cursor position in normalized device coordinates (-1..1, y up).
///
/// Raw targets arrive at event rate; the smoothed value only advances when the
/// frame loop calls [`PointerTracker::update`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    target: Vec2,
    value: Vec2,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw pointer position given in client pixels.
    pub fn set_target_from_client(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.target = client_to_ndc(x, y, width, height);
    }

    pub fn set_target(&mut self, ndc: Vec2) {
        self.target = ndc.clamp(Vec2::splat(-1.0), Vec2::ONE);
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Advance toward the latest target by `damping` of the remaining distance.
    pub fn update(&mut self, damping: f32) -> Vec2 {
        let k = damping.clamp(0.0, 1.0);
        self.value += (self.target - self.value) * k;
        self.value
    }

    pub fn value(&self) -> Vec2 {
        self.value
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.target - self.value).length_squared() <= epsilon * epsilon
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Client pixel coordinates to NDC. Degenerate viewports map to the center.
#[inline]
pub fn client_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if !(width > 0.0 && height > 0.0) || !x.is_finite() || !y.is_finite() {
        return Vec2::ZERO;
    }
    let nx = (x / width) * 2.0 - 1.0;
    let ny = 1.0 - (y / height) * 2.0;
    Vec2::new(nx.clamp(-1.0, 1.0), ny.clamp(-1.0, 1.0))
}
