use crate::constants::{
    COAST_EPSILON, DRAG_PITCH_SPEED, DRAG_YAW_SPEED, PITCH_COAST_DECAY, PITCH_LIMIT,
    YAW_COAST_DECAY,
};

/// Orbit drag state. `yaw`/`pitch` persist across frames; velocities coast
/// after release and decay geometrically.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub active: bool,
    pub pointer_id: Option<i32>,
    pub last_x: f32,
    pub last_y: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub velocity_yaw: f32,
    pub velocity_pitch: f32,
}

impl DragState {
    /// Start a drag session. A second pointer cannot take over a live session.
    pub fn begin(&mut self, x: f32, y: f32, pointer_id: Option<i32>) -> bool {
        if self.active && self.pointer_id.is_some() && self.pointer_id != pointer_id {
            return false;
        }
        self.active = true;
        self.pointer_id = pointer_id;
        self.last_x = x;
        self.last_y = y;
        self.velocity_yaw = 0.0;
        self.velocity_pitch = 0.0;
        true
    }

    /// Apply a pointer move. Returns false when not dragging or when the
    /// pointer does not own the session.
    pub fn drag_to(
        &mut self,
        x: f32,
        y: f32,
        pointer_id: Option<i32>,
        viewport_width: f32,
        viewport_height: f32,
    ) -> bool {
        if !self.active || !self.owns(pointer_id) {
            return false;
        }
        let w = viewport_width.max(1.0);
        let h = viewport_height.max(1.0);
        let d_yaw = (x - self.last_x) / w * DRAG_YAW_SPEED;
        let d_pitch = (y - self.last_y) / h * DRAG_PITCH_SPEED;
        self.last_x = x;
        self.last_y = y;
        if !d_yaw.is_finite() || !d_pitch.is_finite() {
            return false;
        }
        self.yaw += d_yaw;
        let pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.velocity_yaw = d_yaw;
        self.velocity_pitch = pitch - self.pitch;
        self.pitch = pitch;
        true
    }

    /// End the session. Residual velocity is kept for the coast.
    pub fn end(&mut self, pointer_id: Option<i32>) -> bool {
        if !self.active || !self.owns(pointer_id) {
            return false;
        }
        self.active = false;
        self.pointer_id = None;
        true
    }

    /// One frame of inertial coast; no-op while dragging.
    pub fn coast(&mut self) {
        if self.active {
            return;
        }
        self.velocity_yaw *= YAW_COAST_DECAY;
        self.velocity_pitch *= PITCH_COAST_DECAY;
        if self.velocity_yaw.abs() < COAST_EPSILON {
            self.velocity_yaw = 0.0;
        }
        if self.velocity_pitch.abs() < COAST_EPSILON {
            self.velocity_pitch = 0.0;
        }
        self.yaw += self.velocity_yaw;
        self.pitch = (self.pitch + self.velocity_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn is_coasting(&self) -> bool {
        !self.active && (self.velocity_yaw != 0.0 || self.velocity_pitch != 0.0)
    }

    // A session started without an id accepts any pointer.
    fn owns(&self, pointer_id: Option<i32>) -> bool {
        match self.pointer_id {
            None => true,
            Some(owner) => pointer_id == Some(owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coast_decays_to_rest() {
        let mut d = DragState::default();
        d.begin(0.0, 0.0, Some(1));
        d.drag_to(100.0, 0.0, Some(1), 1000.0, 1000.0);
        d.end(Some(1));
        let yaw_at_release = d.yaw;
        for _ in 0..400 {
            d.coast();
        }
        assert!(!d.is_coasting());
        assert!(d.yaw > yaw_at_release);
    }

    #[test]
    fn second_pointer_cannot_steal_session() {
        let mut d = DragState::default();
        assert!(d.begin(0.0, 0.0, Some(1)));
        assert!(!d.begin(5.0, 5.0, Some(2)));
        assert_eq!(d.pointer_id, Some(1));
    }
}
