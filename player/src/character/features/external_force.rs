//! Externally injected impulses (knockback, launch pads).

use motor::Vec3;

/// Accumulates impulses between ticks and applies the sum exactly once.
#[derive(Default)]
pub struct ExternalForceFeature {
    pending_velocity: Vec3,
}

impl ExternalForceFeature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an impulse; applied on the next velocity update, never twice.
    pub fn add_velocity(&mut self, velocity: Vec3) {
        self.pending_velocity += velocity;
    }

    pub fn update_velocity(&mut self, velocity: &mut Vec3) {
        if self.pending_velocity.norm_squared() > 0.0 {
            *velocity += self.pending_velocity;
            self.pending_velocity = Vec3::zeros();
        }
    }
}
