//! Air drag.

use motor::{TickContext, Vec3};

use crate::config::DragConfig;

pub struct DragFeature {
    config: DragConfig,
}

impl DragFeature {
    pub fn new(config: DragConfig) -> Self {
        Self { config }
    }

    pub fn update_velocity(&self, ctx: &mut TickContext<'_>, velocity: &mut Vec3, dt: f32) {
        if !ctx.motor.grounding().is_stable_on_ground {
            // Deliberately 1/(1 + drag*dt) rather than the engine-style
            // (1 - drag*dt): stays stable for any dt.
            *velocity *= 1.0 / (1.0 + self.config.drag * dt);
        }
    }
}
