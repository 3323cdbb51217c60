//! Gravity integration and optional up-axis alignment against it.

use motor::{Quat, TickContext, Vec3};

use crate::config::GravityConfig;

pub struct GravityFeature {
    config: GravityConfig,
}

impl GravityFeature {
    pub fn new(config: GravityConfig) -> Self {
        Self { config }
    }

    /// The gravity vector shared with the other features.
    #[inline]
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    pub fn update_rotation(&self, rotation: &mut Quat) {
        if !self.config.enabled || !self.config.orient_towards_gravity {
            return;
        }

        let character_up = *rotation * Vec3::y();
        if let Some(delta) = Quat::rotation_between(&character_up, &-self.config.gravity) {
            *rotation = delta * *rotation;
        }
    }

    pub fn update_velocity(&self, ctx: &mut TickContext<'_>, velocity: &mut Vec3, dt: f32) {
        if !self.config.enabled {
            return;
        }
        if !ctx.motor.grounding().is_stable_on_ground {
            *velocity += self.config.gravity * dt;
        }
    }
}
