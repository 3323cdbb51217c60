//! Free-flight debug movement with collision fully disabled.

use motor::{Motor, TickContext, Vec3};

use crate::config::NoClipConfig;
use crate::input::PlayerInputs;
use crate::math::smooth;

pub struct NoClipFeature {
    config: NoClipConfig,
    fly_up: bool,
    fly_down: bool,
    move_direction: Vec3,
}

impl NoClipFeature {
    pub fn new(config: NoClipConfig) -> Self {
        Self {
            config,
            fly_up: false,
            fly_down: false,
            move_direction: Vec3::zeros(),
        }
    }

    pub fn on_enter(&self, motor: &mut Motor) {
        motor.set_capsule_collisions_active(false);
        motor.set_movement_collisions_solving(false);
        motor.set_ground_solving(false);
    }

    pub fn on_exit(&self, motor: &mut Motor) {
        motor.set_capsule_collisions_active(true);
        motor.set_movement_collisions_solving(true);
        motor.set_ground_solving(true);
    }

    pub fn set_inputs(&mut self, inputs: &PlayerInputs) {
        self.fly_up = inputs.fly_up;
        self.fly_down = inputs.fly_down;

        self.move_direction = inputs.camera_rotation * inputs.move_input;
    }

    pub fn update_velocity(&mut self, ctx: &mut TickContext<'_>, velocity: &mut Vec3, dt: f32) {
        if !self.config.enabled {
            return;
        }

        let vertical_input = (self.fly_up as i32 - self.fly_down as i32) as f32;
        let vertical_velocity = ctx.motor.character_up() * vertical_input;

        let combined = self.move_direction + vertical_velocity;
        let target = {
            let len_sq = combined.norm_squared();
            if len_sq > 1.0e-12 {
                combined / len_sq.sqrt() * self.config.speed
            } else {
                Vec3::zeros()
            }
        };
        *velocity = smooth(*velocity, target, self.config.sharpness * dt);
    }
}
