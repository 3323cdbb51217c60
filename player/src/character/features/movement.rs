//! Ground and air locomotion.

use motor::{Motor, TickContext, Vec3};

use crate::config::MovementConfig;
use crate::input::PlayerInputs;
use crate::math::{camera_planar_direction, look_rotation, project_on_plane, smooth};

pub struct MovementFeature {
    config: MovementConfig,
    move_input: Vec3,
}

impl MovementFeature {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            move_input: Vec3::zeros(),
        }
    }

    /// Rotate the raw planar input into the camera's basis (or leave it in
    /// world space when configured so).
    pub fn set_inputs(&mut self, motor: &Motor, inputs: &PlayerInputs) {
        let up = motor.character_up();
        let camera_direction = if self.config.world_space_input {
            Vec3::z()
        } else {
            camera_planar_direction(inputs.camera_rotation, up)
        };
        let camera_rotation = look_rotation(camera_direction, up);

        self.move_input = camera_rotation * inputs.move_input;
    }

    pub fn update_velocity(
        &mut self,
        ctx: &mut TickContext<'_>,
        velocity: &mut Vec3,
        dt: f32,
        gravity: Vec3,
        movement_resistance: f32,
    ) {
        if ctx.motor.grounding().is_stable_on_ground {
            self.stable_movement(ctx.motor, velocity, dt);
        } else {
            self.unstable_movement(ctx.motor, velocity, dt, gravity, movement_resistance);
        }
    }

    /// Walkable ground: re-project the velocity onto the surface tangent
    /// (preserving speed) and exponentially converge on the input target.
    fn stable_movement(&self, motor: &Motor, velocity: &mut Vec3, dt: f32) {
        if !self.config.stable.enabled {
            return;
        }

        let ground_normal = motor.grounding().ground_normal;
        *velocity = motor.direction_tangent_to_surface(*velocity, ground_normal) * velocity.norm();

        let target = motor.direction_tangent_to_surface(self.move_input, ground_normal)
            * self.config.stable.max_speed;

        *velocity = smooth(*velocity, target, self.config.stable.sharpness * dt);
    }

    /// Airborne (or on ground too steep to stand on): accelerate toward the
    /// input in the plane perpendicular to gravity, with air control damped by
    /// `movement_resistance` right after a wall jump.
    fn unstable_movement(
        &self,
        motor: &Motor,
        velocity: &mut Vec3,
        dt: f32,
        gravity: Vec3,
        movement_resistance: f32,
    ) {
        if !self.config.unstable.enabled {
            return;
        }
        if self.move_input.norm_squared() <= 0.0 {
            return;
        }

        let mut target = self.move_input * self.config.unstable.max_speed;

        // Prevent climbing unstable slopes with air movement: remove the
        // target's component pushing into the slope.
        let grounding = motor.grounding();
        if grounding.found_any_ground {
            let obstruction_normal =
                motor.direction_tangent_to_surface(grounding.ground_normal, motor.character_up());
            target = project_on_plane(target, obstruction_normal);
        }

        let mut velocity_change = project_on_plane(target - *velocity, gravity);
        velocity_change += velocity_change * (self.config.unstable.acceleration * dt);
        velocity_change *= 1.0 - movement_resistance;
        *velocity += velocity_change;
    }
}
