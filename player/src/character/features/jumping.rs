//! Ground, double and wall jumps.

use motor::{Motor, QueryFilter, TickContext, Vec3};

use crate::config::JumpingConfig;
use crate::input::PlayerInputs;
use crate::math::project;

/// How long after an air jump the resistance curve stays in effect (seconds).
const AIR_JUMP_RESISTANCE_WINDOW: f32 = 1.0;

pub struct JumpingFeature {
    config: JumpingConfig,
    jump_requested: bool,
    jump_consumed: bool,
    double_jump_consumed: bool,
    jumped_this_frame: bool,
    can_wall_jump: bool,
    wall_jump_normal: Vec3,
    /// Seconds since the last wall or double jump; `None` until one happens.
    /// Keys the air-control resistance curve while airborne.
    time_since_air_jump: Option<f32>,
    movement_resistance: f32,
}

impl JumpingFeature {
    pub fn new(config: JumpingConfig) -> Self {
        Self {
            config,
            jump_requested: false,
            jump_consumed: false,
            double_jump_consumed: false,
            jumped_this_frame: false,
            can_wall_jump: false,
            wall_jump_normal: Vec3::y(),
            time_since_air_jump: None,
            movement_resistance: 0.0,
        }
    }

    /// Air-control damping fed back into the movement feature.
    #[inline]
    pub fn movement_resistance(&self) -> f32 {
        self.movement_resistance
    }

    pub fn set_inputs(&mut self, inputs: &PlayerInputs) {
        if inputs.jump_down {
            self.jump_requested = true;
        }
    }

    fn on_jumping_ground(&self, motor: &Motor) -> bool {
        if self.config.slope_jumping {
            motor.grounding().found_any_ground
        } else {
            motor.grounding().is_stable_on_ground
        }
    }

    pub fn update_velocity(
        &mut self,
        ctx: &mut TickContext<'_>,
        velocity: &mut Vec3,
        dt: f32,
        filter: &QueryFilter<'_>,
    ) {
        if !self.config.enabled {
            return;
        }

        self.jumped_this_frame = false;
        if let Some(t) = self.time_since_air_jump.as_mut() {
            *t += dt;
        }

        // Sense nearby walls with an inflated capsule while fully airborne.
        if self.config.wall_jump.enabled && !ctx.motor.grounding().found_any_ground {
            let inflate = self.config.wall_jump.inflate_radius;
            if let Some(average_normal) =
                ctx.motor
                    .overlap_with_average_normal(ctx.world, filter, inflate)
            {
                self.wall_jump_normal = average_normal
                    .lerp(&ctx.motor.character_up(), self.config.wall_jump.upward_contribution);
                self.can_wall_jump = true;
            }
        }

        if self.jump_requested {
            // Double jump: only once per airtime, only after the first jump,
            // and never when a wall jump is available this tick.
            if self.config.double_jump.enabled
                && !self.can_wall_jump
                && self.jump_consumed
                && !self.double_jump_consumed
                && !self.on_jumping_ground(ctx.motor)
            {
                ctx.motor.force_unground();
                Self::add_jump_velocity(velocity, ctx.motor.character_up(), self.config.jump_height);

                self.jump_requested = false;
                self.double_jump_consumed = true;
                self.jumped_this_frame = true;
                self.time_since_air_jump = Some(0.0);
            }

            if self.can_wall_jump || (!self.jump_consumed && self.on_jumping_ground(ctx.motor)) {
                let mut jump_direction = ctx.motor.character_up();
                if self.can_wall_jump {
                    self.time_since_air_jump = Some(0.0);
                    jump_direction = self.wall_jump_normal;
                } else if ctx.motor.grounding().found_any_ground
                    && !ctx.motor.grounding().is_stable_on_ground
                {
                    // Jumping off an unstable slope launches along its normal.
                    jump_direction = ctx.motor.grounding().ground_normal;
                }

                ctx.motor.force_unground();
                Self::add_jump_velocity(velocity, jump_direction, self.config.jump_height);

                self.jump_requested = false;
                self.jump_consumed = true;
                self.jumped_this_frame = true;
            }
        }

        // Wall contact only counts for the tick that detected it.
        self.can_wall_jump = false;
    }

    pub fn after_update(&mut self, ctx: &mut TickContext<'_>, _dt: f32) {
        if !self.config.enabled {
            return;
        }

        // Back on jumpable ground with no jump this tick: refill both jumps.
        if self.on_jumping_ground(ctx.motor) && !self.jumped_this_frame {
            self.double_jump_consumed = false;
            self.jump_consumed = false;
        }

        if ctx.motor.grounding().is_stable_on_ground {
            self.movement_resistance = 0.0;
        } else if let Some(elapsed) = self.time_since_air_jump {
            if elapsed <= AIR_JUMP_RESISTANCE_WINDOW {
                self.movement_resistance =
                    self.config.wall_jump.movement_resistance.sample(elapsed);
            }
        }
    }

    /// Add `direction * height` while cancelling the velocity's existing
    /// component along `direction`, so jump height never depends on the
    /// current vertical speed.
    fn add_jump_velocity(velocity: &mut Vec3, direction: Vec3, height: f32) {
        *velocity += direction * height - project(*velocity, direction);
    }
}
