//! Character orientation: toward input, toward movement, and toward the
//! ground surface.

use motor::{Motor, OverlapHits, Quat, QueryFilter, TickContext, Vec3};

use crate::config::RotationConfig;
use crate::input::PlayerInputs;
use crate::math::{
    camera_planar_direction, look_rotation, look_rotation_up, rotate_towards, spherical_smooth,
};

pub struct RotationFeature {
    config: RotationConfig,
    look_input: Vec3,
    last_move_direction: Vec3,
    scratch: OverlapHits,
}

impl RotationFeature {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            look_input: Vec3::z(),
            last_move_direction: Vec3::z(),
            scratch: OverlapHits::default(),
        }
    }

    pub fn set_inputs(&mut self, motor: &Motor, inputs: &PlayerInputs) {
        let up = motor.character_up();
        let camera_direction = camera_planar_direction(inputs.camera_rotation, up);
        self.look_input = camera_direction;

        let camera_rotation = look_rotation_up(up, camera_direction);
        let move_direction = camera_rotation * inputs.move_input;
        if move_direction.norm_squared() > 0.0 {
            self.last_move_direction = move_direction.normalize();
        }
    }

    pub fn update_rotation(
        &mut self,
        ctx: &mut TickContext<'_>,
        rotation: &mut Quat,
        dt: f32,
        filter: &QueryFilter<'_>,
    ) {
        let old_forward = *rotation * Vec3::z();

        if self.config.orient_towards_input.enabled || self.config.orient_towards_movement.enabled {
            *rotation = look_rotation(self.look_input, ctx.motor.character_up());
        }

        if self.config.orient_towards_ground.enabled {
            self.orient_towards_ground(ctx, rotation, dt, filter);
        }

        if self.config.orient_towards_movement.enabled {
            let direction = spherical_smooth(
                old_forward,
                self.last_move_direction,
                self.config.orient_towards_movement.sharpness * dt,
            );
            *rotation = look_rotation_up(*rotation * Vec3::y(), direction);
        }
    }

    /// Iteratively align the up axis with the local surface, each step capped
    /// so the alignment spreads over several frames instead of snapping.
    fn orient_towards_ground(
        &mut self,
        ctx: &mut TickContext<'_>,
        rotation: &mut Quat,
        dt: f32,
        filter: &QueryFilter<'_>,
    ) {
        let grounding = ctx.motor.grounding();
        if !(grounding.found_any_ground && grounding.is_stable_on_ground) {
            return;
        }
        if ctx.motor.base_velocity().norm_squared() <= 0.0 {
            return;
        }

        let iterations = self.config.orient_towards_ground.max_iterations.max(1);
        let max_step =
            self.config.orient_towards_ground.max_degree_change / iterations as f32 * dt;

        for _ in 0..iterations {
            let character_up = *rotation * Vec3::y();

            let Some(ground_normal) = self.depenetration_normal(ctx, character_up, *rotation, filter)
            else {
                break;
            };

            let Some(delta) = Quat::rotation_between(&character_up, &ground_normal) else {
                break;
            };
            *rotation = rotate_towards(*rotation, delta * *rotation, max_step);
        }
    }

    /// Surface normal derived from overlapping colliders: penetration vectors
    /// within the stable slope limit, depth-weighted and normalized.
    fn depenetration_normal(
        &mut self,
        ctx: &mut TickContext<'_>,
        character_up: Vec3,
        rotation: Quat,
        filter: &QueryFilter<'_>,
    ) -> Option<Vec3> {
        let motor = &*ctx.motor;
        let capsule = motor.capsule();
        let base = motor.transient_position();

        let overlap_center =
            base + character_up * self.config.orient_towards_ground.overlap_vertical_offset;
        ctx.world
            .overlap_sphere(overlap_center, capsule.radius, filter, &mut self.scratch);

        let depenetration_base = base
            + character_up * self.config.orient_towards_ground.depenetration_vertical_offset;
        let center = depenetration_base + rotation * (Vec3::y() * capsule.center_y);
        let pose = motor::Iso::from_parts(
            nalgebra::Translation3::new(center.x, center.y, center.z),
            rotation,
        );

        let cos_limit = motor.config().max_stable_slope_deg.to_radians().cos();
        let mut accumulated = Vec3::zeros();
        for &collider in self.scratch.as_slice() {
            if let Some(pen) = ctx.world.capsule_penetration(capsule, pose, collider) {
                if character_up.dot(&pen.direction) >= cos_limit {
                    accumulated += pen.direction * pen.depth;
                }
            }
        }

        let len = accumulated.norm();
        if len <= 1.0e-6 {
            return None;
        }
        Some(accumulated / len)
    }
}
