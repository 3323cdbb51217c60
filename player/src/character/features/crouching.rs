//! Crouching: immediate capsule/mesh shrink, obstruction-checked restore.

use motor::{CapsuleSpec, Motor, QueryFilter, TickContext, Vec3};

use crate::config::CrouchingConfig;
use crate::input::PlayerInputs;

pub struct CrouchingFeature {
    config: CrouchingConfig,
    uncrouched_capsule: CapsuleSpec,
    uncrouched_mesh_scale: Vec3,
    mesh_scale: Vec3,
    should_be_crouching: bool,
    is_crouching: bool,
}

impl CrouchingFeature {
    /// Captures the standing capsule and mesh scale to restore on uncrouch.
    pub fn new(config: CrouchingConfig, motor: &Motor) -> Self {
        Self {
            config,
            uncrouched_capsule: motor.capsule(),
            uncrouched_mesh_scale: Vec3::new(1.0, 1.0, 1.0),
            mesh_scale: Vec3::new(1.0, 1.0, 1.0),
            should_be_crouching: false,
            is_crouching: false,
        }
    }

    /// Mesh scale the host should apply to the character's visual root.
    #[inline]
    pub fn mesh_scale(&self) -> Vec3 {
        self.mesh_scale
    }

    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.is_crouching
    }

    /// Crouching engages immediately; uncrouching only records the wish and is
    /// resolved after the tick, when the capsule can be overlap-tested.
    pub fn set_inputs(&mut self, motor: &mut Motor, inputs: &PlayerInputs) {
        if !self.config.enabled {
            return;
        }

        if inputs.crouch_down {
            self.should_be_crouching = true;

            if !self.is_crouching {
                self.is_crouching = true;
                apply_capsule(motor, self.config.capsule);
                self.mesh_scale = self.config.mesh_scale;
            }
        } else if inputs.crouch_up {
            self.should_be_crouching = false;
        }
    }

    /// Provisionally restore the standing capsule and keep it only when
    /// nothing occupies the reclaimed volume.
    pub fn after_update(&mut self, ctx: &mut TickContext<'_>, filter: &QueryFilter<'_>) {
        if self.is_crouching && !self.should_be_crouching {
            apply_capsule(ctx.motor, self.uncrouched_capsule);

            if ctx.motor.character_overlap(ctx.world, filter) > 0 {
                apply_capsule(ctx.motor, self.config.capsule);
            } else {
                self.mesh_scale = self.uncrouched_mesh_scale;
                self.is_crouching = false;
            }
        }
    }
}

fn apply_capsule(motor: &mut Motor, capsule: CapsuleSpec) {
    motor.set_capsule_dimensions(capsule.radius, capsule.height, capsule.center_y);
}
