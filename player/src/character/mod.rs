//! The character controller: owns the feature set and dispatches the motor's
//! per-tick protocol to whichever features the current mode activates.

pub mod features;

use motor::{
    CharacterBehavior, ColliderHandle, HitStabilityReport, Motor, MoveHit, Quat, QueryFilter,
    TickContext, Vec3,
};

use crate::config::CharacterConfig;
use crate::input::PlayerInputs;
use features::{
    ChargingFeature, CrouchingFeature, DragFeature, ExternalForceFeature, GravityFeature,
    JumpingFeature, LandingEventsFeature, MovementFeature, NoClipFeature, RotationFeature,
};

/// Mutually exclusive control modes. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterMode {
    Default,
    Charging,
    NoClip,
}

/// Owns the features and the mode state machine, and implements the motor's
/// callback protocol by fanning each phase out to the active mode's features
/// in a fixed order.
pub struct CharacterController {
    movement: MovementFeature,
    rotation: RotationFeature,
    drag: DragFeature,
    gravity: GravityFeature,
    jumping: JumpingFeature,
    charging: ChargingFeature,
    crouching: CrouchingFeature,
    external_force: ExternalForceFeature,
    landing_events: LandingEventsFeature,
    no_clip: NoClipFeature,

    mode: CharacterMode,
    ignored_colliders: Vec<ColliderHandle>,
}

impl CharacterController {
    /// The motor reference is only used to capture initial capsule dimensions.
    pub fn new(config: CharacterConfig, motor: &Motor) -> Self {
        Self {
            movement: MovementFeature::new(config.movement),
            rotation: RotationFeature::new(config.rotation),
            drag: DragFeature::new(config.drag),
            gravity: GravityFeature::new(config.gravity),
            jumping: JumpingFeature::new(config.jumping),
            charging: ChargingFeature::new(config.charging),
            crouching: CrouchingFeature::new(config.crouching, motor),
            external_force: ExternalForceFeature::new(),
            landing_events: LandingEventsFeature::new(),
            no_clip: NoClipFeature::new(config.no_clip),
            mode: CharacterMode::Default,
            ignored_colliders: Vec::new(),
        }
    }

    #[inline]
    pub fn current_mode(&self) -> CharacterMode {
        self.mode
    }

    #[inline]
    pub fn gravity(&self) -> Vec3 {
        self.gravity.gravity()
    }

    /// Air-control damping currently reported by the jumping feature.
    #[inline]
    pub fn movement_resistance(&self) -> f32 {
        self.jumping.movement_resistance()
    }

    /// Mesh scale the host should apply to the character's visual root.
    #[inline]
    pub fn mesh_scale(&self) -> Vec3 {
        self.crouching.mesh_scale()
    }

    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.crouching.is_crouching()
    }

    /// Register one of the character's own colliders so every query the
    /// controller issues skips it.
    pub fn ignore_collider(&mut self, collider: ColliderHandle) {
        if !self.ignored_colliders.contains(&collider) {
            self.ignored_colliders.push(collider);
        }
    }

    /// Queue an external impulse. Only honored in the default mode.
    pub fn add_velocity(&mut self, velocity: Vec3) {
        if self.mode == CharacterMode::Default {
            self.external_force.add_velocity(velocity);
        }
    }

    /// Feed one input snapshot: resolve mode transitions first, then fan the
    /// snapshot out to the features of the (possibly new) active mode.
    pub fn set_inputs(&mut self, motor: &mut Motor, inputs: &PlayerInputs) {
        if inputs.no_clip_down {
            match self.mode {
                CharacterMode::Default => self.set_state(motor, CharacterMode::NoClip),
                CharacterMode::NoClip => self.set_state(motor, CharacterMode::Default),
                CharacterMode::Charging => {}
            }
        }
        if inputs.charge_down {
            self.set_state(motor, CharacterMode::Charging);
        }

        self.rotation.set_inputs(motor, inputs);

        match self.mode {
            CharacterMode::Default => {
                self.movement.set_inputs(motor, inputs);
                self.jumping.set_inputs(inputs);
                self.crouching.set_inputs(motor, inputs);
            }
            CharacterMode::NoClip => self.no_clip.set_inputs(inputs),
            CharacterMode::Charging => {}
        }
    }

    /// The only transition entry point: exit hook of the old mode, then the
    /// assignment, then the enter hook of the new mode. Observers never see a
    /// mode paired with another mode's feature activation.
    pub fn set_state(&mut self, motor: &mut Motor, new_mode: CharacterMode) {
        let last_mode = self.mode;
        self.on_state_exit(motor, last_mode);
        self.mode = new_mode;
        self.on_state_enter(motor, new_mode);
        log::debug!("character mode: {last_mode:?} -> {new_mode:?}");
    }

    fn on_state_enter(&mut self, motor: &mut Motor, mode: CharacterMode) {
        match mode {
            CharacterMode::Default => {}
            CharacterMode::Charging => {
                if !self.charging.on_enter(motor) {
                    // Charging is disabled: hand control straight back.
                    self.set_state(motor, CharacterMode::Default);
                }
            }
            CharacterMode::NoClip => self.no_clip.on_enter(motor),
        }
    }

    fn on_state_exit(&mut self, motor: &mut Motor, mode: CharacterMode) {
        match mode {
            CharacterMode::Default => {}
            CharacterMode::Charging => {}
            CharacterMode::NoClip => self.no_clip.on_exit(motor),
        }
    }
}

impl CharacterBehavior for CharacterController {
    fn before_update(&mut self, _ctx: &mut TickContext<'_>, dt: f32) {
        match self.mode {
            CharacterMode::Charging => self.charging.before_update(dt),
            CharacterMode::Default | CharacterMode::NoClip => {}
        }
    }

    fn update_rotation(&mut self, ctx: &mut TickContext<'_>, rotation: &mut Quat, dt: f32) {
        match self.mode {
            CharacterMode::Default | CharacterMode::NoClip => {
                let ignored = &self.ignored_colliders;
                let pred = |c| !ignored.contains(&c);
                self.rotation
                    .update_rotation(ctx, rotation, dt, &QueryFilter::with_predicate(&pred));
                self.gravity.update_rotation(rotation);
            }
            CharacterMode::Charging => {}
        }
    }

    fn update_velocity(&mut self, ctx: &mut TickContext<'_>, velocity: &mut Vec3, dt: f32) {
        match self.mode {
            CharacterMode::Default => {
                let gravity = self.gravity.gravity();
                let resistance = self.jumping.movement_resistance();
                self.movement
                    .update_velocity(ctx, velocity, dt, gravity, resistance);

                let ignored = &self.ignored_colliders;
                let pred = |c| !ignored.contains(&c);
                self.jumping
                    .update_velocity(ctx, velocity, dt, &QueryFilter::with_predicate(&pred));

                self.gravity.update_velocity(ctx, velocity, dt);
                self.drag.update_velocity(ctx, velocity, dt);
                self.external_force.update_velocity(velocity);
            }
            CharacterMode::Charging => {
                if !self.charging.enabled() {
                    self.set_state(ctx.motor, CharacterMode::Default);
                    return;
                }
                let gravity = self.gravity.gravity();
                self.charging.update_velocity(velocity, dt, gravity);
            }
            CharacterMode::NoClip => self.no_clip.update_velocity(ctx, velocity, dt),
        }
    }

    fn on_movement_hit(
        &mut self,
        _ctx: &mut TickContext<'_>,
        hit: &MoveHit,
        report: &mut HitStabilityReport,
    ) {
        match self.mode {
            CharacterMode::Charging => self.charging.on_movement_hit(hit, report),
            CharacterMode::Default | CharacterMode::NoClip => {}
        }
    }

    fn post_grounding_update(&mut self, ctx: &mut TickContext<'_>, _dt: f32) {
        self.landing_events.post_grounding_update(ctx);
    }

    fn after_update(&mut self, ctx: &mut TickContext<'_>, dt: f32) {
        match self.mode {
            CharacterMode::Default => {
                self.jumping.after_update(ctx, dt);

                let ignored = &self.ignored_colliders;
                let pred = |c| !ignored.contains(&c);
                self.crouching
                    .after_update(ctx, &QueryFilter::with_predicate(&pred));
            }
            CharacterMode::Charging => {
                if self.charging.after_update(dt) {
                    self.set_state(ctx.motor, CharacterMode::Default);
                }
            }
            CharacterMode::NoClip => {}
        }
    }

    fn is_collider_valid(&self, collider: ColliderHandle) -> bool {
        !self.ignored_colliders.contains(&collider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CharacterConfig;
    use motor::{
        CapsuleSpec, Motor, MotorConfig, StaticWorld, cuboid_from_pose, plane_from_pose,
    };

    const DT: f32 = 0.02;

    fn standing_capsule() -> CapsuleSpec {
        CapsuleSpec::new(0.5, 2.0, 1.0)
    }

    fn rig_with(
        world_shapes: Vec<motor::StaticShape>,
        config: CharacterConfig,
        spawn: Vec3,
    ) -> (StaticWorld, Motor, CharacterController) {
        let world = StaticWorld::new(world_shapes);
        let motor = Motor::new(
            MotorConfig::default(),
            standing_capsule(),
            spawn,
            Quat::identity(),
        );
        let controller = CharacterController::new(config, &motor);
        (world, motor, controller)
    }

    fn flat_rig() -> (StaticWorld, Motor, CharacterController) {
        rig_with(
            vec![plane_from_pose(Quat::identity(), Vec3::zeros(), 0.0)],
            CharacterConfig::default(),
            Vec3::new(0.0, 0.02, 0.0),
        )
    }

    fn step(
        world: &StaticWorld,
        motor: &mut Motor,
        controller: &mut CharacterController,
        inputs: &PlayerInputs,
        dt: f32,
    ) {
        controller.set_inputs(motor, inputs);
        motor.tick(world, controller, dt);
    }

    fn settle(world: &StaticWorld, motor: &mut Motor, controller: &mut CharacterController) {
        let idle = PlayerInputs::default();
        for _ in 0..5 {
            step(world, motor, controller, &idle, DT);
        }
        assert!(motor.grounding().is_stable_on_ground);
    }

    #[test]
    fn ground_jump_reaches_exactly_the_configured_height_velocity() {
        let (world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);
        assert_eq!(motor.base_velocity(), Vec3::zeros());

        let jump = PlayerInputs {
            jump_down: true,
            jump_held: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &jump, DT);

        // Flat ground, zero prior velocity: post-jump vertical speed is the
        // configured jump height exactly (gravity skips the launch tick).
        assert!((motor.base_velocity().y - 3.0).abs() < 1.0e-5);
        assert!(!motor.grounding().found_any_ground);
    }

    #[test]
    fn double_jump_fires_once_and_third_requests_are_ignored() {
        let mut config = CharacterConfig::default();
        config.jumping.wall_jump.enabled = false;
        let (world, mut motor, mut controller) = rig_with(
            vec![plane_from_pose(Quat::identity(), Vec3::zeros(), 0.0)],
            config,
            Vec3::new(0.0, 0.02, 0.0),
        );
        settle(&world, &mut motor, &mut controller);

        let idle = PlayerInputs::default();
        let jump = PlayerInputs {
            jump_down: true,
            jump_held: true,
            ..PlayerInputs::default()
        };

        step(&world, &mut motor, &mut controller, &jump, DT);
        let after_first = motor.base_velocity().y;
        assert!((after_first - 3.0).abs() < 1.0e-5);

        step(&world, &mut motor, &mut controller, &idle, DT);

        // Second request mid-air: double jump resets vertical speed to the
        // full jump height again (minus the same-tick gravity and drag).
        step(&world, &mut motor, &mut controller, &jump, DT);
        let after_double = motor.base_velocity().y;
        assert!(after_double > 2.3);

        // Third request mid-air: no jump left, free fall continues.
        step(&world, &mut motor, &mut controller, &jump, DT);
        let after_third = motor.base_velocity().y;
        assert!(after_third < after_double);
        assert!(after_third > after_double - 1.0);
    }

    #[test]
    fn charge_locks_horizontal_speed_then_stops_and_reverts() {
        let (world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);

        let dt = 0.1;
        let charge = PlayerInputs {
            charge_down: true,
            ..PlayerInputs::default()
        };
        let idle = PlayerInputs::default();

        step(&world, &mut motor, &mut controller, &charge, dt);
        assert_eq!(controller.current_mode(), CharacterMode::Charging);

        // speed=15, max_duration=1.5: locked at exactly 15 until the timeout
        // tick has passed, zero afterwards.
        let horizontal = |motor: &Motor| {
            let v = motor.base_velocity();
            (v.x * v.x + v.z * v.z).sqrt()
        };
        assert!((horizontal(&motor) - 15.0).abs() < 1.0e-3);

        for _ in 0..15 {
            step(&world, &mut motor, &mut controller, &idle, dt);
            if controller.current_mode() == CharacterMode::Charging
                && horizontal(&motor) > 1.0e-3
            {
                assert!((horizontal(&motor) - 15.0).abs() < 1.0e-3);
            }
        }

        // Timeout reached: stopped sub-state, gravity only.
        step(&world, &mut motor, &mut controller, &idle, dt);
        assert_eq!(controller.current_mode(), CharacterMode::Charging);
        assert!(horizontal(&motor) < 1.0e-3);

        // After the stopped time elapses, control reverts to Default.
        for _ in 0..12 {
            step(&world, &mut motor, &mut controller, &idle, dt);
        }
        assert_eq!(controller.current_mode(), CharacterMode::Default);
    }

    #[test]
    fn charge_stops_early_on_a_head_on_wall() {
        let (mut shapes, spawn) = (
            vec![plane_from_pose(Quat::identity(), Vec3::zeros(), 0.0)],
            Vec3::new(0.0, 0.02, 0.0),
        );
        // Wall 3m ahead along +z (the default facing).
        shapes.push(cuboid_from_pose(
            Vec3::new(5.0, 3.0, 0.25),
            Vec3::new(0.0, 0.0, 3.75),
            Quat::identity(),
        ));
        let (world, mut motor, mut controller) =
            rig_with(shapes, CharacterConfig::default(), spawn);
        settle(&world, &mut motor, &mut controller);

        let charge = PlayerInputs {
            charge_down: true,
            ..PlayerInputs::default()
        };
        let idle = PlayerInputs::default();
        step(&world, &mut motor, &mut controller, &charge, DT);

        // 3m at 15 m/s: the wall interrupts well before the 1.5s timeout.
        for _ in 0..20 {
            step(&world, &mut motor, &mut controller, &idle, DT);
        }
        let v = motor.base_velocity();
        assert!((v.x * v.x + v.z * v.z).sqrt() < 1.0e-3);
        assert_eq!(controller.current_mode(), CharacterMode::Charging);
        // Stopped short of the wall face at z = 3.5.
        assert!(motor.transient_position().z < 3.1);
    }

    #[test]
    fn charging_disabled_falls_straight_back_to_default() {
        let mut config = CharacterConfig::default();
        config.charging.enabled = false;
        let (world, mut motor, mut controller) = rig_with(
            vec![plane_from_pose(Quat::identity(), Vec3::zeros(), 0.0)],
            config,
            Vec3::new(0.0, 0.02, 0.0),
        );
        settle(&world, &mut motor, &mut controller);

        let charge = PlayerInputs {
            charge_down: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &charge, DT);
        assert_eq!(controller.current_mode(), CharacterMode::Default);
    }

    #[test]
    fn crouch_shrinks_immediately_and_uncrouch_waits_for_clearance() {
        let (mut world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);

        let crouch = PlayerInputs {
            crouch_down: true,
            crouch_held: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &crouch, DT);
        assert!(controller.is_crouching());
        assert_eq!(motor.capsule().height, 1.0);
        assert_eq!(controller.mesh_scale(), Vec3::new(1.0, 0.5, 1.0));

        // A slab right above the crouched character blocks standing up.
        world.push(cuboid_from_pose(
            Vec3::new(2.0, 0.2, 2.0),
            Vec3::new(0.0, 1.4, 0.0),
            Quat::identity(),
        ));

        let uncrouch = PlayerInputs {
            crouch_up: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &uncrouch, DT);
        assert!(controller.is_crouching());
        assert_eq!(motor.capsule().height, 1.0);

        // Still pinned on later ticks while the obstruction remains.
        let idle = PlayerInputs::default();
        for _ in 0..3 {
            step(&world, &mut motor, &mut controller, &idle, DT);
            assert!(controller.is_crouching());
        }
    }

    #[test]
    fn uncrouch_restores_capsule_and_mesh_when_clear() {
        let (world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);

        let crouch = PlayerInputs {
            crouch_down: true,
            crouch_held: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &crouch, DT);
        assert!(controller.is_crouching());

        let uncrouch = PlayerInputs {
            crouch_up: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &uncrouch, DT);
        assert!(!controller.is_crouching());
        assert_eq!(motor.capsule().height, 2.0);
        assert_eq!(controller.mesh_scale(), Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn no_clip_toggles_collision_solving_both_ways() {
        let mut shapes = vec![plane_from_pose(Quat::identity(), Vec3::zeros(), 0.0)];
        shapes.push(cuboid_from_pose(
            Vec3::new(0.25, 5.0, 5.0),
            Vec3::new(2.0, 0.0, 0.0),
            Quat::identity(),
        ));
        let (world, mut motor, mut controller) = rig_with(
            shapes,
            CharacterConfig::default(),
            Vec3::new(0.0, 0.02, 0.0),
        );
        settle(&world, &mut motor, &mut controller);

        let toggle = PlayerInputs {
            no_clip_down: true,
            ..PlayerInputs::default()
        };
        // Move input +x so the no-clip velocity points at the wall.
        let fly_at_wall = PlayerInputs::new(Vec3::new(1.0, 0.0, 0.0), Quat::identity());

        step(&world, &mut motor, &mut controller, &toggle, DT);
        assert_eq!(controller.current_mode(), CharacterMode::NoClip);

        for _ in 0..120 {
            step(&world, &mut motor, &mut controller, &fly_at_wall, DT);
        }
        // Sailed through the wall at x = 2.
        assert!(motor.transient_position().x > 3.0);

        // Toggle back: collision is restored and the wall blocks again.
        step(&world, &mut motor, &mut controller, &toggle, DT);
        assert_eq!(controller.current_mode(), CharacterMode::Default);

        motor.set_position(Vec3::new(0.0, 0.02, 0.0));
        motor.set_base_velocity(Vec3::zeros());
        let run_at_wall = PlayerInputs::new(Vec3::new(1.0, 0.0, 0.0), Quat::identity());
        for _ in 0..200 {
            step(&world, &mut motor, &mut controller, &run_at_wall, DT);
        }
        assert!(motor.transient_position().x < 1.75);
    }

    #[test]
    fn no_clip_toggle_is_ignored_while_charging() {
        let (world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);

        let charge = PlayerInputs {
            charge_down: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &charge, DT);
        assert_eq!(controller.current_mode(), CharacterMode::Charging);

        let toggle = PlayerInputs {
            no_clip_down: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &toggle, DT);
        assert_eq!(controller.current_mode(), CharacterMode::Charging);
    }

    #[test]
    fn no_clip_velocity_converges_to_the_configured_speed() {
        let (world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);

        let toggle = PlayerInputs {
            no_clip_down: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &toggle, DT);

        // Forward input plus fly-up: target is the normalized combination
        // scaled to the no-clip speed.
        let fly = PlayerInputs {
            fly_up: true,
            ..PlayerInputs::new(Vec3::new(0.0, 0.0, 1.0), Quat::identity())
        };
        for _ in 0..300 {
            step(&world, &mut motor, &mut controller, &fly, DT);
        }

        let v = motor.base_velocity();
        assert!((v.norm() - 10.0).abs() < 0.05);
        assert!((v.y - v.z).abs() < 0.05); // 45 degrees up-forward
    }

    #[test]
    fn external_impulses_apply_once_and_only_in_default_mode() {
        let (world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);

        controller.add_velocity(Vec3::new(6.0, 0.0, 0.0));
        let idle = PlayerInputs::default();
        step(&world, &mut motor, &mut controller, &idle, DT);
        let first = motor.base_velocity().x;
        assert!(first > 5.5);

        // Not applied a second time.
        step(&world, &mut motor, &mut controller, &idle, DT);
        assert!(motor.base_velocity().x < first);

        // Queued impulses are discarded outside Default mode.
        let toggle = PlayerInputs {
            no_clip_down: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &toggle, DT);
        let before = motor.base_velocity();
        controller.add_velocity(Vec3::new(50.0, 0.0, 0.0));
        step(&world, &mut motor, &mut controller, &idle, DT);
        assert!(motor.base_velocity().x <= before.x.abs() + 1.0e-3);
    }

    #[test]
    fn wall_jump_pushes_away_from_the_wall_and_engages_resistance() {
        // Wall to the right of an airborne character, inside the probe range.
        let shapes = vec![
            plane_from_pose(Quat::identity(), Vec3::zeros(), 0.0),
            cuboid_from_pose(
                Vec3::new(0.25, 8.0, 5.0),
                Vec3::new(1.8, 0.0, 0.0),
                Quat::identity(),
            ),
        ];
        let (world, mut motor, mut controller) = rig_with(
            shapes,
            CharacterConfig::default(),
            Vec3::new(1.0, 3.0, 0.0),
        );
        motor.set_base_velocity(Vec3::new(0.0, -2.0, 0.0));
        assert!(controller.movement_resistance() == 0.0);

        let jump = PlayerInputs {
            jump_down: true,
            jump_held: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &jump, DT);

        let v = motor.base_velocity();
        assert!(v.x < -0.5, "wall jump should push away from the wall");
        assert!(v.y > 0.5, "wall jump should have an upward component");
        assert!(controller.movement_resistance() > 0.9);

        // Landing clears the resistance.
        let idle = PlayerInputs::default();
        for _ in 0..100 {
            step(&world, &mut motor, &mut controller, &idle, DT);
        }
        assert!(motor.grounding().is_stable_on_ground);
        assert_eq!(controller.movement_resistance(), 0.0);
    }

    #[test]
    fn inputs_only_reach_features_of_the_active_mode() {
        let (world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);

        // Press jump while in no-clip: the jumping feature must not latch it.
        let toggle = PlayerInputs {
            no_clip_down: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &toggle, DT);

        let jump_in_noclip = PlayerInputs {
            jump_down: true,
            jump_held: true,
            ..PlayerInputs::default()
        };
        step(&world, &mut motor, &mut controller, &jump_in_noclip, DT);

        step(&world, &mut motor, &mut controller, &toggle, DT);
        assert_eq!(controller.current_mode(), CharacterMode::Default);

        let idle = PlayerInputs::default();
        for _ in 0..10 {
            step(&world, &mut motor, &mut controller, &idle, DT);
        }
        // No stale jump fired after returning to Default.
        assert!(motor.grounding().is_stable_on_ground);
        assert!(motor.base_velocity().y.abs() < 0.1);
    }

    #[test]
    fn set_state_updates_current_mode_after_both_hooks() {
        let (world, mut motor, mut controller) = flat_rig();
        settle(&world, &mut motor, &mut controller);

        assert_eq!(controller.current_mode(), CharacterMode::Default);
        controller.set_state(&mut motor, CharacterMode::Charging);
        assert_eq!(controller.current_mode(), CharacterMode::Charging);

        // Re-entering the same mode runs the hooks again (restarts the charge).
        controller.set_state(&mut motor, CharacterMode::Charging);
        assert_eq!(controller.current_mode(), CharacterMode::Charging);

        controller.set_state(&mut motor, CharacterMode::Default);
        assert_eq!(controller.current_mode(), CharacterMode::Default);
    }
}
