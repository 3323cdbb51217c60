/*!
The per-tick callback protocol between the motor and the character layer.

The motor owns integration; the character layer owns intent. Every physics
step the motor calls the [`CharacterBehavior`] hooks in a fixed order (see
[`Motor::tick`](crate::Motor::tick)) and hands them the working rotation and
velocity by mutable reference. Hooks receive a [`TickContext`] so they can
read motor state and issue collision queries mid-tick.
*/

use crate::motor::Motor;
use crate::queries::PhysicsQueries;
use crate::types::{ColliderHandle, MoveHit, Quat, Vec3};

/// Stability classification of one movement contact, as judged by the motor.
/// The behavior may overrule it before the motor acts on the report.
#[derive(Clone, Copy, Debug)]
pub struct HitStabilityReport {
    /// Whether the contact normal counts as stable, walkable ground.
    pub is_stable: bool,
}

/// Everything a behavior hook may touch during its slice of the tick.
pub struct TickContext<'a> {
    pub motor: &'a mut Motor,
    pub world: &'a dyn PhysicsQueries,
}

/// Character-side hooks driven by [`Motor::tick`](crate::Motor::tick).
///
/// All hooks default to no-ops so partial behaviors (and test doubles) stay
/// small. Velocity and rotation are accumulators: each hook sees the result
/// of everything that ran earlier in the same tick and nothing else.
pub trait CharacterBehavior {
    /// Runs before any solving; a place to advance timers.
    fn before_update(&mut self, ctx: &mut TickContext<'_>, dt: f32) {
        let _ = (ctx, dt);
    }

    /// Mutate the working orientation for this tick.
    fn update_rotation(&mut self, ctx: &mut TickContext<'_>, rotation: &mut Quat, dt: f32) {
        let _ = (ctx, rotation, dt);
    }

    /// Mutate the working velocity for this tick.
    fn update_velocity(&mut self, ctx: &mut TickContext<'_>, velocity: &mut Vec3, dt: f32) {
        let _ = (ctx, velocity, dt);
    }

    /// Raised for every contact the movement sweep resolves.
    fn on_movement_hit(
        &mut self,
        ctx: &mut TickContext<'_>,
        hit: &MoveHit,
        report: &mut HitStabilityReport,
    ) {
        let _ = (ctx, hit, report);
    }

    /// Runs right after the grounding solve, before `after_update`; the place
    /// to edge-detect landing and leaving ground.
    fn post_grounding_update(&mut self, ctx: &mut TickContext<'_>, dt: f32) {
        let _ = (ctx, dt);
    }

    /// Runs last, after integration and grounding.
    fn after_update(&mut self, ctx: &mut TickContext<'_>, dt: f32) {
        let _ = (ctx, dt);
    }

    /// Excludes colliders (typically the character's own) from every query the
    /// motor issues on the behavior's behalf.
    fn is_collider_valid(&self, collider: ColliderHandle) -> bool {
        let _ = collider;
        true
    }
}
