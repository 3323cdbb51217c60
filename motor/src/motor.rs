/*!
The kinematic capsule motor.

Owns the capsule geometry, the transient pose, the base velocity and the
grounding state of one character, and drives the per-tick callback protocol:

1. `before_update`
2. `update_rotation` (working copy, committed after the hook)
3. `update_velocity` (working copy, committed after the hook)
4. movement integration: sweep-and-slide of `velocity * dt`, raising
   `on_movement_hit` for every resolved contact
5. grounding solve (downward probe, hover snap on stable ground)
6. `post_grounding_update`
7. `after_update`

The motor never allocates during a tick; overlap helpers reuse one scratch
buffer whose contents are only valid until the next query.
*/

use nalgebra as na;

use crate::callbacks::{CharacterBehavior, HitStabilityReport, TickContext};
use crate::queries::{OverlapHits, PhysicsQueries, QueryFilter};
use crate::settings::{ASCENT_GROUNDING_CUTOFF, DIST_EPS, MIN_MOVE_SQ, MotorConfig};
use crate::types::{CapsuleSpec, Iso, Quat, Vec3};

/// Ground contact classification for one tick.
///
/// "Stable" means the contact is walkable (within the slope limit);
/// "found any" also includes contacts too steep to stand on.
#[derive(Clone, Copy, Debug)]
pub struct GroundingStatus {
    pub found_any_ground: bool,
    pub is_stable_on_ground: bool,
    pub ground_normal: Vec3,
}

impl GroundingStatus {
    #[inline]
    pub fn airborne() -> Self {
        Self {
            found_any_ground: false,
            is_stable_on_ground: false,
            ground_normal: Vec3::y(),
        }
    }
}

impl Default for GroundingStatus {
    fn default() -> Self {
        Self::airborne()
    }
}

/// Kinematic motor state for a single character.
pub struct Motor {
    config: MotorConfig,
    capsule: CapsuleSpec,
    transient_position: Vec3,
    transient_rotation: Quat,
    base_velocity: Vec3,
    grounding: GroundingStatus,
    last_grounding: GroundingStatus,
    must_unground: bool,
    capsule_collisions: bool,
    movement_solving: bool,
    ground_solving: bool,
    scratch: OverlapHits,
}

impl Motor {
    pub fn new(config: MotorConfig, capsule: CapsuleSpec, position: Vec3, rotation: Quat) -> Self {
        Self {
            config,
            capsule,
            transient_position: position,
            transient_rotation: rotation,
            base_velocity: Vec3::zeros(),
            grounding: GroundingStatus::airborne(),
            last_grounding: GroundingStatus::airborne(),
            must_unground: false,
            capsule_collisions: true,
            movement_solving: true,
            ground_solving: true,
            scratch: OverlapHits::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    #[inline]
    pub fn capsule(&self) -> CapsuleSpec {
        self.capsule
    }

    pub fn set_capsule_dimensions(&mut self, radius: f32, height: f32, center_y: f32) {
        self.capsule = CapsuleSpec::new(radius, height, center_y);
    }

    /// Character base (feet) position, updated during the tick.
    #[inline]
    pub fn transient_position(&self) -> Vec3 {
        self.transient_position
    }

    #[inline]
    pub fn transient_rotation(&self) -> Quat {
        self.transient_rotation
    }

    /// Teleport; skips all collision handling.
    pub fn set_position(&mut self, position: Vec3) {
        self.transient_position = position;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.transient_rotation = rotation;
    }

    #[inline]
    pub fn base_velocity(&self) -> Vec3 {
        self.base_velocity
    }

    pub fn set_base_velocity(&mut self, velocity: Vec3) {
        self.base_velocity = velocity;
    }

    #[inline]
    pub fn grounding(&self) -> &GroundingStatus {
        &self.grounding
    }

    #[inline]
    pub fn last_grounding(&self) -> &GroundingStatus {
        &self.last_grounding
    }

    #[inline]
    pub fn character_up(&self) -> Vec3 {
        self.transient_rotation * Vec3::y()
    }

    #[inline]
    pub fn character_forward(&self) -> Vec3 {
        self.transient_rotation * Vec3::z()
    }

    /// Detach from ground for the remainder of this tick's grounding solve.
    pub fn force_unground(&mut self) {
        self.must_unground = true;
    }

    /// Whether the capsule participates in overlap sensing.
    pub fn set_capsule_collisions_active(&mut self, active: bool) {
        self.capsule_collisions = active;
    }

    /// Whether movement is swept against geometry or integrated freely.
    pub fn set_movement_collisions_solving(&mut self, active: bool) {
        self.movement_solving = active;
    }

    /// Whether the grounding probe runs at all.
    pub fn set_ground_solving(&mut self, active: bool) {
        self.ground_solving = active;
    }

    /// World pose of the capsule center for the current transient state.
    #[inline]
    pub fn capsule_center_pose(&self) -> Iso {
        self.capsule_pose_at(self.transient_position)
    }

    fn capsule_pose_at(&self, base: Vec3) -> Iso {
        let center = base + self.transient_rotation * (Vec3::y() * self.capsule.center_y);
        Iso::from_parts(
            na::Translation3::new(center.x, center.y, center.z),
            self.transient_rotation,
        )
    }

    /// Is `normal` walkable ground for the current orientation?
    pub fn is_stable_normal(&self, normal: Vec3) -> bool {
        let len_sq = normal.norm_squared();
        if len_sq <= DIST_EPS * DIST_EPS {
            return false;
        }
        let cos_limit = self.config.max_stable_slope_deg.to_radians().cos();
        self.character_up().dot(&(normal / len_sq.sqrt())) >= cos_limit
    }

    /// Reorient `direction` along the surface plane, preserving its heading
    /// relative to character-up. Returns zero for degenerate inputs.
    pub fn direction_tangent_to_surface(&self, direction: Vec3, surface_normal: Vec3) -> Vec3 {
        let direction_right = direction.cross(&self.character_up());
        let tangent = surface_normal.cross(&direction_right);
        let len = tangent.norm();
        if len <= DIST_EPS {
            return Vec3::zeros();
        }
        tangent / len
    }

    /// Number of colliders overlapping the capsule at its transient pose.
    /// The scratch results are valid until the next motor query.
    pub fn character_overlap(
        &mut self,
        world: &dyn PhysicsQueries,
        filter: &QueryFilter<'_>,
    ) -> usize {
        if !self.capsule_collisions {
            return 0;
        }
        let capsule = self.capsule;
        let pose = self.capsule_center_pose();
        world.overlap_capsule(capsule, pose, 0.0, filter, &mut self.scratch);
        self.scratch.len()
    }

    /// Probe for nearby geometry with a temporarily inflated capsule and
    /// average the penetration directions into a single contact normal.
    /// Returns `None` when nothing is close enough (or sensing is disabled).
    pub fn overlap_with_average_normal(
        &mut self,
        world: &dyn PhysicsQueries,
        filter: &QueryFilter<'_>,
        inflate_radius: f32,
    ) -> Option<Vec3> {
        if !self.capsule_collisions {
            return None;
        }
        let capsule = self.capsule;
        let pose = self.capsule_center_pose();
        world.overlap_capsule(capsule, pose, inflate_radius, filter, &mut self.scratch);
        if self.scratch.is_empty() {
            return None;
        }

        let inflated = capsule.inflated(inflate_radius);
        let mut average = Vec3::zeros();
        for &collider in self.scratch.as_slice() {
            if let Some(pen) = world.capsule_penetration(inflated, pose, collider) {
                average += pen.direction * pen.depth;
            }
        }

        let len = average.norm();
        if len <= DIST_EPS {
            return None;
        }
        Some(average / len)
    }

    /// Advance the character by one fixed step, driving `behavior`'s hooks in
    /// the documented order.
    pub fn tick(
        &mut self,
        world: &dyn PhysicsQueries,
        behavior: &mut dyn CharacterBehavior,
        dt: f32,
    ) {
        debug_assert!(dt >= 0.0, "negative time step");

        behavior.before_update(&mut TickContext { motor: self, world }, dt);

        let mut rotation = self.transient_rotation;
        behavior.update_rotation(&mut TickContext { motor: self, world }, &mut rotation, dt);
        self.transient_rotation = rotation;

        let mut velocity = self.base_velocity;
        behavior.update_velocity(&mut TickContext { motor: self, world }, &mut velocity, dt);
        self.base_velocity = velocity;

        self.integrate_movement(world, behavior, dt);
        self.solve_grounding(world, behavior);

        behavior.post_grounding_update(&mut TickContext { motor: self, world }, dt);
        behavior.after_update(&mut TickContext { motor: self, world }, dt);
    }

    /// Sweep-and-slide the capsule along `base_velocity * dt`.
    ///
    /// On contact the capsule advances to just before the hit (minus skin),
    /// the leftover motion slides along the contact plane, and the base
    /// velocity is clipped so the next tick does not push into the surface
    /// again. Iterates to handle corners.
    fn integrate_movement(
        &mut self,
        world: &dyn PhysicsQueries,
        behavior: &mut dyn CharacterBehavior,
        dt: f32,
    ) {
        let mut remaining = self.base_velocity * dt;
        if remaining.norm_squared() <= MIN_MOVE_SQ {
            return;
        }

        if !self.movement_solving {
            self.transient_position += remaining;
            return;
        }

        for _ in 0..self.config.max_slide_iterations {
            if remaining.norm_squared() <= MIN_MOVE_SQ {
                break;
            }
            let len = remaining.norm();
            let dir = remaining / len;

            let capsule = self.capsule;
            let pose = self.capsule_center_pose();
            let hit = {
                let pred = |c| behavior.is_collider_valid(c);
                world.cast_capsule(capsule, pose, remaining, &QueryFilter::with_predicate(&pred))
            };

            match hit {
                None => {
                    self.transient_position += remaining;
                    break;
                }
                Some(hit) => {
                    // Travel up to the contact point (minus skin).
                    let travel = (len * hit.fraction).max(0.0);
                    let advance = (travel - self.config.skin).max(0.0);
                    self.transient_position += dir * advance;

                    let n = {
                        let n_len_sq = hit.normal.norm_squared();
                        if n_len_sq > DIST_EPS * DIST_EPS {
                            hit.normal / n_len_sq.sqrt()
                        } else {
                            break;
                        }
                    };

                    let mut report = HitStabilityReport {
                        is_stable: self.is_stable_normal(n),
                    };
                    behavior.on_movement_hit(
                        &mut TickContext { motor: self, world },
                        &hit,
                        &mut report,
                    );

                    // Slide the leftover along the hit plane and clip the base
                    // velocity so it stops pressing into the surface.
                    let leftover = dir * (len - travel);
                    remaining = leftover - n * leftover.dot(&n);

                    let into = self.base_velocity.dot(&n);
                    if into < 0.0 {
                        self.base_velocity -= n * into;
                    }
                }
            }
        }
    }

    /// Downward probe deciding this tick's grounding, snapping stable contacts
    /// to the hover height.
    fn solve_grounding(&mut self, world: &dyn PhysicsQueries, behavior: &mut dyn CharacterBehavior) {
        self.last_grounding = self.grounding;

        if !self.ground_solving {
            self.grounding = GroundingStatus::airborne();
            return;
        }
        if self.must_unground {
            self.must_unground = false;
            self.grounding = GroundingStatus::airborne();
            return;
        }

        let up = self.character_up();

        // An airborne character moving away from the ground must not latch
        // back onto it (this is what keeps a fresh jump alive).
        if !self.last_grounding.found_any_ground
            && self.base_velocity.dot(&up) > ASCENT_GROUNDING_CUTOFF
        {
            self.grounding = GroundingStatus::airborne();
            return;
        }

        let max_down = if self.last_grounding.found_any_ground {
            self.config.ground_probe_distance + self.config.hover_height
        } else {
            self.config.airborne_snap_distance
        };

        let capsule = self.capsule;
        let pose = self.capsule_center_pose();
        let probe = -up * max_down;
        let hit = {
            let pred = |c| behavior.is_collider_valid(c);
            world.cast_capsule(capsule, pose, probe, &QueryFilter::with_predicate(&pred))
        };

        match hit {
            None => self.grounding = GroundingStatus::airborne(),
            Some(hit) => {
                let normal = {
                    let len_sq = hit.normal.norm_squared();
                    if len_sq <= DIST_EPS * DIST_EPS {
                        self.grounding = GroundingStatus::airborne();
                        return;
                    }
                    hit.normal / len_sq.sqrt()
                };

                let stable = self.is_stable_normal(normal);
                self.grounding = GroundingStatus {
                    found_any_ground: true,
                    is_stable_on_ground: stable,
                    ground_normal: normal,
                };

                if stable {
                    // Settle at the hover height above the contact.
                    let at_impact = self.transient_position + probe * hit.fraction;
                    self.transient_position = at_impact + normal * self.config.hover_height;
                }
            }
        }
    }
}
