//! Orbiting third-/first-person camera with focus smoothing, zoom, manual and
//! automatic orbit blending, and obstruction avoidance.
//!
//! The camera runs on the render cadence, independent of the physics tick; it
//! only reads the followed target's transform and issues one box cast per
//! frame when in third person.

use motor::{Iso, PhysicsQueries, Quat, QueryFilter, Transform, Vec2, Vec3};
use nalgebra as na;

use crate::math::{
    camera_half_extents, delta_angle, heading_angle, move_towards_angle,
};
use crate::visual::{CastingMode, ShadowCaster};

/// Pitch limits for one view mode, in degrees.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchLimits {
    pub min_vertical_angle: f32,
    pub max_vertical_angle: f32,
}

/// Camera intrinsics needed to size the obstruction cast.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LensSpec {
    pub near_plane: f32,
    pub fov_y_deg: f32,
    pub aspect: f32,
}

impl Default for LensSpec {
    fn default() -> Self {
        Self {
            near_plane: 0.3,
            fov_y_deg: 60.0,
            aspect: 16.0 / 9.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbitCameraConfig {
    /// Third-person distance restored by [`OrbitCamera::switch_point_of_view`].
    pub distance: f32,
    /// How far the focus point may trail the target. Zero disables smoothing.
    pub focus_radius: f32,
    /// 0..1, how aggressively the focus re-centers on the target.
    pub focus_centering: f32,
    /// Orbit speed in degrees per second.
    pub rotation_speed: f32,
    /// Seconds without manual input before automatic alignment resumes.
    pub align_delay: f32,
    /// Degrees around the 0/180 flip where automatic rotation slows down.
    pub align_smooth_range: f32,
    pub zoom_speed: f32,
    pub max_zoom_distance: f32,
    pub default_zoom_distance: f32,
    /// Below this zoom distance the avatar is hidden from its own camera.
    pub visibility_threshold: f32,
    pub first_person: PitchLimits,
    pub third_person: PitchLimits,
    pub lens: LensSpec,
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        Self {
            distance: 3.0,
            focus_radius: 0.5,
            focus_centering: 0.75,
            rotation_speed: 90.0,
            align_delay: 5.0,
            align_smooth_range: 45.0,
            zoom_speed: 120.0,
            max_zoom_distance: 5.0,
            default_zoom_distance: 3.0,
            visibility_threshold: 1.2,
            first_person: PitchLimits {
                min_vertical_angle: -90.0,
                max_vertical_angle: 90.0,
            },
            third_person: PitchLimits {
                min_vertical_angle: -30.0,
                max_vertical_angle: 60.0,
            },
            lens: LensSpec::default(),
        }
    }
}

/// The camera rig. Orbit angles are `(pitch, yaw)` in degrees; yaw is kept in
/// [0, 360) and pitch inside the active view mode's limits.
pub struct OrbitCamera {
    config: OrbitCameraConfig,
    position: Vec3,
    rotation: Quat,
    orbit_angles: Vec2,
    focus_point: Vec3,
    previous_focus_point: Vec3,
    target_distance: f32,
    time: f32,
    last_manual_rotation_time: f32,
    shadow_caster: Option<Box<dyn ShadowCaster>>,
}

impl OrbitCamera {
    pub fn new(config: OrbitCameraConfig) -> Self {
        let orbit_angles = Vec2::new(45.0, 0.0);
        Self {
            position: Vec3::zeros(),
            rotation: rotation_from_orbit_angles(orbit_angles),
            orbit_angles,
            focus_point: Vec3::zeros(),
            previous_focus_point: Vec3::zeros(),
            target_distance: config.default_zoom_distance,
            time: 0.0,
            last_manual_rotation_time: 0.0,
            shadow_caster: None,
            config,
        }
    }

    /// Bind the followed subject: reset the focus point onto it and restore
    /// the default zoom. The renderer handle is optional; without one the
    /// visibility side effect is skipped.
    pub fn follow(&mut self, target: &Transform, shadow_caster: Option<Box<dyn ShadowCaster>>) {
        self.focus_point = target.translation;
        self.previous_focus_point = target.translation;
        self.shadow_caster = shadow_caster;
        self.target_distance = self.config.default_zoom_distance;
    }

    /// Flip between first person (distance 0) and the configured third-person
    /// distance.
    pub fn switch_point_of_view(&mut self) {
        self.target_distance = if self.target_distance == 0.0 {
            self.config.distance
        } else {
            0.0
        };
    }

    /// Advance the camera by one rendered frame. `dt` must be unscaled time
    /// so the camera keeps responding while the simulation is paused.
    pub fn update_with_input(
        &mut self,
        world: &dyn PhysicsQueries,
        target: &Transform,
        look_input: Vec2,
        zoom_input: f32,
        dt: f32,
    ) {
        self.time += dt;

        self.update_focus_point(target.translation, dt);
        self.update_target_distance(zoom_input, dt);
        self.update_character_visibility();

        let look_rotation = self.refresh_look_rotation(look_input, dt);
        if self.is_first_person() {
            self.place_first_person(target, look_rotation);
        } else {
            self.place_third_person(world, target, look_rotation);
        }
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    #[inline]
    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }

    #[inline]
    pub fn zoom_distance(&self) -> f32 {
        self.target_distance
    }

    #[inline]
    fn is_first_person(&self) -> bool {
        self.target_distance == 0.0
    }

    fn pitch_limits(&self) -> PitchLimits {
        if self.is_first_person() {
            self.config.first_person
        } else {
            self.config.third_person
        }
    }

    /// Exponentially re-center the focus point on the target, forced to catch
    /// up whenever the target escapes the focus radius.
    fn update_focus_point(&mut self, target_point: Vec3, dt: f32) {
        self.previous_focus_point = self.focus_point;

        if self.config.focus_radius <= 0.0 {
            self.focus_point = target_point;
            return;
        }

        let distance = (target_point - self.focus_point).norm();
        let mut t = 1.0;
        if distance > 0.01 && self.config.focus_centering > 0.0 {
            t = (1.0 - self.config.focus_centering).powf(dt);
        }
        if distance > self.config.focus_radius {
            t = t.min(self.config.focus_radius / distance);
        }
        self.focus_point = target_point.lerp(&self.focus_point, t);
    }

    fn update_target_distance(&mut self, zoom_input: f32, dt: f32) {
        self.target_distance += zoom_input * self.config.zoom_speed * dt;
        self.target_distance = self
            .target_distance
            .clamp(0.0, self.config.max_zoom_distance);
    }

    fn update_character_visibility(&mut self) {
        let Some(caster) = self.shadow_caster.as_mut() else {
            return;
        };
        if self.target_distance < self.config.visibility_threshold {
            caster.set_casting_mode(CastingMode::ShadowsOnly);
        } else {
            caster.set_casting_mode(CastingMode::Default);
        }
    }

    fn refresh_look_rotation(&mut self, look_input: Vec2, dt: f32) -> Quat {
        if self.try_add_manual_rotation(look_input, dt) || self.try_add_automatic_rotation(dt) {
            self.constrain_angles();
            return rotation_from_orbit_angles(self.orbit_angles);
        }
        self.rotation
    }

    fn try_add_manual_rotation(&mut self, look_input: Vec2, dt: f32) -> bool {
        const E: f32 = 0.001;

        if look_input.x.abs() < E && look_input.y.abs() < E {
            return false;
        }

        self.orbit_angles += look_input * (self.config.rotation_speed * dt);
        self.last_manual_rotation_time = self.time;
        true
    }

    /// Blend yaw toward the heading implied by recent focus movement, slowed
    /// near the 0/180 degree flip so the camera never oscillates behind a
    /// target that reverses direction.
    fn try_add_automatic_rotation(&mut self, dt: f32) -> bool {
        if self.is_first_person() {
            return false;
        }
        if self.time - self.last_manual_rotation_time < self.config.align_delay {
            return false;
        }

        let movement = Vec2::new(
            self.focus_point.x - self.previous_focus_point.x,
            self.focus_point.z - self.previous_focus_point.z,
        );
        let movement_delta_sq = movement.norm_squared();
        if movement_delta_sq < 0.0001 {
            return false;
        }

        let heading = heading_angle(movement / movement_delta_sq.sqrt());
        let delta_abs = delta_angle(self.orbit_angles.y, heading).abs();
        let mut rotation_change = self.config.rotation_speed * dt.min(movement_delta_sq);
        if delta_abs < self.config.align_smooth_range {
            rotation_change *= delta_abs / self.config.align_smooth_range;
        } else if 180.0 - delta_abs < self.config.align_smooth_range {
            rotation_change *= (180.0 - delta_abs) / self.config.align_smooth_range;
        }
        self.orbit_angles.y = move_towards_angle(self.orbit_angles.y, heading, rotation_change);

        true
    }

    fn constrain_angles(&mut self) {
        let limits = self.pitch_limits();
        self.orbit_angles.x = self
            .orbit_angles
            .x
            .clamp(limits.min_vertical_angle, limits.max_vertical_angle);

        if self.orbit_angles.y < 0.0 {
            self.orbit_angles.y += 360.0;
        } else if self.orbit_angles.y >= 360.0 {
            self.orbit_angles.y -= 360.0;
        }
    }

    fn place_first_person(&mut self, target: &Transform, look_rotation: Quat) {
        self.position = target.translation;
        self.rotation = look_rotation;
    }

    /// Put the camera at the orbit distance behind the focus point, then pull
    /// it in front of anything the near-plane box sweep hits on the way.
    fn place_third_person(
        &mut self,
        world: &dyn PhysicsQueries,
        target: &Transform,
        look_rotation: Quat,
    ) {
        let look_direction = look_rotation * Vec3::z();
        let mut look_position = self.focus_point - look_direction * self.target_distance;

        let rect_offset = look_direction * self.config.lens.near_plane;
        let mut rect_position = look_position + rect_offset;

        let cast_from = target.translation;
        let cast_to = rect_position - cast_from;
        let cast_distance = cast_to.norm();

        if cast_distance > 1.0e-4 {
            let cast_direction = cast_to / cast_distance;
            let half_extents = camera_half_extents(
                self.config.lens.near_plane,
                self.config.lens.fov_y_deg,
                self.config.lens.aspect,
            );
            let cast_pose = Iso::from_parts(
                na::Translation3::new(cast_from.x, cast_from.y, cast_from.z),
                look_rotation,
            );

            if let Some(hit) = world.cast_box(half_extents, cast_pose, cast_to, &QueryFilter::none())
            {
                let hit_distance = cast_distance * hit.fraction;
                rect_position = cast_from + cast_direction * hit_distance;
                look_position = rect_position - rect_offset;
            }
        }

        self.position = look_position;
        self.rotation = look_rotation;
    }
}

fn rotation_from_orbit_angles(orbit_angles: Vec2) -> Quat {
    Quat::from_axis_angle(&na::Vector3::y_axis(), orbit_angles.y.to_radians())
        * Quat::from_axis_angle(&na::Vector3::x_axis(), orbit_angles.x.to_radians())
}
