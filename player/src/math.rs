//! Smoothing, projection and angle helpers shared by the camera and the
//! character features. All functions are stateless and guard degenerate
//! inputs instead of propagating NaNs.

use motor::{Quat, Vec2, Vec3};
use nalgebra as na;

const EPS: f32 = 1.0e-6;

/// Frame-rate independent exponential blend of `a` toward `b`.
///
/// The blend factor is `1 - e^(-sharpness*dt)`; pass `sharpness * dt` as
/// `sharpness_by_dt`. Converges to `b` without overshoot for any time step.
#[inline]
pub fn smooth(a: Vec3, b: Vec3, sharpness_by_dt: f32) -> Vec3 {
    let t = 1.0 - (-sharpness_by_dt).exp();
    a.lerp(&b, t)
}

/// Like [`smooth`], but interpolating along the arc between the two
/// directions (with magnitudes blended linearly).
#[inline]
pub fn spherical_smooth(a: Vec3, b: Vec3, sharpness_by_dt: f32) -> Vec3 {
    let t = 1.0 - (-sharpness_by_dt).exp();
    slerp(a, b, t)
}

/// Spherical interpolation of two vectors treated as scaled directions.
pub fn slerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    let len_a = a.norm();
    let len_b = b.norm();
    if len_a <= EPS || len_b <= EPS {
        return a.lerp(&b, t);
    }

    let dir_a = a / len_a;
    let dir_b = b / len_b;
    let length = len_a + (len_b - len_a) * t;

    let dot = dir_a.dot(&dir_b).clamp(-1.0, 1.0);
    if dot > 1.0 - 1.0e-6 {
        return a.lerp(&b, t);
    }

    let axis = if dot < -1.0 + 1.0e-6 {
        // Opposite directions: the rotation plane is ambiguous, pick one.
        na::Unit::new_normalize(orthogonal_to(dir_a))
    } else {
        na::Unit::new_normalize(dir_a.cross(&dir_b))
    };

    let angle = dot.acos();
    (Quat::from_axis_angle(&axis, angle * t) * dir_a) * length
}

fn orthogonal_to(v: Vec3) -> Vec3 {
    if v.x.abs() < 0.9 {
        v.cross(&Vec3::x())
    } else {
        v.cross(&Vec3::y())
    }
}

/// Component of `v` along `onto` (zero for degenerate `onto`).
#[inline]
pub fn project(v: Vec3, onto: Vec3) -> Vec3 {
    let len_sq = onto.norm_squared();
    if len_sq <= EPS * EPS {
        return Vec3::zeros();
    }
    onto * (v.dot(&onto) / len_sq)
}

/// Remove from `v` its component along the plane normal. The normal does not
/// need to be unit length.
#[inline]
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - project(v, normal)
}

/// The camera's forward direction flattened onto the plane perpendicular to
/// `up`. Falls back to the camera's up axis when looking straight along `up`
/// (so a top-down camera still yields a usable planar heading).
pub fn camera_planar_direction(camera_rotation: Quat, up: Vec3) -> Vec3 {
    let forward = project_on_plane(camera_rotation * Vec3::z(), up);
    let len_sq = forward.norm_squared();
    if len_sq > EPS * EPS {
        return forward / len_sq.sqrt();
    }

    let fallback = project_on_plane(camera_rotation * Vec3::y(), up);
    let len_sq = fallback.norm_squared();
    if len_sq > EPS * EPS {
        return fallback / len_sq.sqrt();
    }
    Vec3::z()
}

/// Orientation looking along `forward` (exact) with `up` as the secondary
/// axis. Identity for degenerate forwards.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    if forward.norm_squared() <= EPS * EPS || forward.cross(&up).norm_squared() <= EPS * EPS {
        return Quat::identity();
    }
    Quat::face_towards(&forward, &up)
}

/// Orientation whose up axis is exactly `up`, with `forward` re-orthogonalized
/// against it. The counterpart of [`look_rotation`] for surface alignment.
pub fn look_rotation_up(up: Vec3, forward: Vec3) -> Quat {
    let up_len = up.norm();
    if up_len <= EPS {
        return Quat::identity();
    }
    let up = up / up_len;

    let mut fwd = project_on_plane(forward, up);
    let fwd_len_sq = fwd.norm_squared();
    if fwd_len_sq <= EPS * EPS {
        fwd = project_on_plane(Vec3::z(), up);
        if fwd.norm_squared() <= EPS * EPS {
            fwd = project_on_plane(Vec3::x(), up);
        }
    }
    let fwd = fwd.normalize();
    let right = up.cross(&fwd);

    Quat::from_rotation_matrix(&na::Rotation3::from_basis_unchecked(&[right, up, fwd]))
}

/// Step `from` toward `to`, rotating at most `max_degrees`.
pub fn rotate_towards(from: Quat, to: Quat, max_degrees: f32) -> Quat {
    let angle = from.angle_to(&to).to_degrees();
    if angle <= max_degrees || angle <= EPS {
        return to;
    }
    from.slerp(&to, (max_degrees / angle).clamp(0.0, 1.0))
}

/// Shortest signed angular difference from `a` to `b`, in degrees (-180, 180].
pub fn delta_angle(a: f32, b: f32) -> f32 {
    let mut delta = (b - a).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Step `current` toward `target` by at most `max_delta` degrees, taking the
/// short way around the circle.
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if delta.abs() <= max_delta {
        return target;
    }
    current + delta.signum() * max_delta
}

/// Heading of a planar `(x, z)` direction as a [0, 360) yaw angle, with 0
/// along +z and 90 along +x. Expects a unit direction.
pub fn heading_angle(direction: Vec2) -> f32 {
    let angle = direction.y.clamp(-1.0, 1.0).acos().to_degrees();
    if direction.x < 0.0 { 360.0 - angle } else { angle }
}

/// Half extents of a camera's near-plane rectangle, used to size the camera
/// obstruction cast.
pub fn camera_half_extents(near_plane: f32, fov_y_deg: f32, aspect: f32) -> Vec3 {
    let y = near_plane * (0.5 * fov_y_deg.to_radians()).tan();
    Vec3::new(y * aspect, y, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn smooth_stays_at_start_for_zero_dt_and_reaches_target_for_large_dt() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-4.0, 0.0, 7.0);

        assert_relative_eq!(smooth(a, b, 0.0), a);
        assert_relative_eq!(smooth(a, b, 100.0), b, epsilon = 1.0e-4);
    }

    #[test]
    fn smooth_converges_monotonically_without_overshoot() {
        // Larger sharpness*dt always ends closer to the target, never past it.
        let a = Vec3::new(5.0, 0.0, 0.0);
        let b = Vec3::zeros();

        let mut previous = f32::INFINITY;
        for i in 1..50 {
            let t = i as f32 * 0.2;
            let distance = (smooth(a, b, t) - b).norm();
            assert!(distance < previous);
            assert!(distance <= (a - b).norm());
            previous = distance;
        }
    }

    #[test]
    fn slerp_rotates_along_the_arc() {
        let a = Vec3::x();
        let b = Vec3::z();
        let mid = slerp(a, b, 0.5);

        // Halfway point bisects the right angle and stays unit length.
        assert_relative_eq!(mid.norm(), 1.0, epsilon = 1.0e-5);
        assert_relative_eq!(mid.x, mid.z, epsilon = 1.0e-5);
    }

    #[test]
    fn project_on_plane_removes_the_normal_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let flat = project_on_plane(v, Vec3::y() * 10.0);
        assert_relative_eq!(flat, Vec3::new(1.0, 0.0, 3.0), epsilon = 1.0e-5);

        // Degenerate normal leaves the vector untouched.
        assert_relative_eq!(project_on_plane(v, Vec3::zeros()), v);
    }

    #[test]
    fn camera_planar_direction_falls_back_when_looking_straight_down() {
        // Looking straight down: forward projects to zero, up supplies heading.
        let down = Quat::from_axis_angle(&nalgebra::Vector3::x_axis(), -90f32.to_radians());
        let dir = camera_planar_direction(down, Vec3::y());
        assert_relative_eq!(dir.norm(), 1.0, epsilon = 1.0e-5);
        assert!(dir.y.abs() < 1.0e-5);
    }

    #[test]
    fn look_rotation_points_forward_axis_at_target() {
        let q = look_rotation(Vec3::new(0.0, 0.0, -1.0), Vec3::y());
        assert_relative_eq!(q * Vec3::z(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1.0e-5);
    }

    #[test]
    fn look_rotation_up_keeps_the_exact_up_axis() {
        let up = Vec3::new(0.3, 1.0, -0.1).normalize();
        let q = look_rotation_up(up, Vec3::z());

        assert_relative_eq!(q * Vec3::y(), up, epsilon = 1.0e-5);
        // Forward ends up orthogonal to up.
        assert!((q * Vec3::z()).dot(&up).abs() < 1.0e-5);
    }

    #[test]
    fn rotate_towards_caps_the_step_and_then_snaps() {
        let from = Quat::identity();
        let to = Quat::from_axis_angle(&nalgebra::Vector3::y_axis(), 90f32.to_radians());

        let stepped = rotate_towards(from, to, 30.0);
        assert_relative_eq!(from.angle_to(&stepped).to_degrees(), 30.0, epsilon = 1.0e-3);

        assert_eq!(rotate_towards(from, to, 120.0), to);
    }

    #[test]
    fn delta_angle_wraps_across_zero() {
        assert_relative_eq!(delta_angle(350.0, 10.0), 20.0);
        assert_relative_eq!(delta_angle(10.0, 350.0), -20.0);
        assert_relative_eq!(delta_angle(0.0, 180.0), 180.0);
    }

    #[test]
    fn move_towards_angle_takes_the_short_way() {
        assert_relative_eq!(move_towards_angle(350.0, 10.0, 5.0), 355.0);
        assert_relative_eq!(move_towards_angle(350.0, 10.0, 30.0), 10.0);
    }

    #[test]
    fn heading_angle_covers_all_quadrants() {
        assert_relative_eq!(heading_angle(Vec2::new(0.0, 1.0)), 0.0);
        assert_relative_eq!(heading_angle(Vec2::new(1.0, 0.0)), 90.0);
        assert_relative_eq!(heading_angle(Vec2::new(0.0, -1.0)), 180.0);
        assert_relative_eq!(heading_angle(Vec2::new(-1.0, 0.0)), 270.0);
    }

    #[test]
    fn camera_half_extents_match_the_frustum_formula() {
        let half = camera_half_extents(0.3, 60.0, 16.0 / 9.0);
        let expected_y = 0.3 * (30f32.to_radians()).tan();
        assert_relative_eq!(half.y, expected_y, epsilon = 1.0e-6);
        assert_relative_eq!(half.x, expected_y * 16.0 / 9.0, epsilon = 1.0e-6);
        assert_eq!(half.z, 0.0);
    }
}
