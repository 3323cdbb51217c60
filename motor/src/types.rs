/*!
Core motor types and math aliases shared by the collision and tick submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- the static collision world (parry3d narrow-phase queries)
- the kinematic motor (sweep-and-slide, grounding)
- the character behavior callbacks implemented by the gameplay layer
*/

use nalgebra as na;

/// Common math aliases for clarity and consistency.
pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }

    /// Convert to nalgebra `Isometry3` for use with parry3d narrow-phase queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }
}

/// Static collision shapes supported by the world.
///
/// - Plane: infinite plane in world-space represented by its normal and offset (dist)
///          satisfying: normal ⋅ x = dist.
/// - Cuboid: oriented box with half-extents in local space, placed by `transform`.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StaticShape {
    Plane {
        /// World-space unit normal of the plane.
        normal: Vec3,
        /// Plane offset along the normal, i.e., normal ⋅ x = dist.
        dist: f32,
    },
    Cuboid {
        /// Local-space half-extents (hx, hy, hz).
        half_extents: Vec3,
        /// World-space pose of the cuboid.
        transform: Transform,
    },
    Sphere {
        /// Radius of the sphere in meters.
        radius: f32,
        /// World-space pose (translation used; rotation ignored).
        transform: Transform,
    },
    Capsule {
        /// Radius of the spherical caps and cylinder.
        radius: f32,
        /// Half of the cylinder length along the local +Y axis.
        half_height: f32,
        /// World-space pose of the capsule.
        transform: Transform,
    },
}

/// Convenience: build a `StaticShape::Plane` from a world-space plane pose:
/// - normal = rotation * +Y
/// - dist = dot(normal, translation) + optional offset
#[inline]
pub fn plane_from_pose(rotation: Quat, translation: Vec3, offset_along_normal: f32) -> StaticShape {
    let normal = rotation * Vec3::new(0.0, 1.0, 0.0);
    let dist = normal.dot(&translation) + offset_along_normal;
    StaticShape::Plane { normal, dist }
}

/// Convenience: build a `StaticShape::Cuboid` with given half extents and pose.
#[inline]
pub fn cuboid_from_pose(half_extents: Vec3, translation: Vec3, rotation: Quat) -> StaticShape {
    StaticShape::Cuboid {
        half_extents,
        transform: Transform {
            translation,
            rotation,
        },
    }
}

/// Character capsule dimensions in the controller's `(radius, height, center_y)` form.
///
/// `height` is the full capsule height (caps included). The motor's transient
/// position is the character base, and the capsule center rides `center_y`
/// along character-up above it, so shrinking the capsule (crouching) keeps the
/// feet planted.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapsuleSpec {
    pub radius: f32,
    pub height: f32,
    pub center_y: f32,
}

impl CapsuleSpec {
    /// Clamps the height so the capsule never degenerates below a sphere.
    #[inline]
    pub fn new(radius: f32, height: f32, center_y: f32) -> Self {
        Self {
            radius,
            height: height.max(radius * 2.0),
            center_y,
        }
    }

    /// Half-length of the cylinder section (the `parry3d` capsule parameter).
    #[inline]
    pub fn half_height(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }

    /// Same capsule with the radius grown by `inflate` (used by proximity probes).
    #[inline]
    pub fn inflated(&self, inflate: f32) -> Self {
        Self {
            radius: self.radius + inflate,
            ..*self
        }
    }
}

/// Identifies a collider inside the world that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColliderHandle(pub u32);

/// A single contact returned by a shape-cast (time-of-impact) query.
#[derive(Clone, Copy, Debug)]
pub struct MoveHit {
    /// Collider that was hit.
    pub collider: ColliderHandle,
    /// World-space contact normal, opposing the cast direction.
    pub normal: Vec3,
    /// Approximate world-space contact point on the cast shape's surface.
    pub point: Vec3,
    /// Fraction (0..1) of the tested translation where the hit occurred.
    pub fraction: f32,
}

/// Separation vector for an overlapping collider pair.
#[derive(Clone, Copy, Debug)]
pub struct PenetrationHit {
    /// Unit direction that moves the character out of the overlap.
    pub direction: Vec3,
    /// Overlap depth along `direction` (meters).
    pub depth: f32,
}
