//! Immutable tunables for every character feature.
//!
//! Each struct is built once at startup (defaults below, or deserialized by
//! the host with the `serde` feature) and handed to its feature by value.
//! Nothing here mutates at runtime.

use motor::{CapsuleSpec, Vec3};

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StableMovementConfig {
    pub enabled: bool,
    pub max_speed: f32,
    /// Exponential smoothing sharpness toward the target velocity.
    pub sharpness: f32,
}

impl Default for StableMovementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_speed: 5.0,
            sharpness: 15.0,
        }
    }
}

/// Movement in the air and on slopes too steep to stand on.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnstableMovementConfig {
    pub enabled: bool,
    pub max_speed: f32,
    pub acceleration: f32,
}

impl Default for UnstableMovementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_speed: 3.0,
            acceleration: 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementConfig {
    /// Interpret move input in world space instead of the camera's basis.
    pub world_space_input: bool,
    pub stable: StableMovementConfig,
    pub unstable: UnstableMovementConfig,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientTowardsInputConfig {
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientTowardsMovementConfig {
    pub enabled: bool,
    pub sharpness: f32,
}

impl Default for OrientTowardsMovementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sharpness: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientTowardsGroundConfig {
    pub enabled: bool,
    /// Total degrees per second the up axis may turn toward the surface.
    pub max_degree_change: f32,
    /// Offset above the character base for the overlap probe center.
    pub overlap_vertical_offset: f32,
    /// Offset applied before the penetration query (slightly into the ground).
    pub depenetration_vertical_offset: f32,
    pub max_iterations: u32,
}

impl Default for OrientTowardsGroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_degree_change: 60.0,
            overlap_vertical_offset: 0.4,
            depenetration_vertical_offset: -0.07,
            max_iterations: 8,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RotationConfig {
    pub orient_towards_input: OrientTowardsInputConfig,
    pub orient_towards_movement: OrientTowardsMovementConfig,
    pub orient_towards_ground: OrientTowardsGroundConfig,
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DragConfig {
    pub drag: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { drag: 0.1 }
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GravityConfig {
    pub enabled: bool,
    /// Keep the character's up axis opposed to gravity.
    pub orient_towards_gravity: bool,
    pub gravity: Vec3,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            orient_towards_gravity: false,
            gravity: Vec3::new(0.0, -30.0, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoubleJumpConfig {
    pub enabled: bool,
}

impl Default for DoubleJumpConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallJumpConfig {
    pub enabled: bool,
    /// How much of the jump direction comes from character-up rather than the
    /// wall normal (0..1).
    pub upward_contribution: f32,
    /// Extra capsule radius used when probing for nearby walls.
    pub inflate_radius: f32,
    /// Air-control damping [0,1] keyed by seconds since the air jump.
    pub movement_resistance: ResponseCurve,
}

impl Default for WallJumpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            upward_contribution: 0.66,
            inflate_radius: 0.1,
            movement_resistance: ResponseCurve::default(),
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JumpingConfig {
    pub enabled: bool,
    /// Allow jumping off unstable slopes (along the slope normal).
    pub slope_jumping: bool,
    pub jump_height: f32,
    pub double_jump: DoubleJumpConfig,
    pub wall_jump: WallJumpConfig,
}

impl Default for JumpingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            slope_jumping: false,
            jump_height: 3.0,
            double_jump: DoubleJumpConfig::default(),
            wall_jump: WallJumpConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChargingConfig {
    pub enabled: bool,
    pub speed: f32,
    pub max_duration: f32,
    /// How long the character stays inert after the charge stops before
    /// control returns to the default mode.
    pub stopped_time: f32,
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 15.0,
            max_duration: 1.5,
            stopped_time: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoClipConfig {
    pub enabled: bool,
    pub speed: f32,
    pub sharpness: f32,
}

impl Default for NoClipConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 10.0,
            sharpness: 15.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrouchingConfig {
    pub enabled: bool,
    pub capsule: CapsuleSpec,
    /// Mesh scale published while crouched.
    pub mesh_scale: Vec3,
}

impl Default for CrouchingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capsule: CapsuleSpec::new(0.5, 1.0, 0.5),
            mesh_scale: Vec3::new(1.0, 0.5, 1.0),
        }
    }
}

/// Aggregate of every feature's tunables.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterConfig {
    pub movement: MovementConfig,
    pub rotation: RotationConfig,
    pub drag: DragConfig,
    pub gravity: GravityConfig,
    pub jumping: JumpingConfig,
    pub charging: ChargingConfig,
    pub no_clip: NoClipConfig,
    pub crouching: CrouchingConfig,
}

/// Piecewise-linear response curve over sorted `(time, value)` keyframes.
/// Sampling clamps to the first/last keyframe outside the covered range.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseCurve {
    keys: Vec<(f32, f32)>,
}

impl ResponseCurve {
    pub fn new(mut keys: Vec<(f32, f32)>) -> Self {
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    pub fn sample(&self, t: f32) -> f32 {
        let Some(&(first_t, first_v)) = self.keys.first() else {
            return 0.0;
        };
        if t <= first_t {
            return first_v;
        }

        for pair in self.keys.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return v1;
                }
                return v0 + (v1 - v0) * ((t - t0) / span);
            }
        }

        self.keys.last().map(|&(_, v)| v).unwrap_or(0.0)
    }
}

impl Default for ResponseCurve {
    /// Full damping right after the jump, fading out over one second.
    fn default() -> Self {
        Self::new(vec![(0.0, 1.0), (1.0, 0.0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn response_curve_interpolates_and_clamps() {
        let curve = ResponseCurve::new(vec![(1.0, 0.0), (0.0, 1.0)]); // unsorted on purpose

        assert_relative_eq!(curve.sample(-1.0), 1.0);
        assert_relative_eq!(curve.sample(0.0), 1.0);
        assert_relative_eq!(curve.sample(0.25), 0.75);
        assert_relative_eq!(curve.sample(1.0), 0.0);
        assert_relative_eq!(curve.sample(5.0), 0.0);
    }

    #[test]
    fn empty_curve_samples_to_zero() {
        let curve = ResponseCurve::new(Vec::new());
        assert_eq!(curve.sample(0.5), 0.0);
    }

    #[test]
    fn defaults_match_the_documented_tuning() {
        let config = CharacterConfig::default();
        assert_eq!(config.movement.stable.max_speed, 5.0);
        assert_eq!(config.gravity.gravity.y, -30.0);
        assert_eq!(config.jumping.jump_height, 3.0);
        assert_eq!(config.charging.speed, 15.0);
        assert!(!config.rotation.orient_towards_input.enabled);
        assert!(config.rotation.orient_towards_movement.enabled);
    }
}
