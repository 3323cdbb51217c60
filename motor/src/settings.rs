/*!
Kinematic motor settings and tolerances.

These constants centralize the parameters used by the sweep-and-slide solver
and the grounding probes. Keeping them together makes tuning easier and helps
ensure deterministic behavior across platforms.

Notes
- Distances are in meters, time in seconds, angles in degrees.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
- `MotorConfig` snapshots the per-actor subset with these as defaults; override
  from your game data when an actor needs different tuning.
*/

/// Separation from surfaces kept when landing or sliding (meters).
/// Too large creates visible gaps; too small risks jitter on contact.
pub const DEFAULT_SKIN: f32 = 0.02;

/// Maximum number of slide iterations per kinematic step.
/// Higher values help with tight corners at the cost of more queries.
pub const DEFAULT_MAX_SLIDE_ITERATIONS: u32 = 4;

/// Minimum squared movement threshold to consider a step meaningful (m^2).
/// Movements below this are treated as zero to avoid tiny oscillations.
pub const MIN_MOVE_SQ: f32 = 1.0e-8;

/// Practical small distance for comparisons (meters).
/// Use for dot-product guards, equality checks in world space, etc.
pub const DIST_EPS: f32 = 1.0e-6;

/// Downward probe distance used to keep contact with ground the character
/// already stands on (meters).
pub const GROUND_PROBE_DISTANCE: f32 = 0.08;

/// Max downward snap distance used to latch onto ground while airborne (meters).
/// Small values keep the controller from snapping through gaps.
pub const AIRBORNE_SNAP_DISTANCE: f32 = 0.30;

/// Hover height above detected ground along the ground normal (meters).
/// Prevents exact contact, which reduces jitter and depenetration needs.
pub const SNAP_HOVER_HEIGHT: f32 = 0.02;

/// Steepest slope (degrees from character-up) still classified as stable,
/// walkable ground. Steeper contacts only count as "found any ground".
pub const MAX_STABLE_SLOPE_DEG: f32 = 60.0;

/// Capacity of the reusable overlap scratch buffers. Overlap queries silently
/// truncate past this many colliders.
pub const MAX_OVERLAP_HITS: usize = 16;

/// Vertical speed above which an airborne character is considered ascending
/// and must not latch onto ground below it (m/s).
pub const ASCENT_GROUNDING_CUTOFF: f32 = 1.0e-3;

/// Per-actor motor tuning. All fields default to the module constants.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorConfig {
    pub skin: f32,
    pub max_slide_iterations: u32,
    pub ground_probe_distance: f32,
    pub airborne_snap_distance: f32,
    pub hover_height: f32,
    pub max_stable_slope_deg: f32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            skin: DEFAULT_SKIN,
            max_slide_iterations: DEFAULT_MAX_SLIDE_ITERATIONS,
            ground_probe_distance: GROUND_PROBE_DISTANCE,
            airborne_snap_distance: AIRBORNE_SNAP_DISTANCE,
            hover_height: SNAP_HOVER_HEIGHT,
            max_stable_slope_deg: MAX_STABLE_SLOPE_DEG,
        }
    }
}
