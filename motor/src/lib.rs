/*!
Kinematic capsule motor for character controllers.

This crate owns everything between "a velocity was decided" and "the capsule
ended up somewhere legal": narrow-phase collision queries over a static world,
sweep-and-slide integration, grounding classification, and the fixed per-tick
callback protocol a character behavior plugs into. The code is split for
clarity:

- types:        shared data types (Transform, StaticShape, CapsuleSpec, etc.)
- settings:     motor and tolerance constants
- queries:      the physics-query trait, query filters, scratch overlap buffers
- static_world: parry3d-backed implementation of the query trait
- callbacks:    the per-tick behavior hooks and stability reports
- motor:        the motor itself (pose, velocity, grounding, tick loop)
*/

pub mod callbacks;
pub mod motor;
pub mod queries;
pub mod settings;
pub mod static_world;
pub mod types;

// Re-export commonly used types and functions.
pub use callbacks::{CharacterBehavior, HitStabilityReport, TickContext};
pub use motor::{GroundingStatus, Motor};
pub use queries::{OverlapHits, PhysicsQueries, QueryFilter};
pub use settings::MotorConfig;
pub use static_world::StaticWorld;
pub use types::{
    CapsuleSpec, ColliderHandle, Iso, MoveHit, PenetrationHit, Quat, StaticShape, Transform, Vec2,
    Vec3, cuboid_from_pose, plane_from_pose,
};
