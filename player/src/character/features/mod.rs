//! The character's composable features.
//!
//! Each feature is an independent, stateful strategy object. The controller
//! owns one of each and calls into them in a fixed, mode-dependent order
//! every tick; a feature only ever sees the velocity/rotation left behind by
//! the features that ran before it in the same tick.

pub mod charging;
pub mod crouching;
pub mod drag;
pub mod external_force;
pub mod gravity;
pub mod jumping;
pub mod landing_events;
pub mod movement;
pub mod no_clip;
pub mod rotation;

pub use charging::ChargingFeature;
pub use crouching::CrouchingFeature;
pub use drag::DragFeature;
pub use external_force::ExternalForceFeature;
pub use gravity::GravityFeature;
pub use jumping::JumpingFeature;
pub use landing_events::LandingEventsFeature;
pub use movement::MovementFeature;
pub use no_clip::NoClipFeature;
pub use rotation::RotationFeature;
