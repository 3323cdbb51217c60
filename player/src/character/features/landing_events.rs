//! Edge detection for stable-ground transitions.
//!
//! Currently only surfaces the transitions as debug logs; the hooks are the
//! extension point for landing effects, footstep audio and the like.

use motor::TickContext;

#[derive(Default)]
pub struct LandingEventsFeature;

impl LandingEventsFeature {
    pub fn new() -> Self {
        Self
    }

    pub fn post_grounding_update(&mut self, ctx: &mut TickContext<'_>) {
        let stable_now = ctx.motor.grounding().is_stable_on_ground;
        let stable_before = ctx.motor.last_grounding().is_stable_on_ground;

        if stable_now && !stable_before {
            self.on_landed();
        } else if !stable_now && stable_before {
            self.on_left_stable_ground();
        }
    }

    fn on_landed(&mut self) {
        log::debug!("landed");
    }

    fn on_left_stable_ground(&mut self) {
        log::debug!("left stable ground");
    }
}
