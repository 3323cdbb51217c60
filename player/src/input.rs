//! The immutable per-tick input snapshot consumed by the character
//! controller, plus a small edge detector for deriving the press/release
//! flags from level-triggered device state.

use motor::{Quat, Vec3};

/// One tick's worth of control signals. Built once per input cycle by the
/// host's polling layer and never mutated afterwards.
#[derive(Clone, Copy, Debug)]
pub struct PlayerInputs {
    /// Planar move vector (x, z), magnitude clamped to 1.
    pub move_input: Vec3,
    /// Current camera orientation; features derive their planar basis from it.
    pub camera_rotation: Quat,
    pub jump_down: bool,
    pub jump_held: bool,
    pub crouch_down: bool,
    pub crouch_up: bool,
    pub crouch_held: bool,
    pub charge_down: bool,
    pub no_clip_down: bool,
    pub fly_up: bool,
    pub fly_down: bool,
}

impl PlayerInputs {
    /// Snapshot with the move vector clamped and every signal released.
    /// Set the flags with struct-update syntax.
    pub fn new(move_input: Vec3, camera_rotation: Quat) -> Self {
        Self {
            move_input: clamp_magnitude(move_input, 1.0),
            camera_rotation,
            ..Self::default()
        }
    }
}

impl Default for PlayerInputs {
    fn default() -> Self {
        Self {
            move_input: Vec3::zeros(),
            camera_rotation: Quat::identity(),
            jump_down: false,
            jump_held: false,
            crouch_down: false,
            crouch_up: false,
            crouch_held: false,
            charge_down: false,
            no_clip_down: false,
            fly_up: false,
            fly_down: false,
        }
    }
}

fn clamp_magnitude(v: Vec3, max: f32) -> Vec3 {
    let len_sq = v.norm_squared();
    if len_sq > max * max {
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

/// Press/release edges of one button across snapshots.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonEdges {
    pub pressed: bool,
    pub released: bool,
    pub held: bool,
}

/// Remembers a button's previous level and reports transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonState {
    held: bool,
}

impl ButtonState {
    pub fn update(&mut self, held_now: bool) -> ButtonEdges {
        let edges = ButtonEdges {
            pressed: held_now && !self.held,
            released: !held_now && self.held,
            held: held_now,
        };
        self.held = held_now;
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_input_is_clamped_to_unit_magnitude() {
        let inputs = PlayerInputs::new(Vec3::new(3.0, 0.0, 4.0), Quat::identity());
        assert!((inputs.move_input.norm() - 1.0).abs() < 1.0e-5);
        // Direction preserved.
        assert!(inputs.move_input.x > 0.0 && inputs.move_input.z > 0.0);

        let small = PlayerInputs::new(Vec3::new(0.3, 0.0, 0.0), Quat::identity());
        assert_eq!(small.move_input, Vec3::new(0.3, 0.0, 0.0));
    }

    #[test]
    fn button_state_reports_single_edges() {
        let mut button = ButtonState::default();

        let e = button.update(true);
        assert!(e.pressed && !e.released && e.held);

        // Holding produces no further press edge.
        let e = button.update(true);
        assert!(!e.pressed && !e.released && e.held);

        let e = button.update(false);
        assert!(!e.pressed && e.released && !e.held);

        let e = button.update(false);
        assert!(!e.pressed && !e.released && !e.held);
    }
}
