//! The charge attack: a fixed-speed horizontal dash that ends on timeout or
//! on slamming into something head-on.

use motor::{HitStabilityReport, Motor, MoveHit, Vec3};

use crate::config::ChargingConfig;

pub struct ChargingFeature {
    config: ChargingConfig,
    charge_velocity: Vec3,
    is_stopped: bool,
    must_stop_velocity: bool,
    current_duration: f32,
    time_since_stopped: f32,
}

impl ChargingFeature {
    pub fn new(config: ChargingConfig) -> Self {
        Self {
            config,
            charge_velocity: Vec3::zeros(),
            is_stopped: false,
            must_stop_velocity: false,
            current_duration: 0.0,
            time_since_stopped: 0.0,
        }
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Lock the charge direction and reset the counters. Returns `false` when
    /// the feature is disabled and the mode switch should be rolled back.
    pub fn on_enter(&mut self, motor: &Motor) -> bool {
        if !self.config.enabled {
            return false;
        }

        self.charge_velocity = motor.character_forward() * self.config.speed;
        self.is_stopped = false;
        self.must_stop_velocity = false;
        self.current_duration = 0.0;
        self.time_since_stopped = 0.0;
        true
    }

    pub fn before_update(&mut self, dt: f32) {
        self.current_duration += dt;
        if self.is_stopped {
            self.time_since_stopped += dt;
        }
    }

    pub fn update_velocity(&mut self, velocity: &mut Vec3, dt: f32, gravity: Vec3) {
        if self.must_stop_velocity {
            *velocity = Vec3::zeros();
            self.must_stop_velocity = false;
        }

        if self.is_stopped {
            // When stopped, add gravity only.
            *velocity += gravity * dt;
        } else {
            // While charging, the horizontal velocity is locked every tick.
            velocity.x = self.charge_velocity.x;
            velocity.z = self.charge_velocity.z;
            *velocity += gravity * dt;
        }
    }

    /// Advance the stop state machine. Returns `true` once the stopped phase
    /// has run its course and control should revert to the default mode.
    pub fn after_update(&mut self, _dt: f32) -> bool {
        if !self.is_stopped && self.current_duration > self.config.max_duration {
            self.must_stop_velocity = true;
            self.is_stopped = true;
            log::debug!("charge stopped: max duration exceeded");
        }

        self.time_since_stopped > self.config.stopped_time
    }

    /// Detect being stopped by an obstruction: an unstable hit whose normal
    /// opposes the charge direction within ~60 degrees.
    pub fn on_movement_hit(&mut self, hit: &MoveHit, report: &HitStabilityReport) {
        let speed_sq = self.charge_velocity.norm_squared();
        if speed_sq <= 1.0e-12 {
            return;
        }
        let charge_direction = self.charge_velocity / speed_sq.sqrt();
        let head_on = (-hit.normal).dot(&charge_direction) > 0.5;

        if !self.is_stopped && !report.is_stable && head_on {
            self.must_stop_velocity = true;
            self.is_stopped = true;
            log::debug!("charge stopped: obstruction");
        }
    }
}
