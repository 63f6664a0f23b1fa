//! Ship physics
//!
//! The ship always travels along its heading with a single scalar speed.
//! Velocity is derived on demand.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::autopilot::{SpeedZone, target_speed};
use crate::settings::FlightTuning;
use crate::{heading_vector, normalize_degrees};

/// Outcome of one autopilot steering step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutopilotStep {
    /// Snapped onto the target and stopped
    Arrived,
    Cruising { zone: SpeedZone, distance: f32 },
}

/// Player ship kinematics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub position: Vec2,
    /// Degrees in [0, 360), 0 = +x, 90 = +y (screen down)
    pub heading: f32,
    /// World units per reference frame, never negative
    pub speed: f32,
}

impl Ship {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            heading: 0.0,
            speed: 0.0,
        }
    }

    /// Velocity vector along the current heading
    pub fn velocity(&self) -> Vec2 {
        heading_vector(self.heading) * self.speed
    }

    /// Manual flight step
    ///
    /// `rotation` is a signed axis (-1 left .. +1 right, joystick may add
    /// more); `thrust` accelerates along the heading.
    pub fn steer_manual(&mut self, rotation: f32, thrust: bool, tuning: &FlightTuning, scale: f32) {
        if rotation != 0.0 && rotation.is_finite() {
            self.heading = normalize_degrees(self.heading + rotation * tuning.rotation_speed * scale);
        }

        if thrust {
            self.speed = (self.speed + tuning.manual_acceleration * scale).min(tuning.manual_max_speed);
        } else {
            self.speed *= tuning.friction.powf(scale);
            if self.speed < tuning.stop_threshold {
                self.speed = 0.0;
            }
        }

        if self.speed > tuning.high_speed_drag_threshold {
            self.speed *= tuning.high_speed_drag.powf(scale);
        }

        self.speed = self.speed.clamp(0.0, tuning.manual_max_speed);
    }

    /// Autopilot step toward `target`
    ///
    /// Arrival is checked before anything divides by the distance.
    pub fn steer_autopilot(&mut self, target: Vec2, tuning: &FlightTuning, scale: f32) -> AutopilotStep {
        let to_target = target - self.position;
        let distance = to_target.length();

        if distance < tuning.arrival_epsilon || !distance.is_finite() {
            if distance.is_finite() {
                self.position = target;
            }
            self.speed = 0.0;
            return AutopilotStep::Arrived;
        }

        self.heading = normalize_degrees(to_target.y.atan2(to_target.x).to_degrees());

        let zone = SpeedZone::for_distance(distance, tuning);
        let desired = target_speed(distance, tuning);
        if self.speed < desired {
            self.speed += tuning.warp_acceleration * scale;
        } else {
            let brake = if distance < tuning.slow_radius {
                tuning.slow_zone_brake
            } else {
                tuning.cruise_brake
            };
            self.speed = (self.speed * brake.powf(scale)).min(desired);
        }

        // Never cover more than the remaining distance in one step
        self.speed = self.speed.clamp(0.0, tuning.warp_max_speed).min(distance / scale);

        AutopilotStep::Cruising { zone, distance }
    }

    /// Cap speed to the manual regime (autopilot hand-off)
    pub fn limit_to_manual(&mut self, tuning: &FlightTuning) {
        self.speed = self.speed.min(tuning.manual_max_speed);
    }

    /// Move along the heading
    pub fn integrate(&mut self, scale: f32) {
        self.position += self.velocity() * scale;
    }
}
