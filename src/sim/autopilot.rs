//! Autopilot navigator
//!
//! Three-zone braking curve:
//! - Far (> braking radius): flat warp cap
//! - Mid: `sqrt(2 * a * d)` so speed falls with remaining distance
//! - Near (<= slow radius): linear creep, reaching zero at the target

use serde::{Deserialize, Serialize};

use super::body::BodyIndex;
use crate::settings::FlightTuning;

/// Which part of the braking curve applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedZone {
    Far,
    Mid,
    Near,
}

impl SpeedZone {
    pub fn for_distance(distance: f32, tuning: &FlightTuning) -> Self {
        if distance > tuning.braking_radius {
            SpeedZone::Far
        } else if distance > tuning.slow_radius {
            SpeedZone::Mid
        } else {
            SpeedZone::Near
        }
    }
}

/// Desired speed at `distance` from the target
pub fn target_speed(distance: f32, tuning: &FlightTuning) -> f32 {
    let distance = distance.max(0.0);
    match SpeedZone::for_distance(distance, tuning) {
        SpeedZone::Far => tuning.warp_max_speed,
        SpeedZone::Mid => (2.0 * tuning.deceleration * distance).sqrt(),
        SpeedZone::Near => distance * tuning.creep_factor,
    }
}

/// Autopilot engagement state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autopilot {
    target: Option<BodyIndex>,
}

impl Autopilot {
    pub fn target(&self) -> Option<BodyIndex> {
        self.target
    }

    pub fn is_engaged(&self) -> bool {
        self.target.is_some()
    }

    /// Steer toward `target`. Returns false if it was already the target.
    pub fn engage(&mut self, target: BodyIndex) -> bool {
        if self.target == Some(target) {
            return false;
        }
        self.target = Some(target);
        true
    }

    /// Disengage. Returns false if nothing was engaged.
    pub fn abort(&mut self) -> bool {
        self.target.take().is_some()
    }
}
