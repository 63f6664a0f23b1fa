//! Per-frame simulation tick
//!
//! Advances the flight one display frame. Per-frame constants are scaled by
//! `dt / REFERENCE_DT` so the feel holds when the frame rate drifts.

use glam::Vec2;

use super::body::BodyIndex;
use super::orbit::advance_orbits;
use super::ship::AutopilotStep;
use super::state::{FlightEvent, FlightState};
use crate::consts::*;

/// Control signals for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub thrust: bool,
    /// Virtual joystick deflection while touched (magnitude <= 1, y down)
    pub joystick: Option<Vec2>,
    /// One-shot: engage autopilot toward a body
    pub navigate_to: Option<BodyIndex>,
    /// One-shot: disengage autopilot
    pub abort_autopilot: bool,
}

impl ControlInput {
    /// Any steering input; cancels autopilot
    pub fn is_manual(&self) -> bool {
        self.rotate_left || self.rotate_right || self.thrust || self.joystick.is_some()
    }

    /// Signed rotation axis: keys give +/-1, joystick adds its x past the deadzone
    pub fn rotation_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.rotate_left {
            axis -= 1.0;
        }
        if self.rotate_right {
            axis += 1.0;
        }
        if let Some(joy) = self.joystick.map(|j| j.clamp_length_max(1.0)) {
            if joy.x.abs() > JOYSTICK_ROTATE_DEADZONE {
                axis += joy.x;
            }
        }
        axis
    }

    /// Thrust from the key or from pushing the joystick up
    pub fn thrust_pressed(&self) -> bool {
        self.thrust
            || self
                .joystick
                .is_some_and(|j| j.clamp_length_max(1.0).y < JOYSTICK_THRUST_THRESHOLD)
    }

    /// Clear one-shot commands after they were consumed
    pub fn clear_one_shots(&mut self) {
        self.navigate_to = None;
        self.abort_autopilot = false;
    }
}

/// Frame delta accepted by the tick, in seconds
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DT)
    } else {
        REFERENCE_DT
    }
}

/// Advance the flight by one frame
///
/// Order: commands, ship physics, particle spawn, orbits, particle advance,
/// proximity. While paused only the commands and the proximity refresh run.
pub fn tick(state: &mut FlightState, input: &ControlInput, dt: f32) {
    let scale = sanitize_dt(dt) / REFERENCE_DT;

    // Commands are intents and are honoured even while paused
    if input.abort_autopilot {
        state.abort_autopilot();
    }
    if let Some(target) = input.navigate_to {
        state.navigate_to(target);
    }

    if !state.is_paused() {
        state.time_ticks += 1;
        step_ship(state, input, scale);

        let warp = state.warp_intensity();
        let warping = state.is_warping();
        if state.thrusting || warping {
            let (pos, heading) = (state.ship.position, state.ship.heading);
            state.particles.emit(pos, heading, warp, warping);
        }

        advance_orbits(state.catalog.bodies_mut(), scale);
        state.particles.advance(warping, &state.tuning, scale);
    }

    state
        .proximity
        .update(state.ship.position, state.catalog.bodies());
}

fn step_ship(state: &mut FlightState, input: &ControlInput, scale: f32) {
    if input.is_manual() && state.autopilot.is_engaged() {
        state.abort_autopilot();
    }

    let mut thrusting = false;
    match state.autopilot.target() {
        Some(index) => match state.catalog.get(index).map(|b| b.position) {
            Some(target) => match state.ship.steer_autopilot(target, &state.tuning, scale) {
                AutopilotStep::Arrived => {
                    state.autopilot.abort();
                    log::info!("Autopilot arrived at {}", state.catalog.bodies()[index.0].id);
                    state.push_event(FlightEvent::AutopilotArrived { target: index });
                }
                AutopilotStep::Cruising { .. } => thrusting = true,
            },
            None => {
                log::warn!("Autopilot target {} left the catalog", index.0);
                state.abort_autopilot();
            }
        },
        None => {
            thrusting = input.thrust_pressed();
            state
                .ship
                .steer_manual(input.rotation_axis(), thrusting, &state.tuning, scale);
        }
    }

    state.ship.integrate(scale);
    state.thrusting = thrusting;
}
