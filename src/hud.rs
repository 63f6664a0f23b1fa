//! HUD snapshots
//!
//! The low-frequency tier copies a settled, read-only view of the flight into
//! a [`HudSnapshot`] and sends it down a one-way pipe. The presentation layer
//! never holds a reference into the simulation.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use glam::Vec2;
use serde::Serialize;

use crate::renderer::{Viewport, visible_bodies};
use crate::sim::{BodyIndex, BodyKind, CelestialBody, FlightState};

/// Identity of a body as shown on the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyLabel {
    pub index: BodyIndex,
    pub id: String,
    pub name: String,
    pub thai_name: String,
    pub kind: BodyKind,
}

impl BodyLabel {
    fn new(index: BodyIndex, body: &CelestialBody) -> Self {
        Self {
            index,
            id: body.id.clone(),
            name: body.name.clone(),
            thai_name: body.thai_name.clone(),
            kind: body.kind,
        }
    }
}

/// Everything the overlay shows, copied at ~30 Hz
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub heading: f32,
    pub nearest: Option<BodyLabel>,
    pub distance_to_nearest: f32,
    pub scan_ready: bool,
    pub zoom: f32,
    pub autopilot_target: Option<BodyLabel>,
    pub visited_ids: Vec<String>,
    pub is_thrusting: bool,
    pub is_warping: bool,
    pub warp_factor: f32,
    pub paused: bool,
    /// Body the current mission wants scanned
    pub mission_target: Option<String>,
    /// Nearest body is the mission target (highlight it)
    pub nearest_is_mission_target: bool,
    /// Bodies worth materializing in the scene
    pub visible_bodies: Vec<BodyIndex>,
}

impl HudSnapshot {
    /// Copy the HUD-relevant slice of the flight
    pub fn capture(state: &FlightState, viewport: Viewport, mission_target: Option<&str>) -> Self {
        let nearest = state
            .proximity
            .nearest()
            .and_then(|i| state.catalog.get(i).map(|b| BodyLabel::new(i, b)));
        let autopilot_target = state
            .autopilot
            .target()
            .and_then(|i| state.catalog.get(i).map(|b| BodyLabel::new(i, b)));
        let nearest_is_mission_target = match (&nearest, mission_target) {
            (Some(n), Some(target)) => n.id == target,
            _ => false,
        };

        Self {
            position: state.ship.position,
            velocity: state.ship.velocity(),
            speed: state.ship.speed,
            heading: state.ship.heading,
            nearest,
            distance_to_nearest: state.proximity.distance(),
            scan_ready: state.scan_eligible(),
            zoom: state.zoom(),
            autopilot_target,
            visited_ids: state.visited().map(str::to_string).collect(),
            is_thrusting: state.thrusting,
            is_warping: state.is_warping(),
            warp_factor: state.warp_intensity(),
            paused: state.is_paused(),
            mission_target: mission_target.map(str::to_string),
            nearest_is_mission_target,
            visible_bodies: visible_bodies(&state.catalog, state.ship.position, state.zoom(), viewport),
        }
    }

    /// Zoom as the percent shown in the HUD field
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Sending half, owned by the frame loop
#[derive(Debug)]
pub struct HudPublisher {
    tx: Sender<HudSnapshot>,
}

/// Receiving half, owned by the presentation layer
#[derive(Debug)]
pub struct HudReceiver {
    rx: Receiver<HudSnapshot>,
    last: Option<HudSnapshot>,
}

/// Create a connected publisher/receiver pair
pub fn hud_channel() -> (HudPublisher, HudReceiver) {
    let (tx, rx) = mpsc::channel();
    (HudPublisher { tx }, HudReceiver { rx, last: None })
}

impl HudPublisher {
    /// Send a snapshot; false once the receiver is gone
    pub fn publish(&self, snapshot: HudSnapshot) -> bool {
        self.tx.send(snapshot).is_ok()
    }
}

impl HudReceiver {
    /// Newest snapshot, dropping any older ones still queued
    pub fn latest(&mut self) -> Option<&HudSnapshot> {
        loop {
            match self.rx.try_recv() {
                Ok(snapshot) => self.last = Some(snapshot),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.last.as_ref()
    }
}
