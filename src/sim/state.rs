//! Flight state and core simulation types
//!
//! One owned struct holds everything the frame loop mutates. The HUD and the
//! projector only ever read it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::autopilot::Autopilot;
use super::body::{BodyIndex, CelestialBody};
use super::catalog::Catalog;
use super::particles::ParticleSystem;
use super::proximity::ProximityTracker;
use super::ship::Ship;
use crate::consts::*;
use crate::error::{CatalogError, ScanError};
use crate::settings::{FlightTuning, Settings};

/// Current phase of flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    Running,
    /// Physics frozen; projection still runs
    Paused,
}

/// Notable things that happened during a tick or command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlightEvent {
    AutopilotEngaged { target: BodyIndex },
    AutopilotArrived { target: BodyIndex },
    /// Cancelled by manual input or an explicit abort
    AutopilotAborted { target: BodyIndex },
    Scanned { target: BodyIndex },
    Paused,
    Resumed,
}

/// Complete flight state
#[derive(Debug, Clone)]
pub struct FlightState {
    pub tuning: FlightTuning,
    pub phase: FlightPhase,
    pub ship: Ship,
    pub catalog: Catalog,
    pub autopilot: Autopilot,
    pub particles: ParticleSystem,
    pub proximity: ProximityTracker,
    /// Whether the engine fired on the last running tick
    pub thrusting: bool,
    /// Simulation tick counter (running ticks only)
    pub time_ticks: u64,
    zoom: f32,
    /// Scanned body ids in scan order
    visited: Vec<String>,
    events: Vec<FlightEvent>,
    /// Catalog as first loaded, for rebuilding on session reset
    initial_catalog: Catalog,
    seed: u64,
}

impl FlightState {
    pub fn new(catalog: Catalog, tuning: FlightTuning, seed: u64) -> Self {
        let (x, y) = INITIAL_SHIP_POS;
        let mut state = Self {
            tuning,
            phase: FlightPhase::Running,
            ship: Ship::new(Vec2::new(x, y)),
            catalog: catalog.clone(),
            autopilot: Autopilot::default(),
            particles: ParticleSystem::new(seed),
            proximity: ProximityTracker::default(),
            thrusting: false,
            time_ticks: 0,
            zoom: 1.0,
            visited: Vec::new(),
            events: Vec::new(),
            initial_catalog: catalog,
            seed,
        };
        state
            .proximity
            .update(state.ship.position, state.catalog.bodies());
        state
    }

    /// Built-in catalog with the user's effective tuning
    pub fn from_settings(settings: &Settings, seed: u64) -> Result<Self, CatalogError> {
        Ok(Self::new(Catalog::builtin()?, settings.effective_tuning(), seed))
    }

    // === Autopilot ===

    /// Engage autopilot toward `target`
    ///
    /// Re-issuing the current target is a no-op. Returns whether anything
    /// changed.
    pub fn navigate_to(&mut self, target: BodyIndex) -> bool {
        if self.catalog.get(target).is_none() {
            log::warn!("Ignoring navigation to unknown body index {}", target.0);
            return false;
        }
        if !self.autopilot.engage(target) {
            return false;
        }
        log::info!("Autopilot engaged: {}", self.catalog.bodies()[target.0].id);
        self.events.push(FlightEvent::AutopilotEngaged { target });
        true
    }

    /// Engage autopilot by body id
    pub fn navigate_to_id(&mut self, id: &str) -> Result<bool, CatalogError> {
        let target = self.catalog.find(id)?;
        Ok(self.navigate_to(target))
    }

    /// Disengage autopilot, dropping to manual speed. No-op when idle.
    pub fn abort_autopilot(&mut self) -> bool {
        let Some(target) = self.autopilot.target() else {
            return false;
        };
        self.autopilot.abort();
        self.ship.limit_to_manual(&self.tuning);
        log::info!("Autopilot aborted");
        self.events.push(FlightEvent::AutopilotAborted { target });
        true
    }

    pub fn autopilot_target(&self) -> Option<&CelestialBody> {
        self.autopilot.target().and_then(|i| self.catalog.get(i))
    }

    // === Zoom ===

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set zoom, clamped to the valid range. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Apply a zoom typed into the HUD percent field
    pub fn set_zoom_percent(&mut self, input: &str) {
        self.set_zoom(parse_zoom_percent(input));
    }

    // === Phase ===

    pub fn is_paused(&self) -> bool {
        self.phase == FlightPhase::Paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        let next = if paused {
            FlightPhase::Paused
        } else {
            FlightPhase::Running
        };
        if next == self.phase {
            return;
        }
        self.phase = next;
        if paused {
            self.thrusting = false;
            self.events.push(FlightEvent::Paused);
        } else {
            self.events.push(FlightEvent::Resumed);
        }
    }

    // === Derived values ===

    pub fn warp_intensity(&self) -> f32 {
        crate::warp_intensity(self.ship.speed)
    }

    pub fn is_warping(&self) -> bool {
        self.ship.speed > WARP_SPEED_THRESHOLD
    }

    /// Engine hum plays while thrusting below half warp
    pub fn engine_sound(&self) -> bool {
        !self.is_paused() && self.thrusting && self.warp_intensity() < 0.5
    }

    pub fn warp_sound(&self) -> bool {
        !self.is_paused() && self.is_warping()
    }

    pub fn nearest_body(&self) -> Option<&CelestialBody> {
        self.proximity.nearest().and_then(|i| self.catalog.get(i))
    }

    pub fn scan_eligible(&self) -> bool {
        !self.is_paused() && self.proximity.scan_eligible(self.tuning.scan_distance)
    }

    // === Scanning ===

    /// Scan the nearest body if it is in range
    ///
    /// Marks it visited and hands it to `on_scan`.
    pub fn scan<F>(&mut self, on_scan: F) -> Result<BodyIndex, ScanError>
    where
        F: FnOnce(&CelestialBody),
    {
        if self.is_paused() {
            return Err(ScanError::Paused);
        }
        let index = self.proximity.nearest().ok_or(ScanError::NothingTracked)?;
        let body = self.catalog.get(index).ok_or(ScanError::NothingTracked)?;
        let distance = self.proximity.distance();
        if distance >= self.tuning.scan_distance {
            return Err(ScanError::OutOfRange {
                id: body.id.clone(),
                distance,
                range: self.tuning.scan_distance,
            });
        }

        log::info!("Scanned {}", body.id);
        if !self.visited.contains(&body.id) {
            self.visited.push(body.id.clone());
        }
        on_scan(body);
        self.events.push(FlightEvent::Scanned { target: index });
        Ok(index)
    }

    pub fn visited(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.iter().any(|v| v == id)
    }

    // === Session ===

    /// Rebuild a fresh flight from the initial catalog, tuning and seed
    ///
    /// Orbits return to their starting phase, the tick counter and particle
    /// generator restart, and the visited list is emptied.
    pub fn reset_session(&mut self) {
        *self = Self::new(self.initial_catalog.clone(), self.tuning.clone(), self.seed);
    }

    pub(crate) fn push_event(&mut self, event: FlightEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<FlightEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Parse a zoom percentage from the HUD input
///
/// Non-numeric input reads as 100%. The result is clamped to the UI range
/// and converted to a zoom factor.
pub fn parse_zoom_percent(input: &str) -> f32 {
    let percent = input
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|p| !p.is_nan())
        .unwrap_or(100.0);
    percent.clamp(ZOOM_PERCENT_MIN, ZOOM_PERCENT_MAX) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ControlInput, tick};

    fn state() -> FlightState {
        FlightState::from_settings(&Settings::default(), 42).unwrap()
    }

    #[test]
    fn test_zoom_percent_parsing() {
        assert_eq!(parse_zoom_percent("9999"), 3.0);
        assert_eq!(parse_zoom_percent("-50"), 0.1);
        assert_eq!(parse_zoom_percent("abc"), 1.0);
        assert_eq!(parse_zoom_percent(" 150% "), 1.5);
        assert_eq!(parse_zoom_percent("NaN"), 1.0);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut s = state();
        s.set_zoom_percent("9999");
        assert_eq!(s.zoom(), 3.0);
        s.set_zoom_percent("-50");
        assert_eq!(s.zoom(), 0.1);
        s.set_zoom(100.0);
        assert_eq!(s.zoom(), ZOOM_MAX);
        s.set_zoom(0.0);
        assert_eq!(s.zoom(), ZOOM_MIN);
        s.set_zoom(f32::NAN);
        assert_eq!(s.zoom(), ZOOM_MIN);
        for _ in 0..10 {
            s.zoom_out();
        }
        assert_eq!(s.zoom(), ZOOM_MIN);
        s.zoom_in();
        assert!((s.zoom() - ZOOM_MIN * ZOOM_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_navigate_idempotent_and_abort_noop() {
        let mut s = state();
        assert!(!s.abort_autopilot());
        let earth = s.catalog.find("earth").unwrap();
        assert!(s.navigate_to(earth));
        assert!(!s.navigate_to(earth));
        assert_eq!(s.drain_events(), vec![FlightEvent::AutopilotEngaged { target: earth }]);
        assert!(!s.navigate_to(BodyIndex(usize::MAX)));
        assert!(s.navigate_to_id("no-such-body").is_err());
    }

    #[test]
    fn test_abort_caps_speed() {
        let mut s = state();
        s.navigate_to_id("neptune").unwrap();
        s.ship.speed = 5000.0;
        assert!(s.abort_autopilot());
        assert_eq!(s.ship.speed, MANUAL_MAX_SPEED);
        assert!(s.autopilot_target().is_none());
    }

    #[test]
    fn test_scan_gating() {
        let mut s = state();
        let earth = s.catalog.find("earth").unwrap();
        let earth_pos = s.catalog.get(earth).unwrap().position;

        s.ship.position = earth_pos + Vec2::new(5000.0, 5000.0);
        s.proximity.update(s.ship.position, s.catalog.bodies());
        assert!(matches!(s.scan(|_| {}), Err(ScanError::OutOfRange { .. })));

        s.ship.position = earth_pos + Vec2::new(60.0, 0.0);
        s.proximity.update(s.ship.position, s.catalog.bodies());
        let mut scanned = None;
        let hit = s.scan(|b| scanned = Some(b.id.clone())).unwrap();
        assert_eq!(hit, earth);
        assert_eq!(scanned.as_deref(), Some("earth"));
        assert!(s.is_visited("earth"));

        s.set_paused(true);
        assert_eq!(s.scan(|_| {}), Err(ScanError::Paused));
    }

    #[test]
    fn test_reset_session_clears_visited() {
        let mut s = state();
        let earth = s.catalog.find("earth").unwrap();
        s.ship.position = s.catalog.get(earth).unwrap().position;
        s.proximity.update(s.ship.position, s.catalog.bodies());
        s.scan(|_| {}).unwrap();
        s.set_zoom(2.0);
        s.reset_session();
        assert_eq!(s.visited().count(), 0);
        assert_eq!(s.zoom(), 1.0);
        assert_eq!(s.ship.position, Vec2::new(800.0, 200.0));
    }

    #[test]
    fn test_reset_session_rebuilds_orbits() {
        let mut s = state();
        let halley = s.catalog.find("halley").unwrap();
        let start = s.catalog.get(halley).unwrap().position;
        let first_spawn = s.particles.clone();

        let idle = ControlInput::default();
        for _ in 0..600 {
            tick(&mut s, &idle, REFERENCE_DT);
        }
        assert_ne!(s.catalog.get(halley).unwrap().position, start);

        s.reset_session();
        assert_eq!(s.catalog.get(halley).unwrap().position, start);
        assert_eq!(s.time_ticks, 0);
        assert!(s.particles.is_empty());

        // Same seed, same particle stream as the first session
        let mut fresh = first_spawn;
        fresh.emit(Vec2::ZERO, 0.0, 0.0, false);
        s.particles.emit(Vec2::ZERO, 0.0, 0.0, false);
        let positions = |p: &ParticleSystem| p.particles().iter().map(|q| q.pos).collect::<Vec<_>>();
        assert_eq!(positions(&s.particles), positions(&fresh));
    }

    #[test]
    fn test_visited_keeps_scan_order() {
        let mut s = state();
        for id in ["mars", "earth", "mars"] {
            let index = s.catalog.find(id).unwrap();
            s.ship.position = s.catalog.get(index).unwrap().position;
            s.proximity.update(s.ship.position, s.catalog.bodies());
            s.scan(|_| {}).unwrap();
        }
        assert_eq!(s.visited().collect::<Vec<_>>(), vec!["mars", "earth"]);
    }

    #[test]
    fn test_pause_silences_audio() {
        let mut s = state();
        s.thrusting = true;
        s.ship.speed = 500.0;
        assert!(s.engine_sound());
        assert!(s.warp_sound());
        s.set_paused(true);
        assert!(!s.engine_sound());
        assert!(!s.warp_sound());
    }
}
