//! Missions and per-session progress
//!
//! A session is one trip from the menu and back. Missions are worked in id
//! order; a mission completes when the scan of its target body is closed.
//! Everything here lives in memory and is reset on exit to the menu.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, ScanError};
use crate::sim::{BodyIndex, Catalog, CelestialBody, FlightState};

/// A scan-this-body objective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub target_body_id: String,
}

impl Mission {
    fn new(id: u32, title: &str, description: &str, target: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: description.to_string(),
            target_body_id: target.to_string(),
        }
    }
}

/// The campaign, inner system outward
pub fn default_missions() -> Vec<Mission> {
    vec![
        Mission::new(
            1,
            "First Contact",
            "เริ่มต้นการเดินทาง: บินกลับไปที่โลก (Earth) เพื่อทดสอบระบบสแกน",
            "earth",
        ),
        Mission::new(
            2,
            "The Red Neighbor",
            "เดินทางสู่ดาวอังคาร (Mars) เพื่อนบ้านสีแดงของเรา",
            "mars",
        ),
        Mission::new(
            3,
            "King of Planets",
            "บินฝ่าแถบดาวเคราะห์น้อยไปยังดาวพฤหัสบดี (Jupiter)",
            "jupiter",
        ),
        Mission::new(
            4,
            "The Ring Master",
            "เดินทางไปชมวงแหวนอันงดงามของดาวเสาร์ (Saturn)",
            "saturn",
        ),
        Mission::new(
            5,
            "Deep Space",
            "เดินทางไปยังดาวเนปจูน (Neptune) ที่ขอบระบบสุริยะชั้นใน",
            "neptune",
        ),
    ]
}

/// Mission list plus completion state
#[derive(Debug, Clone)]
pub struct MissionLog {
    missions: Vec<Mission>,
    completed: BTreeSet<u32>,
}

impl Default for MissionLog {
    fn default() -> Self {
        Self::new(default_missions())
    }
}

impl MissionLog {
    pub fn new(mut missions: Vec<Mission>) -> Self {
        missions.sort_by_key(|m| m.id);
        Self {
            missions,
            completed: BTreeSet::new(),
        }
    }

    /// Every mission must point at a body that exists
    pub fn validate(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        for mission in &self.missions {
            catalog.find(&mission.target_body_id)?;
        }
        Ok(())
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    /// Lowest-id mission not yet completed
    pub fn current(&self) -> Option<&Mission> {
        self.missions.iter().find(|m| !self.completed.contains(&m.id))
    }

    pub fn current_target(&self) -> Option<&str> {
        self.current().map(|m| m.target_body_id.as_str())
    }

    pub fn is_completed(&self, id: u32) -> bool {
        self.completed.contains(&id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Complete the current mission if `body_id` is its target
    pub fn complete_scanned(&mut self, body_id: &str) -> Option<u32> {
        let mission = self.current()?;
        if mission.target_body_id != body_id {
            return None;
        }
        let id = mission.id;
        self.completed.insert(id);
        log::info!("Mission {} complete ({}/{})", id, self.completed.len(), self.missions.len());
        Some(id)
    }

    pub fn all_completed(&self) -> bool {
        self.completed.len() == self.missions.len()
    }

    /// The boss encounter opens once the whole campaign is done
    pub fn boss_unlocked(&self) -> bool {
        !self.missions.is_empty() && self.all_completed()
    }

    pub fn reset(&mut self) {
        self.completed.clear();
    }
}

/// Flight plus campaign progress for one trip from the menu
#[derive(Debug, Clone)]
pub struct Session {
    pub flight: FlightState,
    pub missions: MissionLog,
    /// Body whose scan report is open
    open_scan: Option<BodyIndex>,
}

impl Session {
    pub fn new(flight: FlightState, missions: MissionLog) -> Result<Self, CatalogError> {
        missions.validate(&flight.catalog)?;
        Ok(Self {
            flight,
            missions,
            open_scan: None,
        })
    }

    /// Scan the nearest body and open its report; the flight pauses meanwhile
    pub fn scan<F>(&mut self, on_scan: F) -> Result<BodyIndex, ScanError>
    where
        F: FnOnce(&CelestialBody),
    {
        let index = self.flight.scan(on_scan)?;
        self.open_scan = Some(index);
        self.flight.set_paused(true);
        Ok(index)
    }

    pub fn open_scan(&self) -> Option<&CelestialBody> {
        self.open_scan.and_then(|i| self.flight.catalog.get(i))
    }

    /// Close the report, crediting the mission if this was its target
    pub fn close_scan(&mut self) -> Option<u32> {
        let index = self.open_scan.take()?;
        self.flight.set_paused(false);
        let body_id = self.flight.catalog.get(index)?.id.clone();
        self.missions.complete_scanned(&body_id)
    }

    /// Back to the menu: visited bodies and mission progress are forgotten
    pub fn exit_to_menu(&mut self) {
        self.open_scan = None;
        self.flight.reset_session();
        self.missions.reset();
        log::info!("Session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_DT;
    use crate::settings::Settings;
    use crate::sim::{ControlInput, tick};
    use glam::Vec2;

    fn session() -> Session {
        let flight = FlightState::from_settings(&Settings::default(), 21).unwrap();
        Session::new(flight, MissionLog::default()).unwrap()
    }

    fn park_at(session: &mut Session, id: &str) {
        let index = session.flight.catalog.find(id).unwrap();
        let pos = session.flight.catalog.get(index).unwrap().position;
        session.flight.ship.position = pos;
        session
            .flight
            .proximity
            .update(pos, session.flight.catalog.bodies());
    }

    #[test]
    fn test_current_is_lowest_incomplete() {
        let mut log = MissionLog::default();
        assert_eq!(log.current_target(), Some("earth"));
        assert_eq!(log.complete_scanned("mars"), None);
        assert_eq!(log.complete_scanned("earth"), Some(1));
        assert_eq!(log.current_target(), Some("mars"));
    }

    #[test]
    fn test_scan_close_completes_mission() {
        let mut s = session();
        park_at(&mut s, "earth");
        s.scan(|_| {}).unwrap();
        assert!(s.flight.is_paused());
        assert_eq!(s.open_scan().map(|b| b.id.as_str()), Some("earth"));
        assert_eq!(s.close_scan(), Some(1));
        assert!(!s.flight.is_paused());
        assert_eq!(s.close_scan(), None);
    }

    #[test]
    fn test_boss_unlocks_after_campaign() {
        let mut s = session();
        for id in ["earth", "mars", "jupiter", "saturn"] {
            park_at(&mut s, id);
            s.scan(|_| {}).unwrap();
            s.close_scan();
            assert!(!s.missions.boss_unlocked());
        }
        park_at(&mut s, "neptune");
        s.scan(|_| {}).unwrap();
        assert_eq!(s.close_scan(), Some(5));
        assert!(s.missions.all_completed());
        assert!(s.missions.boss_unlocked());
        assert!(s.missions.current().is_none());
    }

    #[test]
    fn test_exit_resets_progress() {
        let mut s = session();
        let start: Vec<_> = s.flight.catalog.bodies().iter().map(|b| b.position).collect();

        park_at(&mut s, "earth");
        s.scan(|_| {}).unwrap();
        s.close_scan();
        let idle = ControlInput::default();
        for _ in 0..600 {
            tick(&mut s.flight, &idle, REFERENCE_DT);
        }

        s.exit_to_menu();
        assert_eq!(s.missions.completed_count(), 0);
        assert!(!s.flight.is_visited("earth"));
        assert_eq!(s.flight.time_ticks, 0);
        assert_eq!(s.flight.ship.position, Vec2::new(800.0, 200.0));
        let after: Vec<_> = s.flight.catalog.bodies().iter().map(|b| b.position).collect();
        assert_eq!(after, start);
    }

    #[test]
    fn test_unknown_mission_target_rejected() {
        let flight = FlightState::from_settings(&Settings::default(), 1).unwrap();
        let log = MissionLog::new(vec![Mission::new(1, "Lost", "", "vulcan")]);
        assert!(matches!(
            Session::new(flight, log),
            Err(CatalogError::UnknownBody(id)) if id == "vulcan"
        ));
    }
}
