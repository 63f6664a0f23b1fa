//! Nearest-body tracking for scan eligibility and HUD highlighting

use glam::Vec2;

use super::body::{BodyIndex, CelestialBody};
use crate::consts::NO_BODY_DISTANCE;

/// Last computed nearest body (at most one tick stale)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProximityTracker {
    nearest: Option<BodyIndex>,
    distance: f32,
}

impl ProximityTracker {
    /// Recompute against every trackable body
    ///
    /// Distance is measured to the body's surface. Asteroids and bodies with
    /// non-finite geometry are ignored.
    pub fn update(&mut self, ship: Vec2, bodies: &[CelestialBody]) {
        let mut nearest = None;
        let mut min_dist = f32::INFINITY;
        for (i, body) in bodies.iter().enumerate() {
            if !body.kind.is_trackable() || !body.is_finite() {
                continue;
            }
            let d = body.surface_distance(ship);
            if d < min_dist {
                min_dist = d;
                nearest = Some(BodyIndex(i));
            }
        }
        self.nearest = nearest;
        self.distance = if nearest.is_some() {
            min_dist.max(0.0)
        } else {
            NO_BODY_DISTANCE
        };
    }

    pub fn nearest(&self) -> Option<BodyIndex> {
        self.nearest
    }

    /// Surface distance to the nearest body, clamped at zero
    pub fn distance(&self) -> f32 {
        if self.nearest.is_some() {
            self.distance
        } else {
            NO_BODY_DISTANCE
        }
    }

    /// Advisory scan gate
    pub fn scan_eligible(&self, scan_distance: f32) -> bool {
        self.nearest.is_some() && self.distance < scan_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyKind, Visual};

    fn body(id: &str, kind: BodyKind, pos: Vec2, size: f32) -> CelestialBody {
        CelestialBody {
            id: id.into(),
            name: id.into(),
            thai_name: id.into(),
            kind,
            size,
            position: pos,
            distance_from_sun: 0.0,
            orbit_speed: 0.0,
            angle: None,
            visual: Visual {
                color: "#fff".into(),
                gradient: None,
            },
        }
    }

    #[test]
    fn test_surface_distance_picks_big_body() {
        // The giant is further by center but closer by surface
        let bodies = vec![
            body("dot", BodyKind::Moon, Vec2::new(500.0, 0.0), 1.0),
            body("giant", BodyKind::Star, Vec2::new(-900.0, 0.0), 600.0),
        ];
        let mut tracker = ProximityTracker::default();
        tracker.update(Vec2::ZERO, &bodies);
        assert_eq!(tracker.nearest(), Some(BodyIndex(1)));
        assert_eq!(tracker.distance(), 300.0);
        assert!(tracker.scan_eligible(600.0));
    }

    #[test]
    fn test_asteroids_ignored() {
        let bodies = vec![
            body("rock", BodyKind::Asteroid, Vec2::new(10.0, 0.0), 2.0),
            body("earth", BodyKind::Planet, Vec2::new(1000.0, 0.0), 50.0),
        ];
        let mut tracker = ProximityTracker::default();
        tracker.update(Vec2::ZERO, &bodies);
        assert_eq!(tracker.nearest(), Some(BodyIndex(1)));
        assert_eq!(tracker.distance(), 950.0);
        assert!(!tracker.scan_eligible(600.0));
    }

    #[test]
    fn test_inside_body_clamps_to_zero() {
        let bodies = vec![body("sun", BodyKind::Star, Vec2::ZERO, 300.0)];
        let mut tracker = ProximityTracker::default();
        tracker.update(Vec2::new(10.0, 0.0), &bodies);
        assert_eq!(tracker.distance(), 0.0);
    }

    #[test]
    fn test_nothing_to_track() {
        let bodies = vec![body("rock", BodyKind::Asteroid, Vec2::ZERO, 2.0)];
        let mut tracker = ProximityTracker::default();
        tracker.update(Vec2::ZERO, &bodies);
        assert_eq!(tracker.nearest(), None);
        assert_eq!(tracker.distance(), NO_BODY_DISTANCE);
        assert!(!tracker.scan_eligible(f32::INFINITY));
    }
}
