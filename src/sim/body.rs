//! Celestial body data model

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::COMET_MINOR_AXIS_RATIO;
use crate::polar_to_cartesian;

/// Body classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
    DwarfPlanet,
    BlackHole,
    Galaxy,
    Asteroid,
    Comet,
    Nebula,
    Quasar,
    Supernova,
}

impl BodyKind {
    /// Only asteroids and comets move; everything else stays where it was placed
    pub fn orbits(self) -> bool {
        matches!(self, BodyKind::Asteroid | BodyKind::Comet)
    }

    /// Asteroids are scenery: never nearest, never scannable
    pub fn is_trackable(self) -> bool {
        self != BodyKind::Asteroid
    }
}

/// Index of a body in its catalog (stable: the catalog never reorders)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyIndex(pub usize);

/// Render hints, opaque to the physics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
}

/// A star, planet, asteroid or deep-space object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelestialBody {
    pub id: String,
    pub name: String,
    pub thai_name: String,
    pub kind: BodyKind,
    /// Render radius
    pub size: f32,
    pub position: Vec2,
    /// Orbit radius (semi-major axis for comets)
    #[serde(default)]
    pub distance_from_sun: f32,
    /// Radians per reference frame
    #[serde(default)]
    pub orbit_speed: f32,
    /// Orbital phase in radians; present only for moving bodies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
    #[serde(flatten)]
    pub visual: Visual,
}

impl CelestialBody {
    /// Whether the orbit integrator moves this body
    pub fn is_orbiting(&self) -> bool {
        self.kind.orbits() && self.angle.is_some() && self.distance_from_sun > 0.0
    }

    /// Whether position and size are usable numbers
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.size.is_finite()
    }

    /// Position on the orbit for a given phase
    ///
    /// Circular for asteroids, a fixed-eccentricity ellipse for comets.
    pub fn orbit_position(kind: BodyKind, distance: f32, angle: f32) -> Vec2 {
        match kind {
            BodyKind::Comet => Vec2::new(
                distance * angle.cos(),
                distance * COMET_MINOR_AXIS_RATIO * angle.sin(),
            ),
            _ => polar_to_cartesian(distance, angle),
        }
    }

    /// Distance from `point` to this body's surface (negative inside)
    #[inline]
    pub fn surface_distance(&self, point: Vec2) -> f32 {
        point.distance(self.position) - self.size
    }

    /// Display name for a locale ("th" for Thai, anything else English)
    pub fn display_name(&self, locale: &str) -> &str {
        if locale.eq_ignore_ascii_case("th") {
            &self.thai_name
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(kind: BodyKind) -> CelestialBody {
        CelestialBody {
            id: "test".into(),
            name: "Test".into(),
            thai_name: "ทดสอบ".into(),
            kind,
            size: 10.0,
            position: Vec2::new(100.0, 0.0),
            distance_from_sun: 100.0,
            orbit_speed: 0.01,
            angle: Some(0.0),
            visual: Visual {
                color: "#ffffff".into(),
                gradient: None,
            },
        }
    }

    #[test]
    fn test_only_asteroids_and_comets_orbit() {
        assert!(body(BodyKind::Asteroid).is_orbiting());
        assert!(body(BodyKind::Comet).is_orbiting());
        assert!(!body(BodyKind::Planet).is_orbiting());

        let mut parked = body(BodyKind::Asteroid);
        parked.distance_from_sun = 0.0;
        assert!(!parked.is_orbiting());
    }

    #[test]
    fn test_comet_orbit_is_ellipse() {
        let p = CelestialBody::orbit_position(BodyKind::Comet, 1000.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-3);
        assert!((p.y - 400.0).abs() < 1e-3);

        let q = CelestialBody::orbit_position(BodyKind::Asteroid, 1000.0, std::f32::consts::FRAC_PI_2);
        assert!((q.y - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_display_name_by_locale() {
        let b = body(BodyKind::Planet);
        assert_eq!(b.display_name("th"), "ทดสอบ");
        assert_eq!(b.display_name("TH"), "ทดสอบ");
        assert_eq!(b.display_name("en"), "Test");
        assert_eq!(b.display_name(""), "Test");
    }

    #[test]
    fn test_surface_distance_subtracts_radius() {
        let b = body(BodyKind::Planet);
        assert_eq!(b.surface_distance(Vec2::new(150.0, 0.0)), 40.0);
    }

    #[test]
    fn test_kind_json_names() {
        let json = serde_json::to_string(&BodyKind::DwarfPlanet).unwrap();
        assert_eq!(json, "\"DWARF_PLANET\"");
    }
}
