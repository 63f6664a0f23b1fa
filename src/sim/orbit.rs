//! Orbit integrator
//!
//! Advances the phase of asteroids and comets. Positions are always derived
//! from the phase, never accumulated.

use std::f32::consts::TAU;

use super::body::CelestialBody;

/// Advance every orbiting body by `scale` reference frames
///
/// Returns how many bodies moved. Bodies with unusable numbers are skipped
/// for this tick instead of poisoning the rest of the catalog.
pub fn advance_orbits(bodies: &mut [CelestialBody], scale: f32) -> usize {
    let mut moved = 0;
    for body in bodies.iter_mut().filter(|b| b.is_orbiting()) {
        let Some(angle) = body.angle else { continue };
        let next = angle + body.orbit_speed * scale;
        if !next.is_finite() || !body.distance_from_sun.is_finite() {
            log::debug!("Skipping orbit update for '{}'", body.id);
            continue;
        }
        let next = next.rem_euclid(TAU);
        body.angle = Some(next);
        body.position = CelestialBody::orbit_position(body.kind, body.distance_from_sun, next);
        moved += 1;
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyKind, Visual};
    use glam::Vec2;
    use proptest::prelude::*;

    fn orbiter(kind: BodyKind, distance: f32, speed: f32, angle: f32) -> CelestialBody {
        CelestialBody {
            id: format!("{:?}", kind),
            name: "Orbiter".into(),
            thai_name: "Orbiter".into(),
            kind,
            size: 2.0,
            position: CelestialBody::orbit_position(kind, distance, angle),
            distance_from_sun: distance,
            orbit_speed: speed,
            angle: Some(angle),
            visual: Visual {
                color: "#475569".into(),
                gradient: None,
            },
        }
    }

    #[test]
    fn test_planets_stay_put() {
        let mut planet = orbiter(BodyKind::Planet, 1000.0, 0.01, 0.0);
        planet.position = Vec2::new(1000.0, 0.0);
        let mut bodies = vec![planet];
        assert_eq!(advance_orbits(&mut bodies, 1.0), 0);
        assert_eq!(bodies[0].position, Vec2::new(1000.0, 0.0));
        assert_eq!(bodies[0].angle, Some(0.0));
    }

    #[test]
    fn test_nan_body_skipped() {
        let mut bad = orbiter(BodyKind::Asteroid, 1000.0, f32::NAN, 0.0);
        bad.id = "bad".into();
        let good = orbiter(BodyKind::Asteroid, 1000.0, 0.01, 0.0);
        let mut bodies = vec![bad, good];
        assert_eq!(advance_orbits(&mut bodies, 1.0), 1);
        assert_eq!(bodies[0].angle, Some(0.0));
        assert!((bodies[1].angle.unwrap() - 0.01).abs() < 1e-7);
    }

    #[test]
    fn test_comet_stays_on_ellipse() {
        let mut bodies = vec![orbiter(BodyKind::Comet, 2500.0, 0.003, 0.0)];
        for _ in 0..500 {
            advance_orbits(&mut bodies, 1.0);
        }
        let p = bodies[0].position;
        let on_ellipse = (p.x / 2500.0).powi(2) + (p.y / 1000.0).powi(2);
        assert!((on_ellipse - 1.0).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_angle_after_n_ticks(
            start in 0.0f32..TAU,
            speed in 0.0001f32..0.01,
            ticks in 1usize..400,
        ) {
            let mut bodies = vec![orbiter(BodyKind::Asteroid, 1400.0, speed, start)];
            for _ in 0..ticks {
                advance_orbits(&mut bodies, 1.0);
            }
            let expected = (start + ticks as f32 * speed).rem_euclid(TAU);
            let actual = bodies[0].angle.unwrap();
            let diff = (actual - expected).abs();
            prop_assert!(diff < 1e-3 || (TAU - diff) < 1e-3);

            let derived = CelestialBody::orbit_position(BodyKind::Asteroid, 1400.0, actual);
            prop_assert_eq!(bodies[0].position, derived);
        }
    }
}
