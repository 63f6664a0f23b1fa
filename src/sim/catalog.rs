//! Celestial body catalog
//!
//! Built once at startup from the embedded JSON asset plus procedurally
//! generated asteroid belts. After construction the catalog is never
//! reordered or shrunk, so a [`BodyIndex`] stays valid for the session.

use std::collections::HashSet;
use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Deserialize;

use super::body::{BodyIndex, BodyKind, CelestialBody, Visual};
use crate::error::CatalogError;

/// Built-in catalog asset
const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.json");

/// Asteroid look and motion ranges
const ASTEROID_COLOR: &str = "#475569";
const ASTEROID_MIN_SIZE: f32 = 1.0;
const ASTEROID_MAX_SIZE: f32 = 4.0;
const ASTEROID_MIN_ORBIT_SPEED: f32 = 0.0005;
const ASTEROID_MAX_ORBIT_SPEED: f32 = 0.0007;

/// Description of a procedurally generated ring of asteroids
#[derive(Debug, Clone, Deserialize)]
pub struct BeltSpec {
    pub id: String,
    pub count: usize,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Explicit seed; derived from `id` when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl BeltSpec {
    /// Seed for this belt's generator
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| seed_from_id(&self.id))
    }
}

#[derive(Debug, Deserialize)]
struct CatalogAsset {
    bodies: Vec<CelestialBody>,
    #[serde(default)]
    belts: Vec<BeltSpec>,
}

/// FNV-1a over the id bytes, so belts look the same on every run
pub fn seed_from_id(id: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    id.bytes()
        .fold(OFFSET, |hash, b| (hash ^ b as u64).wrapping_mul(PRIME))
}

/// Generate the asteroids of one belt
pub fn generate_belt(belt: &BeltSpec) -> Result<Vec<CelestialBody>, CatalogError> {
    if !(belt.min_distance.is_finite()
        && belt.max_distance.is_finite()
        && belt.min_distance > 0.0
        && belt.min_distance <= belt.max_distance)
    {
        return Err(CatalogError::InvalidBelt {
            id: belt.id.clone(),
            min: belt.min_distance,
            max: belt.max_distance,
        });
    }

    let mut rng = Pcg32::seed_from_u64(belt.seed());
    let asteroids = (0..belt.count)
        .map(|i| {
            let angle = rng.random_range(0.0..TAU);
            let distance = if belt.max_distance > belt.min_distance {
                rng.random_range(belt.min_distance..belt.max_distance)
            } else {
                belt.min_distance
            };
            CelestialBody {
                id: format!("{}-{}", belt.id, i),
                name: format!("Asteroid {}", i),
                thai_name: "อุกกาบาต".to_string(),
                kind: BodyKind::Asteroid,
                size: rng.random_range(ASTEROID_MIN_SIZE..ASTEROID_MAX_SIZE),
                position: CelestialBody::orbit_position(BodyKind::Asteroid, distance, angle),
                distance_from_sun: distance,
                orbit_speed: rng.random_range(ASTEROID_MIN_ORBIT_SPEED..ASTEROID_MAX_ORBIT_SPEED),
                angle: Some(angle),
                visual: Visual {
                    color: ASTEROID_COLOR.to_string(),
                    gradient: None,
                },
            }
        })
        .collect();
    Ok(asteroids)
}

/// Ordered list of every body in the session
#[derive(Debug, Clone)]
pub struct Catalog {
    bodies: Vec<CelestialBody>,
}

impl Catalog {
    /// The embedded solar system plus its asteroid belts
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog asset and expand its belts
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let asset: CatalogAsset = serde_json::from_str(json)?;
        let mut bodies = asset.bodies;
        for belt in &asset.belts {
            bodies.extend(generate_belt(belt)?);
        }
        let catalog = Self::from_bodies(bodies)?;
        log::info!(
            "Catalog loaded: {} bodies ({} belts)",
            catalog.len(),
            asset.belts.len()
        );
        Ok(catalog)
    }

    /// Validate a prepared body list
    ///
    /// Orbiting bodies get their position recomputed from their phase so the
    /// two can never disagree.
    pub fn from_bodies(mut bodies: Vec<CelestialBody>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(bodies.len());
        for body in &mut bodies {
            if !seen.insert(body.id.clone()) {
                return Err(CatalogError::DuplicateId(body.id.clone()));
            }
            if !body.is_finite() || !body.distance_from_sun.is_finite() {
                return Err(CatalogError::NonFinite(body.id.clone()));
            }
            if let (true, Some(angle)) = (body.is_orbiting(), body.angle) {
                body.position =
                    CelestialBody::orbit_position(body.kind, body.distance_from_sun, angle);
            }
        }
        Ok(Self { bodies })
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, index: BodyIndex) -> Option<&CelestialBody> {
        self.bodies.get(index.0)
    }

    /// Look up a body by its stable id
    pub fn index_of(&self, id: &str) -> Option<BodyIndex> {
        self.bodies.iter().position(|b| b.id == id).map(BodyIndex)
    }

    /// Like [`Catalog::index_of`] but with an error for unknown ids
    pub fn find(&self, id: &str) -> Result<BodyIndex, CatalogError> {
        self.index_of(id)
            .ok_or_else(|| CatalogError::UnknownBody(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyIndex, &CelestialBody)> {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyIndex(i), b))
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    /// Mutable access for in-place orbit updates (no insertion or removal)
    pub fn bodies_mut(&mut self) -> &mut [CelestialBody] {
        &mut self.bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        // 37 named bodies + 200 main belt + 300 kuiper belt
        assert_eq!(catalog.len(), 37 + 200 + 300);
        let earth = catalog.get(catalog.find("earth").unwrap()).unwrap();
        assert_eq!(earth.kind, BodyKind::Planet);
        assert_eq!(earth.thai_name, "โลก");
        assert!(catalog.find("planet-x").is_err());
    }

    #[test]
    fn test_belt_generation_is_seeded() {
        let belt = BeltSpec {
            id: "main-belt".into(),
            count: 50,
            min_distance: 1300.0,
            max_distance: 1500.0,
            seed: None,
        };
        let a = generate_belt(&belt).unwrap();
        let b = generate_belt(&belt).unwrap();
        assert_eq!(a.len(), 50);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.angle, y.angle);
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn test_belt_members_within_ranges() {
        let belt = BeltSpec {
            id: "kuiper-belt".into(),
            count: 300,
            min_distance: 5200.0,
            max_distance: 6400.0,
            seed: Some(7),
        };
        for rock in generate_belt(&belt).unwrap() {
            assert!((5200.0..6400.0).contains(&rock.distance_from_sun));
            assert!((1.0..4.0).contains(&rock.size));
            assert!((0.0005..0.0007).contains(&rock.orbit_speed));
            let r = rock.position.length();
            assert!((r - rock.distance_from_sun).abs() < 0.05);
        }
    }

    #[test]
    fn test_invalid_belt_rejected() {
        let belt = BeltSpec {
            id: "broken".into(),
            count: 3,
            min_distance: 500.0,
            max_distance: 100.0,
            seed: None,
        };
        assert!(matches!(
            generate_belt(&belt),
            Err(CatalogError::InvalidBelt { .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r##"{"bodies":[
            {"id":"a","name":"A","thai_name":"A","kind":"STAR","color":"#fff","size":1.0,"position":[0.0,0.0]},
            {"id":"a","name":"B","thai_name":"B","kind":"STAR","color":"#fff","size":1.0,"position":[1.0,0.0]}
        ]}"##;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            Catalog::from_json("{\"bodies\": 3}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_comet_position_follows_angle() {
        let catalog = Catalog::builtin().unwrap();
        let halley = catalog.get(catalog.find("halley").unwrap()).unwrap();
        assert!(halley.is_orbiting());
        assert!((halley.position.x - 2000.0).abs() < 0.5);
        assert!((halley.position.y + 600.0).abs() < 0.5);
    }
}
