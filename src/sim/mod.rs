//! Flight simulation module
//!
//! All gameplay logic lives here:
//! - Per-frame tick scaled to a 60 Hz reference
//! - Seeded RNG for belts and particle jitter
//! - Stable body order (indices never change during a session)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod body;
pub mod catalog;
pub mod orbit;
pub mod particles;
pub mod proximity;
pub mod ship;
pub mod state;
pub mod tick;

pub use autopilot::{Autopilot, SpeedZone, target_speed};
pub use body::{BodyIndex, BodyKind, CelestialBody, Visual};
pub use catalog::{BeltSpec, Catalog, generate_belt};
pub use orbit::advance_orbits;
pub use particles::{Particle, ParticleColor, ParticleSystem};
pub use proximity::ProximityTracker;
pub use ship::{AutopilotStep, Ship};
pub use state::{FlightEvent, FlightPhase, FlightState, parse_zoom_percent};
pub use tick::{ControlInput, sanitize_dt, tick};
