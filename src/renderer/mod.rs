//! Rendering module
//!
//! Camera projection and sprite geometry. Reads the flight state, never
//! writes it; the platform layer applies the results to the DOM.

pub mod projector;
pub mod shapes;

pub use projector::{SceneFrame, ShipSprite, ViewTransform, Viewport, project, visible_bodies};
pub use shapes::{ParticleSprite, particle_sprites};
