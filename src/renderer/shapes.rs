//! Particle sprite geometry
//!
//! At warp, particles stretch along their velocity into streaks; otherwise
//! they are round dots.

use glam::Vec2;

use crate::sim::{Particle, ParticleColor};

/// Warp intensity above which particles render as streaks
pub const STREAK_RENDER_WARP: f32 = 0.1;

/// One particle as drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    pub center: Vec2,
    /// Extent along the velocity
    pub length: f32,
    pub thickness: f32,
    /// Radians, from the velocity direction
    pub rotation: f32,
    pub color: ParticleColor,
    /// Fades with remaining life
    pub opacity: f32,
}

impl ParticleSprite {
    pub fn new(particle: &Particle, warp: f32) -> Self {
        let stretch = if warp > STREAK_RENDER_WARP {
            warp * 40.0 + 5.0
        } else {
            1.0
        };
        Self {
            center: particle.pos,
            length: particle.size * stretch,
            thickness: particle.size,
            rotation: particle.vel.y.atan2(particle.vel.x),
            color: particle.color,
            opacity: particle.life.clamp(0.0, 1.0),
        }
    }

    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}rad)",
            self.center.x, self.center.y, self.rotation
        )
    }
}

/// Sprites for a whole particle pool
pub fn particle_sprites(particles: &[Particle], warp: f32) -> Vec<ParticleSprite> {
    particles.iter().map(|p| ParticleSprite::new(p, warp)).collect()
}
