//! Exhaust and warp-streak particles
//!
//! One pool, two looks: below the streak threshold the ship leaves warm
//! exhaust behind it, above it cyan streaks rush past. The branch is taken
//! per spawn from the current warp intensity.

use std::f32::consts::PI;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{EXHAUST_LIFE, EXHAUST_OFFSET, STREAK_MIN_WARP};
use crate::heading_vector;
use crate::settings::FlightTuning;

/// Particle palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Amber,
    Red,
    Cyan,
    White,
}

impl ParticleColor {
    pub fn hex(self) -> &'static str {
        match self {
            ParticleColor::Amber => "#f59e0b",
            ParticleColor::Red => "#ef4444",
            ParticleColor::Cyan => "#a5f3fc",
            ParticleColor::White => "#ffffff",
        }
    }
}

/// A short-lived visual particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub id: u64,
    pub pos: Vec2,
    /// World units per reference frame
    pub vel: Vec2,
    pub life: f32,
    pub size: f32,
    pub color: ParticleColor,
}

/// Particle pool, oldest first
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Pcg32,
    next_id: u64,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(0x5eed)
    }
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(256),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Particles to spawn this frame
    pub fn density(warp: f32, warping: bool) -> usize {
        if warping {
            (warp * 5.0).ceil() as usize + 1
        } else {
            1
        }
    }

    /// Spawn one particle at the ship
    pub fn spawn(&mut self, origin: Vec2, heading_deg: f32, warp: f32) {
        let forward = heading_vector(heading_deg);
        let id = self.next_id;
        self.next_id += 1;

        let particle = if warp > STREAK_MIN_WARP {
            // Passing-stars streaks in a box that widens with warp
            let spread = 200.0 + warp * 400.0;
            let jitter = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread,
            );
            let streak_speed = 20.0 + warp * 60.0;
            Particle {
                id,
                pos: origin + jitter,
                vel: -forward * streak_speed,
                life: 0.1 + self.rng.random::<f32>() * 0.3,
                size: self.rng.random::<f32>() * 2.0 + 1.0,
                color: if self.rng.random::<f32>() > 0.7 {
                    ParticleColor::Cyan
                } else {
                    ParticleColor::White
                },
            }
        } else {
            let speed = self.rng.random::<f32>() * 5.0 + 5.0;
            let spread = (self.rng.random::<f32>() - 0.5) * 0.4;
            let exhaust = heading_deg.to_radians() + PI + spread;
            Particle {
                id,
                pos: origin - forward * EXHAUST_OFFSET,
                vel: Vec2::new(exhaust.cos(), exhaust.sin()) * speed,
                life: EXHAUST_LIFE,
                size: self.rng.random::<f32>() * 6.0 + 4.0,
                color: if self.rng.random::<f32>() > 0.4 {
                    ParticleColor::Amber
                } else {
                    ParticleColor::Red
                },
            }
        };
        self.particles.push(particle);
    }

    /// Spawn a frame's worth of particles for the current flight state
    pub fn emit(&mut self, origin: Vec2, heading_deg: f32, warp: f32, warping: bool) {
        for _ in 0..Self::density(warp, warping) {
            self.spawn(origin, heading_deg, warp);
        }
    }

    /// Move, age and prune; then enforce the population cap
    pub fn advance(&mut self, warping: bool, tuning: &FlightTuning, scale: f32) {
        let decay = if warping {
            tuning.particle_decay_warp
        } else {
            tuning.particle_decay_cruise
        };
        for p in self.particles.iter_mut() {
            p.pos += p.vel * scale;
            p.life -= decay * scale;
        }
        self.particles.retain(|p| p.life > 0.0);

        let cap = if warping {
            tuning.max_particles_warp
        } else {
            tuning.max_particles_cruise
        };
        self.enforce_cap(cap);
    }

    /// Drop the oldest particles above `cap`
    pub fn enforce_cap(&mut self, cap: usize) {
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(0..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exhaust_spawns_behind_ship() {
        let mut ps = ParticleSystem::new(1);
        ps.spawn(Vec2::ZERO, 0.0, 0.0);
        let p = &ps.particles()[0];
        assert_eq!(p.pos, Vec2::new(-40.0, 0.0));
        assert!(p.vel.x < 0.0);
        assert_eq!(p.life, 0.5);
        assert!(matches!(p.color, ParticleColor::Amber | ParticleColor::Red));
        assert!((4.0..10.0).contains(&p.size));
    }

    #[test]
    fn test_streaks_above_threshold() {
        let mut ps = ParticleSystem::new(2);
        ps.spawn(Vec2::ZERO, 90.0, 1.0);
        let p = &ps.particles()[0];
        assert!((0.1..=0.4).contains(&p.life));
        assert!(p.vel.y < -79.0);
        assert!(p.pos.x.abs() <= 300.0 && p.pos.y.abs() <= 300.0);
        assert!(matches!(p.color, ParticleColor::Cyan | ParticleColor::White));
    }

    #[test]
    fn test_density() {
        assert_eq!(ParticleSystem::density(0.0, false), 1);
        assert_eq!(ParticleSystem::density(0.5, true), 4);
        assert_eq!(ParticleSystem::density(1.0, true), 6);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut ps = ParticleSystem::new(3);
        for _ in 0..150 {
            ps.spawn(Vec2::ZERO, 0.0, 0.0);
        }
        ps.advance(false, &FlightTuning::default(), 1.0);
        assert_eq!(ps.len(), 100);
        assert_eq!(ps.particles()[0].id, 51);
    }

    #[test]
    fn test_exhaust_expires() {
        let mut ps = ParticleSystem::new(4);
        ps.spawn(Vec2::ZERO, 0.0, 0.0);
        let t = FlightTuning::default();
        // 0.5 life at 0.04 per frame lasts 12 frames, gone on the 13th
        for _ in 0..12 {
            ps.advance(false, &t, 1.0);
        }
        assert_eq!(ps.len(), 1);
        ps.advance(false, &t, 1.0);
        assert!(ps.is_empty());
    }

    proptest! {
        #[test]
        fn prop_life_strictly_decreases(seed in any::<u64>(), warp in 0.0f32..1.0, frames in 1usize..30) {
            let t = FlightTuning::default();
            let mut ps = ParticleSystem::new(seed);
            let warping = warp > 0.0;
            for _ in 0..frames {
                ps.emit(Vec2::ZERO, 45.0, warp, warping);
                let before: Vec<(u64, f32)> = ps.particles().iter().map(|p| (p.id, p.life)).collect();
                ps.advance(warping, &t, 1.0);
                let cap = if warping { t.max_particles_warp } else { t.max_particles_cruise };
                prop_assert!(ps.len() <= cap);
                for p in ps.particles() {
                    prop_assert!(p.life > 0.0);
                    let old = before.iter().find(|(id, _)| *id == p.id).map(|(_, l)| *l);
                    prop_assert!(old.is_some_and(|l| p.life < l));
                }
            }
        }
    }
}
