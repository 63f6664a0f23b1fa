//! Cosmo Voyager - arcade flight through a toy solar system
//!
//! Core modules:
//! - `sim`: Flight simulation (ship physics, autopilot, orbits, particles, proximity)
//! - `renderer`: Camera projection and sprite geometry (pure reads of sim state)
//! - `platform`: Keyboard/touch input mapping
//! - `frame`: Two-tier frame loop (per-frame simulation, throttled HUD sync)
//! - `hud`: Low-frequency snapshots for the presentation layer
//! - `session`: Missions and per-session progress
//! - `settings`: User preferences and flight tuning

pub mod audio;
pub mod error;
pub mod frame;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{CatalogError, ScanError};
pub use settings::{FlightTuning, QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Speeds are in world units per reference frame, rotation in degrees per
/// reference frame. All per-frame constants are scaled by
/// `dt / REFERENCE_DT` when the frame rate drifts.
pub mod consts {
    /// Frame duration the per-frame constants were tuned for (60 Hz)
    pub const REFERENCE_DT: f32 = 1.0 / 60.0;
    /// Longest frame delta accepted before clamping (tab switches, stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World scale: one "AU-ish" unit of the toy solar system
    pub const UNIVERSE_SCALE: f32 = 2000.0;
    /// Ship spawn point, just outside Earth's position
    pub const INITIAL_SHIP_POS: (f32, f32) = (0.4 * UNIVERSE_SCALE, 0.1 * UNIVERSE_SCALE);

    /// Manual flight
    pub const ROTATION_SPEED: f32 = 5.0;
    pub const MANUAL_ACCELERATION: f32 = 4.0;
    pub const MANUAL_MAX_SPEED: f32 = 600.0;
    pub const FRICTION: f32 = 0.98;
    /// Coasting speed below this snaps to zero
    pub const STOP_THRESHOLD: f32 = 0.1;
    pub const HIGH_SPEED_DRAG: f32 = 0.98;
    pub const HIGH_SPEED_DRAG_THRESHOLD: f32 = 400.0;

    /// Autopilot
    pub const WARP_ACCELERATION: f32 = 80.0;
    pub const WARP_MAX_SPEED: f32 = 5000.0;
    pub const BRAKING_RADIUS: f32 = 1500.0;
    pub const SLOW_RADIUS: f32 = 300.0;
    /// `v = sqrt(2 * a * d)` braking constant for the mid zone
    pub const DECELERATION: f32 = 15.0;
    pub const CREEP_FACTOR: f32 = 0.8;
    pub const ARRIVAL_EPSILON: f32 = 5.0;
    pub const CRUISE_BRAKE: f32 = 0.98;
    pub const SLOW_ZONE_BRAKE: f32 = 0.9;

    /// Warp visuals kick in above this speed and saturate at `WARP_FULL_SPEED`
    pub const WARP_SPEED_THRESHOLD: f32 = 400.0;
    pub const WARP_FULL_SPEED: f32 = 2000.0;

    /// Scanning
    pub const SCAN_DISTANCE: f32 = 600.0;
    /// Reported distance when nothing is tracked
    pub const NO_BODY_DISTANCE: f32 = 99_999.0;

    /// Zoom (1.0 = 100%)
    pub const ZOOM_MIN: f32 = 0.05;
    pub const ZOOM_MAX: f32 = 3.0;
    pub const ZOOM_STEP: f32 = 1.2;
    /// HUD percent field bounds
    pub const ZOOM_PERCENT_MIN: f32 = 10.0;
    pub const ZOOM_PERCENT_MAX: f32 = 300.0;
    /// Fraction of zoom shed at full warp (wider field of view)
    pub const WARP_ZOOM_OUT: f32 = 0.4;
    /// Extra world units kept around the viewport when culling (divided by zoom)
    pub const CULL_MARGIN: f32 = 2000.0;

    /// Comet ellipse: minor axis = major axis * ratio
    pub const COMET_MINOR_AXIS_RATIO: f32 = 0.4;

    /// Particles
    pub const MAX_PARTICLES_CRUISE: usize = 100;
    pub const MAX_PARTICLES_WARP: usize = 200;
    pub const PARTICLE_DECAY_CRUISE: f32 = 0.04;
    pub const PARTICLE_DECAY_WARP: f32 = 0.08;
    /// Above this warp intensity exhaust turns into streaks
    pub const STREAK_MIN_WARP: f32 = 0.05;
    pub const EXHAUST_OFFSET: f32 = 40.0;
    pub const EXHAUST_LIFE: f32 = 0.5;

    /// HUD sync period (~30 Hz)
    pub const HUD_INTERVAL_MS: f64 = 30.0;

    /// Virtual joystick
    pub const JOYSTICK_RADIUS: f32 = 50.0;
    pub const JOYSTICK_ROTATE_DEADZONE: f32 = 0.2;
    pub const JOYSTICK_THRUST_THRESHOLD: f32 = -0.3;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Unit vector for a heading in degrees
#[inline]
pub fn heading_vector(heading_deg: f32) -> Vec2 {
    let rad = heading_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Warp intensity (0-1) for a scalar speed
#[inline]
pub fn warp_intensity(speed: f32) -> f32 {
    use consts::{WARP_FULL_SPEED, WARP_SPEED_THRESHOLD};
    ((speed - WARP_SPEED_THRESHOLD) / (WARP_FULL_SPEED - WARP_SPEED_THRESHOLD)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_degrees_wraps() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-5.0), 355.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
    }

    #[test]
    fn test_warp_intensity_range() {
        assert_eq!(warp_intensity(0.0), 0.0);
        assert_eq!(warp_intensity(400.0), 0.0);
        assert!((warp_intensity(1200.0) - 0.5).abs() < 1e-6);
        assert_eq!(warp_intensity(5000.0), 1.0);
    }

    #[test]
    fn test_heading_vector_axes() {
        let east = heading_vector(0.0);
        assert_eq!(east, Vec2::new(1.0, 0.0));
        let south = heading_vector(90.0);
        assert!(south.x.abs() < 1e-6 && (south.y - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_normalized_heading_in_range(angle in -1.0e6f32..1.0e6f32) {
            let a = normalize_degrees(angle);
            prop_assert!((0.0..360.0).contains(&a));
        }
    }
}
