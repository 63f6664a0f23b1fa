//! Game settings and flight tuning
//!
//! Persisted in LocalStorage on the web; natively loaded from a JSON string
//! or left at defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Multiplier applied to the particle population caps
    pub fn particle_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }
}

/// Physics constants for one flight session
///
/// Defaults reproduce the arcade feel; every value is per reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    pub rotation_speed: f32,
    pub manual_acceleration: f32,
    pub manual_max_speed: f32,
    pub friction: f32,
    pub stop_threshold: f32,
    pub high_speed_drag: f32,
    pub high_speed_drag_threshold: f32,

    pub warp_acceleration: f32,
    pub warp_max_speed: f32,
    pub braking_radius: f32,
    pub slow_radius: f32,
    pub deceleration: f32,
    pub creep_factor: f32,
    pub arrival_epsilon: f32,
    pub cruise_brake: f32,
    pub slow_zone_brake: f32,

    pub scan_distance: f32,
    pub warp_zoom_out: f32,

    pub max_particles_cruise: usize,
    pub max_particles_warp: usize,
    pub particle_decay_cruise: f32,
    pub particle_decay_warp: f32,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            rotation_speed: ROTATION_SPEED,
            manual_acceleration: MANUAL_ACCELERATION,
            manual_max_speed: MANUAL_MAX_SPEED,
            friction: FRICTION,
            stop_threshold: STOP_THRESHOLD,
            high_speed_drag: HIGH_SPEED_DRAG,
            high_speed_drag_threshold: HIGH_SPEED_DRAG_THRESHOLD,

            warp_acceleration: WARP_ACCELERATION,
            warp_max_speed: WARP_MAX_SPEED,
            braking_radius: BRAKING_RADIUS,
            slow_radius: SLOW_RADIUS,
            deceleration: DECELERATION,
            creep_factor: CREEP_FACTOR,
            arrival_epsilon: ARRIVAL_EPSILON,
            cruise_brake: CRUISE_BRAKE,
            slow_zone_brake: SLOW_ZONE_BRAKE,

            scan_distance: SCAN_DISTANCE,
            warp_zoom_out: WARP_ZOOM_OUT,

            max_particles_cruise: MAX_PARTICLES_CRUISE,
            max_particles_warp: MAX_PARTICLES_WARP,
            particle_decay_cruise: PARTICLE_DECAY_CRUISE,
            particle_decay_warp: PARTICLE_DECAY_WARP,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Exhaust and warp streak particles
    pub particles: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
    /// All sound off
    pub muted: bool,

    // === Language ===
    /// Body names: "th" for Thai, anything else English
    pub locale: String,

    // === Accessibility ===
    /// Reduced motion (no warp zoom-out)
    pub reduced_motion: bool,

    // === Flight ===
    pub tuning: FlightTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
            muted: false,
            locale: "en".to_string(),
            reduced_motion: false,
            tuning: FlightTuning::default(),
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Tuning with quality and accessibility preferences folded in
    pub fn effective_tuning(&self) -> FlightTuning {
        let mut tuning = self.tuning.clone();
        if self.particles {
            let scale = self.quality.particle_scale();
            tuning.max_particles_cruise = (tuning.max_particles_cruise as f32 * scale) as usize;
            tuning.max_particles_warp = (tuning.max_particles_warp as f32 * scale) as usize;
        } else {
            tuning.max_particles_cruise = 0;
            tuning.max_particles_warp = 0;
        }
        if self.reduced_motion {
            tuning.warp_zoom_out = 0.0;
        }
        tuning
    }

    /// Effective sound volume (0.0 - 1.0)
    pub fn effective_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Switch body names between English and Thai
    pub fn toggle_locale(&mut self) -> &str {
        self.locale = if self.locale.eq_ignore_ascii_case("th") {
            "en".to_string()
        } else {
            "th".to_string()
        };
        &self.locale
    }

    /// Master volume from a 0-100 UI value; junk input leaves it unchanged
    pub fn set_master_volume_percent(&mut self, input: &str) -> f32 {
        if let Ok(percent) = input.trim().trim_end_matches('%').parse::<f32>() {
            if percent.is_finite() {
                self.master_volume = (percent / 100.0).clamp(0.0, 1.0);
            }
        }
        self.master_volume
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cosmo_voyager_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"quality":"High","tuning":{"warp_max_speed":3000.0}}"#);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.tuning.warp_max_speed, 3000.0);
        assert_eq!(settings.tuning.manual_max_speed, MANUAL_MAX_SPEED);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let settings = Settings::from_json("{not json");
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.tuning, FlightTuning::default());
    }

    #[test]
    fn test_effective_tuning_particle_caps() {
        let low = Settings::from_preset(QualityPreset::Low).effective_tuning();
        assert_eq!(low.max_particles_cruise, 50);
        assert_eq!(low.max_particles_warp, 100);

        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.effective_tuning().max_particles_warp, 0);
    }

    #[test]
    fn test_locale_and_volume_preferences() {
        let mut settings = Settings::from_json(r#"{"muted":true}"#);
        assert!(settings.muted);
        assert_eq!(settings.locale, "en");
        assert_eq!(settings.toggle_locale(), "th");
        assert_eq!(settings.toggle_locale(), "en");

        assert_eq!(settings.set_master_volume_percent("50"), 0.5);
        assert_eq!(settings.set_master_volume_percent("loud"), 0.5);
        assert_eq!(settings.set_master_volume_percent("250%"), 1.0);
        assert_eq!(settings.effective_volume(), 1.0);
    }

    #[test]
    fn test_quality_names() {
        for q in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(q.as_str()), Some(q));
        }
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_reduced_motion_disables_warp_zoom() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(settings.effective_tuning().warp_zoom_out, 0.0);
    }
}
