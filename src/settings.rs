//! Engine and demo settings
//!
//! JSON on native hosts, LocalStorage in the browser. Missing fields take their
//! defaults, so older files keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::{FIXED_STEP_SECONDS, MAX_ACCUMULATOR_MS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::SettingsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Simulation steps per second
    pub step_rate_hz: f64,
    /// Accumulator ceiling; time beyond it is dropped after a stall
    pub max_accumulator_ms: f64,

    // === Viewport ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Simulation ===
    /// Run SAT between bodies every step
    pub collisions: bool,

    // === Demo ===
    /// Seed for obstacle generation
    pub seed: u64,
    pub obstacle_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_rate_hz: 1.0 / FIXED_STEP_SECONDS,
            max_accumulator_ms: MAX_ACCUMULATOR_MS,

            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            collisions: true,

            seed: 0x5eed_d0e1,
            obstacle_count: 12,
        }
    }
}

impl Settings {
    /// Highest step rate accepted by [`validate`](Self::validate)
    pub const MAX_STEP_RATE_HZ: f64 = 1000.0;

    /// Fixed step length in seconds
    #[inline]
    pub fn step_seconds(&self) -> f64 {
        1.0 / self.step_rate_hz
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.step_rate_hz.is_finite()
            && self.step_rate_hz > 0.0
            && self.step_rate_hz <= Self::MAX_STEP_RATE_HZ)
        {
            return Err(SettingsError::Invalid(format!(
                "step_rate_hz must be in (0, {}], got {}",
                Self::MAX_STEP_RATE_HZ,
                self.step_rate_hz
            )));
        }
        let step_ms = self.step_seconds() * 1000.0;
        if !(self.max_accumulator_ms.is_finite() && self.max_accumulator_ms >= step_ms) {
            return Err(SettingsError::Invalid(format!(
                "max_accumulator_ms must be at least one step ({step_ms:.3} ms), got {}",
                self.max_accumulator_ms
            )));
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "viewport must be positive, got {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        Ok(())
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "el_duel_settings";

    /// Load settings from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {err}"),
                }
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
            match self.to_json() {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_ok() {
                        log::info!("Settings saved");
                    }
                }
                Err(err) => log::warn!("Could not serialize settings: {err}"),
            }
        }
    }
}
