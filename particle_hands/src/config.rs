//! Configuration management.
//!
//! Every tuning constant of the signal path lives here with its legacy
//! value as the default, so a config file only needs the keys it changes:
//!
//! ```toml
//! [interpreter]
//! pinch_distance = 0.06
//!
//! [control.latch]
//! lock_above = 0.85
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use hand_signal::{InterpreterConfig, SmootherConfig, Timing};
use particle_control::ControlConfig;

use crate::error::AppError;

pub const FULL_PARTICLES:    usize = 30_000;
pub const COMPACT_PARTICLES: usize = 12_000;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timing:      Timing,
    pub interpreter: InterpreterConfig,
    pub smoother:    SmootherConfig,
    pub control:     ControlConfig,
    pub view:        ViewConfig,
}

/// Window, particle and simulated-detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width:          usize,
    pub height:         usize,
    /// Fewer particles for slow machines.
    pub compact:        bool,
    /// Explicit particle count; overrides `compact`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle_count: Option<usize>,
    /// Simulated detector cadence.
    pub detector_hz:    f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            width:          960,
            height:         600,
            compact:        false,
            particle_count: None,
            detector_hz:    30.0,
        }
    }
}

impl ViewConfig {
    pub fn particle_count(&self) -> usize {
        match self.particle_count {
            Some(n) => n,
            None if self.compact => COMPACT_PARTICLES,
            None => FULL_PARTICLES,
        }
    }
}

impl AppConfig {
    /// Validate every section; the first bad field wins.
    pub fn validate(&self) -> Result<(), AppError> {
        self.timing.validate()?;
        self.interpreter.validate()?;
        self.smoother.validate()?;
        self.control.validate()?;

        let v = &self.view;
        if v.width < 64 || v.height < 64 {
            return Err(AppError::Config(format!(
                "window must be at least 64x64, got {}x{}", v.width, v.height
            )));
        }
        if !(v.detector_hz > 0.0 && v.detector_hz <= 240.0) {
            return Err(AppError::Config(format!(
                "detector_hz must be in (0, 240], got {}", v.detector_hz
            )));
        }
        if v.particle_count() == 0 {
            return Err(AppError::Config("particle_count must be > 0".to_string()));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when there
    /// is no file.
    pub fn load_default() -> Result<Self, AppError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".particle_hands").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("particle_hands.toml"))
    }

    pub fn to_toml(&self) -> Result<String, AppError> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_signal::Rate;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_valid_and_legacy() {
        let c = AppConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.interpreter.pinch_distance, 0.08);
        assert_eq!(c.smoother.position_rate, Rate::per_tick(0.15));
        assert_eq!(c.control.latch.lock_above, 0.8);
        assert_eq!(c.timing.reference_hz, 60.0);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut c = AppConfig::default();
        c.view.compact = true;
        c.interpreter.pinch_distance = 0.06;
        c.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, c);
        assert_eq!(loaded.view.particle_count(), COMPACT_PARTICLES);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[smoother]\npinch_rate = 0.3\n\n[control.latch]\nlock_above = 0.9\n").unwrap();

        let c = AppConfig::load(&path).unwrap();
        assert_eq!(c.smoother.pinch_rate, Rate::per_tick(0.3));
        assert_eq!(c.smoother.position_rate, Rate::per_tick(0.15));
        assert_eq!(c.control.latch.lock_above, 0.9);
        assert_eq!(c.control.latch.release_below, 0.5);
    }

    #[test]
    fn invalid_values_are_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[control.latch]\nlock_above = 0.3\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(AppError::Signal(_))));

        std::fs::write(&path, "[view]\ndetector_hz = 0.0\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[view\nwidth = ").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn particle_count_override() {
        let v = ViewConfig { particle_count: Some(500), compact: true, ..Default::default() };
        assert_eq!(v.particle_count(), 500);
        assert_eq!(ViewConfig::default().particle_count(), FULL_PARTICLES);
    }
}
