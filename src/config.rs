//! Tunable game constants.
//!
//! Every value has a default matching the classic 360×640 layout, so a
//! config file only needs the keys it wants to change:
//!
//! ```toml
//! [cat]
//! gravity = 0.12
//!
//! [pipes]
//! gap = 160.0
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "FLAPPY_CAT_CONFIG";

/// Visible playfield, in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
    /// Height of the ground band at the bottom of the field.
    pub ground_height: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 640.0,
            ground_height: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatConfig {
    pub x: f64,
    pub start_y: f64,
    pub width: f64,
    pub height: f64,
    /// Added to velocity every tick.
    pub gravity: f64,
    /// Velocity set by a flap (negative = upward).
    pub flap_impulse: f64,
}

impl Default for CatConfig {
    fn default() -> Self {
        Self {
            x: 80.0,
            start_y: 240.0,
            width: 100.0,
            height: 52.0,
            gravity: 0.1,
            flap_impulse: -4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub width: f64,
    /// Height of the top segment; the gap starts this far below a pipe's offset.
    pub segment_height: f64,
    pub gap: f64,
    /// Leftward scroll per tick.
    pub speed: f64,
    /// Minimum distance from the right edge to the newest pipe before spawning.
    pub spacing: f64,
    /// Offsets are drawn uniformly from `[-offset_range, 0)`.
    pub offset_range: f64,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            width: 60.0,
            segment_height: 360.0,
            gap: 180.0,
            speed: 2.1,
            spacing: 180.0,
            offset_range: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Milliseconds per tick (~60 Hz by default).
    pub frame_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { frame_ms: 16 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: FieldConfig,
    pub cat: CatConfig,
    pub pipes: PipeConfig,
    pub timing: TimingConfig,
}

impl GameConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `$FLAPPY_CAT_CONFIG`, then the user config dir, falling back
    /// to defaults when neither exists.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.field;
        positive("field.width", f.width)?;
        positive("field.height", f.height)?;
        non_negative("field.ground_height", f.ground_height)?;
        if f.ground_height >= f.height {
            return Err(invalid("field.ground_height", "must be below the field height"));
        }

        let c = &self.cat;
        positive("cat.width", c.width)?;
        positive("cat.height", c.height)?;
        positive("cat.gravity", c.gravity)?;
        if !c.flap_impulse.is_finite() || c.flap_impulse >= 0.0 {
            return Err(invalid("cat.flap_impulse", "must be negative (upward)"));
        }
        if !c.x.is_finite() || !c.start_y.is_finite() {
            return Err(invalid("cat", "position must be finite"));
        }

        let p = &self.pipes;
        positive("pipes.width", p.width)?;
        positive("pipes.segment_height", p.segment_height)?;
        positive("pipes.gap", p.gap)?;
        positive("pipes.speed", p.speed)?;
        positive("pipes.offset_range", p.offset_range)?;
        if !p.spacing.is_finite() || p.spacing < p.width {
            return Err(invalid("pipes.spacing", "must be at least the pipe width"));
        }

        if self.timing.frame_ms == 0 {
            return Err(invalid("timing.frame_ms", "must be positive"));
        }
        Ok(())
    }
}

/// `<config_dir>/flappy-cat/config.toml`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flappy-cat").join("config.toml"))
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be positive"))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must not be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.field.width, 360.0);
        assert_eq!(config.field.ground_height, 90.0);
        assert_eq!(config.cat.flap_impulse, -4.0);
        assert_eq!(config.pipes.spacing, 180.0);
        assert_eq!(config.timing.frame_ms, 16);
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = GameConfig::from_toml_str("[pipes]\ngap = 150.0\n").unwrap();
        assert_eq!(config.pipes.gap, 150.0);
        assert_eq!(config.pipes.width, 60.0);
        assert_eq!(config.cat, CatConfig::default());
    }

    #[test]
    fn test_rejects_upward_gravity() {
        let err = GameConfig::from_toml_str("[cat]\ngravity = -0.1\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "cat.gravity",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_downward_flap() {
        let err = GameConfig::from_toml_str("[cat]\nflap_impulse = 4.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "cat.flap_impulse",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_spacing_below_pipe_width() {
        let err = GameConfig::from_toml_str("[pipes]\nspacing = 40.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "pipes.spacing",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_ground_taller_than_field() {
        let toml = "[field]\nheight = 100.0\nground_height = 100.0\n";
        assert!(GameConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_rejects_zero_frame_time() {
        assert!(GameConfig::from_toml_str("[timing]\nframe_ms = 0\n").is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = GameConfig::from_toml_str("[cat\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load(Path::new("/nonexistent/flappy-cat.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
