//! # Configuration
//!
//! Tunables for a session, loadable from TOML. Every field has a default
//! matching the shipped constants, so an empty file (or no file) is a valid
//! configuration.
//!
//! The movement constants here are part of the client/server contract:
//! peers that disagree on `speed` or `gravity` will predict divergent
//! motion and reconcile forever. Loading validates shape and positivity
//! only; agreement across peers is the deployment's responsibility.

use std::path::Path;

use serde::Deserialize;

use crate::movement::MotionConfig;

/// Failure to load or validate a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field that must be positive is zero or negative.
    #[error("config field `{field}` must be positive")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Session tunables.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NetConfig {
    /// Fixed simulation ticks per second, both sides.
    pub tick_rate: u32,
    /// Server snapshot broadcasts per second.
    pub snapshot_rate: u32,
    /// Planar movement speed in units per second.
    pub speed: f32,
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    /// States retained in the server's recent-history tail.
    pub history_capacity: usize,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            snapshot_rate: 60,
            speed: 7.0,
            gravity: 21.0,
            history_capacity: 20,
        }
    }
}

impl NetConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded session config");
        Ok(config)
    }

    /// Rejects values that would make the simulation degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::NonPositive { field: "tick_rate" });
        }
        if self.snapshot_rate == 0 {
            return Err(ConfigError::NonPositive {
                field: "snapshot_rate",
            });
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::NonPositive { field: "speed" });
        }
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(ConfigError::NonPositive { field: "gravity" });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::NonPositive {
                field: "history_capacity",
            });
        }
        Ok(())
    }

    /// Seconds per fixed simulation tick.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fixed_delta(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Seconds between snapshot broadcasts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn snapshot_interval(&self) -> f32 {
        1.0 / self.snapshot_rate as f32
    }

    /// Buffering delay for remote interpolation: deep enough for three
    /// snapshot intervals of jitter plus two local ticks of slack.
    #[must_use]
    pub fn interpolation_delay(&self) -> f32 {
        3.0 * self.snapshot_interval() + 2.0 * self.fixed_delta()
    }

    /// The movement constants as the resolver consumes them.
    #[must_use]
    pub const fn motion(&self) -> MotionConfig {
        MotionConfig {
            speed: self.speed,
            gravity: self.gravity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NetConfig::default();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.snapshot_rate, 60);
        assert!((config.speed - 7.0).abs() < f32::EPSILON);
        assert!((config.gravity - 21.0).abs() < f32::EPSILON);
        assert_eq!(config.history_capacity, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_defaults() {
        let config = NetConfig::from_toml_str("").unwrap();
        assert_eq!(config, NetConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = NetConfig::from_toml_str("tick_rate = 30\nspeed = 5.5\n").unwrap();
        assert_eq!(config.tick_rate, 30);
        assert!((config.speed - 5.5).abs() < f32::EPSILON);
        assert_eq!(config.snapshot_rate, 60);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            NetConfig::from_toml_str("warp_speed = 9.0\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_rates_rejected() {
        assert!(matches!(
            NetConfig::from_toml_str("tick_rate = 0\n"),
            Err(ConfigError::NonPositive { field: "tick_rate" })
        ));
        assert!(matches!(
            NetConfig::from_toml_str("gravity = -1.0\n"),
            Err(ConfigError::NonPositive { field: "gravity" })
        ));
    }

    #[test]
    fn test_derived_intervals() {
        let config = NetConfig::default();
        let delta = 1.0 / 60.0;
        assert!((config.fixed_delta() - delta).abs() < 1e-7);
        assert!((config.snapshot_interval() - delta).abs() < 1e-7);
        // Three snapshot intervals plus two ticks.
        assert!((config.interpolation_delay() - 5.0 * delta).abs() < 1e-6);
    }

    #[test]
    fn test_motion_constants_passed_through() {
        let config = NetConfig::from_toml_str("speed = 4.0\ngravity = 9.8\n").unwrap();
        let motion = config.motion();
        assert!((motion.speed - 4.0).abs() < f32::EPSILON);
        assert!((motion.gravity - 9.8).abs() < f32::EPSILON);
    }
}
