#![forbid(unsafe_code)]

//! Widget configuration.
//!
//! Groups every tunable into a single [`BarajaConfig`] that can be loaded
//! from TOML or JSON when the `config` feature is enabled.
//!
//! ```toml
//! [options]
//! easing = "ease-in-out"
//! speed = 300
//!
//! [fan]
//! direction = "left"
//! range = 120.0
//! origin = { x = 25.0, y = 100.0 }
//!
//! [dispatch]
//! completion_timeout_ms = 5000
//! max_queued = 16
//! ```
//!
//! Every field has a default matching the built-in behavior, so
//! `BarajaConfig::default()` is what `Baraja::initialize` uses.

#[cfg(feature = "config")]
use std::path::Path;

use baraja_core::{BarajaOptions, DEFAULT_Z_INDEX_MIN, ResolvedFanSettings};
use web_time::Duration;

/// Sequencing limits.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct DispatchConfig {
    /// Grace period after a transition's expected end before it is settled
    /// without a host signal.
    pub completion_timeout_ms: u64,
    /// Requests held while an operation is in flight; further ones are
    /// rejected.
    pub max_queued: usize,
    /// Lowest z-index handed to items.
    pub z_index_min: i32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            completion_timeout_ms: 5000,
            max_queued: 16,
            z_index_min: DEFAULT_Z_INDEX_MIN,
        }
    }
}

impl DispatchConfig {
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct BarajaConfig {
    /// Speed and easing for navigation and bring-to-front.
    pub options: BarajaOptions,
    /// Defaults that partial fan settings are merged with.
    pub fan: ResolvedFanSettings,
    pub dispatch: DispatchConfig,
}

impl BarajaConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to TOML.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check parameters for values that would produce a broken layout.
    ///
    /// Returns a list of problems; an empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.fan.speed == 0 {
            errors.push("fan.speed must be > 0".into());
        }
        if !self.fan.range.is_finite() {
            errors.push(format!("fan.range must be finite, got {}", self.fan.range));
        }
        if !self.fan.translation.is_finite() {
            errors.push(format!(
                "fan.translation must be finite, got {}",
                self.fan.translation
            ));
        }
        if self.fan.easing.is_empty() {
            errors.push("fan.easing must not be empty".into());
        }
        if let Some(r) = self.fan.origin.range {
            if r.min_x > r.max_x {
                errors.push(format!(
                    "fan.origin range is inverted: min_x {} > max_x {}",
                    r.min_x, r.max_x
                ));
            }
        }
        if self.options.easing.is_empty() {
            errors.push("options.easing must not be empty".into());
        }
        if self.dispatch.completion_timeout_ms == 0 {
            errors.push("dispatch.completion_timeout_ms must be > 0".into());
        }

        errors
    }

    /// Like [`validate`](Self::validate), as a `Result`.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baraja_core::{Direction, OriginRange};

    #[test]
    fn default_is_valid() {
        assert!(BarajaConfig::default().validate().is_empty());
        assert_eq!(
            BarajaConfig::default().dispatch.completion_timeout(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn validate_reports_every_problem() {
        let mut config = BarajaConfig::default();
        config.fan.speed = 0;
        config.fan.range = f64::INFINITY;
        config.fan.origin.range = Some(OriginRange {
            min_x: 80.0,
            max_x: 20.0,
        });
        config.dispatch.completion_timeout_ms = 0;
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(matches!(
            config.validated(),
            Err(ConfigError::Validation(e)) if e.len() == 4
        ));
    }

    #[test]
    fn validation_error_display() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_partial_overrides() {
        let config = BarajaConfig::from_toml_str(
            r#"
            [options]
            speed = 450

            [fan]
            direction = "left"
            range = 120.0

            [dispatch]
            max_queued = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.options.speed, 450);
        assert_eq!(config.options.easing.as_str(), "ease-in-out");
        assert_eq!(config.fan.direction, Direction::Left);
        assert_eq!(config.fan.range, 120.0);
        assert_eq!(config.fan.speed, 500);
        assert_eq!(config.dispatch.max_queued, 4);
        assert_eq!(config.dispatch.completion_timeout_ms, 5000);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_round_trip_through_file() {
        use std::io::Write;

        let mut config = BarajaConfig::default();
        config.fan.scatter = true;
        let json = serde_json::to_string(&config).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = BarajaConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[cfg(feature = "config")]
    #[test]
    fn malformed_toml_is_an_error() {
        let err = BarajaConfig::from_toml_str("[fan\nrange = ").unwrap_err();
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[cfg(not(feature = "config"))]
    #[test]
    fn direction_default_is_right() {
        assert_eq!(BarajaConfig::default().fan.direction, Direction::Right);
    }
}
