//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::dshot::protocol::{SpeedGrade, DSHOT_THROTTLE_MAX, DSHOT_THROTTLE_MIN};
use crate::error::{DshotError, Result};

/// Most engines a single process drives
pub const MAX_MOTORS: usize = 8;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub receive: ReceiveConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub recorder: RecorderConfig,
}

/// DShot engine configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub mode: SpeedGrade,

    #[serde(default)]
    pub bidirectional: bool,

    #[serde(default = "default_motor_count")]
    pub motor_count: usize,

    #[serde(default = "default_initial_throttle")]
    pub initial_throttle: u16,
}

/// Telemetry receive window configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReceiveConfig {
    #[serde(default = "default_min_signal_ns")]
    pub min_signal_ns: u32,

    #[serde(default = "default_max_signal_ns")]
    pub max_signal_ns: u32,
}

/// Telemetry conversion and polling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_erpm_scale")]
    pub erpm_scale: u32,

    #[serde(default = "default_magnet_count")]
    pub magnet_count: u8,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Telemetry file recording configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RecorderConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,
}

// Default value functions
fn default_motor_count() -> usize { 1 }
fn default_initial_throttle() -> u16 { DSHOT_THROTTLE_MIN }

fn default_min_signal_ns() -> u32 { 1000 }
fn default_max_signal_ns() -> u32 { 15000 }

fn default_erpm_scale() -> u32 { 100 }
fn default_magnet_count() -> u8 { 14 }
fn default_poll_interval_ms() -> u64 { 100 }

fn default_log_dir() -> String { "./logs".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: SpeedGrade::default(),
            bidirectional: false,
            motor_count: default_motor_count(),
            initial_throttle: default_initial_throttle(),
        }
    }
}

impl Default for ReceiveConfig {
    fn default() -> Self {
        Self {
            min_signal_ns: default_min_signal_ns(),
            max_signal_ns: default_max_signal_ns(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            erpm_scale: default_erpm_scale(),
            magnet_count: default_magnet_count(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
        }
    }
}

fn invalid(msg: impl std::fmt::Display) -> DshotError {
    DshotError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dshot_engine::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.engine.motor_count == 0 || self.engine.motor_count > MAX_MOTORS {
            return Err(invalid(format!("motor_count must be between 1 and {}", MAX_MOTORS)));
        }

        if self.engine.initial_throttle < DSHOT_THROTTLE_MIN
            || self.engine.initial_throttle > DSHOT_THROTTLE_MAX {
            return Err(invalid(format!(
                "initial_throttle must be between {} and {}",
                DSHOT_THROTTLE_MIN, DSHOT_THROTTLE_MAX
            )));
        }

        if self.engine.mode == SpeedGrade::Off {
            return Err(invalid("mode cannot be 'off' for a running engine"));
        }

        // Receive window
        if self.receive.min_signal_ns == 0 {
            return Err(invalid("min_signal_ns must be greater than 0"));
        }

        if self.receive.max_signal_ns <= self.receive.min_signal_ns {
            return Err(invalid("max_signal_ns must be greater than min_signal_ns"));
        }

        // Telemetry
        if self.telemetry.erpm_scale == 0 {
            return Err(invalid("erpm_scale must be greater than 0"));
        }

        if self.telemetry.poll_interval_ms == 0 || self.telemetry.poll_interval_ms > 60000 {
            return Err(invalid("poll_interval_ms must be between 1 and 60000"));
        }

        // Recorder
        if self.recorder.enabled && self.recorder.log_dir.is_empty() {
            return Err(invalid("recorder log_dir cannot be empty when enabled"));
        }

        if self.recorder.max_records_per_file == 0 {
            return Err(invalid("max_records_per_file must be greater than 0"));
        }

        if self.recorder.max_files_to_keep == 0 {
            return Err(invalid("max_files_to_keep must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[engine]
mode = "dshot300"
bidirectional = true
motor_count = 4

[receive]

[telemetry]
erpm_scale = 50
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.engine.mode, SpeedGrade::Dshot300);
        assert!(config.engine.bidirectional);
        assert_eq!(config.engine.motor_count, 4);
        assert_eq!(config.engine.initial_throttle, 48);
        assert_eq!(config.receive.max_signal_ns, 15000);
        assert_eq!(config.telemetry.erpm_scale, 50);
        assert!(!config.recorder.enabled);
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"").unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.engine.mode, SpeedGrade::Dshot600);
        assert_eq!(config.telemetry.magnet_count, 14);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/dshot.toml");
        assert!(matches!(result, Err(DshotError::Io(_))));
    }

    #[test]
    fn test_load_invalid_mode() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[engine]\nmode = \"dshot2400\"\n").unwrap();
        temp_file.flush().unwrap();

        let result = Config::load(temp_file.path());
        assert!(matches!(result, Err(DshotError::Config(_))));
    }

    #[test]
    fn test_motor_count_zero() {
        let mut config = Config::default();
        config.engine.motor_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_motor_count_too_high() {
        let mut config = Config::default();
        config.engine.motor_count = MAX_MOTORS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_throttle_below_min() {
        let mut config = Config::default();
        config.engine.initial_throttle = 47;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_throttle_above_max() {
        let mut config = Config::default();
        config.engine.initial_throttle = 2048;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_off_rejected() {
        let mut config = Config::default();
        config.engine.mode = SpeedGrade::Off;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_signal_zero() {
        let mut config = Config::default();
        config.receive.min_signal_ns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_signal_not_above_min() {
        let mut config = Config::default();
        config.receive.max_signal_ns = config.receive.min_signal_ns;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_erpm_scale_zero() {
        let mut config = Config::default();
        config.telemetry.erpm_scale = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_zero() {
        let mut config = Config::default();
        config.telemetry.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_too_high() {
        let mut config = Config::default();
        config.telemetry.poll_interval_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_dir_when_enabled() {
        let mut config = Config::default();
        config.recorder.enabled = true;
        config.recorder.log_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_dir_when_disabled() {
        let mut config = Config::default();
        config.recorder.enabled = false;
        config.recorder.log_dir = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_records_per_file_zero() {
        let mut config = Config::default();
        config.recorder.max_records_per_file = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_files_to_keep_zero() {
        let mut config = Config::default();
        config.recorder.max_files_to_keep = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_motor_count(), 1);
        assert_eq!(default_initial_throttle(), 48);
        assert_eq!(default_min_signal_ns(), 1000);
        assert_eq!(default_max_signal_ns(), 15000);
        assert_eq!(default_erpm_scale(), 100);
        assert_eq!(default_magnet_count(), 14);
        assert_eq!(default_poll_interval_ms(), 100);
        assert_eq!(default_log_dir(), "./logs");
        assert_eq!(default_max_records_per_file(), 10000);
        assert_eq!(default_max_files_to_keep(), 10);
    }
}
