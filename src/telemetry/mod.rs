//! # Telemetry Module
//!
//! Turns decoded bidirectional DShot telemetry into eRPM and mechanical RPM.
//!
//! This module handles:
//! - Scaling the recovered telemetry field to eRPM (pluggable strategy)
//! - Converting eRPM to mechanical RPM from the motor's magnet count
//! - Recording telemetry samples to rotating JSONL files

pub mod recorder;

/// Default linear factor from telemetry field to eRPM
pub const DEFAULT_ERPM_SCALE: u32 = 100;

/// Strategy converting a decoded telemetry field into eRPM
///
/// The relation is ESC-specific; [`LinearErpmScale`] is the default
/// approximation.
pub trait ErpmScale {
    /// Convert a validated telemetry field (48-2047) into eRPM
    fn to_erpm(&self, field: u16) -> u32;
}

/// `eRPM = field * factor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearErpmScale {
    factor: u32,
}

impl LinearErpmScale {
    /// Create a linear scale with the given factor
    pub fn new(factor: u32) -> Self {
        Self { factor }
    }

    /// Multiplication factor
    pub fn factor(&self) -> u32 {
        self.factor
    }
}

impl Default for LinearErpmScale {
    fn default() -> Self {
        Self::new(DEFAULT_ERPM_SCALE)
    }
}

impl ErpmScale for LinearErpmScale {
    fn to_erpm(&self, field: u16) -> u32 {
        u32::from(field).saturating_mul(self.factor)
    }
}

/// Convert eRPM to mechanical RPM
///
/// Pole pairs are `magnet_count / 2`, floored at 1 so that a magnet count of
/// 0 or 1 never divides by zero.
///
/// # Examples
///
/// ```
/// use dshot_engine::telemetry::erpm_to_rpm;
///
/// assert_eq!(erpm_to_rpm(14_000, 14), 2_000);
/// assert_eq!(erpm_to_rpm(14_000, 0), 14_000);
/// ```
pub fn erpm_to_rpm(erpm: u32, magnet_count: u8) -> u32 {
    let pole_count = u32::from(magnet_count / 2).max(1);
    erpm / pole_count
}
