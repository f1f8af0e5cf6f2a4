//! # DShot Protocol Constants and Types
//!
//! Core protocol definitions for DShot signal generation and telemetry.

use serde::Deserialize;

/// Number of data bits in a DShot packet
pub const DSHOT_BITS_PER_FRAME: usize = 16;

/// Number of symbols in a transmitted frame (16 data bits + 1 pause)
pub const DSHOT_FRAME_SYMBOLS: usize = DSHOT_BITS_PER_FRAME + 1;

/// Length of the inter-frame pause, in bit periods
///
/// The receiver uses this silence to find the frame boundary.
pub const DSHOT_PAUSE_BITS: u16 = 21;

/// Lowest throttle value (values below are reserved command codes)
pub const DSHOT_THROTTLE_MIN: u16 = 48;

/// Highest throttle value (11-bit maximum)
pub const DSHOT_THROTTLE_MAX: u16 = 2047;

/// Mask for the 11-bit throttle field
pub const DSHOT_THROTTLE_MASK: u16 = 0x7FF;

/// Mask for the 4-bit checksum field
pub const DSHOT_CHECKSUM_MASK: u16 = 0x0F;

/// Signal peripheral clock resolution (10 MHz, 100 ns per tick)
pub const DSHOT_RESOLUTION_HZ: u32 = 10_000_000;

/// Shortest accepted received pulse in nanoseconds
pub const DSHOT_RX_MIN_SIGNAL_NS: u32 = 1_000;

/// Longest received level before the line counts as idle, in nanoseconds
pub const DSHOT_RX_MAX_SIGNAL_NS: u32 = 15_000;

/// DShot speed grade
///
/// Determines bit timing. Fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedGrade {
    /// Output disabled (degenerate zero-length timing)
    Off,
    /// 150 kbit/s
    Dshot150,
    /// 300 kbit/s
    Dshot300,
    /// 600 kbit/s
    #[default]
    Dshot600,
    /// 1200 kbit/s
    Dshot1200,
}

impl SpeedGrade {
    /// Nominal bit rate in kbit/s (0 when off)
    pub fn bitrate_kbps(&self) -> u32 {
        match self {
            SpeedGrade::Off => 0,
            SpeedGrade::Dshot150 => 150,
            SpeedGrade::Dshot300 => 300,
            SpeedGrade::Dshot600 => 600,
            SpeedGrade::Dshot1200 => 1200,
        }
    }
}

impl std::fmt::Display for SpeedGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedGrade::Off => write!(f, "DSHOT_OFF"),
            grade => write!(f, "DSHOT{}", grade.bitrate_kbps()),
        }
    }
}

/// One timed pulse at the signal-generation layer
///
/// Mirrors a peripheral symbol word: the line is held at `level0` for
/// `duration0` ticks, then at `level1` for `duration1` ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Symbol {
    /// First level (true = high)
    pub level0: bool,

    /// Ticks spent at `level0`
    pub duration0: u16,

    /// Second level (true = high)
    pub level1: bool,

    /// Ticks spent at `level1`
    pub duration1: u16,
}

impl Symbol {
    /// A data-bit pulse: high for `high` ticks, then low for `low` ticks
    pub fn pulse(high: u16, low: u16) -> Self {
        Self {
            level0: true,
            duration0: high,
            level1: false,
            duration1: low,
        }
    }

    /// A pause held at logic low for `ticks`
    pub fn pause(ticks: u16) -> Self {
        Self {
            level0: false,
            duration0: ticks,
            level1: false,
            duration1: 0,
        }
    }

    /// Whether this symbol has data-bit polarity (high then low)
    pub fn is_pulse(&self) -> bool {
        self.level0 && !self.level1
    }

    /// Total length in ticks
    pub fn total_ticks(&self) -> u32 {
        self.duration0 as u32 + self.duration1 as u32
    }
}

/// A complete transmit frame: 16 data symbols followed by one pause symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    symbols: [Symbol; DSHOT_FRAME_SYMBOLS],
}

impl Frame {
    /// Build a frame from its symbols
    pub fn new(symbols: [Symbol; DSHOT_FRAME_SYMBOLS]) -> Self {
        Self { symbols }
    }

    /// All 17 symbols, in transmission order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The 16 data-bit symbols, most significant bit first
    pub fn data_symbols(&self) -> &[Symbol] {
        &self.symbols[..DSHOT_BITS_PER_FRAME]
    }

    /// The trailing pause symbol
    pub fn pause(&self) -> &Symbol {
        &self.symbols[DSHOT_BITS_PER_FRAME]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_constants() {
        assert_eq!(DSHOT_BITS_PER_FRAME, 16);
        assert_eq!(DSHOT_FRAME_SYMBOLS, 17);
        assert_eq!(DSHOT_THROTTLE_MIN, 48);
        assert_eq!(DSHOT_THROTTLE_MAX, 2047);
        assert_eq!(DSHOT_THROTTLE_MASK, DSHOT_THROTTLE_MAX);
    }

    #[test]
    fn test_speed_grade_bitrates() {
        assert_eq!(SpeedGrade::Off.bitrate_kbps(), 0);
        assert_eq!(SpeedGrade::Dshot150.bitrate_kbps(), 150);
        assert_eq!(SpeedGrade::Dshot300.bitrate_kbps(), 300);
        assert_eq!(SpeedGrade::Dshot600.bitrate_kbps(), 600);
        assert_eq!(SpeedGrade::Dshot1200.bitrate_kbps(), 1200);
    }

    #[test]
    fn test_speed_grade_display() {
        assert_eq!(SpeedGrade::Dshot600.to_string(), "DSHOT600");
        assert_eq!(SpeedGrade::Off.to_string(), "DSHOT_OFF");
    }

    #[test]
    fn test_speed_grade_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: SpeedGrade,
        }

        let parsed: Wrapper = toml::from_str("mode = \"dshot1200\"").unwrap();
        assert_eq!(parsed.mode, SpeedGrade::Dshot1200);

        let parsed: Wrapper = toml::from_str("mode = \"off\"").unwrap();
        assert_eq!(parsed.mode, SpeedGrade::Off);

        assert!(toml::from_str::<Wrapper>("mode = \"dshot9000\"").is_err());
    }

    #[test]
    fn test_symbol_constructors() {
        let pulse = Symbol::pulse(12, 4);
        assert!(pulse.is_pulse());
        assert_eq!(pulse.total_ticks(), 16);

        let pause = Symbol::pause(336);
        assert!(!pause.is_pulse());
        assert!(!pause.level0);
        assert!(!pause.level1);
        assert_eq!(pause.duration0, 336);
        assert_eq!(pause.duration1, 0);
    }

    #[test]
    fn test_frame_split() {
        let mut symbols = [Symbol::pulse(6, 10); DSHOT_FRAME_SYMBOLS];
        symbols[16] = Symbol::pause(336);
        let frame = Frame::new(symbols);

        assert_eq!(frame.symbols().len(), 17);
        assert_eq!(frame.data_symbols().len(), 16);
        assert_eq!(*frame.pause(), Symbol::pause(336));
    }
}
