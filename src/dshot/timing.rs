//! # Bit Timing
//!
//! Tick counts per bit for each DShot speed grade, at the peripheral's
//! fixed 10 MHz resolution.

use super::protocol::{SpeedGrade, DSHOT_PAUSE_BITS};

/// Tick counts for one speed grade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    /// Length of one bit
    pub ticks_per_bit: u16,

    /// High time of a `0` bit
    pub ticks_high_zero: u16,

    /// High time of a `1` bit
    pub ticks_high_one: u16,
}

impl TimingProfile {
    /// Look up the timing for a speed grade
    ///
    /// `SpeedGrade::Off` yields an all-zero profile. Frames encoded with it
    /// are degenerate, so callers must not drive the encoder in that mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use dshot_engine::dshot::protocol::SpeedGrade;
    /// use dshot_engine::dshot::timing::TimingProfile;
    ///
    /// let profile = TimingProfile::for_grade(SpeedGrade::Dshot600);
    /// assert_eq!(profile.ticks_per_bit, 16);
    /// assert_eq!(profile.low_ticks(true), 4);
    /// ```
    pub const fn for_grade(grade: SpeedGrade) -> Self {
        let (ticks_per_bit, ticks_high_zero, ticks_high_one) = match grade {
            SpeedGrade::Dshot150 => (64, 24, 48),
            SpeedGrade::Dshot300 => (32, 12, 24),
            SpeedGrade::Dshot600 => (16, 6, 12),
            SpeedGrade::Dshot1200 => (8, 3, 6),
            SpeedGrade::Off => (0, 0, 0),
        };

        Self {
            ticks_per_bit,
            ticks_high_zero,
            ticks_high_one,
        }
    }

    /// High time for a bit value
    pub fn high_ticks(&self, bit: bool) -> u16 {
        if bit {
            self.ticks_high_one
        } else {
            self.ticks_high_zero
        }
    }

    /// Low time for a bit value (rest of the bit period)
    pub fn low_ticks(&self, bit: bool) -> u16 {
        self.ticks_per_bit - self.high_ticks(bit)
    }

    /// Length of the inter-frame pause
    pub fn pause_ticks(&self) -> u16 {
        self.ticks_per_bit * DSHOT_PAUSE_BITS
    }
}
