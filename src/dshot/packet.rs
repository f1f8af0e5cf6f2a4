//! # DShot Packet Assembly
//!
//! Builds the 16-bit DShot packet:
//!
//! ```text
//! bit 15                 5    4    3      0
//! [ throttle field (11) | telemetry | checksum (4) ]
//! ```

use super::checksum::compute_checksum;
use super::protocol::{DSHOT_CHECKSUM_MASK, DSHOT_THROTTLE_MASK};

/// A 16-bit DShot packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packet(u16);

impl Packet {
    /// Assemble a packet from a throttle value and the direction flag
    ///
    /// The telemetry-request bit is set to the bidirectional flag, so a
    /// bidirectional engine always requests telemetry and a standard one
    /// never does. The checksum polarity follows the same flag.
    ///
    /// # Arguments
    ///
    /// * `throttle` - Throttle or command value (masked to 11 bits)
    /// * `bidirectional` - Bidirectional DShot mode
    ///
    /// # Examples
    ///
    /// ```
    /// use dshot_engine::dshot::packet::Packet;
    ///
    /// let packet = Packet::assemble(48, false);
    /// assert_eq!(packet.raw(), 0x606);
    /// assert_eq!(packet.throttle(), 48);
    /// ```
    pub fn assemble(throttle: u16, bidirectional: bool) -> Self {
        let data12 = ((throttle & DSHOT_THROTTLE_MASK) << 1) | u16::from(bidirectional);
        let checksum = compute_checksum(data12, bidirectional);

        Self((data12 << 4) | checksum)
    }

    /// Wrap a raw 16-bit value (e.g. one recovered from the line)
    pub fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw 16-bit value
    pub fn raw(&self) -> u16 {
        self.0
    }

    /// The 12 checksummed bits (throttle field + telemetry bit)
    pub fn data12(&self) -> u16 {
        self.0 >> 4
    }

    /// 11-bit throttle / command field
    pub fn throttle(&self) -> u16 {
        self.data12() >> 1
    }

    /// Telemetry-request bit
    pub fn telemetry_requested(&self) -> bool {
        self.data12() & 1 == 1
    }

    /// Stored 4-bit checksum field
    pub fn checksum(&self) -> u16 {
        self.0 & DSHOT_CHECKSUM_MASK
    }

    /// Whether the stored checksum matches the data for the given polarity
    pub fn is_valid(&self, bidirectional: bool) -> bool {
        compute_checksum(self.data12(), bidirectional) == self.checksum()
    }
}

impl From<Packet> for u16 {
    fn from(packet: Packet) -> Self {
        packet.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_min_throttle_standard() {
        // data12 = 96, checksum = (96 ^ 6 ^ 0) & 0xF = 6
        let packet = Packet::assemble(48, false);
        assert_eq!(packet.data12(), 96);
        assert_eq!(packet.checksum(), 0x6);
        assert_eq!(packet.raw(), 0x606);
    }

    #[test]
    fn test_assemble_sets_telemetry_bit_from_direction() {
        assert!(!Packet::assemble(1000, false).telemetry_requested());
        assert!(Packet::assemble(1000, true).telemetry_requested());
    }

    #[test]
    fn test_assemble_bidirectional_uses_inverted_checksum() {
        let packet = Packet::assemble(500, true);
        assert_eq!(packet.data12(), (500 << 1) | 1);
        assert!(packet.is_valid(true));
        assert!(!packet.is_valid(false));
    }

    #[test]
    fn test_assemble_standard_not_valid_as_bidirectional() {
        let packet = Packet::assemble(500, false);
        assert!(packet.is_valid(false));
        assert!(!packet.is_valid(true));
    }

    #[test]
    fn test_throttle_field_round_trip() {
        for throttle in [0u16, 47, 48, 500, 1024, 2000, 2047] {
            for bidirectional in [false, true] {
                let packet = Packet::assemble(throttle, bidirectional);
                assert_eq!(packet.throttle(), throttle);
                assert!(packet.is_valid(bidirectional));
            }
        }
    }

    #[test]
    fn test_assemble_masks_to_eleven_bits() {
        let packet = Packet::assemble(2048 + 100, false);
        assert_eq!(packet.throttle(), 100);
    }

    #[test]
    fn test_checksum_field_matches_for_all_data() {
        for throttle in 0..=2047u16 {
            for bidirectional in [false, true] {
                let packet = Packet::assemble(throttle, bidirectional);
                assert_eq!(
                    compute_checksum(packet.data12(), bidirectional),
                    packet.checksum(),
                    "throttle = {}, bidirectional = {}",
                    throttle,
                    bidirectional
                );
            }
        }
    }

    #[test]
    fn test_from_raw() {
        let packet = Packet::from_raw(0x606);
        assert_eq!(packet.throttle(), 48);
        assert_eq!(u16::from(packet), 0x606);
    }
}
