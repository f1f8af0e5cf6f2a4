//! # DShot Telemetry Decoder
//!
//! Recovers a telemetry packet from raw received symbols (bidirectional
//! DShot only).
//!
//! Bits are recovered by comparing high time against half the symbol length,
//! which tolerates clock jitter on the ESC side. The packet is then checked
//! against the inverted checksum and the throttle band.

use thiserror::Error;

use super::checksum::compute_checksum;
use super::packet::Packet;
use super::protocol::*;

/// Reasons a received frame was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer than 16 valid symbols before the first polarity violation
    #[error("short frame: {bits} valid bits")]
    ShortFrame {
        /// Bits recovered before scanning stopped
        bits: usize,
    },

    /// Recomputed checksum does not match the received one
    #[error("checksum mismatch: expected 0x{expected:X}, got 0x{received:X}")]
    ChecksumMismatch {
        /// Checksum recomputed from the data bits
        expected: u16,
        /// Checksum carried by the frame
        received: u16,
    },

    /// Recovered value lies outside the throttle band and is treated as noise
    #[error("value {0} outside throttle range")]
    OutOfRange(u16),
}

/// Decode a received symbol buffer into its throttle field
///
/// Scanning stops after `max_bits` symbols or at the first symbol that is not
/// high-then-low, whichever comes first. Remaining symbols are ignored.
///
/// # Arguments
///
/// * `symbols` - Raw received symbols, in order
/// * `max_bits` - Most symbols to consume (normally [`DSHOT_BITS_PER_FRAME`])
///
/// # Returns
///
/// * `Result<u16, DecodeError>` - Throttle field in `[48, 2047]`
///
/// # Examples
///
/// ```
/// use dshot_engine::dshot::decoder::decode_frame;
/// use dshot_engine::dshot::encoder::encode_frame;
/// use dshot_engine::dshot::packet::Packet;
/// use dshot_engine::dshot::protocol::{SpeedGrade, DSHOT_BITS_PER_FRAME};
/// use dshot_engine::dshot::timing::TimingProfile;
///
/// let profile = TimingProfile::for_grade(SpeedGrade::Dshot600);
/// let frame = encode_frame(Packet::assemble(500, true), &profile);
/// assert_eq!(decode_frame(frame.data_symbols(), DSHOT_BITS_PER_FRAME), Ok(500));
/// ```
pub fn decode_frame(symbols: &[Symbol], max_bits: usize) -> Result<u16, DecodeError> {
    let mut value: u16 = 0;
    let mut received_bits = 0;

    for symbol in symbols.iter().take(max_bits) {
        if !symbol.is_pulse() {
            break;
        }

        let bit = u32::from(symbol.duration0) > symbol.total_ticks() / 2;
        value = (value << 1) | u16::from(bit);
        received_bits += 1;
    }

    if received_bits < DSHOT_BITS_PER_FRAME {
        return Err(DecodeError::ShortFrame { bits: received_bits });
    }

    let packet = Packet::from_raw(value);
    let expected = compute_checksum(packet.data12(), true);
    let received = packet.checksum();

    if expected != received {
        return Err(DecodeError::ChecksumMismatch { expected, received });
    }

    let throttle = packet.throttle();
    if !(DSHOT_THROTTLE_MIN..=DSHOT_THROTTLE_MAX).contains(&throttle) {
        return Err(DecodeError::OutOfRange(throttle));
    }

    Ok(throttle)
}
