//! # DShot Checksum
//!
//! 4-bit XOR-fold checksum over the 12 high bits of a DShot packet.
//!
//! **Standard**: `(d ^ (d >> 4) ^ (d >> 8)) & 0x0F`
//! **Bidirectional**: the bitwise complement of the same fold, masked to 4 bits.
//!
//! Bidirectional ESCs invert the line, so the checksum polarity is inverted
//! too. Using the wrong polarity makes every frame fail validation.

use super::protocol::DSHOT_CHECKSUM_MASK;

/// Calculate the DShot checksum for a 12-bit data field
///
/// # Arguments
///
/// * `data12` - Throttle field and telemetry bit (`throttle << 1 | telemetry`)
/// * `bidirectional` - Use the inverted checksum form
///
/// # Returns
///
/// * `u16` - 4-bit checksum
///
/// # Examples
///
/// ```
/// use dshot_engine::dshot::checksum::compute_checksum;
///
/// assert_eq!(compute_checksum(96, false), 0x6);
/// assert_eq!(compute_checksum(96, true), 0x9);
/// ```
pub fn compute_checksum(data12: u16, bidirectional: bool) -> u16 {
    let fold = data12 ^ (data12 >> 4) ^ (data12 >> 8);

    if bidirectional {
        !fold & DSHOT_CHECKSUM_MASK
    } else {
        fold & DSHOT_CHECKSUM_MASK
    }
}
