//! # DShot Frame Encoder
//!
//! Expands a 16-bit packet into timed pulse symbols for the transceiver.

use super::packet::Packet;
use super::protocol::*;
use super::timing::TimingProfile;

/// Encode a packet into a complete transmit frame
///
/// Emits one symbol per bit, most significant first, each held high for the
/// bit's high time and low for the rest of the period. A pause symbol of
/// `ticks_per_bit * DSHOT_PAUSE_BITS` low ticks closes the frame.
///
/// # Arguments
///
/// * `packet` - Assembled DShot packet
/// * `profile` - Bit timing for the engine's speed grade
///
/// # Returns
///
/// * `Frame` - 17 symbols (16 data + 1 pause)
///
/// # Examples
///
/// ```
/// use dshot_engine::dshot::encoder::encode_frame;
/// use dshot_engine::dshot::packet::Packet;
/// use dshot_engine::dshot::protocol::SpeedGrade;
/// use dshot_engine::dshot::timing::TimingProfile;
///
/// let profile = TimingProfile::for_grade(SpeedGrade::Dshot600);
/// let frame = encode_frame(Packet::assemble(1000, false), &profile);
/// assert_eq!(frame.symbols().len(), 17);
/// ```
pub fn encode_frame(packet: Packet, profile: &TimingProfile) -> Frame {
    let raw = packet.raw();
    let mut symbols = [Symbol::default(); DSHOT_FRAME_SYMBOLS];

    for (slot, bit_index) in symbols.iter_mut().zip((0..DSHOT_BITS_PER_FRAME).rev()) {
        let bit = (raw >> bit_index) & 1 == 1;
        *slot = Symbol::pulse(profile.high_ticks(bit), profile.low_ticks(bit));
    }

    symbols[DSHOT_BITS_PER_FRAME] = Symbol::pause(profile.pause_ticks());

    Frame::new(symbols)
}
