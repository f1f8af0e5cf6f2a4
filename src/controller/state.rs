//! Mutable state of one DShot engine

use crate::dshot::packet::Packet;
use crate::dshot::protocol::SpeedGrade;

/// State owned by a single [`ThrottleController`](super::ThrottleController)
///
/// Starts with `last_throttle = 0` and `last_erpm = 0` and is never reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    /// Speed grade, fixed at construction
    pub mode: SpeedGrade,

    /// Bidirectional DShot (inverted checksum, telemetry expected)
    pub bidirectional: bool,

    /// Last throttle loaded into the transmitter (0-2047)
    pub last_throttle: u16,

    /// Last decoded (or initial) eRPM
    pub last_erpm: u32,

    /// Packet of the frame currently looping
    pub last_packet: Option<Packet>,
}

impl EngineState {
    /// Fresh state for an engine
    pub fn new(mode: SpeedGrade, bidirectional: bool) -> Self {
        Self {
            mode,
            bidirectional,
            last_throttle: 0,
            last_erpm: 0,
            last_packet: None,
        }
    }
}
