//! # Signal Transceiver Module
//!
//! Abstraction over the peripheral that puts DShot symbols on the wire and
//! samples the ESC's telemetry reply.
//!
//! This module handles:
//! - The [`Transceiver`] trait the engine talks to
//! - Channel setup (clock resolution, line inversion, receive window)
//! - A software [`LoopbackTransceiver`] for running without hardware

pub mod loopback;

pub use loopback::LoopbackTransceiver;

use crate::dshot::protocol::{
    Frame, Symbol, DSHOT_RESOLUTION_HZ, DSHOT_RX_MAX_SIGNAL_NS, DSHOT_RX_MIN_SIGNAL_NS,
};
use crate::error::Result;

/// Acceptance range for received pulses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveWindow {
    /// Pulses shorter than this are glitches
    pub min_signal_ns: u32,

    /// A level held longer than this ends the frame
    pub max_signal_ns: u32,
}

impl Default for ReceiveWindow {
    fn default() -> Self {
        Self {
            min_signal_ns: DSHOT_RX_MIN_SIGNAL_NS,
            max_signal_ns: DSHOT_RX_MAX_SIGNAL_NS,
        }
    }
}

/// Channel configuration applied once before transmitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSetup {
    /// Tick clock of the symbol durations
    pub resolution_hz: u32,

    /// Invert the output line (bidirectional DShot idles high)
    pub invert_output: bool,

    /// Line level after the looping frame ends
    pub idle_level_high: bool,

    /// Receive window, present only when telemetry is expected
    pub receive: Option<ReceiveWindow>,
}

impl ChannelSetup {
    /// Setup for an engine in the given direction mode
    pub fn for_engine(bidirectional: bool, window: ReceiveWindow) -> Self {
        Self {
            resolution_hz: DSHOT_RESOLUTION_HZ,
            invert_output: bidirectional,
            idle_level_high: bidirectional,
            receive: bidirectional.then_some(window),
        }
    }
}

/// Trait for the signal peripheral driving one ESC line
///
/// Implementations own the hardware channel. The engine only ever calls
/// these methods from one thread.
#[cfg_attr(test, mockall::automock)]
pub trait Transceiver {
    /// Configure TX (and RX if requested) channels
    fn configure(&mut self, setup: &ChannelSetup) -> Result<()>;

    /// Replace the continuously repeating frame
    ///
    /// The switch must happen at a frame boundary: no transmission may mix
    /// symbols of the old and new frame.
    fn transmit_continuous(&mut self, frame: &Frame) -> Result<()>;

    /// Poll once for a received symbol buffer
    ///
    /// Returns `None` when nothing arrived within the window.
    fn try_receive(&mut self, window: &ReceiveWindow) -> Option<Vec<Symbol>>;

    /// Whether a receive channel is configured and enabled
    fn has_receive_channel(&self) -> bool;
}
