//! Software transceiver that keeps frames in memory instead of driving a pin

use std::collections::VecDeque;
use tracing::{debug, trace};

use super::{ChannelSetup, ReceiveWindow, Transceiver};
use crate::dshot::protocol::{Frame, Symbol, DSHOT_RESOLUTION_HZ};
use crate::error::Result;

/// In-memory transceiver
///
/// The looping frame is held as a single value, so replacing it can never
/// interleave two frames. Received buffers come from an injected queue, or,
/// in echo mode, from the data symbols of the frame currently looping (an
/// ESC reporting back the value it is commanded).
#[derive(Debug, Default)]
pub struct LoopbackTransceiver {
    setup: Option<ChannelSetup>,
    looping: Option<Frame>,
    frames_loaded: u64,
    rx_queue: VecDeque<Vec<Symbol>>,
    echo: bool,
}

impl LoopbackTransceiver {
    /// Create a transceiver with an empty receive queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transceiver that echoes the looping frame back on receive
    pub fn with_echo() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Queue a raw buffer for the next `try_receive`
    pub fn push_received(&mut self, symbols: Vec<Symbol>) {
        self.rx_queue.push_back(symbols);
    }

    /// Frame currently being repeated
    pub fn looping_frame(&self) -> Option<&Frame> {
        self.looping.as_ref()
    }

    /// Number of frames loaded since creation
    pub fn frames_loaded(&self) -> u64 {
        self.frames_loaded
    }

    /// Setup applied by the last `configure`
    pub fn setup(&self) -> Option<&ChannelSetup> {
        self.setup.as_ref()
    }

    fn ns_per_tick(&self) -> u32 {
        let resolution = self
            .setup
            .map(|s| s.resolution_hz)
            .unwrap_or(DSHOT_RESOLUTION_HZ)
            .max(1);
        (1_000_000_000 / resolution).max(1)
    }

    /// Cut the buffer at the first level longer than the idle threshold
    fn apply_window(&self, symbols: &[Symbol], window: &ReceiveWindow) -> Vec<Symbol> {
        let ns_per_tick = self.ns_per_tick();
        let too_long = |ticks: u16| u32::from(ticks).saturating_mul(ns_per_tick) > window.max_signal_ns;

        symbols
            .iter()
            .take_while(|s| !too_long(s.duration0) && !too_long(s.duration1))
            .copied()
            .collect()
    }
}

impl Transceiver for LoopbackTransceiver {
    fn configure(&mut self, setup: &ChannelSetup) -> Result<()> {
        debug!(
            "Loopback channel configured: {} Hz, inverted = {}, rx = {}",
            setup.resolution_hz,
            setup.invert_output,
            setup.receive.is_some()
        );
        self.setup = Some(*setup);
        Ok(())
    }

    fn transmit_continuous(&mut self, frame: &Frame) -> Result<()> {
        self.looping = Some(*frame);
        self.frames_loaded += 1;
        trace!("Loopback frame #{} loaded", self.frames_loaded);
        Ok(())
    }

    fn try_receive(&mut self, window: &ReceiveWindow) -> Option<Vec<Symbol>> {
        if !self.has_receive_channel() {
            return None;
        }

        let raw = match self.rx_queue.pop_front() {
            Some(symbols) => symbols,
            None if self.echo => self.looping.as_ref()?.symbols().to_vec(),
            None => return None,
        };

        let symbols = self.apply_window(&raw, window);
        if symbols.is_empty() {
            None
        } else {
            Some(symbols)
        }
    }

    fn has_receive_channel(&self) -> bool {
        self.setup.map_or(false, |s| s.receive.is_some())
    }
}
