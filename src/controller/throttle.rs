//! # Throttle Controller
//!
//! Public face of the engine: clamps throttle commands, loads frames into the
//! transceiver only when the command changes, and polls for telemetry.
//!
//! No operation here fails on protocol grounds. Out-of-range throttle is
//! clamped, and corrupt telemetry leaves the cached eRPM in place.

use tracing::{debug, trace, warn};

use super::state::EngineState;
use crate::config::Config;
use crate::dshot::decoder::decode_frame;
use crate::dshot::encoder::encode_frame;
use crate::dshot::packet::Packet;
use crate::dshot::protocol::*;
use crate::dshot::timing::TimingProfile;
use crate::error::Result;
use crate::telemetry::{erpm_to_rpm, ErpmScale, LinearErpmScale};
use crate::transceiver::{ChannelSetup, ReceiveWindow, Transceiver};

/// DShot engine for one ESC
///
/// Each motor needs its own controller; nothing is shared between instances.
///
/// # Examples
///
/// ```
/// use dshot_engine::controller::ThrottleController;
/// use dshot_engine::dshot::protocol::SpeedGrade;
/// use dshot_engine::transceiver::LoopbackTransceiver;
///
/// let mut esc = ThrottleController::new(LoopbackTransceiver::with_echo(), SpeedGrade::Dshot600, true);
/// esc.begin()?;
/// esc.set_throttle(500);
/// assert_eq!(esc.get_erpm(), 50_000);
/// assert_eq!(esc.get_motor_rpm(14), 50_000 / 7);
/// # Ok::<(), dshot_engine::error::DshotError>(())
/// ```
#[derive(Debug)]
pub struct ThrottleController<T: Transceiver, S: ErpmScale = LinearErpmScale> {
    transceiver: T,
    state: EngineState,
    profile: TimingProfile,
    window: ReceiveWindow,
    scale: S,
}

impl<T: Transceiver> ThrottleController<T> {
    /// Create an engine with the default eRPM scale and receive window
    pub fn new(transceiver: T, mode: SpeedGrade, bidirectional: bool) -> Self {
        Self {
            transceiver,
            state: EngineState::new(mode, bidirectional),
            profile: TimingProfile::for_grade(mode),
            window: ReceiveWindow::default(),
            scale: LinearErpmScale::default(),
        }
    }

    /// Create an engine from the `[engine]`, `[receive]` and `[telemetry]` sections
    pub fn from_config(transceiver: T, config: &Config) -> Self {
        Self::new(transceiver, config.engine.mode, config.engine.bidirectional)
            .with_receive_window(ReceiveWindow {
                min_signal_ns: config.receive.min_signal_ns,
                max_signal_ns: config.receive.max_signal_ns,
            })
            .with_erpm_scale(LinearErpmScale::new(config.telemetry.erpm_scale))
    }
}

impl<T: Transceiver, S: ErpmScale> ThrottleController<T, S> {
    /// Replace the eRPM scale strategy
    pub fn with_erpm_scale<S2: ErpmScale>(self, scale: S2) -> ThrottleController<T, S2> {
        ThrottleController {
            transceiver: self.transceiver,
            state: self.state,
            profile: self.profile,
            window: self.window,
            scale,
        }
    }

    /// Replace the receive acceptance window
    pub fn with_receive_window(mut self, window: ReceiveWindow) -> Self {
        self.window = window;
        self
    }

    /// Configure the transceiver channels for this engine
    ///
    /// Bidirectional engines get an inverted output line and a receive
    /// channel. This is the only fallible step, as it touches hardware.
    ///
    /// # Errors
    ///
    /// Returns error if the transceiver rejects the setup
    pub fn begin(&mut self) -> Result<()> {
        let setup = ChannelSetup::for_engine(self.state.bidirectional, self.window);
        self.transceiver.configure(&setup)?;
        debug!(
            "{} engine started (bidirectional = {})",
            self.state.mode, self.state.bidirectional
        );
        Ok(())
    }

    /// Command a throttle value
    ///
    /// The value is clamped to 48-2047. If it equals the value already
    /// looping, nothing happens. Otherwise a new frame is assembled and
    /// replaces the one in the transmitter.
    ///
    /// Values 0-47 are command codes and are promoted to 48, so this never
    /// sends a disarm. Callers must layer that on top.
    pub fn set_throttle(&mut self, requested: u16) {
        let throttle =
            requested.clamp(DSHOT_THROTTLE_MIN, DSHOT_THROTTLE_MAX) & DSHOT_THROTTLE_MASK;

        if throttle == self.state.last_throttle {
            return;
        }

        self.state.last_throttle = throttle;

        let packet = Packet::assemble(throttle, self.state.bidirectional);
        let frame = encode_frame(packet, &self.profile);
        self.state.last_packet = Some(packet);

        trace!("Loading frame 0x{:04X} (throttle {})", packet.raw(), throttle);

        if let Err(e) = self.transceiver.transmit_continuous(&frame) {
            warn!("Failed to load DShot frame for throttle {}: {}", throttle, e);
        }
    }

    /// Latest eRPM reported by the ESC
    ///
    /// Returns the cached value when the engine is not bidirectional, when
    /// there is no receive channel, when nothing was received, or when the
    /// received frame fails validation.
    pub fn get_erpm(&mut self) -> u32 {
        if !self.state.bidirectional || !self.transceiver.has_receive_channel() {
            return self.state.last_erpm;
        }

        let Some(symbols) = self.transceiver.try_receive(&self.window) else {
            return self.state.last_erpm;
        };

        match decode_frame(&symbols, DSHOT_BITS_PER_FRAME) {
            Ok(field) => {
                self.state.last_erpm = self.scale.to_erpm(field);
            }
            Err(e) => {
                debug!("Telemetry frame rejected ({}), keeping {} eRPM", e, self.state.last_erpm);
            }
        }

        self.state.last_erpm
    }

    /// Latest mechanical RPM, from eRPM and the motor's magnet count
    ///
    /// Magnet counts of 0 or 1 are treated as one pole pair.
    pub fn get_motor_rpm(&mut self, magnet_count: u8) -> u32 {
        erpm_to_rpm(self.get_erpm(), magnet_count)
    }

    /// Speed grade
    pub fn mode(&self) -> SpeedGrade {
        self.state.mode
    }

    /// Whether the engine runs bidirectional DShot
    pub fn is_bidirectional(&self) -> bool {
        self.state.bidirectional
    }

    /// Last throttle loaded into the transmitter (0 before the first command)
    pub fn last_throttle(&self) -> u16 {
        self.state.last_throttle
    }

    /// Cached eRPM without polling
    pub fn last_erpm(&self) -> u32 {
        self.state.last_erpm
    }

    /// Packet of the frame currently looping
    pub fn last_packet(&self) -> Option<Packet> {
        self.state.last_packet
    }

    /// Engine state snapshot
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Underlying transceiver
    pub fn transceiver(&self) -> &T {
        &self.transceiver
    }
}
