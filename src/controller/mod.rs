//! # Controller Module
//!
//! Per-ESC engine driving the DShot protocol over a transceiver.
//!
//! This module handles:
//! - Clamping throttle commands and skipping redundant frame loads
//! - Handing encoded frames to the transceiver
//! - Polling and validating bidirectional telemetry
//! - Keeping the last good eRPM as the fallback value

pub mod state;
pub mod throttle;

pub use state::EngineState;
pub use throttle::ThrottleController;
