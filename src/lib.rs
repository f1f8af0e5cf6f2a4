//! # DShot Engine Library
//!
//! DShot digital ESC protocol engine with bidirectional eRPM telemetry.
//!
//! This library assembles DShot packets, encodes them into timed pulse
//! symbols for a signal transceiver, and decodes the telemetry frames that
//! bidirectional ESCs send back on the same line.

pub mod config;
pub mod error;
pub mod dshot;
pub mod controller;
pub mod transceiver;
pub mod telemetry;
