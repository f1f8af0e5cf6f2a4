//! # DShot Protocol Module
//!
//! Implementation of the DShot digital ESC protocol.
//!
//! This module handles:
//! - Bit timing for DShot150/300/600/1200
//! - 16-bit packet assembly (11-bit throttle, telemetry bit, 4-bit checksum)
//! - Standard and inverted (bidirectional) checksum calculation
//! - Encoding packets into timed pulse symbols with an inter-frame pause
//! - Decoding bidirectional telemetry frames from received symbols

pub mod protocol;
pub mod timing;
pub mod checksum;
pub mod packet;
pub mod encoder;
pub mod decoder;
