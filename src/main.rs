//! # DShot Engine
//!
//! Runs one DShot engine per configured motor and reports their telemetry.
//!
//! Each engine drives a software loopback transceiver that echoes the looping
//! frame back as bidirectional telemetry, so the full encode/decode path runs
//! without an ESC attached.

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use dshot_engine::config::Config;
use dshot_engine::controller::ThrottleController;
use dshot_engine::telemetry::recorder::{TelemetryRecorder, TelemetrySample};
use dshot_engine::transceiver::LoopbackTransceiver;

/// Number of telemetry polls between status log messages
const LOG_INTERVAL_POLLS: u64 = 50;

/// Main entry point for the DShot engine
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (first argument, or built-in defaults)
///    - Start one engine per motor and command the initial throttle
///
/// 2. **Main Loop**
///    - Poll eRPM / RPM for every motor at `poll_interval_ms`
///    - Record samples when the recorder is enabled
///    - Log status every `LOG_INTERVAL_POLLS` polls
///
/// 3. **Graceful Shutdown**
///    - Stop on Ctrl+C and flush recorded telemetry
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("DShot Engine v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).with_context(|| format!("Failed to load {}", path))?,
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    info!(
        "{} motor(s) at {} (bidirectional = {})",
        config.engine.motor_count, config.engine.mode, config.engine.bidirectional
    );

    let mut engines = Vec::with_capacity(config.engine.motor_count);
    for motor in 0..config.engine.motor_count {
        let mut engine = ThrottleController::from_config(LoopbackTransceiver::with_echo(), &config);
        engine
            .begin()
            .with_context(|| format!("Failed to start engine for motor {}", motor))?;
        engine.set_throttle(config.engine.initial_throttle);
        engines.push(engine);
    }

    let mut recorder = if config.recorder.enabled {
        Some(TelemetryRecorder::new(
            &config.recorder.log_dir,
            config.recorder.max_records_per_file,
            config.recorder.max_files_to_keep,
        )?)
    } else {
        None
    };

    let mut poll_interval = interval(Duration::from_millis(config.telemetry.poll_interval_ms));
    let magnet_count = config.telemetry.magnet_count;

    info!("Polling telemetry every {}ms", config.telemetry.poll_interval_ms);
    info!("Press Ctrl+C to exit");

    let mut poll_count: u64 = 0;

    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                poll_count += 1;

                for (motor, engine) in engines.iter_mut().enumerate() {
                    let erpm = engine.get_erpm();
                    let rpm = engine.get_motor_rpm(magnet_count);
                    debug!("Motor {}: {} eRPM, {} RPM", motor, erpm, rpm);

                    if let Some(recorder) = recorder.as_mut() {
                        let sample = TelemetrySample {
                            timestamp: Utc::now(),
                            motor,
                            throttle: engine.last_throttle(),
                            erpm,
                            rpm,
                        };
                        if let Err(e) = recorder.record(&sample) {
                            warn!("Failed to record telemetry: {}", e);
                        }
                    }
                }

                if poll_count % LOG_INTERVAL_POLLS == 0 {
                    for (motor, engine) in engines.iter().enumerate() {
                        info!(
                            "Motor {}: throttle {}, {} eRPM",
                            motor, engine.last_throttle(), engine.last_erpm()
                        );
                    }
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total telemetry polls: {}", poll_count);
                break;
            }
        }
    }

    if let Some(recorder) = recorder.as_mut() {
        recorder.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_interval_constant() {
        assert_eq!(LOG_INTERVAL_POLLS, 50);

        // At the default 100ms poll interval, 50 polls = 5 seconds
        let seconds = LOG_INTERVAL_POLLS * Config::default().telemetry.poll_interval_ms / 1000;
        assert_eq!(seconds, 5);
    }

    #[test]
    fn test_default_engines_start() {
        let config = Config::default();
        let mut engine = ThrottleController::from_config(LoopbackTransceiver::with_echo(), &config);
        assert!(engine.begin().is_ok());

        engine.set_throttle(config.engine.initial_throttle);
        assert_eq!(engine.last_throttle(), 48);
        assert_eq!(engine.transceiver().frames_loaded(), 1);
    }
}
