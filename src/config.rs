use std::env;
use std::time::Duration;

use crate::command::AccelerometerRange;

/// Serial port the sensor enumerates as by default.
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Baud rate of the sensor's virtual COM port.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Settle delay after a single-reading request, in seconds. Sized to the
/// device's worst-case latency for one field; shortening it truncates
/// responses.
pub const SINGLE_SETTLE_SECS: u64 = 2;

/// Settle delay after the batched read-all request, in seconds. The full
/// batch costs far more wall-clock time than any single field, and the
/// device is still transmitting when drained early.
pub const AGGREGATE_SETTLE_SECS: u64 = 30;

/// Idle window while draining a response, in milliseconds: reading stops
/// once this long passes without new bytes.
pub const READ_IDLE_WINDOW_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct SensorConfig {
    pub port: String,
    pub baud_rate: u32,
    pub single_settle: Duration,
    pub aggregate_settle: Duration,
    pub read_idle_window: Duration,
    pub accel_range: Option<AccelerometerRange>,
}

/// Read an integer environment variable, falling back to a default when the
/// variable is not set.
fn env_u64(key: &str, default: u64) -> Result<u64, Box<dyn std::error::Error>> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|_| format!("{} must be a number, got '{}'", key, value).into()),
        Err(_) => Ok(default),
    }
}

impl SensorConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let port = env::var("DLPTH1C_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let baud_rate = env_u64("DLPTH1C_BAUD_RATE", u64::from(DEFAULT_BAUD_RATE))? as u32;

        let single_settle =
            Duration::from_secs(env_u64("DLPTH1C_SINGLE_SETTLE_SECS", SINGLE_SETTLE_SECS)?);
        let aggregate_settle = Duration::from_secs(env_u64(
            "DLPTH1C_AGGREGATE_SETTLE_SECS",
            AGGREGATE_SETTLE_SECS,
        )?);
        let read_idle_window =
            Duration::from_millis(env_u64("DLPTH1C_READ_IDLE_MS", READ_IDLE_WINDOW_MS)?);

        // Optional accelerometer range applied once at session start
        let accel_range = match env::var("DLPTH1C_ACCEL_RANGE") {
            Ok(label) => Some(AccelerometerRange::from_label(&label).ok_or_else(|| {
                format!(
                    "DLPTH1C_ACCEL_RANGE must be one of 2g, 4g, 8g, 16g, got '{}'",
                    label
                )
            })?),
            Err(_) => None,
        };

        Ok(SensorConfig {
            port,
            baud_rate,
            single_settle,
            aggregate_settle,
            read_idle_window,
            accel_range,
        })
    }
}
