use std::collections::HashMap;
use std::fmt;

use time::{format_description, OffsetDateTime};

/// Number of spectral bands the sensor reports for vibration and sound.
pub const SPECTRAL_BANDS: usize = 6;

/// The ten semantic readings the DLP-TH1C exposes over its ASCII protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    Temperature,
    Humidity,
    Pressure,
    Tilt,
    VibrationX,
    VibrationY,
    VibrationZ,
    Light,
    Sound,
    Broadband,
}

impl ReadingKind {
    /// All reading kinds in wire-command order. The aggregate request sends
    /// the command bytes in this order and the device answers in the same
    /// order, so this array also fixes the aggregate response layout.
    pub const ALL: [ReadingKind; 10] = [
        ReadingKind::Temperature,
        ReadingKind::Humidity,
        ReadingKind::Pressure,
        ReadingKind::Tilt,
        ReadingKind::VibrationX,
        ReadingKind::VibrationY,
        ReadingKind::VibrationZ,
        ReadingKind::Light,
        ReadingKind::Sound,
        ReadingKind::Broadband,
    ];

    /// Human-readable label used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            ReadingKind::Temperature => "temperature",
            ReadingKind::Humidity => "humidity",
            ReadingKind::Pressure => "pressure",
            ReadingKind::Tilt => "tilt",
            ReadingKind::VibrationX => "vibration X",
            ReadingKind::VibrationY => "vibration Y",
            ReadingKind::VibrationZ => "vibration Z",
            ReadingKind::Light => "light",
            ReadingKind::Sound => "sound",
            ReadingKind::Broadband => "broadband",
        }
    }
}

impl fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical axis of a vibration spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VibrationAxis {
    X,
    Y,
    Z,
}

impl VibrationAxis {
    /// The reading kind carrying this axis.
    pub fn kind(self) -> ReadingKind {
        match self {
            VibrationAxis::X => ReadingKind::VibrationX,
            VibrationAxis::Y => ReadingKind::VibrationY,
            VibrationAxis::Z => ReadingKind::VibrationZ,
        }
    }
}

impl fmt::Display for VibrationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VibrationAxis::X => f.write_str("X"),
            VibrationAxis::Y => f.write_str("Y"),
            VibrationAxis::Z => f.write_str("Z"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltReading {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// One spectral band: peak frequency and its amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralBand {
    pub peak_hz: i64,
    pub amplitude: f64,
}

/// Six-band spectrum, in the line order the device reports (index 0..5).
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralReading {
    pub bands: [SpectralBand; SPECTRAL_BANDS],
}

/// One decoded sensor value.
///
/// Closed over all value shapes the device produces; formatting for the
/// console is selected per variant in the `Display` implementation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// Temperature in degrees Celsius.
    Temperature(f64),
    /// Relative humidity in percent.
    Humidity(f64),
    /// Barometric pressure in hPa.
    Pressure(f64),
    /// Raw tilt counts per axis.
    Tilt(TiltReading),
    /// Vibration spectrum of one physical axis.
    Vibration {
        axis: VibrationAxis,
        spectrum: SpectralReading,
    },
    /// Light level, an 8-bit signed count.
    Light(i8),
    /// Sound spectrum.
    Sound(SpectralReading),
    /// Broadband sound level.
    Broadband(f64),
}

impl Reading {
    /// The reading kind this value belongs to.
    pub fn kind(&self) -> ReadingKind {
        match self {
            Reading::Temperature(_) => ReadingKind::Temperature,
            Reading::Humidity(_) => ReadingKind::Humidity,
            Reading::Pressure(_) => ReadingKind::Pressure,
            Reading::Tilt(_) => ReadingKind::Tilt,
            Reading::Vibration {
                axis: VibrationAxis::X,
                ..
            } => ReadingKind::VibrationX,
            Reading::Vibration {
                axis: VibrationAxis::Y,
                ..
            } => ReadingKind::VibrationY,
            Reading::Vibration {
                axis: VibrationAxis::Z,
                ..
            } => ReadingKind::VibrationZ,
            Reading::Light(_) => ReadingKind::Light,
            Reading::Sound(_) => ReadingKind::Sound,
            Reading::Broadband(_) => ReadingKind::Broadband,
        }
    }
}

fn write_spectrum(f: &mut fmt::Formatter<'_>, spectrum: &SpectralReading) -> fmt::Result {
    for (index, band) in spectrum.bands.iter().enumerate() {
        write!(
            f,
            "\n  band {}: {} Hz, amplitude {}",
            index, band.peak_hz, band.amplitude
        )?;
    }
    Ok(())
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Temperature(value) => write!(f, "Temperature: {:.2}\u{b0}C", value),
            Reading::Humidity(value) => write!(f, "Humidity: {:.2}%", value),
            Reading::Pressure(value) => write!(f, "Pressure: {:.2} hPa", value),
            Reading::Tilt(tilt) => {
                write!(f, "Tilt: X: {}, Y: {}, Z: {}", tilt.x, tilt.y, tilt.z)
            }
            Reading::Vibration { axis, spectrum } => {
                write!(f, "Vibration ({} axis):", axis)?;
                write_spectrum(f, spectrum)
            }
            Reading::Light(value) => write!(f, "Light level: {}", value),
            Reading::Sound(spectrum) => {
                write!(f, "Sound spectrum:")?;
                write_spectrum(f, spectrum)
            }
            Reading::Broadband(value) => write!(f, "Broadband level: {:.2}", value),
        }
    }
}

/// One timestamped set of decoded readings, keyed by kind.
///
/// A single-kind request produces exactly one entry; an aggregate request
/// produces up to ten, fewer when individual fields failed to decode.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: OffsetDateTime,
    pub readings: HashMap<ReadingKind, Reading>,
}

impl Snapshot {
    /// Build a one-entry snapshot from a single decoded reading.
    pub fn single(time: OffsetDateTime, reading: Reading) -> Self {
        let mut readings = HashMap::new();
        readings.insert(reading.kind(), reading);
        Snapshot { time, readings }
    }

    /// Format the capture timestamp for console output
    ///
    /// Converts the OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
    /// Falls back to default string representation if formatting fails.
    pub fn formatted_time(&self) -> String {
        let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
            .expect("Failed to create format description");
        self.time.format(&format).unwrap_or_else(|_| self.time.to_string())
    }
}
