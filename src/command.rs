/// Wire command catalog for the DLP-TH1C ASCII protocol
///
/// Every reading kind is requested with a single ASCII byte; the device
/// answers with free-form text framed only by delimiters and timing.
use crate::error::DecodeError;
use crate::models::{ReadingKind, VibrationAxis};

// ASCII request commands, one byte per reading kind
pub const TEMPERATURE_CMD: u8 = 0x74; // 't'
pub const HUMIDITY_CMD: u8 = 0x68; // 'h'
pub const PRESSURE_CMD: u8 = 0x70; // 'p'
pub const TILT_CMD: u8 = 0x61; // 'a'
pub const VIBRATION_X_CMD: u8 = 0x78; // 'x'
pub const VIBRATION_Y_CMD: u8 = 0x76; // 'v'
pub const VIBRATION_Z_CMD: u8 = 0x77; // 'w'
pub const LIGHT_CMD: u8 = 0x6C; // 'l'
pub const SOUND_CMD: u8 = 0x66; // 'f'
pub const BROADBAND_CMD: u8 = 0x62; // 'b'

// Accelerometer range selection commands; these acknowledge without
// returning parseable data
pub const SET_2G_CMD: u8 = 0x6D; // 'm'
pub const SET_4G_CMD: u8 = 0x6E; // 'n'
pub const SET_8G_CMD: u8 = 0x2C; // ','
pub const SET_16G_CMD: u8 = 0x2E; // '.'

/// The batched read-all request: every reading command in canonical order,
/// written to the device in one write.
pub const AGGREGATE_REQUEST: [u8; 10] = [
    TEMPERATURE_CMD,
    HUMIDITY_CMD,
    PRESSURE_CMD,
    TILT_CMD,
    VIBRATION_X_CMD,
    VIBRATION_Y_CMD,
    VIBRATION_Z_CMD,
    LIGHT_CMD,
    SOUND_CMD,
    BROADBAND_CMD,
];

impl ReadingKind {
    /// The wire command byte requesting this reading.
    pub fn command(self) -> u8 {
        match self {
            ReadingKind::Temperature => TEMPERATURE_CMD,
            ReadingKind::Humidity => HUMIDITY_CMD,
            ReadingKind::Pressure => PRESSURE_CMD,
            ReadingKind::Tilt => TILT_CMD,
            ReadingKind::VibrationX => VIBRATION_X_CMD,
            ReadingKind::VibrationY => VIBRATION_Y_CMD,
            ReadingKind::VibrationZ => VIBRATION_Z_CMD,
            ReadingKind::Light => LIGHT_CMD,
            ReadingKind::Sound => SOUND_CMD,
            ReadingKind::Broadband => BROADBAND_CMD,
        }
    }

    /// Reverse-map a wire command byte to its reading kind.
    ///
    /// Returns `None` for bytes outside the ten reading commands; range
    /// selection commands do not map to a reading.
    pub fn from_command(command: u8) -> Option<ReadingKind> {
        match command {
            TEMPERATURE_CMD => Some(ReadingKind::Temperature),
            HUMIDITY_CMD => Some(ReadingKind::Humidity),
            PRESSURE_CMD => Some(ReadingKind::Pressure),
            TILT_CMD => Some(ReadingKind::Tilt),
            VIBRATION_X_CMD => Some(ReadingKind::VibrationX),
            VIBRATION_Y_CMD => Some(ReadingKind::VibrationY),
            VIBRATION_Z_CMD => Some(ReadingKind::VibrationZ),
            LIGHT_CMD => Some(ReadingKind::Light),
            SOUND_CMD => Some(ReadingKind::Sound),
            BROADBAND_CMD => Some(ReadingKind::Broadband),
            _ => None,
        }
    }
}

impl VibrationAxis {
    /// The wire command byte requesting this axis.
    pub fn command(self) -> u8 {
        match self {
            VibrationAxis::X => VIBRATION_X_CMD,
            VibrationAxis::Y => VIBRATION_Y_CMD,
            VibrationAxis::Z => VIBRATION_Z_CMD,
        }
    }

    /// Guard for the vibration read path: accepts only the three axis
    /// command bytes, everything else is an invalid command.
    pub fn from_command(command: u8) -> Result<VibrationAxis, DecodeError> {
        match command {
            VIBRATION_X_CMD => Ok(VibrationAxis::X),
            VIBRATION_Y_CMD => Ok(VibrationAxis::Y),
            VIBRATION_Z_CMD => Ok(VibrationAxis::Z),
            _ => Err(DecodeError::InvalidCommand { command }),
        }
    }
}

/// Accelerometer full-scale range for the vibration readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelerometerRange {
    G2,
    G4,
    G8,
    G16,
}

impl AccelerometerRange {
    /// The wire command byte selecting this range.
    pub fn command(self) -> u8 {
        match self {
            AccelerometerRange::G2 => SET_2G_CMD,
            AccelerometerRange::G4 => SET_4G_CMD,
            AccelerometerRange::G8 => SET_8G_CMD,
            AccelerometerRange::G16 => SET_16G_CMD,
        }
    }

    /// Parse a configuration label (`2g`, `4g`, `8g`, `16g`).
    pub fn from_label(label: &str) -> Option<AccelerometerRange> {
        match label {
            "2g" => Some(AccelerometerRange::G2),
            "4g" => Some(AccelerometerRange::G4),
            "8g" => Some(AccelerometerRange::G8),
            "16g" => Some(AccelerometerRange::G16),
            _ => None,
        }
    }
}
