/// Field decoders for the DLP-TH1C ASCII responses
///
/// The sensor frames its responses with delimiters and timing only, and the
/// transport is known to drop bytes, so every decoder here works the same
/// defensive way: locate the delimiter particular to the reading, isolate the
/// value substring, strip the noise characters the device embeds (carriage
/// returns, NUL bytes, unit suffixes), then parse the number. Malformed input
/// is a typed `DecodeError`, never a panic.
use crate::error::DecodeError;
use crate::models::{
    Reading, ReadingKind, SpectralBand, SpectralReading, TiltReading, VibrationAxis,
    SPECTRAL_BANDS,
};

/// Minimum line count of a spectral response: six band lines plus at least
/// one separator line the device injects.
const MIN_SPECTRUM_LINES: usize = 7;

/// Decode a raw response as 8-bit text, one character per byte.
///
/// The device emits Latin-1 style text, not UTF-8: the degree marker in the
/// temperature response is the single byte 0xB0. Mapping each byte to the
/// code point of the same value keeps every byte addressable from `&str`
/// without any lossy replacement.
pub fn latin1_text(raw: &[u8]) -> String {
    raw.iter().map(|&byte| byte as char).collect()
}

/// The substring before the first occurrence of `delimiter`, or the whole
/// string when the delimiter never arrives (truncated responses are common).
fn before<'a>(text: &'a str, delimiter: &str) -> &'a str {
    match text.find(delimiter) {
        Some(index) => &text[..index],
        None => text,
    }
}

/// The field after the first `delimiter`, ending at the next occurrence if
/// there is one. `None` when the delimiter is absent entirely.
fn field_after<'a>(text: &'a str, delimiter: &str) -> Option<&'a str> {
    let mut parts = text.split(delimiter);
    parts.next();
    parts.next()
}

/// Parse a temperature response, e.g. `"Temperature = 23.45\u{b0}C\r\n"`.
///
/// The value sits after `"= "` and ends at the degree-Celsius marker.
pub fn parse_temperature(text: &str) -> Result<f64, DecodeError> {
    let field = field_after(text, "= ").ok_or_else(|| DecodeError::data_missing(text))?;
    let value = before(field, "\u{b0}C");
    value
        .parse::<f64>()
        .map_err(|_| DecodeError::malformed_number(value))
}

/// Parse a humidity response, e.g. `"Humidity = 41.20%\r\n"`.
///
/// The value sits after `"= "` and ends at the percent sign.
pub fn parse_humidity(text: &str) -> Result<f64, DecodeError> {
    let field = field_after(text, "= ").ok_or_else(|| DecodeError::data_missing(text))?;
    let value = before(field, "%");
    value
        .parse::<f64>()
        .map_err(|_| DecodeError::malformed_number(value))
}

/// Parse a pressure response, e.g. `"Pressure = 1009.52\r\n"`.
///
/// The value sits after `"= "`; carriage returns, NUL bytes and surrounding
/// whitespace are stripped before parsing.
pub fn parse_pressure(text: &str) -> Result<f64, DecodeError> {
    let field = field_after(text, "= ").ok_or_else(|| DecodeError::data_missing(text))?;
    let value = before(before(field, "\r"), "\0").trim();
    value
        .parse::<f64>()
        .map_err(|_| DecodeError::malformed_number(value))
}

/// Isolate and parse one tilt axis field: the digits run to the next space
/// or carriage return.
fn parse_tilt_axis(field: &str) -> Result<i64, DecodeError> {
    let value = before(before(field, " "), "\r").trim();
    value
        .parse::<i64>()
        .map_err(|_| DecodeError::malformed_number(value))
}

/// Parse a tilt response, e.g. `"Tilt X:-12 Y:34 Z:1020\r\n"`.
///
/// Splitting on `":"` must yield at least four fields; fields 1 to 3 carry
/// the X, Y and Z axis counts immediately after each colon.
pub fn parse_tilt(text: &str) -> Result<TiltReading, DecodeError> {
    let fields: Vec<&str> = text.split(':').collect();
    if fields.len() < 4 {
        return Err(DecodeError::data_missing(text));
    }

    let x = parse_tilt_axis(fields[1])?;
    let y = parse_tilt_axis(fields[2])?;
    let z = parse_tilt_axis(fields[3])?;

    Ok(TiltReading { x, y, z })
}

/// Parse a six-band spectral response (vibration or sound).
///
/// The response is split into lines; a line splitting on `":"` into exactly
/// three fields is a band line (`index: <peak>Hz:<amplitude>`), everything
/// else is separator noise the device injects and is discarded. Exactly six
/// band lines are required, taken in line order; the peak field loses its
/// `"Hz"` suffix and leading spaces, the amplitude field loses trailing
/// carriage returns and NUL bytes.
pub fn parse_spectrum(text: &str) -> Result<SpectralReading, DecodeError> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() < MIN_SPECTRUM_LINES {
        return Err(DecodeError::data_missing(text));
    }

    let mut bands = [SpectralBand {
        peak_hz: 0,
        amplitude: 0.0,
    }; SPECTRAL_BANDS];
    let mut found = 0;

    for line in lines {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != 3 {
            continue;
        }

        let peak = before(fields[1], "Hz").trim_start_matches(' ');
        let peak_hz = peak
            .parse::<i64>()
            .map_err(|_| DecodeError::malformed_number(peak))?;

        let amp = before(before(fields[2], "\r"), "\0");
        let amplitude = amp
            .parse::<f64>()
            .map_err(|_| DecodeError::malformed_number(amp))?;

        bands[found] = SpectralBand { peak_hz, amplitude };
        found += 1;
        if found == SPECTRAL_BANDS {
            return Ok(SpectralReading { bands });
        }
    }

    Err(DecodeError::data_missing(text))
}

/// Parse a vibration response for one physical axis.
pub fn parse_vibration(axis: VibrationAxis, text: &str) -> Result<Reading, DecodeError> {
    let spectrum = parse_spectrum(text)?;
    Ok(Reading::Vibration { axis, spectrum })
}

/// Parse a light level response, e.g. `"Light Level: 57\r\n"`.
///
/// The value sits after `": "` and ends at the first CR, LF or NUL byte.
/// The sensor reports light as a signed 8-bit count, so the parse enforces
/// the i8 range.
pub fn parse_light(text: &str) -> Result<i8, DecodeError> {
    let field = field_after(text, ": ").ok_or_else(|| DecodeError::data_missing(text))?;
    let value = before(before(before(field, "\r"), "\n"), "\0");
    value
        .parse::<i8>()
        .map_err(|_| DecodeError::malformed_number(value))
}

/// Parse a broadband sound level response, e.g. `"Broadband: 60.52\r\n"`.
///
/// Same locator as the light response, but the payload is a float.
pub fn parse_broadband(text: &str) -> Result<f64, DecodeError> {
    let field = field_after(text, ": ").ok_or_else(|| DecodeError::data_missing(text))?;
    let value = before(before(before(field, "\r"), "\n"), "\0");
    value
        .parse::<f64>()
        .map_err(|_| DecodeError::malformed_number(value))
}

/// Decode one response (or one aggregate line group) for the given kind.
///
/// The single seam shared by the single-kind polling loop and the aggregate
/// decode tasks.
pub fn decode_reading(kind: ReadingKind, text: &str) -> Result<Reading, DecodeError> {
    match kind {
        ReadingKind::Temperature => parse_temperature(text).map(Reading::Temperature),
        ReadingKind::Humidity => parse_humidity(text).map(Reading::Humidity),
        ReadingKind::Pressure => parse_pressure(text).map(Reading::Pressure),
        ReadingKind::Tilt => parse_tilt(text).map(Reading::Tilt),
        ReadingKind::VibrationX => parse_vibration(VibrationAxis::X, text),
        ReadingKind::VibrationY => parse_vibration(VibrationAxis::Y, text),
        ReadingKind::VibrationZ => parse_vibration(VibrationAxis::Z, text),
        ReadingKind::Light => parse_light(text).map(Reading::Light),
        ReadingKind::Sound => parse_spectrum(text).map(Reading::Sound),
        ReadingKind::Broadband => parse_broadband(text).map(Reading::Broadband),
    }
}

// Little-endian word assembly for the device's binary read mode. The ASCII
// pipeline never calls these; they are kept for parity with the binary
// protocol the sensor also speaks.

#[allow(dead_code)]
pub fn word16(bytes: &[u8]) -> Result<u16, DecodeError> {
    if bytes.len() != 2 {
        return Err(DecodeError::InvalidByteLength {
            expected: 2,
            got: bytes.len(),
        });
    }

    Ok(u16::from(bytes[1]) << 8 | u16::from(bytes[0]))
}

#[allow(dead_code)]
pub fn word24(bytes: &[u8]) -> Result<u32, DecodeError> {
    if bytes.len() != 3 {
        return Err(DecodeError::InvalidByteLength {
            expected: 3,
            got: bytes.len(),
        });
    }

    Ok(u32::from(bytes[2]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[0]))
}

#[allow(dead_code)]
pub fn word32(bytes: &[u8]) -> Result<u32, DecodeError> {
    if bytes.len() != 4 {
        return Err(DecodeError::InvalidByteLength {
            expected: 4,
            got: bytes.len(),
        });
    }

    Ok(u32::from(bytes[3]) << 24
        | u32::from(bytes[2]) << 16
        | u32::from(bytes[1]) << 8
        | u32::from(bytes[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Response fixtures in the device's line format; the degree marker is
    // the raw byte 0xB0, decoded through latin1_text like live traffic.
    const TEMPERATURE_RAW: &[u8] = b"Temperature = 23.45\xb0C\r\n";

    fn spectrum_fixture() -> String {
        // Nine lines: two blank separators, six band lines, one trailing
        // empty fragment after the final newline.
        "\n\n\
         1: 320Hz:0.00123\r\n\
         2: 640Hz:0.00456\r\n\
         3: 960Hz:0.00789\r\n\
         4: 1280Hz:0.00012\r\n\
         5: 1600Hz:0.00034\r\n\
         6: 1920Hz:0.00056\r\n"
            .to_string()
    }

    #[test]
    fn test_latin1_text_keeps_every_byte() {
        let text = latin1_text(TEMPERATURE_RAW);
        assert_eq!(text, "Temperature = 23.45\u{b0}C\r\n");

        let text = latin1_text(&[0x00, 0x41, 0xb0, 0xff]);
        assert_eq!(text, "\u{0}A\u{b0}\u{ff}");
    }

    #[test]
    fn test_parse_temperature_well_formed() {
        let text = latin1_text(TEMPERATURE_RAW);
        assert_eq!(parse_temperature(&text).unwrap(), 23.45);
    }

    #[test]
    fn test_parse_temperature_missing_delimiter() {
        assert_eq!(
            parse_temperature("Temperature 23.45"),
            Err(DecodeError::data_missing("Temperature 23.45"))
        );
        assert!(parse_temperature("").is_err());
    }

    #[test]
    fn test_parse_temperature_malformed_number() {
        let text = latin1_text(b"Temperature = 2x.45\xb0C\r\n");
        assert_eq!(
            parse_temperature(&text),
            Err(DecodeError::malformed_number("2x.45"))
        );
    }

    #[test]
    fn test_parse_humidity_well_formed() {
        assert_eq!(parse_humidity("Humidity = 41.20%\r\n").unwrap(), 41.2);
    }

    #[test]
    fn test_parse_humidity_failures() {
        assert!(matches!(
            parse_humidity("Humidity 41.20%"),
            Err(DecodeError::DataMissing { .. })
        ));
        assert!(matches!(
            parse_humidity("Humidity = forty%"),
            Err(DecodeError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_parse_pressure_strips_noise() {
        assert_eq!(parse_pressure("Pressure = 1009.52\r\n").unwrap(), 1009.52);
        // NUL padding and stray whitespace from the lossy transport
        assert_eq!(
            parse_pressure("Pressure =  1013.25\u{0}\r\n").unwrap(),
            1013.25
        );
    }

    #[test]
    fn test_parse_pressure_failures() {
        assert!(matches!(
            parse_pressure("no delimiter here"),
            Err(DecodeError::DataMissing { .. })
        ));
        assert!(matches!(
            parse_pressure("Pressure = high\r\n"),
            Err(DecodeError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_parse_tilt_well_formed() {
        let tilt = parse_tilt("Tilt X:-12 Y:34 Z:1020\r\n").unwrap();
        assert_eq!(
            tilt,
            TiltReading {
                x: -12,
                y: 34,
                z: 1020
            }
        );
    }

    #[test]
    fn test_parse_tilt_too_few_fields() {
        // Only three colon-fields: the Z axis was lost in transit
        assert!(matches!(
            parse_tilt("Tilt X:-12 Y:34"),
            Err(DecodeError::DataMissing { .. })
        ));
        assert!(parse_tilt("").is_err());
    }

    #[test]
    fn test_parse_tilt_malformed_axis() {
        assert!(matches!(
            parse_tilt("Tilt X:abc Y:34 Z:1020"),
            Err(DecodeError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_parse_spectrum_nine_line_fixture() {
        let spectrum = parse_spectrum(&spectrum_fixture()).unwrap();

        let peaks: Vec<i64> = spectrum.bands.iter().map(|b| b.peak_hz).collect();
        assert_eq!(peaks, vec![320, 640, 960, 1280, 1600, 1920]);

        let amps: Vec<f64> = spectrum.bands.iter().map(|b| b.amplitude).collect();
        assert_eq!(
            amps,
            vec![0.00123, 0.00456, 0.00789, 0.00012, 0.00034, 0.00056]
        );
    }

    #[test]
    fn test_parse_spectrum_five_valid_lines() {
        // Enough raw lines, but only five parse as band lines
        let text = "\n\n\
                    1: 320Hz:0.00123\r\n\
                    2: 640Hz:0.00456\r\n\
                    3: 960Hz:0.00789\r\n\
                    4: 1280Hz:0.00012\r\n\
                    5: 1600Hz:0.00034\r\n\n";
        assert!(matches!(
            parse_spectrum(text),
            Err(DecodeError::DataMissing { .. })
        ));
    }

    #[test]
    fn test_parse_spectrum_too_few_lines() {
        let text = "1: 320Hz:0.1\n2: 640Hz:0.2";
        assert!(matches!(
            parse_spectrum(text),
            Err(DecodeError::DataMissing { .. })
        ));
        assert!(parse_spectrum("").is_err());
    }

    #[test]
    fn test_parse_spectrum_malformed_band() {
        let text = "\n\n\
                    1: 320Hz:0.00123\r\n\
                    2: sixHz:0.00456\r\n\
                    3: 960Hz:0.00789\r\n\
                    4: 1280Hz:0.00012\r\n\
                    5: 1600Hz:0.00034\r\n\
                    6: 1920Hz:0.00056\r\n";
        assert_eq!(
            parse_spectrum(text),
            Err(DecodeError::malformed_number("six"))
        );
    }

    #[test]
    fn test_parse_spectrum_takes_first_six_bands() {
        let text = "1: 100Hz:0.1\r\n\
                    2: 200Hz:0.2\r\n\
                    3: 300Hz:0.3\r\n\
                    4: 400Hz:0.4\r\n\
                    5: 500Hz:0.5\r\n\
                    6: 600Hz:0.6\r\n\
                    7: 700Hz:0.7\r";
        let spectrum = parse_spectrum(text).unwrap();
        assert_eq!(spectrum.bands[5].peak_hz, 600);
    }

    #[test]
    fn test_parse_vibration_carries_axis() {
        let reading = parse_vibration(VibrationAxis::Y, &spectrum_fixture()).unwrap();
        assert_eq!(reading.kind(), ReadingKind::VibrationY);
    }

    #[test]
    fn test_parse_light_well_formed() {
        assert_eq!(parse_light("Light Level: 57\r\n").unwrap(), 57);
        assert_eq!(parse_light("Light Level: -3\n").unwrap(), -3);
        assert_eq!(parse_light("Light Level: 12\u{0}").unwrap(), 12);
    }

    #[test]
    fn test_parse_light_enforces_signed_8_bit_range() {
        assert!(matches!(
            parse_light("Light Level: 300\r\n"),
            Err(DecodeError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_parse_light_missing_delimiter() {
        assert!(matches!(
            parse_light("Light Level 57"),
            Err(DecodeError::DataMissing { .. })
        ));
    }

    #[test]
    fn test_parse_broadband_well_formed() {
        assert_eq!(parse_broadband("Broadband: 60.52\r\n").unwrap(), 60.52);
    }

    #[test]
    fn test_parse_broadband_failures() {
        assert!(matches!(
            parse_broadband("Broadband 60.52"),
            Err(DecodeError::DataMissing { .. })
        ));
        assert!(matches!(
            parse_broadband("Broadband: loud\r\n"),
            Err(DecodeError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn test_decode_reading_dispatches_by_kind() {
        let text = latin1_text(TEMPERATURE_RAW);
        assert_eq!(
            decode_reading(ReadingKind::Temperature, &text).unwrap(),
            Reading::Temperature(23.45)
        );

        let reading = decode_reading(ReadingKind::VibrationZ, &spectrum_fixture()).unwrap();
        assert_eq!(reading.kind(), ReadingKind::VibrationZ);

        assert_eq!(
            decode_reading(ReadingKind::Light, "Light Level: 9\r\n").unwrap(),
            Reading::Light(9)
        );
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let text = latin1_text(TEMPERATURE_RAW);
        assert_eq!(parse_temperature(&text), parse_temperature(&text));

        let fixture = spectrum_fixture();
        assert_eq!(parse_spectrum(&fixture), parse_spectrum(&fixture));

        let broken = "Pressure = \r\n";
        assert_eq!(parse_pressure(broken), parse_pressure(broken));
    }

    #[test]
    fn test_word_assembly_little_endian() {
        assert_eq!(word16(&[0x34, 0x12]).unwrap(), 0x1234);
        assert_eq!(word24(&[0x56, 0x34, 0x12]).unwrap(), 0x123456);
        assert_eq!(word32(&[0x78, 0x56, 0x34, 0x12]).unwrap(), 0x12345678);
    }

    #[test]
    fn test_word_assembly_rejects_wrong_length() {
        assert_eq!(
            word16(&[0x01]),
            Err(DecodeError::InvalidByteLength {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            word24(&[0x01, 0x02, 0x03, 0x04]),
            Err(DecodeError::InvalidByteLength {
                expected: 3,
                got: 4
            })
        );
        assert_eq!(
            word32(&[]),
            Err(DecodeError::InvalidByteLength {
                expected: 4,
                got: 0
            })
        );
    }
}
