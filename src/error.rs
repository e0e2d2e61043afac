/// Error taxonomy shared by the field decoders and the polling session
use thiserror::Error;

/// Failure modes of decoding one sensor response.
///
/// The DLP-TH1C frames its ASCII responses with delimiters and timing only,
/// so a lossy transport shows up as missing delimiters or truncated numeric
/// fields rather than as I/O errors. Each variant carries the offending raw
/// fragment so that transport glitches can be diagnosed from the logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The expected delimiter, label or line count was absent from the response.
    #[error("data missing in response: {fragment:?}")]
    DataMissing { fragment: String },

    /// The delimiter was found but the isolated payload did not parse as the
    /// expected numeric type.
    #[error("malformed number: {fragment:?}")]
    MalformedNumber { fragment: String },

    /// A fixed-width binary word helper received the wrong number of bytes.
    /// Defensive only; the ASCII protocol never produces this.
    #[error("invalid byte length: expected {expected}, got {got}")]
    InvalidByteLength { expected: usize, got: usize },

    /// A vibration read was requested with a byte that is not one of the
    /// three axis commands.
    #[error("invalid command byte: {command:#04x}")]
    InvalidCommand { command: u8 },
}

impl DecodeError {
    /// Build a `DataMissing` error from the response text it was found in.
    pub fn data_missing(fragment: &str) -> Self {
        DecodeError::DataMissing {
            fragment: fragment.to_string(),
        }
    }

    /// Build a `MalformedNumber` error from the substring that failed to parse.
    pub fn malformed_number(fragment: &str) -> Self {
        DecodeError::MalformedNumber {
            fragment: fragment.to_string(),
        }
    }
}
