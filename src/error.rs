//! Error types returned by the packet decoder.
//!
//! Every failed [`crate::parse`] call reports exactly one [`DecodeError`]
//! naming the stage that rejected the packet. Callers are expected to drop or
//! log the packet and keep going; nothing here is fatal to the decoder.

use thiserror::Error;

use crate::packet::DecodedPacket;

/// Reason a packet header (`FROM>TO,PATH`) was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("missing '>' between source and destination")]
    MissingSeparator,
    #[error("source callsign is invalid")]
    InvalidSource,
    #[error("no destination callsign in header")]
    MissingDestination,
    #[error("destination callsign is invalid")]
    InvalidDestination,
    #[error("invalid callsign in path")]
    InvalidPath,
}

/// Reason an uncompressed position was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("latitude and longitude ambiguity mismatch")]
    AmbiguityMismatch,
    #[error("latitude is out of range (0-89 degrees)")]
    LatitudeOutOfRange,
    #[error("longitude is out of range (0-179 degrees)")]
    LongitudeOutOfRange,
    #[error("invalid latitude minutes")]
    InvalidLatitudeMinutes,
    #[error("invalid longitude minutes")]
    InvalidLongitudeMinutes,
}

/// Reason a Mic-E packet was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MicEError {
    #[error("destination callsign has to be 6 characters")]
    DestinationLength,
    #[error("destination callsign is not a Mic-E destination")]
    InvalidDestination,
    #[error("information field is too short")]
    BodyTooShort,
    #[error("information field does not match the Mic-E layout")]
    InvalidBody,
    #[error("invalid latitude ambiguity")]
    InvalidAmbiguity,
    #[error("unsupported position ambiguity: {0}")]
    UnsupportedAmbiguity(usize),
    #[error("invalid telemetry hex data")]
    InvalidTelemetryHex,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("packet is empty")]
    EmptyPacket,

    #[error("packet has no body")]
    MissingBody,

    #[error("packet body is empty after packet type character")]
    EmptyBody,

    #[error("invalid packet header: {0}")]
    InvalidHeader(HeaderError),

    #[error("packet type '{discriminator}' ({description}) is unsupported")]
    UnsupportedFormat {
        discriminator: char,
        description: &'static str,
    },

    #[error("invalid position: {0}")]
    InvalidPosition(PositionError),

    #[error("invalid object format")]
    InvalidObjectFormat,

    #[error("invalid timestamp format")]
    InvalidTimestamp,

    #[error("invalid compressed format")]
    InvalidCompressedFormat,

    #[error("invalid Mic-E packet: {0}")]
    InvalidMicE(MicEError),

    #[error("invalid positionless weather report format")]
    InvalidWeatherFormat,

    #[error("invalid telemetry definition: {0}")]
    InvalidTelemetryConfig(String),

    #[error("invalid base91 character {0:?}")]
    InvalidBase91Character(char),

    #[error("third-party packet nested deeper than {0} levels")]
    ThirdPartyTooDeep(usize),
}

impl DecodeError {
    /// Stable label used for logging and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::EmptyPacket => "empty_packet",
            DecodeError::MissingBody => "missing_body",
            DecodeError::EmptyBody => "empty_body",
            DecodeError::InvalidHeader(_) => "invalid_header",
            DecodeError::UnsupportedFormat { .. } => "unsupported_format",
            DecodeError::InvalidPosition(_) => "invalid_position",
            DecodeError::InvalidObjectFormat => "invalid_object",
            DecodeError::InvalidTimestamp => "invalid_timestamp",
            DecodeError::InvalidCompressedFormat => "invalid_compressed",
            DecodeError::InvalidMicE(_) => "invalid_mic_e",
            DecodeError::InvalidWeatherFormat => "invalid_weather",
            DecodeError::InvalidTelemetryConfig(_) => "invalid_telemetry_config",
            DecodeError::InvalidBase91Character(_) => "invalid_base91",
            DecodeError::ThirdPartyTooDeep(_) => "third_party_too_deep",
        }
    }
}

impl From<HeaderError> for DecodeError {
    fn from(e: HeaderError) -> Self {
        DecodeError::InvalidHeader(e)
    }
}

impl From<PositionError> for DecodeError {
    fn from(e: PositionError) -> Self {
        DecodeError::InvalidPosition(e)
    }
}

impl From<MicEError> for DecodeError {
    fn from(e: MicEError) -> Self {
        DecodeError::InvalidMicE(e)
    }
}

/// A rejected packet: the error plus a record holding only the raw line
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error}")]
pub struct ParseFailure {
    pub packet: DecodedPacket,
    #[source]
    pub error: DecodeError,
}

impl ParseFailure {
    pub fn new(raw: &str, error: DecodeError) -> Self {
        Self {
            packet: DecodedPacket::with_raw(raw),
            error,
        }
    }
}
