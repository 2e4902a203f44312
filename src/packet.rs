use serde::{Deserialize, Serialize};
use std::fmt;

/// Which decoder produced a [`DecodedPacket`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacketFormat {
    Uncompressed,
    Compressed,
    MicE,
    Object,
    Status,
    Message,
    Bulletin,
    GroupBulletin,
    Announcement,
    TelemetryMessage,
    #[serde(rename = "thirdparty")]
    ThirdParty,
    UserDefined,
    Invalid,
    Weather,
}

impl PacketFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacketFormat::Uncompressed => "uncompressed",
            PacketFormat::Compressed => "compressed",
            PacketFormat::MicE => "mic-e",
            PacketFormat::Object => "object",
            PacketFormat::Status => "status",
            PacketFormat::Message => "message",
            PacketFormat::Bulletin => "bulletin",
            PacketFormat::GroupBulletin => "group-bulletin",
            PacketFormat::Announcement => "announcement",
            PacketFormat::TelemetryMessage => "telemetry-message",
            PacketFormat::ThirdParty => "thirdparty",
            PacketFormat::UserDefined => "user-defined",
            PacketFormat::Invalid => "invalid",
            PacketFormat::Weather => "weather",
        }
    }
}

impl fmt::Display for PacketFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response carried by an ack/rej message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Ack,
    Rej,
}

impl Response {
    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ack" => Some(Response::Ack),
            "rej" => Some(Response::Rej),
            _ => None,
        }
    }
}

/// PHG directivity digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directivity {
    Omni,
    /// Digit 9, reserved by the protocol
    Invalid,
    /// Beam heading in degrees (45 × digit)
    Degrees(u16),
}

/// Power-Height-Gain station descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phg {
    /// The four PHG digits, plus the rate digit when present
    pub raw: String,
    /// Watts
    pub power: f64,
    /// Metres above average terrain
    pub height: f64,
    /// Linear gain (not dB)
    pub gain: f64,
    pub directivity: Directivity,
    /// Estimated radio range in km
    pub range: f64,
    /// Beacons per hour, from the optional `PHGabcdr/` form
    pub rate: Option<u8>,
}

/// Telemetry embedded in a comment between `|` markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub seq: u32,
    pub values: [u32; 5],
    /// Eight `0`/`1` characters, least significant bit first
    pub bits: Option<String>,
}

/// Telemetry channel definitions sent as `PARM.`/`UNIT.`/`EQNS.`/`BITS.` messages.
///
/// A single message only carries one kind of definition, so only the
/// matching member is populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryDefs {
    pub parm_names: Option<Vec<String>>,
    pub unit_names: Option<Vec<String>>,
    /// `a·x² + b·x + c` coefficients for the five analog channels
    pub eqns: Option<[[f64; 3]; 5]>,
    pub bits_mask: Option<String>,
    pub title: Option<String>,
}

/// Weather values in metric units
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    /// Degrees
    pub wind_direction: Option<f64>,
    /// m/s
    pub wind_speed: Option<f64>,
    /// m/s
    pub wind_gust: Option<f64>,
    /// Celsius
    pub temperature: Option<f64>,
    /// mm
    pub rain_1h: Option<f64>,
    /// mm
    pub rain_24h: Option<f64>,
    /// mm
    pub rain_since_midnight: Option<f64>,
    /// Percent. A reading of `00` is reported as 100.
    pub humidity: Option<f64>,
    /// hPa
    pub pressure: Option<f64>,
    /// W/m²
    pub luminosity: Option<f64>,
    /// mm
    pub snow: Option<f64>,
    /// Raw rain counter
    pub rain_raw: Option<f64>,
}

impl Weather {
    pub fn is_empty(&self) -> bool {
        *self == Weather::default()
    }
}

/// A decoded APRS packet.
///
/// Only the fields relevant to `format` are populated; everything else keeps
/// its default value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPacket {
    pub raw: String,
    pub from: String,
    pub to: String,
    pub path: Vec<String>,
    pub format: Option<PacketFormat>,

    // Position
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub pos_ambiguity: Option<u8>,
    pub symbol_table: Option<char>,
    pub symbol_code: Option<char>,
    pub message_capable: bool,
    /// Degrees
    pub course: Option<f64>,
    /// km/h
    pub speed: Option<f64>,
    /// Metres
    pub altitude: Option<f64>,
    pub bearing: Option<u16>,
    pub nrq: Option<u16>,
    pub phg: Option<Phg>,
    /// km
    pub range: Option<f64>,
    pub gps_fix_status: Option<bool>,
    pub dao_datum: Option<char>,

    pub comment: String,
    pub telemetry: Option<Telemetry>,
    pub telemetry_mic_e: Option<Vec<u8>>,
    pub telemetry_defs: Option<TelemetryDefs>,
    pub weather: Option<Weather>,

    // Mic-E
    pub mic_e_bits: Option<String>,
    pub mic_e_message: Option<String>,

    // Messages
    pub addressee: Option<String>,
    pub message_text: Option<String>,
    pub msg_no: Option<String>,
    pub ack_msg_no: Option<String>,
    pub response: Option<Response>,
    pub bulletin_id: Option<String>,
    pub announcement_id: Option<String>,
    pub group_identifier: Option<String>,

    pub status: Option<String>,
    pub object_name: Option<String>,
    pub object_alive: Option<bool>,
    pub object_format: Option<PacketFormat>,
    pub user_defined_id: Option<char>,
    pub user_defined_type: Option<char>,
    /// Undecoded payload of user-defined and invalid packets
    pub body: Option<String>,

    pub raw_timestamp: Option<String>,
    /// Seconds since the UNIX epoch, 0 when absent
    pub timestamp: i64,

    pub sub_packet: Option<Box<DecodedPacket>>,
}

impl DecodedPacket {
    pub(crate) fn with_raw(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            ..Default::default()
        }
    }

    /// Latitude and longitude, when the packet carried a position
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Symbol table and code, e.g. `('/', '>')` for a car
    pub fn symbol(&self) -> Option<(char, char)> {
        match (self.symbol_table, self.symbol_code) {
            (Some(table), Some(code)) => Some((table, code)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_serializes_as_tag() {
        assert_eq!(
            serde_json::to_string(&PacketFormat::MicE).unwrap(),
            "\"mic-e\""
        );
        assert_eq!(
            serde_json::to_string(&PacketFormat::ThirdParty).unwrap(),
            "\"thirdparty\""
        );
        assert_eq!(
            serde_json::to_string(&PacketFormat::TelemetryMessage).unwrap(),
            "\"telemetry-message\""
        );
        assert_eq!(PacketFormat::GroupBulletin.to_string(), "group-bulletin");
    }

    #[test]
    fn test_default_packet_is_blank() {
        let packet = DecodedPacket::with_raw("raw line");
        assert_eq!(packet.raw, "raw line");
        assert_eq!(packet.position(), None);
        assert_eq!(packet.symbol(), None);
        assert_eq!(packet.timestamp, 0);
        assert!(packet.comment.is_empty());
    }

    #[test]
    fn test_weather_is_empty() {
        let mut weather = Weather::default();
        assert!(weather.is_empty());
        weather.humidity = Some(50.0);
        assert!(!weather.is_empty());
    }
}
