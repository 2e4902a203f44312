//! Mic-E: latitude, message bits and longitude offsets packed into the
//! destination callsign, with longitude, speed and course in the body.

use super::{comment, telemetry};
use crate::base91;
use crate::error::{DecodeError, MicEError};
use crate::packet::{DecodedPacket, PacketFormat};
use crate::patterns;

const DESTINATION: &str = r"^[0-9A-Z]{3}[0-9L-Z]{3}$";
const BODY: &str = r"^[&-\x7f][&-a][\x1c-\x7f]{2}[\x1c-\x7d][\x1c-\x7f][\x21-\x7e][/\\0-9A-Z]";
const AMBIGUITY: &str = r"^[0-9]+( *)$";
const TELEMETRY: &str = r"^('[0-9a-f]{10}|`[0-9a-f]{4})";
const ALTITUDE: &str = r"^(.*)([!-{]{3})\}(.*)$";

const KNOTS_TO_KMH: f64 = 1.852;

/// Message types for the standard bit patterns
const STANDARD_MESSAGES: [(&str, &str); 8] = [
    ("111", "M0: Off Duty"),
    ("110", "M1: En Route"),
    ("101", "M2: In Service"),
    ("100", "M3: Returning"),
    ("011", "M4: Committed"),
    ("010", "M5: Special"),
    ("001", "M6: Priority"),
    ("000", "Emergency"),
];

/// Message types when any bit uses the custom encoding (A-K)
const CUSTOM_MESSAGES: [(&str, &str); 8] = [
    ("111", "C0: Custom-0"),
    ("110", "C1: Custom-1"),
    ("101", "C2: Custom-2"),
    ("100", "C3: Custom-3"),
    ("011", "C4: Custom-4"),
    ("010", "C5: Custom-5"),
    ("001", "C6: Custom-6"),
    ("000", "Emergency"),
];

pub(super) fn decode(packet: &mut DecodedPacket, body: &str) -> Result<(), DecodeError> {
    packet.format = Some(PacketFormat::MicE);

    let destination = packet.to.split('-').next().unwrap_or_default().to_string();
    if destination.len() != 6 {
        return Err(MicEError::DestinationLength.into());
    }
    if body.len() < 8 {
        return Err(MicEError::BodyTooShort.into());
    }
    if !patterns::get(DESTINATION).is_match(&destination) {
        return Err(MicEError::InvalidDestination.into());
    }
    if !patterns::get(BODY).is_match(body) {
        return Err(MicEError::InvalidBody.into());
    }

    let dst = destination.as_bytes();
    let info = body.as_bytes();

    packet.symbol_code = Some(info[6] as char);
    packet.symbol_table = Some(info[7] as char);

    let ambiguity = decode_latitude(packet, dst)?;
    decode_message_bits(packet, &destination[..3]);
    decode_longitude(packet, dst, info, ambiguity);
    decode_speed_course(packet, info);

    if body.len() > 8 {
        let rest = decode_telemetry(packet, &body[8..])?;
        let rest = decode_altitude(packet, rest)?;
        let rest = telemetry::decode_comment_telemetry(packet, &rest);
        let rest = comment::decode_dao(packet, &rest);
        packet.comment = rest.trim_matches(' ').to_string();
    }

    Ok(())
}

/// Decode latitude from the destination digits and return the ambiguity
fn decode_latitude(packet: &mut DecodedPacket, dst: &[u8]) -> Result<usize, DecodeError> {
    let digits: String = dst
        .iter()
        .map(|&c| match c {
            b'K' | b'L' | b'Z' => ' ',
            // P-Y
            c if c > 76 => (c - 32) as char,
            // A-J
            c if c > 57 => (c - 17) as char,
            c => c as char,
        })
        .collect();

    let caps = patterns::get(AMBIGUITY)
        .captures(&digits)
        .ok_or(MicEError::InvalidAmbiguity)?;
    let ambiguity = caps.get(1).map_or(0, |m| m.len());
    if ambiguity > 4 {
        return Err(MicEError::UnsupportedAmbiguity(ambiguity).into());
    }

    // Move to the centre of the ambiguity box
    let mut digits = digits.into_bytes();
    if ambiguity >= 4 {
        digits[2] = b'3';
    } else if ambiguity > 0 {
        digits[6 - ambiguity] = b'5';
    }
    let digits = String::from_utf8_lossy(&digits).replace(' ', "0");

    let minutes: f64 = format!("{}.{}", &digits[2..4], &digits[4..6])
        .parse()
        .map_err(|_| MicEError::InvalidAmbiguity)?;
    let degrees: f64 = digits[..2].parse().map_err(|_| MicEError::InvalidAmbiguity)?;

    let mut lat = degrees + minutes / 60.0;
    if dst[3] <= b'L' {
        lat = -lat;
    }

    packet.lat = Some(lat);
    packet.pos_ambiguity = Some(ambiguity as u8);
    Ok(ambiguity)
}

fn decode_message_bits(packet: &mut DecodedPacket, prefix: &str) {
    let bits: String = prefix
        .chars()
        .map(|c| match c {
            '0'..='9' | 'L' => '0',
            'P'..='Z' => '1',
            _ => '2',
        })
        .collect();

    let message = if bits.contains('2') {
        let folded = bits.replace('2', "1");
        lookup(&CUSTOM_MESSAGES, &folded)
    } else {
        lookup(&STANDARD_MESSAGES, &bits)
    };

    packet.mic_e_message = message.map(str::to_string);
    packet.mic_e_bits = Some(bits);
}

fn lookup(table: &[(&str, &'static str)], bits: &str) -> Option<&'static str> {
    table.iter().find(|(key, _)| *key == bits).map(|&(_, message)| message)
}

fn decode_longitude(packet: &mut DecodedPacket, dst: &[u8], info: &[u8], ambiguity: usize) {
    let mut lon = f64::from(info[0]) - 28.0;
    if dst[4] >= b'P' {
        lon += 100.0;
    }
    if (180.0..=189.0).contains(&lon) {
        lon -= 80.0;
    } else if (190.0..=199.0).contains(&lon) {
        lon -= 190.0;
    }

    let mut minutes = f64::from(info[1]) - 28.0;
    if minutes >= 60.0 {
        minutes -= 60.0;
    }
    minutes += (f64::from(info[2]) - 28.0) / 100.0;

    minutes = match ambiguity {
        4 => 30.0,
        3 => ((minutes / 10.0).floor() + 0.5) * 10.0,
        2 => minutes.floor() + 0.5,
        1 => ((minutes * 10.0).floor() + 0.5) / 10.0,
        _ => minutes,
    };

    lon += minutes / 60.0;
    if dst[5] >= b'P' {
        lon = -lon;
    }
    packet.lon = Some(lon);
}

fn decode_speed_course(packet: &mut DecodedPacket, info: &[u8]) {
    let mut speed = (f64::from(info[3]) - 28.0) * 10.0;
    let mut course = f64::from(info[4]) - 28.0;
    let quotient = (course / 10.0).trunc();
    course -= quotient * 10.0;
    course = course * 100.0 + f64::from(info[5]) - 28.0;
    speed += quotient;

    if speed >= 800.0 {
        speed -= 800.0;
    }
    if course >= 400.0 {
        course -= 400.0;
    }

    packet.speed = Some(speed * KNOTS_TO_KMH);
    packet.course = Some(course);
}

/// Two (`` ` ``) or five (`'`) hex telemetry channels right after the body
fn decode_telemetry<'a>(packet: &mut DecodedPacket, rest: &'a str) -> Result<&'a str, DecodeError> {
    let Some(m) = patterns::get(TELEMETRY).find(rest) else {
        return Ok(rest);
    };

    let hex = &m.as_str()[1..];
    let channels = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| MicEError::InvalidTelemetryHex)?;

    packet.telemetry_mic_e = Some(channels);
    Ok(&rest[m.end()..])
}

/// `xxx}` base-91 altitude in metres above -10000
fn decode_altitude(packet: &mut DecodedPacket, rest: &str) -> Result<String, DecodeError> {
    let Some(caps) = patterns::get(ALTITUDE).captures(rest) else {
        return Ok(rest.to_string());
    };

    let altitude = base91::decode(&caps[2])? as f64 - 10000.0;
    packet.altitude = Some(altitude);
    Ok(format!("{}{}", &caps[1], &caps[3]))
}
