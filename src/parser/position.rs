use tracing::trace;

use super::{comment, weather};
use crate::base91;
use crate::error::{DecodeError, PositionError};
use crate::packet::{DecodedPacket, PacketFormat};
use crate::patterns;
use crate::timestamp::{self, Clock};

/// Quick check for the fixed-width `DDMM.MMN/DDDMM.MMW` layout
const UNCOMPRESSED_SHAPE: &str = r"^[0-9 ]{4}\.[0-9 ]{2}[NS].[0-9 ]{5}\.[0-9 ]{2}[EW]";
const UNCOMPRESSED: &str = r"^([0-9]{2})([0-9 ]{2}\.[0-9 ]{2})([NnSs])([/\\0-9A-Z])([0-9]{3})([0-9 ]{2}\.[0-9 ]{2})([EeWw])([\x21-\x7e])";

const COMPRESSED_LEN: usize = 13;

const FEET_TO_METERS: f64 = 0.3048;
const KNOTS_TO_KMH: f64 = 1.852;
const MILES_TO_KM: f64 = 1.609344;

/// Decode a position report (`!`, `=`, `/`, `@`) or object (`;`)
pub(super) fn decode(
    packet: &mut DecodedPacket,
    packet_type: char,
    body: &str,
    clock: &dyn Clock,
) -> Result<(), DecodeError> {
    // Anything else reached here because it has a '!' early in the body
    let (packet_type, mut body) = if "!=/@;".contains(packet_type) {
        (packet_type, body)
    } else {
        let after_bang = body.split_once('!').map(|(_, rest)| rest).unwrap_or_default();
        ('!', after_bang)
    };

    if packet_type == ';' {
        let (name, alive, rest) = split_object_header(body).ok_or(DecodeError::InvalidObjectFormat)?;
        packet.object_name = Some(name.to_string());
        packet.object_alive = Some(alive);
        body = rest;
    } else {
        packet.message_capable = matches!(packet_type, '@' | '=');
    }

    if matches!(packet_type, '/' | '@' | ';') {
        let (ts, rest) = timestamp::decode(body, clock)?;
        packet.raw_timestamp = Some(ts.raw);
        packet.timestamp = ts.epoch;
        body = rest;
    }
    if body.is_empty() && packet.timestamp != 0 {
        return Err(DecodeError::InvalidTimestamp);
    }

    let body = match decode_uncompressed(packet, body)? {
        Some(rest) => rest,
        None => decode_compressed(packet, body)?,
    };

    if packet.symbol_code == Some('_') {
        let rest = comment::decode_data_extensions(packet, body);
        let rest = weather::decode_data(packet, rest);
        packet.comment = rest.trim_matches(' ').to_string();
    } else {
        comment::decode(packet, body);
    }

    if packet_type == ';' {
        packet.object_format = packet.format;
        packet.format = Some(PacketFormat::Object);
    }

    Ok(())
}

/// Split `NNNNNNNNN*` / `NNNNNNNNN_` off an object body
fn split_object_header(body: &str) -> Option<(&str, bool, &str)> {
    let bytes = body.as_bytes();
    if bytes.len() < 10 || !bytes[..9].iter().all(|b| (b' '..=b'~').contains(b)) {
        return None;
    }

    let alive = match bytes[9] {
        b'*' => true,
        b'_' => false,
        _ => return None,
    };

    Some((&body[..9], alive, &body[10..]))
}

/// Decode `DDMM.MMN/DDDMM.MMW$`. Returns `Ok(None)` when the body is not in
/// that layout so the caller can try the compressed form instead.
fn decode_uncompressed<'a>(
    packet: &mut DecodedPacket,
    body: &'a str,
) -> Result<Option<&'a str>, DecodeError> {
    if !patterns::get(UNCOMPRESSED_SHAPE).is_match(body) {
        return Ok(None);
    }
    let Some(caps) = patterns::get(UNCOMPRESSED).captures(body) else {
        trace!("uncompressed layout did not match strictly, trying compressed");
        return Ok(None);
    };

    let lat_min = &caps[2];
    let lon_min = &caps[6];

    let ambiguity = lat_min.matches(' ').count();
    if ambiguity != lon_min.matches(' ').count() {
        return Err(PositionError::AmbiguityMismatch.into());
    }

    let lat_deg: u8 = caps[1].parse().map_err(|_| PositionError::LatitudeOutOfRange)?;
    if lat_deg > 89 {
        return Err(PositionError::LatitudeOutOfRange.into());
    }
    let lon_deg: u16 = caps[5].parse().map_err(|_| PositionError::LongitudeOutOfRange)?;
    if lon_deg > 179 {
        return Err(PositionError::LongitudeOutOfRange.into());
    }

    let lat_min: f64 = center_of_ambiguity(lat_min, ambiguity)
        .parse()
        .map_err(|_| PositionError::InvalidLatitudeMinutes)?;
    let lon_min: f64 = center_of_ambiguity(lon_min, ambiguity)
        .parse()
        .map_err(|_| PositionError::InvalidLongitudeMinutes)?;

    let mut lat = f64::from(lat_deg) + lat_min / 60.0;
    let mut lon = f64::from(lon_deg) + lon_min / 60.0;
    if caps[3].eq_ignore_ascii_case("s") {
        lat = -lat;
    }
    if caps[7].eq_ignore_ascii_case("w") {
        lon = -lon;
    }

    packet.format = Some(PacketFormat::Uncompressed);
    packet.lat = Some(lat);
    packet.lon = Some(lon);
    packet.pos_ambiguity = Some(ambiguity as u8);
    packet.symbol_table = caps[4].chars().next();
    packet.symbol_code = caps[8].chars().next();

    let end = caps.get(0).map_or(0, |m| m.end());
    Ok(Some(&body[end..]))
}

/// Replace blanked minute digits with the centre of the ambiguity box: the
/// first blank becomes 5 and the rest 0, or 30 minutes when four digits are
/// blank.
fn center_of_ambiguity(minutes: &str, ambiguity: usize) -> String {
    if ambiguity >= 4 {
        return "30".to_string();
    }

    let mut first = true;
    minutes
        .chars()
        .map(|c| match c {
            ' ' if first => {
                first = false;
                '5'
            }
            ' ' => '0',
            c => c,
        })
        .collect()
}

/// Decode the 13-character compressed block `TYYYYXXXXCcst`
fn decode_compressed<'a>(packet: &mut DecodedPacket, body: &'a str) -> Result<&'a str, DecodeError> {
    let block = body
        .get(..COMPRESSED_LEN)
        .filter(|block| block.is_ascii())
        .ok_or(DecodeError::InvalidCompressedFormat)?;
    let bytes = block.as_bytes();

    let lat = 90.0 - base91::decode(&block[1..5])? as f64 / 380926.0;
    let lon = -180.0 + base91::decode(&block[5..9])? as f64 / 190463.0;

    let c = i32::from(bytes[10]) - 33;
    let s = i32::from(bytes[11]) - 33;
    let compression_type = i32::from(bytes[12]) - 33;

    if c == -1 {
        packet.gps_fix_status = Some(compression_type & 0x20 == 0x20);
    }

    if c == -1 || s == -1 {
        // no course/speed, altitude or range
    } else if compression_type & 0x18 == 0x10 {
        packet.altitude = Some(1.002_f64.powi(c * 91 + s) * FEET_TO_METERS);
    } else if (0..=89).contains(&c) {
        packet.course = Some(if c == 0 { 360.0 } else { f64::from(c * 4) });
        packet.speed = Some((1.08_f64.powi(s) - 1.0) * KNOTS_TO_KMH);
    } else if c == 90 {
        packet.range = Some(2.0 * 1.08_f64.powi(s) * MILES_TO_KM);
    }

    packet.format = Some(PacketFormat::Compressed);
    packet.lat = Some(lat);
    packet.lon = Some(lon);
    packet.symbol_table = Some(bytes[0] as char);
    packet.symbol_code = Some(bytes[9] as char);

    Ok(&body[COMPRESSED_LEN..])
}
