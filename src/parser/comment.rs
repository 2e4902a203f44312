//! Comment field extensions: course/speed, direction finding, PHG, range,
//! altitude and DAO. Whatever is left over becomes the free-text comment.

use super::telemetry;
use crate::base91;
use crate::packet::{DecodedPacket, Directivity, Phg};
use crate::patterns;

const COURSE_SPEED: &str = r"^([0-9 .]{3})/([0-9 .]{3})";
const BEARING_NRQ: &str = r"^/([0-9 .]{3})/([0-9 .]{3})";
const PHG: &str = r"^PHG([0-9][\x30-\x7e][0-9]{2})([0-9A-Z]/)?";
const RNG: &str = r"^RNG([0-9]{4})";
const ALTITUDE: &str = r"^(.*?)/A=(-[0-9]{5}|[0-9]{6})(.*)$";
const DAO: &str = r"^(.*)!([\x21-\x7b])([\x20-\x7b]{2})!(.*?)$";

const FEET_TO_METERS: f64 = 0.3048;
const KNOTS_TO_KMH: f64 = 1.852;
const MILES_TO_KM: f64 = 1.609344;

/// Run the full comment pipeline and store the remaining text
pub(super) fn decode(packet: &mut DecodedPacket, body: &str) {
    let body = decode_data_extensions(packet, body);
    let body = decode_altitude(packet, body);
    let body = telemetry::decode_comment_telemetry(packet, &body);
    let body = decode_dao(packet, &body);

    let body = body.strip_prefix('/').unwrap_or(&body);
    packet.comment = body.trim_matches(' ').to_string();
}

/// Decode a leading data extension: `CSE/SPD` (optionally followed by
/// `/BRG/NRQ`), `PHGphgd[r/]` or `RNGrrrr`
pub(super) fn decode_data_extensions<'a>(packet: &mut DecodedPacket, body: &'a str) -> &'a str {
    if let Some(caps) = patterns::get(COURSE_SPEED).captures(body) {
        let course = caps.get(1).map_or("", |m| m.as_str());
        let speed = caps.get(2).map_or("", |m| m.as_str());
        let mut rest = &body[7..];

        if let Some(value) = digits(course).filter(|_| course != "000") {
            packet.course = (1..=360).contains(&value).then_some(f64::from(value));
        }
        if let Some(value) = digits(speed).filter(|_| speed != "000") {
            packet.speed = Some(f64::from(value) * KNOTS_TO_KMH);
        }

        if let Some(df) = patterns::get(BEARING_NRQ).captures(rest) {
            // 000 marks a fixed direction-finding station
            if course == "000" {
                packet.course = Some(0.0);
            }
            packet.bearing = digits(&df[1]);
            packet.nrq = digits(&df[2]);
            rest = &rest[8..];
        }

        return rest;
    }

    if let Some(caps) = patterns::get(PHG).captures(body) {
        let end = caps.get(0).map_or(0, |m| m.end());
        let rate = caps.get(2).and_then(|m| m.as_str().chars().next());
        packet.phg = Some(power_height_gain(&caps[1], rate));
        return &body[end..];
    }

    if let Some(caps) = patterns::get(RNG).captures(body) {
        if let Some(miles) = digits(&caps[1]) {
            packet.range = Some(f64::from(miles) * MILES_TO_KM);
        }
        return &body[7..];
    }

    body
}

fn power_height_gain(phg: &str, rate: Option<char>) -> Phg {
    let digit = |i: usize| f64::from(phg.as_bytes()[i].wrapping_sub(b'0'));

    let power = digit(0).powi(2);
    // Height digit may run past 9: ':' is 10, ';' is 11 and so on
    let height = 10.0 * 2f64.powf(digit(1)) * FEET_TO_METERS;
    let gain = 10f64.powf(digit(2) / 10.0);
    let directivity = match phg.as_bytes()[3] {
        b'0' => Directivity::Omni,
        b'9' => Directivity::Invalid,
        d => Directivity::Degrees(45 * u16::from(d - b'0')),
    };
    let range = (2.0 * (height / FEET_TO_METERS) * ((power / 10.0) * (gain / 2.0)).sqrt()).sqrt()
        * 1.60934;

    let mut raw = phg.to_string();
    if let Some(r) = rate {
        raw.push(r);
    }

    Phg {
        raw,
        power,
        height,
        gain,
        directivity,
        range,
        rate: rate.and_then(|r| r.to_digit(16)).map(|r| r as u8),
    }
}

/// Strip the first `/A=nnnnnn` altitude tag (feet) from anywhere in the comment
pub(super) fn decode_altitude(packet: &mut DecodedPacket, body: &str) -> String {
    let Some(caps) = patterns::get(ALTITUDE).captures(body) else {
        return body.to_string();
    };

    if let Ok(feet) = caps[2].parse::<i32>() {
        packet.altitude = Some(f64::from(feet) * FEET_TO_METERS);
    }
    format!("{}{}", &caps[1], &caps[3])
}

/// Strip the last `!DAO!` precision tag and apply its offsets to the position
pub(super) fn decode_dao(packet: &mut DecodedPacket, body: &str) -> String {
    let Some(caps) = patterns::get(DAO).captures(body) else {
        return body.to_string();
    };

    let datum = caps[2].chars().next().unwrap_or_default();
    let dao = &caps[3];
    packet.dao_datum = Some(datum.to_ascii_uppercase());

    let (lat_offset, lon_offset) = match datum {
        // Human readable: one extra decimal digit of minutes each
        'W' if dao.bytes().all(|b| b.is_ascii_digit()) => {
            let b = dao.as_bytes();
            (
                f64::from(b[0] - b'0') * 0.001 / 60.0,
                f64::from(b[1] - b'0') * 0.001 / 60.0,
            )
        }
        // Base-91: one character each, 1/91 of 0.01 minute steps
        'w' if !dao.contains(' ') => {
            let lat = base91::decode(&dao[..1]).unwrap_or(0) as f64;
            let lon = base91::decode(&dao[1..]).unwrap_or(0) as f64;
            (lat / 91.0 * 0.01 / 60.0, lon / 91.0 * 0.01 / 60.0)
        }
        _ => (0.0, 0.0),
    };

    if let Some(lat) = packet.lat.as_mut() {
        *lat += lat_offset.copysign(*lat);
    }
    if let Some(lon) = packet.lon.as_mut() {
        *lon += lon_offset.copysign(*lon);
    }

    format!("{}{}", &caps[1], &caps[4])
}

/// Parse a field that must be all ASCII digits
fn digits(field: &str) -> Option<u16> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
