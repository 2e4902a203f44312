//! Weather reports, both positionless (`_MMDDHHMM...`) and the data that
//! follows a position with the weather station symbol.

use crate::error::DecodeError;
use crate::packet::{DecodedPacket, PacketFormat, Weather};
use crate::patterns;
use crate::timestamp::{self, Clock};

const POSITIONLESS: &str = r"^([0-9]{8})c[. 0-9]{3}s[. 0-9]{3}g[. 0-9]{3}t[. 0-9]{3}";
const WIND: &str = r"^([0-9]{3})/([0-9]{3})";
const TOKEN: &str = r"^(?:[cSgtrpPlLs#][0-9\-. ]{3}|h[0-9. ]{2}|b[0-9. ]{5})";
const WELL_FORMED: &str =
    r"^(?:[cSgtrpPlLs#][0-9]{3}|t-[0-9]{2}|h[0-9]{2}|b[0-9]{5}|s\.[0-9]{2}|s[0-9]\.[0-9])$";

const MPH_TO_MS: f64 = 0.44704;
/// Hundredths of an inch to millimetres
const RAIN_TO_MM: f64 = 0.254;
const INCHES_TO_MM: f64 = 25.4;

/// Decode a positionless weather report
pub(super) fn decode_positionless(
    packet: &mut DecodedPacket,
    body: &str,
    clock: &dyn Clock,
) -> Result<(), DecodeError> {
    let caps = patterns::get(POSITIONLESS)
        .captures(body)
        .ok_or(DecodeError::InvalidWeatherFormat)?;

    let digits = &caps[1];
    packet.raw_timestamp = Some(digits.to_string());
    packet.timestamp = timestamp::decode_month_day(digits, clock);

    let rest = decode_data(packet, &body[8..]);
    packet.comment = rest.trim_matches(' ').to_string();
    packet.format = Some(PacketFormat::Weather);

    Ok(())
}

/// Consume the leading run of weather tokens and return what follows
pub(super) fn decode_data(packet: &mut DecodedPacket, body: &str) -> String {
    let body = normalize_wind(body);
    let mut weather = packet.weather.take().unwrap_or_default();
    let mut rest = body.as_str();

    while let Some(token) = patterns::get(TOKEN).find(rest) {
        let token = token.as_str();
        rest = &rest[token.len()..];

        if !patterns::get(WELL_FORMED).is_match(token) {
            continue;
        }
        let (key, value) = token.split_at(1);
        apply(&mut weather, key, value);
    }

    if !weather.is_empty() {
        packet.weather = Some(weather);
    }
    rest.to_string()
}

/// `ddd/ddd` is wind direction and speed; a `c` token followed by `s` means
/// wind speed rather than snow
fn normalize_wind(body: &str) -> String {
    if let Some(caps) = patterns::get(WIND).captures(body) {
        return format!("c{}S{}{}", &caps[1], &caps[2], &body[7..]);
    }

    if body.starts_with('c') && body.get(4..5) == Some("s") {
        return format!("{}S{}", &body[..4], &body[5..]);
    }

    body.to_string()
}

fn apply(weather: &mut Weather, key: &str, value: &str) {
    let Ok(number) = value.parse::<f64>() else {
        return;
    };

    match key {
        "c" => weather.wind_direction = Some(number),
        "S" => weather.wind_speed = Some(number * MPH_TO_MS),
        "g" => weather.wind_gust = Some(number * MPH_TO_MS),
        "t" => weather.temperature = Some((number - 32.0) / 1.8),
        "r" => weather.rain_1h = Some(number * RAIN_TO_MM),
        "p" => weather.rain_24h = Some(number * RAIN_TO_MM),
        "P" => weather.rain_since_midnight = Some(number * RAIN_TO_MM),
        // 00 is how stations send 100%
        "h" => weather.humidity = Some(if number == 0.0 { 100.0 } else { number }),
        "b" => weather.pressure = Some(number / 10.0),
        "l" => weather.luminosity = Some(number + 1000.0),
        "L" => weather.luminosity = Some(number),
        "s" => weather.snow = Some(number * INCHES_TO_MM),
        "#" => weather.rain_raw = Some(number),
        _ => {}
    }
}
