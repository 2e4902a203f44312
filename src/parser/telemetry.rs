use crate::base91;
use crate::error::DecodeError;
use crate::packet::{DecodedPacket, PacketFormat, Telemetry, TelemetryDefs};
use crate::patterns;

const COMMENT_TELEMETRY: &str = r"^(.*?)\|([!-{]{4,14})\|(.*)$";
const DEFINITION: &str = r"^(PARM|UNIT|EQNS|BITS)\.(.*)$";
const COEFFICIENT: &str = r"^-?[0-9]*\.?[0-9]+$";
const BITS: &str = r"^([01]{8}),(.{0,23})$";

const CHANNEL_NAMES: usize = 13;
const MAX_NAME_LEN: usize = 20;

/// Strip `|ssvvvvvvvvvvbb|` base-91 telemetry from a comment
pub(super) fn decode_comment_telemetry(packet: &mut DecodedPacket, text: &str) -> String {
    let Some(caps) = patterns::get(COMMENT_TELEMETRY).captures(text) else {
        return text.to_string();
    };

    let data = &caps[2];
    if data.len() % 2 != 0 {
        return text.to_string();
    }

    // Sequence, five analog channels, digital bits
    let mut fields = [0u32; 7];
    for (field, pair) in fields.iter_mut().zip(data.as_bytes().chunks(2)) {
        let pair = std::str::from_utf8(pair).unwrap_or_default();
        *field = base91::decode(pair).unwrap_or(0) as u32;
    }

    let bits = (fields[6] != 0).then(|| {
        (0..8)
            .map(|i| if fields[6] & (1 << i) != 0 { '1' } else { '0' })
            .collect::<String>()
    });

    packet.telemetry = Some(Telemetry {
        seq: fields[0],
        values: [fields[1], fields[2], fields[3], fields[4], fields[5]],
        bits,
    });

    format!("{}{}", &caps[1], &caps[3])
}

/// Decode a `PARM.`/`UNIT.`/`EQNS.`/`BITS.` telemetry definition message.
///
/// Returns `Ok(false)` when the message text is not a definition.
pub(super) fn decode_definition(packet: &mut DecodedPacket, text: &str) -> Result<bool, DecodeError> {
    let Some(caps) = patterns::get(DEFINITION).captures(text) else {
        return Ok(false);
    };

    let kind = caps.get(1).map_or("", |m| m.as_str());
    let values = caps[2].trim_end_matches(' ');
    let mut defs = TelemetryDefs::default();

    match kind {
        "PARM" | "UNIT" => {
            let names = channel_names(kind, values)?;
            if kind == "PARM" {
                defs.parm_names = Some(names);
            } else {
                defs.unit_names = Some(names);
            }
        }
        "EQNS" => defs.eqns = Some(equations(values)?),
        _ => {
            let bits = patterns::get(BITS).captures(values).ok_or_else(|| {
                DecodeError::InvalidTelemetryConfig(format!("incorrect format of {kind} (title too long?)"))
            })?;
            defs.bits_mask = Some(bits[1].to_string());
            defs.title = Some(bits[2].trim_matches(' ').to_string());
        }
    }

    packet.format = Some(PacketFormat::TelemetryMessage);
    packet.telemetry_defs = Some(defs);
    Ok(true)
}

fn channel_names(kind: &str, values: &str) -> Result<Vec<String>, DecodeError> {
    let mut names: Vec<String> = values
        .split(',')
        .take(CHANNEL_NAMES)
        .map(str::to_string)
        .collect();

    if names.iter().any(|name| name.chars().count() > MAX_NAME_LEN) {
        return Err(DecodeError::InvalidTelemetryConfig(format!(
            "incorrect format of {kind} (name too long?)"
        )));
    }

    names.resize(CHANNEL_NAMES, String::new());
    Ok(names)
}

/// Parse up to 15 coefficients into five `[a, b, c]` groups. Missing or empty
/// values keep the identity equation `0·x² + 1·x + 0`.
fn equations(values: &str) -> Result<[[f64; 3]; 5], DecodeError> {
    let mut eqns = [[0.0, 1.0, 0.0]; 5];

    for (idx, value) in values.split(',').take(15).enumerate() {
        if value.is_empty() {
            continue;
        }
        if !patterns::get(COEFFICIENT).is_match(value) {
            return Err(DecodeError::InvalidTelemetryConfig(format!(
                "value at {} is not a number in EQNS",
                idx + 1
            )));
        }
        eqns[idx / 3][idx % 3] = value.parse().unwrap_or(0.0);
    }

    Ok(eqns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_telemetry() {
        let mut packet = DecodedPacket::default();
        let rest = decode_comment_telemetry(&mut packet, "Solar |!\"!#!$!%!&'N| station");
        assert_eq!(rest, "Solar  station");

        let telemetry = packet.telemetry.expect("telemetry");
        assert_eq!(telemetry.seq, 1);
        assert_eq!(telemetry.values, [2, 3, 4, 5, 6 * 91 + 45]);
        assert_eq!(telemetry.bits, None);
    }

    #[test]
    fn test_comment_telemetry_with_bits() {
        let mut packet = DecodedPacket::default();
        decode_comment_telemetry(&mut packet, "|!!!!!!!!!!!!\"'|");
        let telemetry = packet.telemetry.expect("telemetry");
        // 1 * 91 + 6 = 97 = 0b0110_0001, least significant bit first
        assert_eq!(telemetry.bits.as_deref(), Some("10000110"));
    }

    #[test]
    fn test_short_comment_telemetry() {
        let mut packet = DecodedPacket::default();
        decode_comment_telemetry(&mut packet, "|#$%&|");
        let telemetry = packet.telemetry.expect("telemetry");
        assert_eq!(telemetry.seq, 2 * 91 + 3);
        assert_eq!(telemetry.values, [4 * 91 + 5, 0, 0, 0, 0]);
    }

    #[test]
    fn test_odd_length_telemetry_is_left_alone() {
        let mut packet = DecodedPacket::default();
        assert_eq!(decode_comment_telemetry(&mut packet, "|!!!!!|"), "|!!!!!|");
        assert!(packet.telemetry.is_none());
    }

    #[test]
    fn test_parm_and_unit() {
        let mut packet = DecodedPacket::default();
        assert!(decode_definition(&mut packet, "PARM.Vbat,Temp,Light,,Door  ").unwrap());
        assert_eq!(packet.format, Some(PacketFormat::TelemetryMessage));

        let defs = packet.telemetry_defs.expect("definitions");
        let names = defs.parm_names.expect("names");
        assert_eq!(names.len(), 13);
        assert_eq!(&names[..5], ["Vbat", "Temp", "Light", "", "Door"]);
        assert!(names[5..].iter().all(String::is_empty));
        assert!(defs.unit_names.is_none());

        let mut packet = DecodedPacket::default();
        assert!(decode_definition(&mut packet, "UNIT.V,deg.C").unwrap());
        let units = packet.telemetry_defs.unwrap().unit_names.unwrap();
        assert_eq!(&units[..2], ["V", "deg.C"]);
    }

    #[test]
    fn test_name_too_long() {
        let mut packet = DecodedPacket::default();
        let err = decode_definition(&mut packet, "PARM.ThisNameIsWayTooLongForAChannel").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidTelemetryConfig(_)));
    }

    #[test]
    fn test_equations() {
        let mut packet = DecodedPacket::default();
        assert!(decode_definition(&mut packet, "EQNS.0,2.5,-10,,,,0,.5,3").unwrap());
        let eqns = packet.telemetry_defs.unwrap().eqns.unwrap();
        assert_eq!(eqns[0], [0.0, 2.5, -10.0]);
        assert_eq!(eqns[1], [0.0, 1.0, 0.0]);
        assert_eq!(eqns[2], [0.0, 0.5, 3.0]);
        assert_eq!(eqns[4], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_equation_not_a_number() {
        let mut packet = DecodedPacket::default();
        let err = decode_definition(&mut packet, "EQNS.0,x,0").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidTelemetryConfig("value at 2 is not a number in EQNS".to_string())
        );
    }

    #[test]
    fn test_bits() {
        let mut packet = DecodedPacket::default();
        assert!(decode_definition(&mut packet, "BITS.10110000,Weather station ").unwrap());
        let defs = packet.telemetry_defs.unwrap();
        assert_eq!(defs.bits_mask.as_deref(), Some("10110000"));
        assert_eq!(defs.title.as_deref(), Some("Weather station"));

        let mut packet = DecodedPacket::default();
        assert!(decode_definition(&mut packet, "BITS.1011,title").is_err());
    }

    #[test]
    fn test_not_a_definition() {
        let mut packet = DecodedPacket::default();
        assert!(!decode_definition(&mut packet, "Hello PARM.").unwrap());
        assert!(packet.format.is_none());
    }
}
