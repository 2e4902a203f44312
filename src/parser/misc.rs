use crate::error::DecodeError;
use crate::packet::{DecodedPacket, PacketFormat};
use crate::patterns;
use crate::timestamp::{self, Clock};

const STATUS_TIMESTAMP: &str = r"^[0-9]{6}z";

/// Keep an undecodable body as-is
pub(super) fn decode_invalid(packet: &mut DecodedPacket, body: &str) {
    packet.format = Some(PacketFormat::Invalid);
    packet.body = Some(body.to_string());
}

/// `{` experimental data: user id, packet type, then free-form content
pub(super) fn decode_user_defined(packet: &mut DecodedPacket, body: &str) {
    let mut chars = body.chars();
    packet.format = Some(PacketFormat::UserDefined);
    packet.user_defined_id = chars.next();
    packet.user_defined_type = chars.next();
    packet.body = Some(chars.as_str().to_string());
}

/// Status text, optionally led by a `DDHHMMz` timestamp
pub(super) fn decode_status(
    packet: &mut DecodedPacket,
    body: &str,
    clock: &dyn Clock,
) -> Result<(), DecodeError> {
    packet.format = Some(PacketFormat::Status);

    let mut body = body;
    if patterns::get(STATUS_TIMESTAMP).is_match(body) {
        let (ts, rest) = timestamp::decode(body, clock)?;
        packet.raw_timestamp = Some(ts.raw);
        packet.timestamp = ts.epoch;
        body = rest;
    }

    packet.status = Some(body.trim_matches(' ').to_string());
    Ok(())
}
