//! Messages, bulletins, announcements, acks/rejects and telemetry
//! definitions (`:ADDRESSEE:text`).

use super::telemetry;
use crate::error::DecodeError;
use crate::packet::{DecodedPacket, PacketFormat, Response};
use crate::patterns;

const BULLETIN: &str = r"(?i)^BLN([0-9])([a-z0-9_ \-]{5}):(.{0,67})";
const ANNOUNCEMENT: &str = r"^BLN([A-Z])([a-zA-Z0-9_ \-]{5}):(.{0,67})";
const ADDRESSED: &str = r"^([a-zA-Z0-9_ \-]{9}):(.*)$";

/// `ackMM}AA` / `rejMM}AA`
const REPLY_ACK: &str = r"^(ack|rej)([A-Za-z0-9]{2})\}([A-Za-z0-9]{2})?$";
/// `ack12345` / `rej12345`
const LEGACY_ACK: &str = r"^(ack|rej)([A-Za-z0-9]{1,5})$";
/// `text{MM}AA`
const REPLY_ACK_MSG_NO: &str = r"\{([A-Za-z0-9]{2})\}([A-Za-z0-9]{2})?$";
/// `text{12345`
const MSG_NO: &str = r"\{([A-Za-z0-9]{1,5})$";

/// Decode a `:` body. Anything not addressed to a 9-character addressee is
/// accepted with no format.
pub(super) fn decode(packet: &mut DecodedPacket, body: &str) -> Result<(), DecodeError> {
    if let Some(caps) = patterns::get(BULLETIN).captures(body) {
        let identifier = caps[2].trim_end_matches(' ');
        packet.format = Some(if identifier.is_empty() {
            PacketFormat::Bulletin
        } else {
            PacketFormat::GroupBulletin
        });
        packet.message_text = Some(caps[3].trim_matches(' ').to_string());
        packet.bulletin_id = Some(caps[1].to_string());
        packet.group_identifier = (!identifier.is_empty()).then(|| identifier.to_string());
        return Ok(());
    }

    if let Some(caps) = patterns::get(ANNOUNCEMENT).captures(body) {
        let identifier = caps[2].trim_end_matches(' ');
        packet.format = Some(PacketFormat::Announcement);
        packet.message_text = Some(caps[3].trim_matches(' ').to_string());
        packet.announcement_id = Some(caps[1].to_string());
        packet.group_identifier = (!identifier.is_empty()).then(|| identifier.to_string());
        return Ok(());
    }

    let Some(caps) = patterns::get(ADDRESSED).captures(body) else {
        return Ok(());
    };
    packet.addressee = Some(caps[1].trim_end_matches(' ').to_string());
    let text = caps.get(2).map_or("", |m| m.as_str());

    // Telemetry definitions are addressed to the station that sends them
    if telemetry::decode_definition(packet, text)? {
        return Ok(());
    }

    packet.format = Some(PacketFormat::Message);
    decode_text(packet, text);
    Ok(())
}

fn decode_text(packet: &mut DecodedPacket, text: &str) {
    if let Some(caps) = patterns::get(REPLY_ACK).captures(text) {
        packet.response = Response::from_tag(&caps[1]);
        packet.msg_no = Some(caps[2].to_string());
        packet.ack_msg_no = caps.get(3).map(|m| m.as_str().to_string());
        return;
    }

    if let Some(caps) = patterns::get(LEGACY_ACK).captures(text) {
        packet.response = Response::from_tag(&caps[1]);
        packet.msg_no = Some(caps[2].to_string());
        return;
    }

    let tagged = patterns::get(REPLY_ACK_MSG_NO)
        .captures(text)
        .or_else(|| patterns::get(MSG_NO).captures(text));

    let text = match tagged {
        Some(caps) => {
            packet.msg_no = Some(caps[1].to_string());
            packet.ack_msg_no = caps.get(2).map(|m| m.as_str().to_string());
            let start = caps.get(0).map_or(text.len(), |m| m.start());
            &text[..start]
        }
        None => text,
    };

    packet.message_text = Some(text.trim_matches(' ').to_string());
}
