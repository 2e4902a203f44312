//! Packet decoding: header, body dispatch and the per-format decoders.
//!
//! Each decoder receives the single [`DecodedPacket`] being built for the
//! current line and fills in the fields of its format. When any stage fails
//! the partially filled record is thrown away and the caller gets a
//! [`ParseFailure`] holding only the raw line.

mod comment;
mod header;
mod message;
mod mic_e;
mod misc;
mod position;
mod telemetry;
mod weather;

use std::sync::Arc;
use tracing::{debug, trace};

use crate::config::ParseOptions;
use crate::error::{DecodeError, ParseFailure};
use crate::packet::DecodedPacket;
use crate::timestamp::{Clock, SystemClock};

/// Some clients send the Mic-E backtick as a typographic quote
const MIS_ENCODED_BACKTICK: char = '\u{2018}';
/// The same quote read back as Windows-1252
const MOJIBAKE_BACKTICK: &str = "\u{e2}\u{20ac}\u{2dc}";

/// Packet types that are recognised but not decoded
const UNSUPPORTED_FORMATS: &[(char, &str)] = &[
    ('#', "raw weather report"),
    ('$', "raw gps"),
    ('%', "agrelo"),
    ('&', "reserved"),
    ('(', "unused"),
    (')', "item report"),
    ('*', "complete weather report"),
    ('+', "reserved"),
    ('-', "unused"),
    ('.', "reserved"),
    ('<', "station capabilities"),
    ('?', "general query format"),
    ('T', "telemetry report"),
    ('[', "maidenhead locator beacon"),
    ('\\', "unused"),
    (']', "unused"),
    ('^', "unused"),
];

/// Decode one packet line with the system clock
pub fn parse(line: &str, options: &ParseOptions) -> Result<DecodedPacket, ParseFailure> {
    AprsParser::new(options.clone()).parse(line)
}

/// Reusable decoder holding options and the clock used for timestamps
#[derive(Clone)]
pub struct AprsParser {
    options: ParseOptions,
    clock: Arc<dyn Clock>,
}

impl Default for AprsParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl std::fmt::Debug for AprsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AprsParser")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl AprsParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            clock: Arc::new(SystemClock),
        }
    }

    /// Use `clock` instead of the system clock for date-less timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Decode one packet line (`FROM>TO,PATH:BODY`, CR/LF allowed)
    pub fn parse(&self, line: &str) -> Result<DecodedPacket, ParseFailure> {
        let result = self.decode(line, 0);

        match &result {
            Ok(packet) => {
                let format = packet.format.map(|f| f.as_str()).unwrap_or("none");
                metrics::counter!("aprs.parse.decoded_total", "format" => format).increment(1);
            }
            Err(failure) => {
                debug!(raw = %line.trim_end(), error = %failure.error, "Failed to decode packet");
                metrics::counter!("aprs.parse.failed_total", "error" => failure.error.kind())
                    .increment(1);
            }
        }

        result
    }

    fn decode(&self, line: &str, depth: usize) -> Result<DecodedPacket, ParseFailure> {
        let mut packet = DecodedPacket::with_raw(line);
        match self.decode_into(&mut packet, line, depth) {
            Ok(()) => Ok(packet),
            Err(error) => Err(ParseFailure::new(line, error)),
        }
    }

    fn decode_into(
        &self,
        packet: &mut DecodedPacket,
        line: &str,
        depth: usize,
    ) -> Result<(), DecodeError> {
        if line.is_empty() {
            return Err(DecodeError::EmptyPacket);
        }

        let line = line.trim_matches(|c| c == '\r' || c == '\n');
        let (head, body) = line.split_once(':').ok_or(DecodeError::MissingBody)?;

        header::decode(packet, head, &self.options)?;
        self.decode_body(packet, body, depth)
    }

    fn decode_body(
        &self,
        packet: &mut DecodedPacket,
        body: &str,
        depth: usize,
    ) -> Result<(), DecodeError> {
        let (packet_type, rest) = split_packet_type(body).ok_or(DecodeError::EmptyBody)?;

        if rest.is_empty() && packet_type != '>' {
            return Err(DecodeError::EmptyBody);
        }

        if let Some(&(discriminator, description)) =
            UNSUPPORTED_FORMATS.iter().find(|(c, _)| *c == packet_type)
        {
            return Err(DecodeError::UnsupportedFormat {
                discriminator,
                description,
            });
        }

        trace!(packet_type = %packet_type, "dispatching packet body");
        let clock = self.clock.as_ref();

        match packet_type {
            '}' => self.decode_third_party(packet, rest, depth),
            ',' => {
                misc::decode_invalid(packet, rest);
                Ok(())
            }
            '{' => {
                misc::decode_user_defined(packet, rest);
                Ok(())
            }
            '>' => misc::decode_status(packet, rest, clock),
            '`' | '\'' | MIS_ENCODED_BACKTICK => mic_e::decode(packet, rest),
            ':' => message::decode(packet, rest),
            '_' => weather::decode_positionless(packet, rest, clock),
            '!' | '=' | '/' | '@' | ';' => position::decode(packet, packet_type, rest, clock),
            _ => match rest.find('!') {
                Some(pos) if pos < 40 => position::decode(packet, packet_type, rest, clock),
                _ => {
                    misc::decode_invalid(packet, rest);
                    Ok(())
                }
            },
        }
    }

    fn decode_third_party(
        &self,
        packet: &mut DecodedPacket,
        inner: &str,
        depth: usize,
    ) -> Result<(), DecodeError> {
        let depth = depth + 1;
        if depth > self.options.max_third_party_depth {
            return Err(DecodeError::ThirdPartyTooDeep(self.options.max_third_party_depth));
        }

        packet.format = Some(crate::packet::PacketFormat::ThirdParty);
        let sub_packet = self.decode(inner, depth).map_err(|failure| failure.error)?;
        packet.sub_packet = Some(Box::new(sub_packet));

        Ok(())
    }
}

/// Split off the packet type character, folding the mojibake form of the
/// mis-encoded backtick into a single character
fn split_packet_type(body: &str) -> Option<(char, &str)> {
    if let Some(rest) = body.strip_prefix(MOJIBAKE_BACKTICK) {
        return Some((MIS_ENCODED_BACKTICK, rest));
    }

    let packet_type = body.chars().next()?;
    Some((packet_type, &body[packet_type.len_utf8()..]))
}
