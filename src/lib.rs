//! APRS packet decoding library
//!
//! Turns one line of APRS / APRS-IS text (`FROM>TO,PATH:BODY`) into a
//! [`DecodedPacket`]: uncompressed and compressed positions, objects, Mic-E,
//! weather, comment telemetry, messages, bulletins, status and third-party
//! traffic. Decoding never panics; every failure comes back as a
//! [`ParseFailure`] carrying the raw line and the reason.
//!
//! ```
//! use aprs_parser::{parse, PacketFormat, ParseOptions};
//!
//! let packet = parse("N0CALL>APRS,WIDE1-1:!4903.50N/07201.75W-Test", &ParseOptions::default())
//!     .expect("valid packet");
//! assert_eq!(packet.format, Some(PacketFormat::Uncompressed));
//! assert_eq!(packet.comment, "Test");
//! ```

pub mod base91;
pub mod callsign;
pub mod config;
pub mod distance;
pub mod error;
pub mod packet;
pub mod parser;
mod patterns;
pub mod timestamp;

pub use config::ParseOptions;
pub use error::{DecodeError, ParseFailure};
pub use packet::{DecodedPacket, PacketFormat};
pub use parser::{AprsParser, parse};
pub use timestamp::{Clock, FixedClock, SystemClock};
