/// End-to-end decoding of complete APRS-IS lines
///
/// Each case feeds a full `FROM>TO,PATH:BODY` line through the public parser
/// and checks the fields a downstream consumer would read.
mod common;

#[cfg(test)]
mod packet_decoding_tests {
    use super::common::{assert_close, decode, parser, parser_with};
    use aprs_parser::packet::Response;
    use aprs_parser::{DecodeError, PacketFormat, ParseOptions};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_uncompressed_position_line() {
        let packet = decode("N0CALL>APRS,WIDE1-1,qAR,IGATE:!4903.50N/07201.75W-Test 001234\r\n")
            .expect("Failed to parse position");

        assert_eq!(packet.from, "N0CALL");
        assert_eq!(packet.to, "APRS");
        assert_eq!(packet.path, vec!["WIDE1-1", "qAR", "IGATE"]);
        assert_eq!(packet.format, Some(PacketFormat::Uncompressed));
        assert_close(packet.lat, 49.058333);
        assert_close(packet.lon, -72.029166);
        assert_eq!(packet.symbol(), Some(('/', '-')));
        assert_eq!(packet.comment, "Test 001234");
        assert_eq!(packet.raw, "N0CALL>APRS,WIDE1-1,qAR,IGATE:!4903.50N/07201.75W-Test 001234\r\n");
    }

    #[test]
    fn test_compressed_position_line() {
        let packet = decode("N0CALL>APRS:=/5L!!<*e7>7P[Compressed")
            .expect("Failed to parse compressed position");

        assert_eq!(packet.format, Some(PacketFormat::Compressed));
        assert!(packet.message_capable);
        assert_close(packet.lat, 49.5);
        assert_close(packet.lon, -72.75);
        assert_close(packet.course, 88.0);
        assert_eq!(packet.comment, "Compressed");
    }

    #[test]
    fn test_mic_e_line() {
        let packet = decode("N0CALL-9>S32U6T,WIDE1-1:`vCD\"&P>/\"4T}Hello world")
            .expect("Failed to parse Mic-E");

        assert_eq!(packet.format, Some(PacketFormat::MicE));
        assert_close(packet.lat, 33.0 + 25.64 / 60.0);
        assert_close(packet.lon, -(90.0 + 39.40 / 60.0));
        assert_close(packet.speed, 61.0 * 1.852);
        assert_close(packet.course, 52.0);
        assert_close(packet.altitude, 61.0);
        assert_eq!(packet.mic_e_message.as_deref(), Some("M3: Returning"));
        assert_eq!(packet.comment, "Hello world");
    }

    #[test]
    fn test_mis_encoded_mic_e_backtick() {
        let plain = decode("N0CALL-9>S32U6T:`vCD\"&P>/").unwrap();
        let quoted = decode("N0CALL-9>S32U6T:\u{2018}vCD\"&P>/").unwrap();
        let mojibake = decode("N0CALL-9>S32U6T:\u{e2}\u{20ac}\u{2dc}vCD\"&P>/").unwrap();

        assert_eq!(quoted.format, Some(PacketFormat::MicE));
        assert_eq!(quoted.position(), plain.position());
        assert_eq!(mojibake.position(), plain.position());
    }

    #[test]
    fn test_object_line() {
        let packet = decode("N0CALL>APRS:;LEADER   *092345z4903.50N/07201.75W>088/036Convoy")
            .expect("Failed to parse object");

        assert_eq!(packet.format, Some(PacketFormat::Object));
        assert_eq!(packet.object_format, Some(PacketFormat::Uncompressed));
        assert_eq!(packet.object_name.as_deref(), Some("LEADER   "));
        assert_eq!(packet.object_alive, Some(true));
        assert_eq!(packet.raw_timestamp.as_deref(), Some("092345z"));
        assert_eq!(
            packet.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 9, 23, 0, 0).unwrap().timestamp()
        );
        assert_eq!(packet.comment, "Convoy");
    }

    #[test]
    fn test_weather_lines() {
        let packet = decode("N0CALL>APRS:_10090556c220s004g005t077r000p000P000h50b09900wRSW")
            .expect("Failed to parse positionless weather");
        assert_eq!(packet.format, Some(PacketFormat::Weather));
        let weather = packet.weather.expect("weather");
        assert_close(weather.wind_direction, 220.0);
        assert_close(weather.temperature, 25.0);

        let packet = decode("N0CALL>APRS:@092345z4903.50N/07201.75W_220/004g005t077h00b10132")
            .expect("Failed to parse weather station position");
        assert_eq!(packet.format, Some(PacketFormat::Uncompressed));
        assert_close(packet.course, 220.0);
        let weather = packet.weather.expect("weather");
        assert_close(weather.humidity, 100.0);
        assert_close(weather.pressure, 1013.2);
    }

    #[test]
    fn test_message_lines() {
        let packet = decode("N0CALL>APRS::KB1ABC-7 :Meet at the club{042").unwrap();
        assert_eq!(packet.format, Some(PacketFormat::Message));
        assert_eq!(packet.addressee.as_deref(), Some("KB1ABC-7"));
        assert_eq!(packet.message_text.as_deref(), Some("Meet at the club"));
        assert_eq!(packet.msg_no.as_deref(), Some("042"));

        let packet = decode("KB1ABC-7>APRS::N0CALL   :ack042").unwrap();
        assert_eq!(packet.response, Some(Response::Ack));
        assert_eq!(packet.msg_no.as_deref(), Some("042"));

        let packet = decode("N0CALL>APRS::BLN1     :Field day").unwrap();
        assert_eq!(packet.format, Some(PacketFormat::Bulletin));
    }

    #[test]
    fn test_status_line() {
        let packet = decode("N0CALL>APRS:>141530zMonitoring 146.52").unwrap();
        assert_eq!(packet.format, Some(PacketFormat::Status));
        assert_eq!(packet.status.as_deref(), Some("Monitoring 146.52"));
        assert_eq!(
            packet.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn test_third_party_matches_inner_packet() {
        let inner = "N0CALL>APRS,TCPIP,N1GATE*:!4903.50N/07201.75W-Relayed";
        let outer = format!("N1GATE>APRS,WIDE2-1:}}{}", inner);

        let wrapped = decode(&outer).expect("Failed to parse third-party packet");
        assert_eq!(wrapped.format, Some(PacketFormat::ThirdParty));
        assert_eq!(wrapped.from, "N1GATE");

        let direct = decode(inner).unwrap();
        assert_eq!(wrapped.sub_packet.as_deref(), Some(&direct));
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let lines = [
            "N0CALL>APRS:/092345z4903.50N/07201.75W>088/036",
            "N0CALL>APRS:_10090556c220s004g005t077",
            "N0CALL-9>S32U6T:`vCD\"&P>/'0a1b2c3d4e",
        ];

        let parser = parser();
        for line in lines {
            assert_eq!(parser.parse(line), parser.parse(line), "line: {line}");
        }
    }

    #[test]
    fn test_destination_validation_option() {
        let line = "FLRDDA5BA>OGFLARM,qAS,LFNM:/074548h4415.61N/00531.90E'342/049";
        assert!(decode(line).is_err());

        let options = ParseOptions {
            disable_destination_callsign_validation: true,
            ..Default::default()
        };
        let packet = parser_with(options).parse(line).unwrap();
        assert_eq!(packet.to, "OGFLARM");
        assert_eq!(packet.raw_timestamp.as_deref(), Some("074548h"));
    }

    #[test]
    fn test_sender_needs_a_callsign_before_the_ssid() {
        let failure = decode("-AB>APRS:>hi").unwrap_err();
        assert_eq!(
            failure.error,
            DecodeError::InvalidHeader(aprs_parser::error::HeaderError::InvalidSource)
        );
    }

    #[test]
    fn test_failure_reports_raw_line() {
        let failure = decode("N0CALL>APRS:!9903.50N/07201.75W-").unwrap_err();
        assert_eq!(failure.packet.raw, "N0CALL>APRS:!9903.50N/07201.75W-");
        assert!(failure.packet.format.is_none());
        assert!(matches!(failure.error, DecodeError::InvalidPosition(_)));
    }

    #[test]
    fn test_serializes_as_camel_case_json() {
        let packet = decode("N0CALL>APRS:=4903.50N/07201.75W-").unwrap();
        let json = serde_json::to_value(&packet).unwrap();
        assert_eq!(json["format"], "uncompressed");
        assert_eq!(json["messageCapable"], true);
        assert_eq!(json["from"], "N0CALL");
    }
}
