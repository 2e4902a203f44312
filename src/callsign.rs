//! Callsign grammar checks and the APRS-IS login passcode.

/// Hash seed for the APRS-IS passcode
const PASSCODE_SEED: u16 = 0x73e2;

/// Check a station callsign against `^[A-Za-z0-9]{1,6}(-[0-9]{1,2})?$`
pub fn is_valid_callsign(callsign: &str) -> bool {
    let (base, ssid) = match callsign.split_once('-') {
        Some((base, ssid)) => (base, Some(ssid)),
        None => (callsign, None),
    };

    let base_ok = (1..=6).contains(&base.len()) && base.bytes().all(|b| b.is_ascii_alphanumeric());
    let ssid_ok = match ssid {
        Some(ssid) => (1..=2).contains(&ssid.len()) && ssid.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    };

    base_ok && ssid_ok
}

/// Check an APRS source callsign: at most 9 characters in total, a non-empty
/// alphanumeric base and an optional alphanumeric SSID of up to 8 characters.
pub(crate) fn is_valid_source(callsign: &str) -> bool {
    if !(1..=9).contains(&callsign.len()) {
        return false;
    }

    let (base, ssid) = match callsign.split_once('-') {
        Some((base, ssid)) => (base, Some(ssid)),
        None => (callsign, None),
    };

    !base.is_empty()
        && base.bytes().all(|b| b.is_ascii_alphanumeric())
        && ssid.is_none_or(|s| (1..=8).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// Compute the APRS-IS passcode for a callsign. The SSID is ignored.
pub fn passcode(callsign: &str) -> u16 {
    let root = callsign.split('-').next().unwrap_or_default();
    let root: Vec<u8> = root.bytes().take(8).map(|b| b.to_ascii_uppercase()).collect();

    let mut hash = PASSCODE_SEED;
    for pair in root.chunks_exact(2) {
        hash ^= u16::from(pair[0]) << 8;
        hash ^= u16::from(pair[1]);
    }

    hash & 0x7fff
}
