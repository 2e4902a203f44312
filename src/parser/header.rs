use crate::callsign::{is_valid_callsign, is_valid_source};
use crate::config::ParseOptions;
use crate::error::HeaderError;
use crate::packet::DecodedPacket;

/// Decode `FROM>TO,PATH1,PATH2` into source, destination and path
pub(super) fn decode(
    packet: &mut DecodedPacket,
    head: &str,
    options: &ParseOptions,
) -> Result<(), HeaderError> {
    let (from, path) = head.split_once('>').ok_or(HeaderError::MissingSeparator)?;

    if !is_valid_source(from) {
        return Err(HeaderError::InvalidSource);
    }

    let mut elements = path.split(',');
    let to = elements
        .next()
        .filter(|to| !to.is_empty())
        .ok_or(HeaderError::MissingDestination)?;

    if !options.disable_destination_callsign_validation && !is_valid_callsign(to) {
        return Err(HeaderError::InvalidDestination);
    }

    let path: Vec<String> = elements
        .filter(|element| !element.trim().is_empty())
        .map(|element| {
            if is_valid_path_element(element) {
                Ok(element.to_string())
            } else {
                Err(HeaderError::InvalidPath)
            }
        })
        .collect::<Result<_, _>>()?;

    packet.from = from.to_string();
    packet.to = to.to_string();
    packet.path = path;

    Ok(())
}

/// `^[A-Za-z0-9-]{1,9}\*?$`
fn is_valid_path_element(element: &str) -> bool {
    let call = element.strip_suffix('*').unwrap_or(element);
    (1..=9).contains(&call.len())
        && call.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
