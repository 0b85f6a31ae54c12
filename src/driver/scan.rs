//! Parsing of the lines output while scanning

use crate::hex::{self, MalformedPayload};
use crate::{MacAddress, Peripheral};

/// Parse one line of a scan
///
/// A line is `<address>,<address type>,<name>,<reserved>,<rssi>` where the address is twelve
/// hexadecimal characters, the address type is `0` for a public address or `1` for a random
/// address, and the RSSI is a signed 8 bit value in hexadecimal. The reserved field is where the
/// module may put the advertised services, it is not parsed.
///
/// ```
/// # use rn4020::driver::scan::parse_scan_line;
/// let peripheral = parse_scan_line("001122AABBCC,0,MyDevice,,C8").unwrap();
///
/// assert_eq!("00:11:22:AA:BB:CC", peripheral.address().to_string());
/// assert_eq!("MyDevice", peripheral.name());
/// assert_eq!(-56, peripheral.rssi());
/// ```
pub fn parse_scan_line(line: &str) -> Result<Peripheral, MalformedPayload> {
    let malformed = || MalformedPayload(line.to_string());

    let mut fields = line.splitn(5, ',');

    let address = fields
        .next()
        .filter(|field| field.len() == MacAddress::HEX_LEN)
        .ok_or_else(malformed)
        .and_then(MacAddress::decode)?;

    let is_random_address = match fields.next() {
        Some("0") => false,
        Some("1") => true,
        _ => return Err(malformed()),
    };

    let name = fields.next().ok_or_else(malformed)?;

    let _reserved = fields.next().ok_or_else(malformed)?;

    let rssi = fields.next().ok_or_else(malformed).and_then(decode_rssi)?;

    Ok(Peripheral::new(address, is_random_address)
        .with_name(name)
        .with_rssi(rssi))
}

/// Decode a signal strength
///
/// The module outputs the RSSI either as the two's complement byte (`C8`) or as a negative
/// hexadecimal number (`-38`), both are -56 dBm.
pub fn decode_rssi(text: &str) -> Result<i8, MalformedPayload> {
    let text = text.trim();

    match text.strip_prefix('-') {
        Some(magnitude) => hex::decode_hex8(magnitude)
            .ok()
            .and_then(|m| 0i16.checked_sub(m as i16))
            .and_then(|v| i8::try_from(v).ok())
            .ok_or_else(|| MalformedPayload(text.to_string())),
        None => hex::decode_hex8(text).map(|v| v as i8),
    }
}
