//! Bluetooth device (MAC) address

use crate::hex::{self, HexInt, MalformedPayload};
use core::fmt;

/// A six byte Bluetooth device address
///
/// The bytes are kept in the order they are written on the wire, so the first byte is the most
/// significant octet of the address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// The number of hexadecimal characters of an unseparated address
    pub const HEX_LEN: usize = 12;

    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }

    /// Create an address from the lower 48 bits of `v`
    pub fn from_u64(v: u64) -> Self {
        let mut bytes = [0u8; 6];

        bytes.copy_from_slice(&v.to_be_bytes()[2..]);

        MacAddress(bytes)
    }

    /// Get the address as a zero extended 48 bit value
    pub fn as_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |v, b| v << 8 | *b as u64)
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Encode the address as hexadecimal octets
    ///
    /// When `separator` is `Some` it is placed between each of the six octets, otherwise the
    /// octets are concatenated into twelve characters.
    pub fn encode(&self, separator: Option<char>) -> String {
        let mut s = String::with_capacity(17);

        for (i, b) in self.0.iter().enumerate() {
            if let (Some(sep), true) = (separator, i != 0) {
                s.push(sep);
            }

            s.push_str(&b.encode_hex());
        }

        s
    }

    /// Decode the address from the first twelve characters of `text`
    ///
    /// Octets are read two characters at a time with no allowance for separators. Only the
    /// unseparated form written by the module is valid input, text like `"00:11:22:33:44:55"` is
    /// not decoded as an address.
    pub fn decode(text: &str) -> Result<Self, MalformedPayload> {
        let digits = text
            .get(..Self::HEX_LEN)
            .filter(|digits| digits.is_ascii())
            .ok_or_else(|| MalformedPayload(text.to_string()))?;

        let mut bytes = [0u8; 6];

        for (byte, i) in bytes.iter_mut().zip((0..Self::HEX_LEN).step_by(2)) {
            *byte = hex::decode_hex8(&digits[i..i + 2])?;
        }

        Ok(MacAddress(bytes))
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddress(bytes)
    }
}

impl From<MacAddress> for [u8; 6] {
    fn from(address: MacAddress) -> Self {
        address.0
    }
}

impl core::str::FromStr for MacAddress {
    type Err = MalformedPayload;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MacAddress::decode(s)
    }
}

/// Displays the address with `:` between the octets
impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode(Some(':')))
    }
}
