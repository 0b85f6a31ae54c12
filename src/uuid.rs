//! Universally Unique Identifier
//!
//! The RN4020 lists services and characteristics either by their 16 bit alias (`"180F"`) or by
//! the full 128 bit value (`"F9B34FB0000010008000000000001800"`, sometimes with the `-`
//! separators of the canonical form).

use crate::hex;
use core::fmt;
use core::hash::{Hash, Hasher};
use thiserror::Error;

/// Universally Unique Identifier
///
/// A UUID in Bluetooth has some differences from the UUID of
/// [RFC 4122](https://datatracker.ietf.org/doc/html/rfc4122). To reduce the load of transferring
/// 128 bits for commonly used identifiers, a 16 bit shortened form is mapped into the Bluetooth Base
/// UUID `0000xxxx-0000-1000-8000-00805F9B34FB`, where the `xxxx` is the short form.
///
/// ```
/// # use rn4020::Uuid;
/// let battery = Uuid::from_u16(0x180F);
///
/// assert_eq!("0000180F-0000-1000-8000-00805F9B34FB", battery.to_string());
/// assert_eq!(0x180F, battery.short());
/// assert!(battery.is_base_derived());
/// ```
///
/// # Equality
/// Two `Uuid`s are equal when their 16 bit short forms are equal. The short form is taken from
/// bytes two and three of the 128 bit value for *every* UUID, including ones that are not derived
/// from the Bluetooth Base UUID, so two different 128 bit UUIDs that share those two bytes compare
/// equal. The module is only ever asked about 16 bit aliases, use [`as_bytes`](Uuid::as_bytes) when
/// the full value must be compared.
///
/// ## Conversion
/// A UUID can be converted to a [uuid::Uuid](https://github.com/uuid-rs/uuid) if the feature
/// `uuid-crate` is enabled.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uuid {
    bytes: [u8; 16],
    short: u16,
}

impl Uuid {
    /// See Vol 3 part B sec 2.5.1 for where this value comes from.
    /// This can also be found as the Bluetooth Base UUID in the assigned numbers document.
    const BLUETOOTH_BASE_UUID: [u8; 16] = [
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0x80, 0x5F, 0x9B, 0x34, 0xFB,
    ];

    /// Length of the hexadecimal 16 bit short form
    pub const SHORT_LEN: usize = 4;

    /// Length of the hexadecimal 128 bit form without separators
    pub const LONG_LEN: usize = 32;

    /// Length of the canonical 8-4-4-4-12 form
    pub const CANONICAL_LEN: usize = 36;

    pub const fn from_u16(v: u16) -> Self {
        let mut bytes = Self::BLUETOOTH_BASE_UUID;

        bytes[2] = (v >> 8) as u8;
        bytes[3] = v as u8;

        Uuid { bytes, short: v }
    }

    /// Create a UUID from its *big endian* (wire ordered) bytes
    ///
    /// The short form is taken from bytes two and three whether or not the UUID is derived from
    /// the Bluetooth Base UUID.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        let short = (bytes[2] as u16) << 8 | bytes[3] as u16;

        Uuid { bytes, short }
    }

    pub const fn from_u128(v: u128) -> Self {
        Self::from_bytes(v.to_be_bytes())
    }

    /// Get the 16 bit short form
    ///
    /// This is only meaningful when [`is_base_derived`](Uuid::is_base_derived) is true.
    pub fn short(&self) -> u16 {
        self.short
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    pub fn as_u128(&self) -> u128 {
        <u128>::from_be_bytes(self.bytes)
    }

    /// Returns true if all bytes outside of the short form match the Bluetooth Base UUID
    pub fn is_base_derived(&self) -> bool {
        self.bytes
            .iter()
            .zip(Self::BLUETOOTH_BASE_UUID.iter())
            .enumerate()
            .all(|(i, (b, base))| i == 2 || i == 3 || b == base)
    }

    /// Encode to the canonical `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` form
    pub fn encode(&self) -> String {
        let b = &self.bytes;

        format!(
            "{}-{}-{}-{}-{}",
            hex::encode_bytes(&b[..4]),
            hex::encode_bytes(&b[4..6]),
            hex::encode_bytes(&b[6..8]),
            hex::encode_bytes(&b[8..10]),
            hex::encode_bytes(&b[10..]),
        )
    }

    /// Decode a UUID
    ///
    /// The text is either the four character short form, the 32 character 128 bit form, or the
    /// 36 character canonical form.
    pub fn decode(text: &str) -> Result<Self, UuidFormatError> {
        match text.len() {
            Self::SHORT_LEN => hex::decode_hex16(text)
                .map(Uuid::from_u16)
                .map_err(|_| UuidFormatError::IncorrectDigit(text.to_string())),
            Self::LONG_LEN | Self::CANONICAL_LEN => {
                let canonical = text.len() == Self::CANONICAL_LEN;

                // separators are only allowed at the 8-4-4-4-12 group boundaries
                let separators_placed = text
                    .bytes()
                    .enumerate()
                    .all(|(i, b)| (b == b'-') == (canonical && matches!(i, 8 | 13 | 18 | 23)));

                if !separators_placed {
                    return Err(UuidFormatError::IncorrectDigit(text.to_string()));
                }

                let digits: Vec<u8> = text.bytes().filter(|b| *b != b'-').collect();

                if digits.len() != Self::LONG_LEN || !digits.iter().all(u8::is_ascii_hexdigit) {
                    return Err(UuidFormatError::IncorrectDigit(text.to_string()));
                }

                let mut bytes = [0u8; 16];

                for (byte, pair) in bytes.iter_mut().zip(digits.chunks(2)) {
                    *byte = (hex_value(pair[0]) << 4) | hex_value(pair[1]);
                }

                Ok(Uuid::from_bytes(bytes))
            }
            len => Err(UuidFormatError::IncorrectLength(len)),
        }
    }
}

/// `digit` must already be checked to be an ASCII hexadecimal digit
fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// An all ones UUID, the value of a UUID that was never assigned
impl Default for Uuid {
    fn default() -> Self {
        Uuid {
            bytes: [0xFF; 16],
            short: 0xFFFF,
        }
    }
}

impl PartialEq for Uuid {
    fn eq(&self, other: &Self) -> bool {
        self.short == other.short
    }
}

impl Eq for Uuid {}

impl Hash for Uuid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.short.hash(state)
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_base_derived() {
            write!(f, "Uuid({:04X} (16b))", self.short)
        } else {
            write!(f, "Uuid({} (128b))", self.encode())
        }
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<u16> for Uuid {
    fn from(v: u16) -> Uuid {
        Self::from_u16(v)
    }
}

impl From<u128> for Uuid {
    fn from(v: u128) -> Uuid {
        Self::from_u128(v)
    }
}

/// Create a UUID from a *big endian* ordered array
impl From<[u8; 16]> for Uuid {
    fn from(v: [u8; 16]) -> Uuid {
        Self::from_bytes(v)
    }
}

impl From<Uuid> for u128 {
    fn from(uuid: Uuid) -> u128 {
        uuid.as_u128()
    }
}

impl TryFrom<Uuid> for u16 {
    type Error = ();

    /// Try to convert a UUID into its 16 bit shortened form. This doesn't check that the value is
    /// pre-allocated (a.k.a. assigned number) from the Bluetooth SIG.
    fn try_from(uuid: Uuid) -> Result<u16, ()> {
        if uuid.is_base_derived() {
            Ok(uuid.short)
        } else {
            Err(())
        }
    }
}

impl<'a> TryFrom<&'a str> for Uuid {
    type Error = UuidFormatError;

    fn try_from(v: &'a str) -> Result<Self, Self::Error> {
        Uuid::decode(v)
    }
}

impl core::str::FromStr for Uuid {
    type Err = UuidFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::decode(s)
    }
}

#[cfg(feature = "uuid-crate")]
impl From<::uuid::Uuid> for Uuid {
    fn from(uuid: ::uuid::Uuid) -> Uuid {
        Uuid::from_bytes(*uuid.as_bytes())
    }
}

#[cfg(feature = "uuid-crate")]
impl From<Uuid> for ::uuid::Uuid {
    fn from(uuid: Uuid) -> ::uuid::Uuid {
        ::uuid::Uuid::from_bytes(uuid.bytes)
    }
}

/// Text that is not a UUID
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UuidFormatError {
    #[error("a UUID is 4, 32, or 36 characters, not {0}")]
    IncorrectLength(usize),
    #[error("'{0}' is not a hexadecimal UUID")]
    IncorrectDigit(String),
}
