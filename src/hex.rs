//! Fixed width hexadecimal text
//!
//! Integers on the wire are written as big-endian, zero padded, upper case hexadecimal with two
//! characters per byte. An 8 bit value is always two characters, a 16 bit value four, and a 32 bit
//! value eight.
//!
//! ```
//! # use rn4020::hex::{decode_hex16, encode_hex16, HexInt};
//! assert_eq!("002A", encode_hex16(42));
//! assert_eq!(Ok(42), decode_hex16("002A"));
//! assert_eq!(4, <u16 as HexInt>::WIDTH);
//! ```

use thiserror::Error;

/// Text that is not valid hexadecimal for the expected width
///
/// This is a local decode failure, the serial line that carried the text is still considered
/// healthy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("malformed hexadecimal payload '{0}'")]
pub struct MalformedPayload(pub String);

/// An unsigned integer with a fixed width hexadecimal representation
pub trait HexInt: Copy + Sized {
    /// The number of hexadecimal characters (two per byte)
    const WIDTH: usize;

    /// Encode to `WIDTH` upper case hexadecimal characters
    fn encode_hex(self) -> String;

    /// Decode from hexadecimal text
    ///
    /// The entire text must be hexadecimal digits and must not be longer than `WIDTH`. Shorter text
    /// is accepted as the module does not always zero pad values (e.g. a signal strength).
    fn decode_hex(text: &str) -> Result<Self, MalformedPayload>;

    /// Truncate a 32 bit value to this width
    fn truncate_from(v: u32) -> Self;
}

macro_rules! impl_hex_int {
    ( $( $ty:ty ),* ) => { $(
        impl HexInt for $ty {
            const WIDTH: usize = core::mem::size_of::<$ty>() * 2;

            fn encode_hex(self) -> String {
                format!("{:0width$X}", self, width = Self::WIDTH)
            }

            fn decode_hex(text: &str) -> Result<Self, MalformedPayload> {
                if text.is_empty() || text.len() > Self::WIDTH || !is_hex(text) {
                    return Err(MalformedPayload(text.to_string()));
                }

                <$ty>::from_str_radix(text, 16).map_err(|_| MalformedPayload(text.to_string()))
            }

            fn truncate_from(v: u32) -> Self {
                v as $ty
            }
        }
    )* };
}

impl_hex_int!(u8, u16, u32);

/// `from_str_radix` accepts a leading `+`, the wire never does
fn is_hex(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn encode_hex8(v: u8) -> String {
    v.encode_hex()
}

pub fn encode_hex16(v: u16) -> String {
    v.encode_hex()
}

pub fn encode_hex32(v: u32) -> String {
    v.encode_hex()
}

pub fn decode_hex8(text: &str) -> Result<u8, MalformedPayload> {
    u8::decode_hex(text)
}

pub fn decode_hex16(text: &str) -> Result<u16, MalformedPayload> {
    u16::decode_hex(text)
}

pub fn decode_hex32(text: &str) -> Result<u32, MalformedPayload> {
    u32::decode_hex(text)
}

/// Encode a byte slice as two hexadecimal characters per byte
pub fn encode_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| b.encode_hex()).collect()
}

/// Decode two hexadecimal characters per byte
///
/// The text must have an even length.
pub fn decode_bytes(text: &str) -> Result<Vec<u8>, MalformedPayload> {
    if text.len() % 2 != 0 || !is_hex(text) {
        return Err(MalformedPayload(text.to_string()));
    }

    (0..text.len()).step_by(2).map(|i| decode_hex8(&text[i..i + 2])).collect()
}
