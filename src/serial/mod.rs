//! Serial transport and line framing
//!
//! The RN4020 is connected over a UART. This library does not open or configure the port, it only
//! requires something that implements [`Serial`]. The platform crate `rn4020-linux` provides an
//! implementation for a tty and `ScriptedSerial` (feature `test-util`) is a fake used for
//! testing.
//!
//! The byte stream of the UART has no message boundaries, a read may return part of a line or
//! several lines at once. [`DelimiterSerial`] puts the boundaries back by splitting the stream at
//! a delimiter, keeping any bytes read past the end of a line in a [`CircularBuffer`] for the next
//! receive.

mod circular;
mod delimiter;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use circular::CircularBuffer;
pub use delimiter::DelimiterSerial;

use core::fmt::{Debug, Display};

macro_rules! log_debug {
    ( $arg1:expr $(, $args:expr)* ) => { log::debug!(concat!("(SERIAL) ", $arg1) $(, $args)*) }
}

macro_rules! log_warn {
    ( $arg1:expr $(, $args:expr)* ) => { log::warn!(concat!("(SERIAL) ", $arg1) $(, $args)*) }
}

pub(crate) use {log_debug, log_warn};

/// The delimiter of every line sent to or received from the RN4020
pub const NEW_LINE: &[u8] = b"\r\n";

/// A raw byte transport
///
/// This is the capability the driver needs from a serial port. Port configuration (baud rate,
/// parity, read timeout) is the business of whatever creates the implementation.
pub trait Serial {
    type Error: Debug + Display;

    /// Send the bytes, returning the number of bytes the transport accepted
    fn send(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Receive bytes into `buffer`
    ///
    /// This must block no longer than the transport's read timeout. `Ok(0)` is returned when the
    /// timeout expires before any byte was received.
    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Discard any bytes buffered by the transport
    fn flush(&mut self);
}

impl<S> Serial for &mut S
where
    S: Serial + ?Sized,
{
    type Error = S::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        S::send(self, bytes)
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        S::receive(self, buffer)
    }

    fn flush(&mut self) {
        S::flush(self)
    }
}

/// Error from a [`DelimiterSerial`]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    /// The transport failed
    #[error("serial transport error: {0}")]
    Transport(E),
    /// Nothing was received within the transport's read timeout
    #[error("timed out waiting for serial data")]
    Timeout,
    /// A line did not fit within the receive buffer or the bytes past the delimiter did not fit
    /// within the ring buffer.
    ///
    /// The framing can no longer be trusted, the `DelimiterSerial` must be flushed.
    #[error("serial buffer overflow")]
    BufferOverflow,
}
