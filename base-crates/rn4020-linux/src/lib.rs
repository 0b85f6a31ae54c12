//! An implementation of the serial interface for Linux
//!
//! The RN4020 is usually attached through a USB to UART bridge or a board UART, both of which
//! show up as a tty device. [`SerialPort`] puts the tty into raw mode at the baud rate of the
//! module and implements [`Serial`] for it, so it can be given to a
//! [`Rn4020Driver`](rn4020::Rn4020Driver) or a [`Rn4020Device`](rn4020::Rn4020Device).
//!
//! ```no_run
//! use rn4020_linux::{PortConfig, SerialPort};
//!
//! let port = SerialPort::open(&PortConfig::new("/dev/ttyUSB0")).unwrap();
//!
//! let mut device = rn4020::Rn4020Device::new(port);
//!
//! println!("{}", device.mac_address().unwrap());
//! ```

use nix::sys::termios::{self, ControlFlags, FlushArg, SetArg, SpecialCharacterIndices};
use rn4020::serial::Serial;
use std::error;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

macro_rules! log_debug {
    ( $arg1:expr $(, $args:expr)* ) => { log::debug!(concat!("(LINUX) ", $arg1) $(, $args)*) }
}

/// The largest read timeout of a tty, in deciseconds
const MAX_DECISECONDS: u8 = u8::MAX;

#[derive(Debug)]
pub enum Error {
    IOError(nix::Error),
    File(io::Error),
    UnsupportedBaudRate(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(from base-crate: rn4020-linux) ")?;

        match *self {
            Error::IOError(ref errno) => write!(f, "IO error: {}", errno),

            Error::File(ref err) => write!(f, "file error: {}", err),

            Error::UnsupportedBaudRate(rate) => write!(f, "unsupported baud rate {}", rate),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IOError(ref errno) => Some(errno),
            Error::File(ref err) => Some(err),
            Error::UnsupportedBaudRate(_) => None,
        }
    }
}

impl From<nix::Error> for Error {
    fn from(e: nix::Error) -> Self {
        Error::IOError(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::File(e)
    }
}

/// Configuration of the tty
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortConfig {
    pub path: PathBuf,
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// How long a read waits for the first byte
    ///
    /// The tty counts in deciseconds, so this is rounded up to the nearest decisecond and is at
    /// most 25.5 seconds.
    pub read_timeout: Duration,
}

impl PortConfig {
    /// Create a configuration with the module's factory baud rate (115200)
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        PortConfig {
            path: path.as_ref().to_path_buf(),
            baud_rate: rn4020::driver::BaudRate::Baud115200.bits_per_second(),
            read_timeout: Duration::from_millis(100),
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: rn4020::driver::BaudRate) -> Self {
        self.baud_rate = baud_rate.bits_per_second();
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

fn termios_baud_rate(rate: u32) -> Result<termios::BaudRate, Error> {
    use termios::BaudRate;

    match rate {
        2400 => Ok(BaudRate::B2400),
        9600 => Ok(BaudRate::B9600),
        19200 => Ok(BaudRate::B19200),
        38400 => Ok(BaudRate::B38400),
        57600 => Ok(BaudRate::B57600),
        115200 => Ok(BaudRate::B115200),
        230400 => Ok(BaudRate::B230400),
        460800 => Ok(BaudRate::B460800),
        921600 => Ok(BaudRate::B921600),
        _ => Err(Error::UnsupportedBaudRate(rate)),
    }
}

/// Convert a timeout into deciseconds, rounding up
///
/// A zero timeout would make reads return immediately, so the least is one decisecond.
fn deciseconds(timeout: Duration) -> u8 {
    let ds = (timeout.as_millis() + 99) / 100;

    ds.clamp(1, MAX_DECISECONDS as u128) as u8
}

/// A tty in raw mode
#[derive(Debug)]
pub struct SerialPort {
    file: File,
}

impl SerialPort {
    /// Open and configure a tty
    ///
    /// The tty is put in raw mode (8 data bits, no parity, one stop bit, no flow control) and
    /// reads return after the first bytes arrive or after the read timeout of `config`.
    pub fn open(config: &PortConfig) -> Result<Self, Error> {
        let baud_rate = termios_baud_rate(config.baud_rate)?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(nix::libc::O_NOCTTY)
            .open(&config.path)?;

        let mut attributes = termios::tcgetattr(&file)?;

        termios::cfmakeraw(&mut attributes);

        termios::cfsetspeed(&mut attributes, baud_rate)?;

        attributes.control_flags |= ControlFlags::CLOCAL | ControlFlags::CREAD;
        attributes.control_flags &= !ControlFlags::CRTSCTS;

        attributes.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
        attributes.control_chars[SpecialCharacterIndices::VTIME as usize] = deciseconds(config.read_timeout);

        termios::tcsetattr(&file, SetArg::TCSANOW, &attributes)?;

        termios::tcflush(&file, FlushArg::TCIOFLUSH)?;

        log_debug!("opened {} at {} baud", config.path.display(), config.baud_rate);

        Ok(SerialPort { file })
    }

    /// Retry `func` while it fails by being interrupted or because it would block
    fn ignore_would_block_and_interrupt<F, R>(mut func: F) -> Result<R, Error>
    where
        F: FnMut() -> io::Result<R>,
    {
        loop {
            match func() {
                Err(ref e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock) => continue,
                result => break result.map_err(Error::from),
            }
        }
    }
}

impl Serial for SerialPort {
    type Error = Error;

    fn send(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let file = &mut self.file;

        Self::ignore_would_block_and_interrupt(|| file.write_all(bytes))?;

        Ok(bytes.len())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let file = &mut self.file;

        Self::ignore_would_block_and_interrupt(|| file.read(buffer))
    }

    fn flush(&mut self) {
        if let Err(e) = termios::tcflush(&self.file, FlushArg::TCIOFLUSH) {
            log::error!("(LINUX) failed to flush the tty: {}", e)
        }
    }
}
