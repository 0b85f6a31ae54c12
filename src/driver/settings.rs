//! Typed values of the set and get commands

use crate::hex::{self, MalformedPayload};
use core::ops::{BitOr, BitOrAssign};

/// Baud rate of the UART
///
/// The rate is a single digit on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaudRate {
    Baud2400,
    Baud9600,
    Baud19200,
    Baud38400,
    Baud115200,
    Baud230400,
    Baud460800,
    Baud921600,
}

impl BaudRate {
    pub fn to_digit(&self) -> char {
        match self {
            BaudRate::Baud2400 => '0',
            BaudRate::Baud9600 => '1',
            BaudRate::Baud19200 => '2',
            BaudRate::Baud38400 => '3',
            BaudRate::Baud115200 => '4',
            BaudRate::Baud230400 => '5',
            BaudRate::Baud460800 => '6',
            BaudRate::Baud921600 => '7',
        }
    }

    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '0' => Some(BaudRate::Baud2400),
            '1' => Some(BaudRate::Baud9600),
            '2' => Some(BaudRate::Baud19200),
            '3' => Some(BaudRate::Baud38400),
            '4' => Some(BaudRate::Baud115200),
            '5' => Some(BaudRate::Baud230400),
            '6' => Some(BaudRate::Baud460800),
            '7' => Some(BaudRate::Baud921600),
            _ => None,
        }
    }

    /// The rate in bits per second
    pub fn bits_per_second(&self) -> u32 {
        match self {
            BaudRate::Baud2400 => 2400,
            BaudRate::Baud9600 => 9600,
            BaudRate::Baud19200 => 19200,
            BaudRate::Baud38400 => 38400,
            BaudRate::Baud115200 => 115200,
            BaudRate::Baud230400 => 230400,
            BaudRate::Baud460800 => 460800,
            BaudRate::Baud921600 => 921600,
        }
    }
}

/// Bitmap of the supported features of the module
///
/// This is written with `SR` and read with `GR`. Changes take effect after a reboot.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Features(pub u32);

impl Features {
    /// The device that starts a connection is the central
    ///
    /// Ignored since firmware 1.20, roles are determined by the action commands.
    pub const CENTRAL: Features = Features(0x8000_0000);
    /// Characteristic values are requested from the host when read
    pub const REALTIME_READ: Features = Features(0x4000_0000);
    /// Advertise after a power cycle, reboot, or disconnection
    pub const AUTO_ADVERTISE: Features = Features(0x2000_0000);
    pub const MLDP: Features = Features(0x1000_0000);
    pub const AUTO_MLDP_DISABLE: Features = Features(0x0800_0000);
    /// Never use directed advertising, even when bonded
    pub const NO_DIRECT_ADVERTISEMENT: Features = Features(0x0400_0000);
    pub const UART_FLOW_CONTROL: Features = Features(0x0200_0000);
    pub const STARTUP_SCRIPT: Features = Features(0x0100_0000);
    pub const AUTHENTICATION: Features = Features(0x0040_0000);
    pub const REMOTE_COMMAND: Features = Features(0x0020_0000);
    pub const DO_NOT_SAVE_BONDING: Features = Features(0x0010_0000);
    pub const BLOCK_REMOTE_SET: Features = Features(0x0001_0000);
    /// Device firmware update over the air
    pub const OTA: Features = Features(0x0000_8000);
    pub const IOS_MODE: Features = Features(0x0000_4000);
    /// No service discovery is performed after a connection
    pub const SERVER_ONLY: Features = Features(0x0000_2000);
    pub const UART_SCRIPT: Features = Features(0x0000_1000);
    pub const AUTO_MLDP: Features = Features(0x0000_0800);
    /// No status strings (`CMD`, `Connected`, ...) are output
    pub const MLDP_NO_STATUS: Features = Features(0x0000_0400);

    pub fn contains(&self, other: Features) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Features {
    type Output = Features;

    fn bitor(self, rhs: Features) -> Features {
        Features(self.0 | rhs.0)
    }
}

impl BitOrAssign for Features {
    fn bitor_assign(&mut self, rhs: Features) {
        self.0 |= rhs.0
    }
}

/// Connection timing parameters
///
/// * `interval`: time between connection events (unit of 1.25 ms)
/// * `latency`: number of connection events the peripheral may skip
/// * `timeout`: supervision timeout (unit of 10 ms)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    pub interval: u16,
    pub latency: u16,
    pub timeout: u16,
}

impl Timing {
    /// Encode as `IIII,LLLL,TTTT`
    pub fn encode(&self) -> String {
        format!(
            "{},{},{}",
            hex::encode_hex16(self.interval),
            hex::encode_hex16(self.latency),
            hex::encode_hex16(self.timeout)
        )
    }

    /// Decode from `IIII,LLLL,TTTT`
    pub fn decode(text: &str) -> Result<Self, MalformedPayload> {
        let fields = text
            .split(',')
            .map(hex::decode_hex16)
            .collect::<Result<Vec<_>, _>>()?;

        match fields[..] {
            [interval, latency, timeout] => Ok(Timing {
                interval,
                latency,
                timeout,
            }),
            _ => Err(MalformedPayload(text.to_string())),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            interval: 0x0006,
            latency: 0x0000,
            timeout: 0x0064,
        }
    }
}

/// The interval and window for advertising or scanning
///
/// Both are in milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalWindow {
    pub interval: u16,
    pub window: u16,
}

impl IntervalWindow {
    /// Encode as `IIII,WWWW`
    pub fn encode(&self) -> String {
        format!("{},{}", hex::encode_hex16(self.interval), hex::encode_hex16(self.window))
    }
}

/// Transmit power level
///
/// The module has eight levels from `0` (-19.1 dBm) to `7` (7.5 dBm).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Power(u8);

impl Power {
    pub const MAX: Power = Power(7);

    /// Create a power level, any level greater than 7 is clamped to 7
    pub fn new(level: u8) -> Self {
        Power(level.min(Self::MAX.0))
    }

    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for Power {
    fn default() -> Self {
        Power(2)
    }
}
