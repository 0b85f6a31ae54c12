//! GATT items exposed by the module's command set
//!
//! The RN4020 runs the GATT server and client itself, the host only sees the listings of services
//! and characteristics, the bitmap of built in services, and the client characteristic
//! configuration of a peer's characteristic.

pub mod characteristic;

pub use characteristic::{
    ClientCharacteristic, Properties, PropertyFlags, ServerCharacteristic, ShortClientCharacteristic,
    ShortServerCharacteristic,
};

use core::ops::{BitOr, BitOrAssign};

/// Bitmap of the built in services supported by the module's server
///
/// This is written with command `SS` and read with `GS` as eight hexadecimal characters. Changes
/// take effect after a reboot.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Services(pub u32);

impl Services {
    pub const DEVICE_INFORMATION: Services = Services(0x8000_0000);
    pub const BATTERY: Services = Services(0x4000_0000);
    pub const HEART_RATE: Services = Services(0x2000_0000);
    pub const HEALTH_THERMOMETER: Services = Services(0x1000_0000);
    pub const GLUCOSE: Services = Services(0x0800_0000);
    pub const BLOOD_PRESSURE: Services = Services(0x0400_0000);
    pub const RUNNING_SPEED_CADENCE: Services = Services(0x0200_0000);
    pub const CYCLING_SPEED_CADENCE: Services = Services(0x0100_0000);
    pub const CURRENT_TIME: Services = Services(0x0080_0000);
    pub const NEXT_DST_CHANGE: Services = Services(0x0040_0000);
    pub const REFERENCE_TIME_UPDATE: Services = Services(0x0020_0000);
    pub const LINK_LOSS: Services = Services(0x0010_0000);
    pub const IMMEDIATE_ALERT: Services = Services(0x0008_0000);
    pub const TX_POWER: Services = Services(0x0004_0000);
    pub const ALERT_NOTIFICATION: Services = Services(0x0002_0000);
    pub const PHONE_ALERT_STATUS: Services = Services(0x0001_0000);
    pub const SCAN_PARAMETERS: Services = Services(0x0000_4000);
    pub const USER_DEFINED_PRIVATE: Services = Services(0x0000_0001);

    pub fn contains(&self, other: Services) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Services {
    type Output = Services;

    fn bitor(self, rhs: Services) -> Services {
        Services(self.0 | rhs.0)
    }
}

impl BitOrAssign for Services {
    fn bitor_assign(&mut self, rhs: Services) {
        self.0 |= rhs.0
    }
}

/// Client Characteristic Configuration
///
/// The state of notifications and indications for a characteristic of the connected peer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClientConfiguration {
    NotStarted,
    Notifications,
    Indications,
}

impl ClientConfiguration {
    /// Convert from the configuration descriptor value
    ///
    /// The descriptor is little endian on the air, the module reads it back as two bytes in air
    /// order, so `"0100"` means notifications.
    pub fn from_descriptor(raw: u16) -> Result<Self, u16> {
        match raw >> 8 {
            0 => Ok(ClientConfiguration::NotStarted),
            1 => Ok(ClientConfiguration::Notifications),
            2 => Ok(ClientConfiguration::Indications),
            _ => Err(raw),
        }
    }
}
