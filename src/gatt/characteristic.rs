//! Characteristics as they are listed by the module

use crate::Uuid;

/// Characteristic Properties
///
/// These are the properties that are part of the Characteristic Declaration
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Properties {
    Broadcast,
    Read,
    WriteWithoutResponse,
    Write,
    Notify,
    Indicate,
    AuthenticatedSignedWrite,
    ExtendedProperties,
}

impl Properties {
    const ALL: [Properties; 8] = [
        Properties::Broadcast,
        Properties::Read,
        Properties::WriteWithoutResponse,
        Properties::Write,
        Properties::Notify,
        Properties::Indicate,
        Properties::AuthenticatedSignedWrite,
        Properties::ExtendedProperties,
    ];

    pub fn to_val(&self) -> u8 {
        match *self {
            Properties::Broadcast => 1 << 0,
            Properties::Read => 1 << 1,
            Properties::WriteWithoutResponse => 1 << 2,
            Properties::Write => 1 << 3,
            Properties::Notify => 1 << 4,
            Properties::Indicate => 1 << 5,
            Properties::AuthenticatedSignedWrite => 1 << 6,
            Properties::ExtendedProperties => 1 << 7,
        }
    }
}

/// The property bit field of a client characteristic
///
/// The module lists the properties as a hexadecimal byte, e.g. `12` for read and notify.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyFlags(u8);

impl PropertyFlags {
    pub const fn from_bits(bits: u8) -> Self {
        PropertyFlags(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, property: Properties) -> bool {
        self.0 & property.to_val() != 0
    }

    /// Iterate over the properties within the bit field
    pub fn iter(&self) -> impl Iterator<Item = Properties> + '_ {
        Properties::ALL.iter().copied().filter(move |p| self.contains(*p))
    }
}

impl<'a> FromIterator<&'a Properties> for PropertyFlags {
    fn from_iter<I: IntoIterator<Item = &'a Properties>>(iter: I) -> Self {
        PropertyFlags(iter.into_iter().fold(0u8, |u, p| u | p.to_val()))
    }
}

/// A characteristic of this module's GATT server
///
/// The server listing has one entry per handle, a characteristic with a client characteristic
/// configuration descriptor is listed twice. The entry for the value has `is_configuration` set to
/// false and the entry for the configuration has it set to true.
///
/// `U` is the representation of the UUIDs, either [`Uuid`] or its short `u16` form.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerCharacteristic<U = Uuid> {
    pub service: U,
    pub uuid: U,
    pub handle: u16,
    pub is_configuration: bool,
}

/// A characteristic of the connected peer's GATT server
///
/// `U` is the representation of the UUIDs, either [`Uuid`] or its short `u16` form.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientCharacteristic<U = Uuid> {
    pub service: U,
    pub uuid: U,
    pub handle: u16,
    pub properties: PropertyFlags,
}

pub type ShortServerCharacteristic = ServerCharacteristic<u16>;

pub type ShortClientCharacteristic = ClientCharacteristic<u16>;

impl ServerCharacteristic<Uuid> {
    pub fn to_short(&self) -> ShortServerCharacteristic {
        ServerCharacteristic {
            service: self.service.short(),
            uuid: self.uuid.short(),
            handle: self.handle,
            is_configuration: self.is_configuration,
        }
    }
}

impl ClientCharacteristic<Uuid> {
    pub fn to_short(&self) -> ShortClientCharacteristic {
        ClientCharacteristic {
            service: self.service.short(),
            uuid: self.uuid.short(),
            handle: self.handle,
            properties: self.properties,
        }
    }
}
