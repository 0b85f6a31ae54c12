//! A remote device seen in a scan or targeted by a connection

use crate::{MacAddress, Uuid};

/// A discovered or connected remote device
///
/// A `Peripheral` is created by parsing a line of a scan, or by the caller when it knows the
/// address of the device to connect to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Peripheral {
    address: MacAddress,
    is_random_address: bool,
    name: [u8; Peripheral::NAME_CAPACITY + 1],
    primary_service: Option<Uuid>,
    rssi: i8,
}

impl Peripheral {
    /// The maximum number of bytes in a name
    pub const NAME_CAPACITY: usize = 20;

    /// Create a peripheral from its address
    pub fn new(address: MacAddress, is_random_address: bool) -> Self {
        Peripheral {
            address,
            is_random_address,
            name: [0; Self::NAME_CAPACITY + 1],
            primary_service: None,
            rssi: 0,
        }
    }

    /// Set the name
    ///
    /// A name longer than [`NAME_CAPACITY`](Peripheral::NAME_CAPACITY) bytes is cut at the last
    /// character boundary that fits.
    pub fn with_name(mut self, name: &str) -> Self {
        let mut len = name.len().min(Self::NAME_CAPACITY);

        while !name.is_char_boundary(len) {
            len -= 1;
        }

        self.name = [0; Self::NAME_CAPACITY + 1];
        self.name[..len].copy_from_slice(&name.as_bytes()[..len]);
        self
    }

    pub fn with_primary_service(mut self, uuid: Uuid) -> Self {
        self.primary_service = Some(uuid);
        self
    }

    pub fn with_rssi(mut self, rssi: i8) -> Self {
        self.rssi = rssi;
        self
    }

    pub fn address(&self) -> &MacAddress {
        &self.address
    }

    pub fn is_random_address(&self) -> bool {
        self.is_random_address
    }

    pub fn name(&self) -> &str {
        let len = self.name.iter().position(|b| *b == 0).unwrap_or(Self::NAME_CAPACITY);

        // `with_name` only ever copies whole characters
        core::str::from_utf8(&self.name[..len]).unwrap_or_default()
    }

    pub fn primary_service(&self) -> Option<&Uuid> {
        self.primary_service.as_ref()
    }

    /// Signal strength in dBm
    pub fn rssi(&self) -> i8 {
        self.rssi
    }
}
