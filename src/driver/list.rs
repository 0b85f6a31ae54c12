//! Parsing of service and characteristic listings
//!
//! The commands `LS` and `LC` list the services and characteristics of the server and of the
//! connected peer's server. A listing is a sequence of lines terminated by a line `END`. A line
//! that does not start with two spaces is the UUID of a service, and the lines that start with
//! two spaces that follow it are the characteristics of that service.
//!
//! ```text
//! 180F
//!   2A19,000B,V
//!   2A19,000C,C
//! END
//! ```
//!
//! A characteristic line is `<uuid>,<handle>,<trailing>`. What the trailing field means depends
//! on the listing (see [`ListedCharacteristic`]).

use crate::gatt::{ClientCharacteristic, PropertyFlags, ServerCharacteristic};
use crate::hex::{self, MalformedPayload};
use crate::uuid::{Uuid, UuidFormatError};

/// Error from parsing a listing
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error(transparent)]
    MalformedPayload(#[from] MalformedPayload),
    #[error(transparent)]
    InvalidUuid(#[from] UuidFormatError),
    #[error("the service was not within the listing")]
    ServiceNotListed,
}

/// A characteristic type that can be created from a line of a listing
///
/// The server listing marks each handle as either the value (`V`) or the client characteristic
/// configuration (`C`) of the characteristic. The client listing instead has the characteristic
/// properties as a hexadecimal byte.
pub trait ListedCharacteristic: Sized {
    fn from_listing(service: Uuid, uuid: Uuid, handle: u16, trailing: &str) -> Result<Self, ListingError>;
}

impl ListedCharacteristic for ServerCharacteristic {
    fn from_listing(service: Uuid, uuid: Uuid, handle: u16, trailing: &str) -> Result<Self, ListingError> {
        let is_configuration = match trailing {
            "C" => true,
            "V" => false,
            _ => return Err(MalformedPayload(trailing.to_string()).into()),
        };

        Ok(ServerCharacteristic {
            service,
            uuid,
            handle,
            is_configuration,
        })
    }
}

impl ListedCharacteristic for ClientCharacteristic {
    fn from_listing(service: Uuid, uuid: Uuid, handle: u16, trailing: &str) -> Result<Self, ListingError> {
        let properties = PropertyFlags::from_bits(hex::decode_hex8(trailing)?);

        Ok(ClientCharacteristic {
            service,
            uuid,
            handle,
            properties,
        })
    }
}

enum Line<'a> {
    Service(Uuid),
    Characteristic(&'a str),
    End,
}

fn classify(line: &str) -> Result<Line<'_>, ListingError> {
    if let Some(fields) = line.strip_prefix("  ") {
        Ok(Line::Characteristic(fields))
    } else if line.trim_end() == "END" {
        Ok(Line::End)
    } else {
        Ok(Line::Service(Uuid::decode(line.trim_end())?))
    }
}

fn characteristic<T: ListedCharacteristic>(service: Uuid, fields: &str) -> Result<T, ListingError> {
    let mut split = fields.trim_end().splitn(3, ',');

    match (split.next(), split.next(), split.next()) {
        (Some(uuid), Some(handle), Some(trailing)) => {
            T::from_listing(service, Uuid::decode(uuid)?, hex::decode_hex16(handle)?, trailing)
        }
        _ => Err(MalformedPayload(fields.to_string()).into()),
    }
}

/// Parse the services of a listing
///
/// Lines are taken from `lines` until the line `END` or until `capacity` services are parsed,
/// whichever comes first. The lines of the characteristics are skipped.
pub fn parse_services<I>(lines: I, capacity: usize) -> Result<Vec<Uuid>, ListingError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut lines = lines.into_iter();
    let mut services = Vec::new();

    while services.len() < capacity {
        let Some(line) = lines.next() else { break };

        match classify(line.as_ref())? {
            Line::End => break,
            Line::Service(uuid) => services.push(uuid),
            Line::Characteristic(_) => (),
        }
    }

    Ok(services)
}

/// Parse the characteristics of a listing
///
/// Lines are taken from `lines` until the line `END` or until `capacity` characteristics are
/// parsed, whichever comes first.
///
/// When `target` is `Some` only the characteristics of that service are collected and parsing
/// stops at the end of the service's block. [`ServiceNotListed`](ListingError::ServiceNotListed)
/// is returned if the service is never listed.
pub fn parse_characteristics<T, I>(
    lines: I,
    target: Option<&Uuid>,
    capacity: usize,
) -> Result<Vec<T>, ListingError>
where
    T: ListedCharacteristic,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut lines = lines.into_iter();
    let mut characteristics = Vec::new();
    let mut service: Option<Uuid> = None;
    let mut target_found = false;

    while characteristics.len() < capacity {
        let Some(line) = lines.next() else { break };

        match classify(line.as_ref())? {
            Line::End => break,
            Line::Service(uuid) => {
                if target_found {
                    break;
                }

                target_found = target.map_or(false, |target| *target == uuid);

                service = Some(uuid);
            }
            Line::Characteristic(fields) => {
                let service = service.ok_or_else(|| MalformedPayload(line.as_ref().to_string()))?;

                if target.map_or(true, |target| *target == service) {
                    characteristics.push(characteristic(service, fields)?);
                }
            }
        }
    }

    match target {
        Some(_) if !target_found => Err(ListingError::ServiceNotListed),
        _ => Ok(characteristics),
    }
}
