//! The RN4020 command protocol
//!
//! [`Rn4020Driver`] issues the ASCII commands of the RN4020 and interprets the replies. Every
//! method sends one command and blocks until its reply has been received (or the serial read
//! times out). There is no pipelining, a command's reply must be consumed before the next command
//! is sent or the line framing would be out of step with the conversation.
//!
//! Commands come in three flavours.
//! * Set commands (`SN,MyName`) are answered with `AOK` or `ERR`.
//! * Get commands (`GN`) are answered with a single line of text or hexadecimal.
//! * Action commands (`F`, `LS`, `R,1`, ...) are answered with `AOK` and/or a number of lines
//!   that are output over time.

pub mod list;
pub mod scan;
pub mod settings;

pub use list::{ListedCharacteristic, ListingError};
pub use settings::{BaudRate, Features, IntervalWindow, Power, Timing};

use crate::gatt::{ClientCharacteristic, ClientConfiguration, ServerCharacteristic, Services};
use crate::hex::{self, HexInt, MalformedPayload};
use crate::serial::{self, DelimiterSerial, Serial};
use crate::uuid::UuidFormatError;
use crate::{MacAddress, Peripheral, Uuid};

macro_rules! log_trace {
    ( $arg1:expr $(, $args:expr)* ) => { log::trace!(concat!("(AT) ", $arg1) $(, $args)*) }
}

macro_rules! log_debug {
    ( $arg1:expr $(, $args:expr)* ) => { log::debug!(concat!("(AT) ", $arg1) $(, $args)*) }
}

macro_rules! log_warn {
    ( $arg1:expr $(, $args:expr)* ) => { log::warn!(concat!("(AT) ", $arg1) $(, $args)*) }
}

/// The size of the ring buffer of the [`DelimiterSerial`] used by the driver
///
/// This holds more than [`LINE_LEN`] bytes, so the bytes past a delimiter within a full line
/// buffer always fit.
pub const RING_LEN: usize = 256;

/// The maximum length of a line received by the driver
///
/// The longest regular line is a scan result with a 20 character name and a 128 bit service UUID
/// in its reserved field (about 80 bytes). A longer line is a
/// [`BufferOverflow`](serial::Error::BufferOverflow).
pub const LINE_LEN: usize = 128;

/// Default number of serial read timeouts to wait for an event
pub const DEFAULT_WAIT_ATTEMPTS: usize = 20;

/// Default number of serial read timeouts to wait for the next scanned peripheral
pub const DEFAULT_SCAN_ATTEMPTS: usize = 10;

/// The maximum number of characters of the device name
pub const MAX_NAME_LEN: usize = 20;

/// The maximum number of characters of the serialized name
pub const MAX_SERIALIZED_NAME_LEN: usize = 15;

/// The maximum number of bytes of broadcast data
pub const MAX_BROADCAST_LEN: usize = 25;

const ACKNOWLEDGED: &[u8] = b"AOK";

const REJECTED: &[u8] = b"ERR";

const READY: &str = "CMD";

const NO_CONNECTION: &str = "No Connection";

/// Error from a [`Rn4020Driver`]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    #[error(transparent)]
    Serial(#[from] serial::Error<E>),
    #[error(transparent)]
    MalformedPayload(#[from] MalformedPayload),
    #[error(transparent)]
    InvalidUuid(#[from] UuidFormatError),
    /// The module replied `ERR`
    #[error("command `{0}` was rejected")]
    Rejected(String),
    /// The targeted service was not within the listing
    #[error("service not within the listing")]
    ServiceNotListed,
    /// The reply was not what the command produces
    #[error("unexpected reply `{0}`")]
    UnexpectedReply(String),
    /// The parameter cannot be sent to the module
    #[error("invalid parameter `{0}`")]
    InvalidParameter(String),
}

impl<E> From<ListingError> for Error<E> {
    fn from(e: ListingError) -> Self {
        match e {
            ListingError::MalformedPayload(e) => Error::MalformedPayload(e),
            ListingError::InvalidUuid(e) => Error::InvalidUuid(e),
            ListingError::ServiceNotListed => Error::ServiceNotListed,
        }
    }
}

/// The listing command
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Listing {
    /// The services of this module's server (`LS`)
    Server,
    /// The services of the connected peer's server (`LC`)
    Client,
}

impl Listing {
    fn command(&self) -> &'static str {
        match self {
            Listing::Server => "LS",
            Listing::Client => "LC",
        }
    }
}

/// Driver of the RN4020 command protocol
pub struct Rn4020Driver<S> {
    serial: DelimiterSerial<S, RING_LEN>,
}

impl<S> Rn4020Driver<S>
where
    S: Serial,
{
    pub fn new(serial: S) -> Self {
        Rn4020Driver {
            serial: DelimiterSerial::new(serial),
        }
    }

    pub fn serial(&self) -> &DelimiterSerial<S, RING_LEN> {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut DelimiterSerial<S, RING_LEN> {
        &mut self.serial
    }

    pub fn into_inner(self) -> S {
        self.serial.into_inner()
    }

    /// Flush the serial
    ///
    /// This must be called after an error of [`BufferOverflow`](serial::Error::BufferOverflow).
    pub fn flush(&mut self) {
        self.serial.flush()
    }

    fn send_command(&mut self, command: &str, param: Option<&str>) -> Result<(), Error<S::Error>> {
        match param {
            Some(param) => {
                log_trace!("-> {},{}", command, param);

                self.serial.send_raw(command.as_bytes())?;
                self.serial.send_raw(b",")?;
                self.serial.send(Some(param.as_bytes()))?;
            }
            None => {
                log_trace!("-> {}", command);

                self.serial.send(Some(command.as_bytes()))?;
            }
        }

        Ok(())
    }

    /// Issue a set command
    ///
    /// The command line `command[,param]` is sent and true is returned if the module replies
    /// `AOK`. Any other reply, or any failure, returns false.
    pub fn set(&mut self, command: &str, param: Option<&str>) -> bool {
        self.try_set(command, param).is_ok()
    }

    /// Issue a set command
    ///
    /// This is the same as [`set`](Rn4020Driver::set) except the reason for failing is returned.
    /// A reply of `ERR` is [`Rejected`](Error::Rejected).
    pub fn try_set(&mut self, command: &str, param: Option<&str>) -> Result<(), Error<S::Error>> {
        self.send_command(command, param)?;

        let mut buffer = [0u8; LINE_LEN];

        let len = self.get(None, &mut buffer)?;

        let reply = &buffer[..len];

        if reply.starts_with(ACKNOWLEDGED) {
            Ok(())
        } else if reply.starts_with(REJECTED) {
            log_warn!("`{}` was rejected", command);

            Err(Error::Rejected(command.to_string()))
        } else {
            log_warn!("`{}` was answered with `{}`", command, String::from_utf8_lossy(reply));

            Err(Error::UnexpectedReply(String::from_utf8_lossy(reply).into_owned()))
        }
    }

    /// Issue a set command with a 32 bit parameter
    pub fn set_hex32(&mut self, command: &str, value: u32) -> bool {
        self.try_set_hex32(command, value).is_ok()
    }

    pub fn try_set_hex32(&mut self, command: &str, value: u32) -> Result<(), Error<S::Error>> {
        self.try_set(command, Some(&hex::encode_hex32(value)))
    }

    /// Receive a line, sending `command` first when it is `Some`
    ///
    /// The command is sent without parameters. When `command` is `None` the next line is received,
    /// which is used for reading the lines after the first line of a reply or for polling.
    ///
    /// The number of bytes within the line is returned. A timeout is returned as
    /// [`Timeout`](serial::Error::Timeout).
    pub fn get(&mut self, command: Option<&str>, buffer: &mut [u8]) -> Result<usize, Error<S::Error>> {
        if let Some(command) = command {
            self.send_command(command, None)?;
        }

        let len = self.serial.receive(buffer)?;

        log_trace!("<- {}", String::from_utf8_lossy(&buffer[..len]));

        Ok(len)
    }

    /// Get a line as a `String`
    ///
    /// If `strip_new_lines` is true then any carriage return or line feed within the line is
    /// removed.
    pub fn get_string(&mut self, command: Option<&str>, strip_new_lines: bool) -> Result<String, Error<S::Error>> {
        let mut buffer = [0u8; LINE_LEN];

        let len = self.get(command, &mut buffer)?;

        let mut line = String::from_utf8_lossy(&buffer[..len]).into_owned();

        if strip_new_lines {
            line.retain(|c| c != '\r' && c != '\n');
        }

        Ok(line)
    }

    /// Get a 32 bit value
    pub fn get_hex32(&mut self, command: &str) -> Result<u32, Error<S::Error>> {
        let line = self.get_string(Some(command), true)?;

        Ok(hex::decode_hex32(line.trim())?)
    }

    /// Wait for a line
    ///
    /// The serial is read until a non empty line is received or the read timed out `attempts`
    /// times. This is for events that take longer than the serial read timeout.
    ///
    /// The length of the received line is returned, or `None` if no line was received.
    pub fn wait_for_line(&mut self, buffer: &mut [u8], attempts: usize) -> Option<usize> {
        for _ in 0..attempts {
            match self.get(None, buffer) {
                Ok(0) | Err(Error::Serial(serial::Error::Timeout)) => continue,
                Ok(len) => return Some(len),
                Err(e) => {
                    log_warn!("stopped waiting for a line: {}", e);

                    return None;
                }
            }
        }

        log_debug!("no line within {} attempts", attempts);

        None
    }

    fn set_text(&mut self, command: &str, text: &str, max_len: usize) -> Result<(), Error<S::Error>> {
        if text.chars().count() > max_len {
            return Err(Error::InvalidParameter(text.to_string()));
        }

        self.try_set(command, Some(text))
    }

    /// Set the baud rate of the UART (`SB`)
    pub fn set_baud_rate(&mut self, baud: BaudRate) -> Result<(), Error<S::Error>> {
        self.try_set("SB", Some(&baud.to_digit().to_string()))
    }

    /// Get the baud rate of the UART (`GB`)
    pub fn baud_rate(&mut self) -> Result<BaudRate, Error<S::Error>> {
        let line = self.get_string(Some("GB"), true)?;

        let mut chars = line.trim().chars();

        match (chars.next().and_then(BaudRate::from_digit), chars.next()) {
            (Some(baud), None) => Ok(baud),
            _ => Err(Error::UnexpectedReply(line)),
        }
    }

    /// Set the supported features (`SR`)
    ///
    /// This takes effect after a reboot.
    pub fn set_features(&mut self, features: Features) -> Result<(), Error<S::Error>> {
        self.try_set_hex32("SR", features.0)
    }

    /// Get the supported features (`GR`)
    pub fn features(&mut self) -> Result<Features, Error<S::Error>> {
        self.get_hex32("GR").map(Features)
    }

    /// Set the services supported by the server (`SS`)
    ///
    /// This takes effect after a reboot.
    pub fn set_services(&mut self, services: Services) -> Result<(), Error<S::Error>> {
        self.try_set_hex32("SS", services.0)
    }

    /// Get the services supported by the server (`GS`)
    pub fn services(&mut self) -> Result<Services, Error<S::Error>> {
        self.get_hex32("GS").map(Services)
    }

    /// Set the device name (`SN`), up to 20 characters
    pub fn set_name(&mut self, name: &str) -> Result<(), Error<S::Error>> {
        self.set_text("SN", name, MAX_NAME_LEN)
    }

    /// Get the device name (`GN`)
    pub fn name(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("GN"), true)
    }

    /// Set the serialized name (`S-`), up to 15 characters
    ///
    /// The module appends the last two bytes of its address to the name.
    pub fn set_serialized_name(&mut self, name: &str) -> Result<(), Error<S::Error>> {
        self.set_text("S-", name, MAX_SERIALIZED_NAME_LEN)
    }

    /// Get the serialized name (`G-`)
    pub fn serialized_name(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("G-"), true)
    }

    /// Set the model of the Device Information Service (`SDM`)
    pub fn set_model(&mut self, model: &str) -> Result<(), Error<S::Error>> {
        self.set_text("SDM", model, LINE_LEN)
    }

    pub fn model(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("GDM"), true)
    }

    /// Set the manufacturer name of the Device Information Service (`SDN`)
    pub fn set_manufacturer(&mut self, manufacturer: &str) -> Result<(), Error<S::Error>> {
        self.set_text("SDN", manufacturer, LINE_LEN)
    }

    pub fn manufacturer(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("GDN"), true)
    }

    /// Set the serial number of the Device Information Service (`SDS`)
    pub fn set_serial_number(&mut self, serial_number: &str) -> Result<(), Error<S::Error>> {
        self.set_text("SDS", serial_number, LINE_LEN)
    }

    pub fn serial_number(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("GDS"), true)
    }

    /// Set the software revision of the Device Information Service (`SDR`)
    pub fn set_software_revision(&mut self, revision: &str) -> Result<(), Error<S::Error>> {
        self.set_text("SDR", revision, LINE_LEN)
    }

    pub fn software_revision(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("GDR"), true)
    }

    /// Set the hardware revision of the Device Information Service (`SDH`)
    pub fn set_hardware_revision(&mut self, revision: &str) -> Result<(), Error<S::Error>> {
        self.set_text("SDH", revision, LINE_LEN)
    }

    pub fn hardware_revision(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("GDH"), true)
    }

    /// Set the firmware revision of the Device Information Service (`SDF`)
    pub fn set_firmware_revision(&mut self, revision: &str) -> Result<(), Error<S::Error>> {
        self.set_text("SDF", revision, LINE_LEN)
    }

    pub fn firmware_revision(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("GDF"), true)
    }

    /// Set the transmit power (`SP`)
    pub fn set_power(&mut self, power: Power) -> Result<(), Error<S::Error>> {
        self.try_set("SP", Some(&power.level().to_string()))
    }

    /// Get the transmit power (`GP`)
    pub fn power(&mut self) -> Result<Power, Error<S::Error>> {
        let line = self.get_string(Some("GP"), true)?;

        match line.trim().parse::<u8>() {
            Ok(level) if level <= Power::MAX.level() => Ok(Power::new(level)),
            _ => Err(Error::UnexpectedReply(line)),
        }
    }

    /// Set the connection parameters used for future connections (`ST`)
    pub fn set_timing(&mut self, timing: Timing) -> Result<(), Error<S::Error>> {
        self.try_set("ST", Some(&timing.encode()))
    }

    /// Get the connection parameters (`GT`)
    ///
    /// These are the parameters of the current connection if there is one.
    pub fn timing(&mut self) -> Result<Timing, Error<S::Error>> {
        let line = self.get_string(Some("GT"), true)?;

        Ok(Timing::decode(line.trim())?)
    }

    /// Reset the configuration to the factory defaults at the next reboot (`SF`)
    ///
    /// When `full` is false the device name, device information, script, and private services
    /// are kept.
    pub fn reset_defaults(&mut self, full: bool) -> Result<(), Error<S::Error>> {
        self.try_set("SF", Some(if full { "2" } else { "1" }))
    }

    /// Start advertising (`A`)
    ///
    /// The module's default interval and window are used when `interval_window` is `None`.
    pub fn advertise(&mut self, interval_window: Option<IntervalWindow>) -> Result<(), Error<S::Error>> {
        self.try_set("A", interval_window.map(|iw| iw.encode()).as_deref())
    }

    /// Secure the connection (`B`)
    ///
    /// The peer is saved as bonded when `save` is true.
    pub fn bond(&mut self, save: bool) -> Result<(), Error<S::Error>> {
        self.try_set("B", Some(if save { "1" } else { "0" }))
    }

    /// Remove the bonding (`U`)
    pub fn unbond(&mut self) -> Result<(), Error<S::Error>> {
        self.try_set("U", None)
    }

    /// Connect to a peripheral (`E`)
    ///
    /// This only starts connecting, the line `Connected` is output once the connection is made.
    pub fn establish(&mut self, use_public_address: bool, address: &MacAddress) -> bool {
        let param = format!("{},{}", if use_public_address { '0' } else { '1' }, address.encode(None));

        self.set("E", Some(&param))
    }

    /// Start scanning (`F`)
    ///
    /// The module's default interval (375ms) and window (250ms) are used when `interval_window`
    /// is `None`. Use [`read_scan`](Rn4020Driver::read_scan) to read the peripherals found.
    pub fn find(&mut self, interval_window: Option<IntervalWindow>) -> Result<(), Error<S::Error>> {
        self.try_set("F", interval_window.map(|iw| iw.encode()).as_deref())
    }

    /// Enter or leave the observer role (`J`)
    pub fn observer(&mut self, enable: bool) -> Result<(), Error<S::Error>> {
        self.try_set("J", Some(if enable { "1" } else { "0" }))
    }

    /// Disconnect the active connection (`K`)
    pub fn kill(&mut self) -> Result<(), Error<S::Error>> {
        self.try_set("K", None)
    }

    /// Get the signal strength of the connection in dBm (`M`)
    ///
    /// `None` is returned when there is no connection.
    pub fn signal_strength(&mut self) -> Result<Option<i8>, Error<S::Error>> {
        let line = self.get_string(Some("M"), true)?;

        if line.trim() == NO_CONNECTION {
            Ok(None)
        } else {
            Ok(Some(scan::decode_rssi(&line)?))
        }
    }

    /// Enter the broadcaster role and set the advertising data (`N`)
    pub fn broadcast(&mut self, data: &[u8]) -> Result<(), Error<S::Error>> {
        if data.len() > MAX_BROADCAST_LEN {
            return Err(Error::InvalidParameter(hex::encode_bytes(data)));
        }

        self.try_set("N", Some(&hex::encode_bytes(data)))
    }

    /// Enter dormant mode (`O`)
    ///
    /// The module does not reply, it must be woken by the WAKE_HW pin.
    pub fn dormant(&mut self) -> Result<(), Error<S::Error>> {
        self.send_command("O", None)
    }

    /// Dump the device information (`D`)
    ///
    /// Only the first line (`BTA=<address>`) is returned, the serial is flushed of the rest.
    pub fn dump(&mut self) -> Result<String, Error<S::Error>> {
        let first = self.get_string(Some("D"), false);

        self.serial.flush();

        first
    }

    /// Reboot the module (`R,1`)
    ///
    /// True is returned once the module outputs `CMD` after it has rebooted.
    pub fn reboot(&mut self) -> bool {
        match self.try_reboot() {
            Ok(()) => true,
            Err(e) => {
                log_warn!("reboot failed: {}", e);

                false
            }
        }
    }

    /// Reboot the module (`R,1`)
    ///
    /// This is the same as [`reboot`](Rn4020Driver::reboot) except the reason for failing is
    /// returned. A [`Timeout`](serial::Error::Timeout) is returned if nothing is output within
    /// [`DEFAULT_WAIT_ATTEMPTS`] serial read timeouts.
    pub fn try_reboot(&mut self) -> Result<(), Error<S::Error>> {
        let mut buffer = [0u8; LINE_LEN];

        // the echo `Reboot`
        self.get(Some("R,1"), &mut buffer)?;

        let len = self
            .wait_for_line(&mut buffer, DEFAULT_WAIT_ATTEMPTS)
            .ok_or(Error::Serial(serial::Error::Timeout))?;

        if buffer[..len].starts_with(READY.as_bytes()) {
            Ok(())
        } else {
            Err(Error::UnexpectedReply(String::from_utf8_lossy(&buffer[..len]).into_owned()))
        }
    }

    /// Change the parameters of the current connection (`T`)
    pub fn update_timings(&mut self, timing: Timing) -> Result<(), Error<S::Error>> {
        self.try_set("T", Some(&timing.encode()))
    }

    /// Get the firmware version (`V`)
    pub fn firmware_version(&mut self) -> Result<String, Error<S::Error>> {
        self.get_string(Some("V"), true)
    }

    /// Stop scanning (`X`)
    pub fn stop_scan(&mut self) -> Result<(), Error<S::Error>> {
        self.try_set("X", None)
    }

    /// Stop advertising (`Y`)
    ///
    /// Auto advertising (see [`Features::AUTO_ADVERTISE`]) restarts advertising anyway.
    pub fn stop_advertise(&mut self) -> Result<(), Error<S::Error>> {
        self.try_set("Y", None)
    }

    /// Stop connecting (`Z`)
    pub fn stop_connecting(&mut self) -> Result<(), Error<S::Error>> {
        self.try_set("Z", None)
    }

    /// Read the peripherals found by a scan
    ///
    /// This is used after [`find`](Rn4020Driver::find). Lines are read until `capacity`
    /// peripherals are found or no line was received within `attempts` serial read timeouts. Lines
    /// that are not peripherals are skipped. Finding nothing is not an error.
    ///
    /// A line longer than [`LINE_LEN`] is dropped and reading continues. The rest of that line is
    /// received as a line of its own, which is skipped as it is not a peripheral.
    pub fn read_scan(&mut self, capacity: usize, attempts: usize) -> Vec<Peripheral> {
        let mut found = Vec::with_capacity(capacity);
        let mut buffer = [0u8; LINE_LEN];
        let mut quiet = 0;

        while found.len() < capacity && quiet < attempts {
            match self.get(None, &mut buffer) {
                Ok(0) | Err(Error::Serial(serial::Error::Timeout)) => quiet += 1,
                Ok(len) => {
                    quiet = 0;

                    let line = String::from_utf8_lossy(&buffer[..len]);

                    match scan::parse_scan_line(&line) {
                        Ok(peripheral) => found.push(peripheral),
                        Err(e) => log_debug!("skipped scan line: {}", e),
                    }
                }
                Err(Error::Serial(serial::Error::BufferOverflow)) => {
                    log_warn!("dropped a scan line longer than {} bytes", LINE_LEN);

                    quiet = 0;
                }
                Err(e) => {
                    log_warn!("stopped reading the scan: {}", e);

                    break;
                }
            }
        }

        if quiet == attempts {
            log_debug!("no scan line within {} attempts", attempts);
        }

        found
    }

    /// Iterate over the lines of a listing
    ///
    /// The iterator ends on the first failed read. A timeout after at least one line was received
    /// ends the listing early, so the lines received so far are still parsed. Any other failure,
    /// or a timeout before the first line, is put in `failure`.
    fn lines<'a>(&'a mut self, failure: &'a mut Option<Error<S::Error>>) -> impl Iterator<Item = String> + 'a {
        let mut received = 0usize;
        let mut ended = false;

        core::iter::from_fn(move || {
            if ended || failure.is_some() {
                return None;
            }

            let mut buffer = [0u8; LINE_LEN];

            match self.get(None, &mut buffer) {
                Ok(len) => {
                    received += 1;

                    Some(String::from_utf8_lossy(&buffer[..len]).into_owned())
                }
                Err(Error::Serial(serial::Error::Timeout)) if received != 0 => {
                    log_debug!("listing timed out after {} lines", received);

                    ended = true;

                    None
                }
                Err(e) => {
                    *failure = Some(e);

                    None
                }
            }
        })
    }

    /// List the services
    ///
    /// At most `capacity` services are returned. The serial is flushed after the listing as the
    /// listing may not have been read to its end. When the module stops outputting the listing
    /// before its `END` line, the services received up to then are returned.
    pub fn list_services(&mut self, listing: Listing, capacity: usize) -> Result<Vec<Uuid>, Error<S::Error>> {
        self.send_command(listing.command(), None)?;

        let mut failure = None;

        let services = list::parse_services(self.lines(&mut failure), capacity);

        self.serial.flush();

        match failure {
            Some(e) => Err(e),
            None => Ok(services?),
        }
    }

    fn list_characteristics<T>(
        &mut self,
        listing: Listing,
        target: Option<&Uuid>,
        capacity: usize,
    ) -> Result<Vec<T>, Error<S::Error>>
    where
        T: ListedCharacteristic,
    {
        self.send_command(listing.command(), None)?;

        let mut failure = None;

        let characteristics = list::parse_characteristics(self.lines(&mut failure), target, capacity);

        self.serial.flush();

        match failure {
            Some(e) => Err(e),
            None => Ok(characteristics?),
        }
    }

    /// List the characteristics of this module's server (`LS`)
    ///
    /// When `service` is `Some` only the characteristics of that service are returned.
    pub fn list_server_characteristics(
        &mut self,
        service: Option<&Uuid>,
        capacity: usize,
    ) -> Result<Vec<ServerCharacteristic>, Error<S::Error>> {
        self.list_characteristics(Listing::Server, service, capacity)
    }

    /// List the characteristics of the connected peer (`LC`)
    ///
    /// When `service` is `Some` only the characteristics of that service are returned.
    pub fn list_client_characteristics(
        &mut self,
        service: Option<&Uuid>,
        capacity: usize,
    ) -> Result<Vec<ClientCharacteristic>, Error<S::Error>> {
        self.list_characteristics(Listing::Client, service, capacity)
    }

    /// Write a value of the server by characteristic UUID (`SUW`)
    pub fn write_server_value_by_uuid(&mut self, uuid: &Uuid, value: &[u8]) -> Result<(), Error<S::Error>> {
        self.try_set("SUW", Some(&format!("{},{}", uuid_param(uuid), hex::encode_bytes(value))))
    }

    /// Write a value of the server by handle (`SHW`)
    pub fn write_server_value(&mut self, handle: u16, value: &[u8]) -> Result<(), Error<S::Error>> {
        self.try_set("SHW", Some(&format!("{},{}", hex::encode_hex16(handle), hex::encode_bytes(value))))
    }

    /// Write an integer value of the server by handle
    ///
    /// The value is written big endian with the width of `T`.
    pub fn write_server_int<T: HexInt>(&mut self, handle: u16, value: T) -> Result<(), Error<S::Error>> {
        self.try_set("SHW", Some(&format!("{},{}", hex::encode_hex16(handle), value.encode_hex())))
    }

    /// Read a value of the server by characteristic UUID (`SUR`)
    pub fn read_server_value_by_uuid(&mut self, uuid: &Uuid) -> Result<Vec<u8>, Error<S::Error>> {
        let line = self.get_string(Some(&format!("SUR,{}", uuid_param(uuid))), true)?;

        Ok(hex::decode_bytes(line.trim())?)
    }

    /// Read a value of the server by handle (`SHR`)
    pub fn read_server_value(&mut self, handle: u16) -> Result<Vec<u8>, Error<S::Error>> {
        let line = self.get_string(Some(&format!("SHR,{}", hex::encode_hex16(handle))), true)?;

        Ok(hex::decode_bytes(line.trim())?)
    }

    /// Read an integer value of the server by handle
    pub fn read_server_int<T: HexInt>(&mut self, handle: u16) -> Result<T, Error<S::Error>> {
        let line = self.get_string(Some(&format!("SHR,{}", hex::encode_hex16(handle))), true)?;

        Ok(T::decode_hex(line.trim())?)
    }

    /// Write a characteristic value of the peer by UUID (`CUWV`)
    pub fn write_client_value(&mut self, uuid: &Uuid, value: &[u8]) -> Result<(), Error<S::Error>> {
        self.try_set("CUWV", Some(&format!("{},{}", uuid_param(uuid), hex::encode_bytes(value))))
    }

    /// Write an integer characteristic value of the peer by UUID
    pub fn write_client_int<T: HexInt>(&mut self, uuid: &Uuid, value: T) -> Result<(), Error<S::Error>> {
        self.try_set("CUWV", Some(&format!("{},{}", uuid_param(uuid), value.encode_hex())))
    }

    /// Start or stop notifications or indications of a characteristic of the peer (`CUWC`)
    pub fn set_client_configuration(&mut self, uuid: &Uuid, enable: bool) -> Result<(), Error<S::Error>> {
        self.try_set("CUWC", Some(&format!("{},{}", uuid_param(uuid), if enable { '1' } else { '0' })))
    }

    fn read_client(&mut self, command: &str) -> Result<String, Error<S::Error>> {
        let line = self.get_string(Some(command), true)?;

        let value = line
            .trim()
            .strip_prefix("R,")
            .and_then(|value| value.strip_suffix('.'))
            .map(str::to_string);

        value.ok_or(Error::UnexpectedReply(line))
    }

    /// Read a characteristic value of the peer by UUID (`CURV`)
    pub fn read_client_value(&mut self, uuid: &Uuid) -> Result<Vec<u8>, Error<S::Error>> {
        let value = self.read_client(&format!("CURV,{}", uuid_param(uuid)))?;

        Ok(hex::decode_bytes(&value)?)
    }

    /// Read a characteristic value of the peer by handle (`CHR`)
    pub fn read_client_value_by_handle(&mut self, handle: u16) -> Result<Vec<u8>, Error<S::Error>> {
        let value = self.read_client(&format!("CHR,{}", hex::encode_hex16(handle)))?;

        Ok(hex::decode_bytes(&value)?)
    }

    /// Read an integer characteristic value of the peer by UUID
    pub fn read_client_int<T: HexInt>(&mut self, uuid: &Uuid) -> Result<T, Error<S::Error>> {
        let value = self.read_client(&format!("CURV,{}", uuid_param(uuid)))?;

        Ok(T::decode_hex(&value)?)
    }

    /// Read the client characteristic configuration of a characteristic of the peer (`CURC`)
    pub fn client_configuration(&mut self, uuid: &Uuid) -> Result<ClientConfiguration, Error<S::Error>> {
        let value = self.read_client(&format!("CURC,{}", uuid_param(uuid)))?;

        ClientConfiguration::from_descriptor(hex::decode_hex16(&value)?).map_err(|_| Error::UnexpectedReply(value))
    }
}

/// A UUID as a command parameter
///
/// UUIDs derived from the Bluetooth base UUID are sent as the short form.
fn uuid_param(uuid: &Uuid) -> String {
    if uuid.is_base_derived() {
        hex::encode_hex16(uuid.short())
    } else {
        uuid.encode().replace('-', "")
    }
}
