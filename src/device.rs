//! Device level actions
//!
//! [`Rn4020Device`] strings together the commands of a [`Rn4020Driver`] into the actions of a
//! Bluetooth LE device: advertising, scanning, connecting, and so on. It also keeps track of
//! whether a setting has been changed that only takes effect once the module reboots. Those
//! reboots are deferred until an action needs the module to be running with the new settings,
//! so changing several settings only costs one reboot.

use crate::driver::{
    Error, Features, IntervalWindow, Rn4020Driver, DEFAULT_SCAN_ATTEMPTS, DEFAULT_WAIT_ATTEMPTS, LINE_LEN,
};
use crate::gatt::Services;
use crate::serial::{self, Serial};
use crate::{MacAddress, Peripheral};

macro_rules! log_info {
    ( $arg1:expr $(, $args:expr)* ) => { log::info!(concat!("(RN4020) ", $arg1) $(, $args)*) }
}

macro_rules! log_debug {
    ( $arg1:expr $(, $args:expr)* ) => { log::debug!(concat!("(RN4020) ", $arg1) $(, $args)*) }
}

/// The label of the address line of the dump
const ADDRESS_LABEL: &str = "BTA=";

const CONNECTED: &[u8] = b"Connected";

/// The GAP role the device was last put in
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Role {
    #[default]
    None,
    Peripheral,
    Central,
    Observer,
    Broadcaster,
}

/// An RN4020 as a Bluetooth LE device
pub struct Rn4020Device<S> {
    driver: Rn4020Driver<S>,
    reboot_pending: bool,
    role: Role,
    interval_window: Option<IntervalWindow>,
    connected: Option<Peripheral>,
}

impl<S> Rn4020Device<S>
where
    S: Serial,
{
    pub fn new(serial: S) -> Self {
        Self::from(Rn4020Driver::new(serial))
    }

    pub fn driver(&self) -> &Rn4020Driver<S> {
        &self.driver
    }

    /// Get the driver
    ///
    /// Settings changed directly through the driver that need a reboot are not tracked by the
    /// device.
    pub fn driver_mut(&mut self) -> &mut Rn4020Driver<S> {
        &mut self.driver
    }

    pub fn into_driver(self) -> Rn4020Driver<S> {
        self.driver
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The peripheral connected to with [`connect`](Rn4020Device::connect)
    pub fn connected_peripheral(&self) -> Option<&Peripheral> {
        self.connected.as_ref()
    }

    /// Check if a setting was changed that takes effect after a reboot
    pub fn is_reboot_pending(&self) -> bool {
        self.reboot_pending
    }

    pub fn interval_window(&self) -> Option<IntervalWindow> {
        self.interval_window
    }

    /// Set the interval and window used for advertising and scanning
    ///
    /// The module's defaults are used when this is `None`.
    pub fn set_interval_window(&mut self, interval_window: Option<IntervalWindow>) {
        self.interval_window = interval_window
    }

    /// Reboot if a setting is waiting for one
    ///
    /// True is returned if the module was rebooted.
    pub fn check_reboot(&mut self) -> Result<bool, Error<S::Error>> {
        if self.reboot_pending {
            self.reboot()?;

            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Reboot the module
    ///
    /// Any connection is lost.
    pub fn reboot(&mut self) -> Result<(), Error<S::Error>> {
        log_info!("rebooting");

        self.driver.try_reboot()?;

        self.reboot_pending = false;
        self.connected = None;
        self.role = Role::None;

        Ok(())
    }

    /// Get the address of the module
    pub fn mac_address(&mut self) -> Result<MacAddress, Error<S::Error>> {
        let line = self.driver.dump()?;

        match line.strip_prefix(ADDRESS_LABEL) {
            Some(address) => Ok(MacAddress::decode(address)?),
            None => Err(Error::UnexpectedReply(line)),
        }
    }

    pub fn name(&mut self) -> Result<String, Error<S::Error>> {
        self.driver.name()
    }

    /// Set the device name
    ///
    /// The name is used once the module is rebooted.
    pub fn set_name(&mut self, name: &str) -> Result<(), Error<S::Error>> {
        self.driver.set_name(name)?;

        self.reboot_pending = true;

        Ok(())
    }

    /// Set the services supported by the server
    ///
    /// The services are available once the module is rebooted.
    pub fn set_services(&mut self, services: Services) -> Result<(), Error<S::Error>> {
        self.driver.set_services(services)?;

        self.reboot_pending = true;

        Ok(())
    }

    /// Set and clear features, marking a reboot as pending if they changed
    fn update_features(&mut self, set: Features, clear: Features) -> Result<(), Error<S::Error>> {
        let current = self.driver.features()?;

        let features = Features((current.0 | set.0) & !clear.0);

        if features != current {
            log_debug!("features changed from {:08X} to {:08X}", current.0, features.0);

            self.driver.set_features(features)?;

            self.reboot_pending = true;
        }

        Ok(())
    }

    /// Start advertising as a peripheral
    ///
    /// With `auto_advertise` the module advertises by itself after every reboot and
    /// disconnection.
    pub fn start_advertise(&mut self, auto_advertise: bool) -> Result<(), Error<S::Error>> {
        if auto_advertise {
            self.update_features(Features::AUTO_ADVERTISE, Features::CENTRAL)?;
        } else {
            self.update_features(Features(0), Features::CENTRAL | Features::AUTO_ADVERTISE)?;
        }

        let rebooted = self.check_reboot()?;

        // the module already advertises after rebooting
        if !(rebooted && auto_advertise) {
            self.driver.advertise(self.interval_window)?;
        }

        self.role = Role::Peripheral;

        Ok(())
    }

    /// Stop advertising
    pub fn stop_advertise(&mut self) -> Result<(), Error<S::Error>> {
        self.driver.stop_advertise()?;

        self.role = Role::None;

        Ok(())
    }

    /// Broadcast `data` as a non connectable advertisement
    pub fn start_broadcast(&mut self, data: &[u8]) -> Result<(), Error<S::Error>> {
        self.check_reboot()?;

        self.driver.broadcast(data)?;
        self.driver.advertise(self.interval_window)?;

        self.role = Role::Broadcaster;

        Ok(())
    }

    /// Scan for peripherals
    ///
    /// At most `capacity` peripherals are returned. The scan ends when no new peripheral is found
    /// within [`DEFAULT_SCAN_ATTEMPTS`] serial read timeouts.
    pub fn scan_peripherals(&mut self, capacity: usize) -> Result<Vec<Peripheral>, Error<S::Error>> {
        self.update_features(Features::CENTRAL, Features(0))?;

        self.check_reboot()?;

        self.driver.find(self.interval_window)?;

        self.role = Role::Central;

        let found = self.driver.read_scan(capacity, DEFAULT_SCAN_ATTEMPTS);

        log_info!("found {} peripherals", found.len());

        self.stop_scan()?;

        Ok(found)
    }

    /// Receive the broadcasts of broadcasters
    ///
    /// The broadcasts are output as lines, use the driver to read them.
    pub fn start_observing(&mut self) -> Result<(), Error<S::Error>> {
        self.check_reboot()?;

        self.driver.observer(true)?;
        self.driver.find(self.interval_window)?;

        self.role = Role::Observer;

        Ok(())
    }

    /// Stop scanning or observing
    pub fn stop_scan(&mut self) -> Result<(), Error<S::Error>> {
        match self.driver.stop_scan() {
            // a peripheral found after reading the scan can be output before the reply
            Err(Error::UnexpectedReply(line)) => {
                log_debug!("flushed `{}` when stopping the scan", line);

                self.driver.flush();

                Ok(())
            }
            result => result,
        }
    }

    /// Connect to a peripheral
    ///
    /// This waits for the module to output `Connected`. If it is not output within
    /// [`DEFAULT_WAIT_ATTEMPTS`] serial read timeouts then connecting is stopped and a
    /// [`Timeout`](serial::Error::Timeout) is returned.
    pub fn connect(&mut self, peripheral: &Peripheral) -> Result<(), Error<S::Error>> {
        self.check_reboot()?;

        if !self.driver.establish(!peripheral.is_random_address(), peripheral.address()) {
            return Err(Error::Rejected("E".to_string()));
        }

        let mut buffer = [0u8; LINE_LEN];

        match self.driver.wait_for_line(&mut buffer, DEFAULT_WAIT_ATTEMPTS) {
            Some(len) if buffer[..len].starts_with(CONNECTED) => {
                log_info!("connected to {}", peripheral.address());

                self.connected = Some(*peripheral);
                self.role = Role::Central;

                Ok(())
            }
            Some(len) => Err(Error::UnexpectedReply(String::from_utf8_lossy(&buffer[..len]).into_owned())),
            None => {
                self.driver.stop_connecting()?;

                Err(Error::Serial(serial::Error::Timeout))
            }
        }
    }

    /// Disconnect from the connected device
    pub fn disconnect(&mut self) -> Result<(), Error<S::Error>> {
        self.driver.kill()?;

        if let Some(peripheral) = self.connected.take() {
            log_info!("disconnected from {}", peripheral.address());
        }

        Ok(())
    }

    /// Get the signal strength of the connection
    pub fn signal_strength(&mut self) -> Result<Option<i8>, Error<S::Error>> {
        self.driver.signal_strength()
    }
}

impl<S> From<Rn4020Driver<S>> for Rn4020Device<S> {
    fn from(driver: Rn4020Driver<S>) -> Self {
        Rn4020Device {
            driver,
            reboot_pending: false,
            role: Role::None,
            interval_window: None,
            connected: None,
        }
    }
}
