//! Tests for listing the services and characteristics through the driver

use rn4020::driver::{Error, Listing};
use rn4020::gatt::Properties;
use rn4020::serial::{self, scripted::ScriptedSerial};
use rn4020::{Rn4020Driver, Uuid};

fn init_logging() {
    use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

    let _ = TermLogger::init(LevelFilter::Trace, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}

const SERVER_LISTING: &str = "1800\r\n  2A00,0003,V\r\n1801\r\n  2A05,0006,C\r\nEND\r\n";

fn server_driver() -> Rn4020Driver<ScriptedSerial> {
    Rn4020Driver::new(ScriptedSerial::new().respond_to("LS", SERVER_LISTING))
}

#[test]
fn server_services() {
    init_logging();

    let mut driver = server_driver();

    let services = driver.list_services(Listing::Server, 8).unwrap();

    assert_eq!(vec![Uuid::from_u16(0x1800), Uuid::from_u16(0x1801)], services);

    assert_eq!(vec!["LS"], driver.serial().get_ref().sent_lines());
    assert_eq!(1, driver.serial().get_ref().flush_count());
}

#[test]
fn server_characteristics() {
    init_logging();

    let mut driver = server_driver();

    let characteristics = driver.list_server_characteristics(None, 8).unwrap();

    assert_eq!(2, characteristics.len());

    assert_eq!(Uuid::from_u16(0x1800), characteristics[0].service);
    assert_eq!(Uuid::from_u16(0x2A00), characteristics[0].uuid);
    assert_eq!(0x0003, characteristics[0].handle);
    assert!(!characteristics[0].is_configuration);

    assert_eq!(Uuid::from_u16(0x1801), characteristics[1].service);
    assert_eq!(Uuid::from_u16(0x2A05), characteristics[1].uuid);
    assert_eq!(0x0006, characteristics[1].handle);
    assert!(characteristics[1].is_configuration);
}

#[test]
fn characteristics_of_one_service() {
    init_logging();

    let mut driver = server_driver();

    let characteristics = driver
        .list_server_characteristics(Some(&Uuid::from_u16(0x1800)), 8)
        .unwrap();

    assert_eq!(1, characteristics.len());
    assert_eq!(0x0003, characteristics[0].handle);

    // the rest of the listing was flushed
    assert_eq!(0, driver.serial().pending());
    assert_eq!(0, driver.serial().get_ref().unread());

    let characteristics = driver
        .list_server_characteristics(Some(&Uuid::from_u16(0x1801)), 8)
        .unwrap();

    assert_eq!(1, characteristics.len());
    assert_eq!(0x0006, characteristics[0].handle);
}

#[test]
fn service_not_listed() {
    init_logging();

    let mut driver = server_driver();

    assert_eq!(
        Err(Error::ServiceNotListed),
        driver.list_server_characteristics(Some(&Uuid::from_u16(0x180F)), 8)
    );

    assert_eq!(1, driver.serial().get_ref().flush_count());
}

#[test]
fn capacity_limits_the_listing() {
    init_logging();

    let mut driver = server_driver();

    assert_eq!(1, driver.list_services(Listing::Server, 1).unwrap().len());
    assert_eq!(1, driver.list_server_characteristics(None, 1).unwrap().len());

    // the driver is back in step with the module
    assert_eq!(2, driver.list_services(Listing::Server, 8).unwrap().len());
}

#[test]
fn client_characteristics_in_chunks() {
    init_logging();

    let port = ScriptedSerial::new().respond_in_chunks(
        "LC",
        ["180F\r\n  2A19,00", "0B,12\r\n  2A1A,000E,02\r", "\nEND\r\n"],
    );

    let mut driver = Rn4020Driver::new(port);

    let characteristics = driver.list_client_characteristics(None, 8).unwrap();

    assert_eq!(2, characteristics.len());

    assert_eq!(Uuid::from_u16(0x180F), characteristics[0].service);
    assert_eq!(0x000B, characteristics[0].handle);
    assert!(characteristics[0].properties.contains(Properties::Read));
    assert!(characteristics[0].properties.contains(Properties::Notify));

    assert_eq!(Uuid::from_u16(0x2A1A), characteristics[1].uuid);
    assert_eq!(0x000E, characteristics[1].handle);
    assert!(characteristics[1].properties.contains(Properties::Read));
    assert!(!characteristics[1].properties.contains(Properties::Notify));

    assert_eq!(vec!["LC"], driver.serial().get_ref().sent_lines());
}

#[test]
fn long_uuid_services() {
    init_logging();

    let listing = "123456789ABCDEF0123456789ABCDEF0\r\n  2A19,000B,02\r\nEND\r\n";

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("LC", listing));

    let services = driver.list_services(Listing::Client, 8).unwrap();

    assert_eq!(1, services.len());
    assert!(!services[0].is_base_derived());
    assert_eq!(
        &0x1234_5678_9ABC_DEF0_1234_5678_9ABC_DEF0u128.to_be_bytes(),
        services[0].as_bytes()
    );
}

#[test]
fn listing_without_end() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("LS", "1800\r\n  2A00,0003,V\r\n"));

    assert_eq!(Ok(vec![Uuid::from_u16(0x1800)]), driver.list_services(Listing::Server, 8));

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("LS", "1800\r\n1801\r\n"));

    assert_eq!(
        Ok(vec![Uuid::from_u16(0x1800), Uuid::from_u16(0x1801)]),
        driver.list_services(Listing::Server, 8)
    );

    assert_eq!(1, driver.serial().get_ref().flush_count());
}

#[test]
fn characteristics_listing_without_end() {
    init_logging();

    let listing = "1800\r\n  2A00,0003,V\r\n1801\r\n  2A05,0006,C\r\n";

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("LS", listing));

    let characteristics = driver.list_server_characteristics(None, 8).unwrap();

    assert_eq!(2, characteristics.len());
    assert_eq!(Uuid::from_u16(0x2A05), characteristics[1].uuid);
}

#[test]
fn listing_without_reply() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new());

    assert_eq!(
        Err(Error::Serial(serial::Error::Timeout)),
        driver.list_services(Listing::Server, 8)
    );

    assert_eq!(vec!["LS"], driver.serial().get_ref().sent_lines());
}

#[test]
fn malformed_listing() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("LS", "18\r\nEND\r\n"));

    assert!(matches!(driver.list_services(Listing::Server, 8), Err(Error::InvalidUuid(_))));

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("LS", "1800\r\n  2A00,0003,Q\r\nEND\r\n"));

    assert!(matches!(
        driver.list_server_characteristics(None, 8),
        Err(Error::MalformedPayload(_))
    ));
}
