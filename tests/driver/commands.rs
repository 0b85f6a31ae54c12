//! Tests for the set, get, and action commands of the driver

use rn4020::driver::{BaudRate, Error, Features, IntervalWindow, Power, Timing};
use rn4020::gatt::{ClientConfiguration, Services};
use rn4020::serial::scripted::{ScriptedError, ScriptedSerial};
use rn4020::serial;
use rn4020::{MacAddress, Rn4020Driver, Uuid};

fn init_logging() {
    use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

    let _ = TermLogger::init(LevelFilter::Trace, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}

fn sent_lines(driver: &Rn4020Driver<ScriptedSerial>) -> Vec<String> {
    driver.serial().get_ref().sent_lines()
}

#[test]
fn set_acknowledged() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("SN", "AOK\r\n"));

    assert!(driver.set("SN", Some("MyName")));

    assert_eq!(b"SN,MyName\r\n", driver.serial().get_ref().sent());
}

#[test]
fn set_rejected() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("SS", "ERR\r\n"));

    assert!(!driver.set("SS", Some("80000000")));

    assert_eq!(Err(Error::Rejected("SS".to_string())), driver.try_set("SS", Some("80000000")));

    assert_eq!(
        Err(Error::Rejected("SS".to_string())),
        driver.set_services(Services::DEVICE_INFORMATION | Services::BATTERY)
    );

    assert_eq!(vec!["SS,80000000", "SS,80000000", "SS,C0000000"], sent_lines(&driver));
}

#[test]
fn set_without_reply() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new());

    assert!(!driver.set("SN", Some("MyName")));

    assert_eq!(
        Err(Error::Serial(serial::Error::Timeout)),
        driver.try_set("SN", Some("MyName"))
    );
}

#[test]
fn set_with_unexpected_reply() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("Y", "Huh\r\n"));

    assert_eq!(Err(Error::UnexpectedReply("Huh".to_string())), driver.stop_advertise());
}

#[test]
fn send_failure() {
    init_logging();

    let mut port = ScriptedSerial::new().respond_to_any("AOK\r\n");

    port.fail_sends(true);

    let mut driver = Rn4020Driver::new(port);

    assert!(!driver.set("SN", Some("MyName")));

    assert_eq!(
        Err(Error::Serial(serial::Error::Transport(ScriptedError))),
        driver.set_name("MyName")
    );
}

#[test]
fn get_name() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("GN", "TestDevice\r\n"));
    let mut buffer = [0u8; 64];

    let len = driver.get(Some("GN"), &mut buffer).unwrap();

    assert_eq!(10, len);
    assert_eq!(b"TestDevice", &buffer[..len]);

    assert_eq!(Ok("TestDevice".to_string()), driver.name());

    assert_eq!(vec!["GN", "GN"], sent_lines(&driver));
}

#[test]
fn typed_getters() {
    init_logging();

    let port = ScriptedSerial::new()
        .respond_to("GR", "24000000\r\n")
        .respond_to("GS", "C0000001\r\n")
        .respond_to("GB", "4\r\n")
        .respond_to("GP", "7\r\n")
        .respond_to("GT", "0006,0000,0064\r\n")
        .respond_to("GDH", "1.0\r\n")
        .respond_to("V", "MCHP BTLE v1.23.5 8/7/2015\r\n");

    let mut driver = Rn4020Driver::new(port);

    let features = driver.features().unwrap();

    assert!(features.contains(Features::AUTO_ADVERTISE));
    assert!(features.contains(Features::NO_DIRECT_ADVERTISEMENT));
    assert!(!features.contains(Features::CENTRAL));

    let services = driver.services().unwrap();

    assert!(services.contains(Services::DEVICE_INFORMATION | Services::BATTERY));
    assert!(services.contains(Services::USER_DEFINED_PRIVATE));

    assert_eq!(Ok(BaudRate::Baud115200), driver.baud_rate());
    assert_eq!(Ok(Power::MAX), driver.power());
    assert_eq!(Ok(Timing::default()), driver.timing());
    assert_eq!(Ok("1.0".to_string()), driver.hardware_revision());
    assert_eq!(Ok("MCHP BTLE v1.23.5 8/7/2015".to_string()), driver.firmware_version());
}

#[test]
fn malformed_getter_replies() {
    init_logging();

    let port = ScriptedSerial::new()
        .respond_to("GR", "2400ZZ00\r\n")
        .respond_to("GB", "9\r\n")
        .respond_to("GP", "8\r\n");

    let mut driver = Rn4020Driver::new(port);

    assert!(matches!(driver.features(), Err(Error::MalformedPayload(_))));
    assert_eq!(Err(Error::UnexpectedReply("9".to_string())), driver.baud_rate());
    assert_eq!(Err(Error::UnexpectedReply("8".to_string())), driver.power());
}

#[test]
fn typed_setters() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to_any("AOK\r\n"));

    driver.set_baud_rate(BaudRate::Baud9600).unwrap();
    driver.set_features(Features::AUTO_ADVERTISE | Features::MLDP).unwrap();
    driver.set_power(Power::new(3)).unwrap();
    driver.set_timing(Timing::default()).unwrap();
    driver.set_serialized_name("Sensor").unwrap();
    driver.set_manufacturer("Acme").unwrap();
    driver.reset_defaults(false).unwrap();

    let expected = vec![
        "SB,1",
        "SR,30000000",
        "SP,3",
        "ST,0006,0000,0064",
        "S-,Sensor",
        "SDN,Acme",
        "SF,1",
    ];

    assert_eq!(expected, sent_lines(&driver));
}

#[test]
fn invalid_parameters_are_not_sent() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to_any("AOK\r\n"));

    assert!(matches!(
        driver.set_name("A Very Long Peripheral Name"),
        Err(Error::InvalidParameter(_))
    ));

    assert!(matches!(
        driver.set_serialized_name("SixteenCharacter"),
        Err(Error::InvalidParameter(_))
    ));

    assert!(matches!(driver.broadcast(&[0u8; 26]), Err(Error::InvalidParameter(_))));

    assert!(driver.serial().get_ref().sent().is_empty());
}

#[test]
fn actions() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to_any("AOK\r\n"));

    let interval_window = IntervalWindow {
        interval: 0x0177,
        window: 0x00FA,
    };

    driver.advertise(None).unwrap();
    driver.advertise(Some(interval_window)).unwrap();
    driver.find(Some(interval_window)).unwrap();
    driver.observer(true).unwrap();
    driver.broadcast(&[0x02, 0x01, 0x06]).unwrap();
    driver.bond(true).unwrap();
    driver.unbond().unwrap();
    driver.kill().unwrap();
    driver.stop_scan().unwrap();
    driver.stop_connecting().unwrap();
    driver.update_timings(Timing::default()).unwrap();

    let expected = vec![
        "A",
        "A,0177,00FA",
        "F,0177,00FA",
        "J,1",
        "N,020106",
        "B,1",
        "U",
        "K",
        "X",
        "Z",
        "T,0006,0000,0064",
    ];

    assert_eq!(expected, sent_lines(&driver));
}

#[test]
fn establish() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("E", "AOK\r\n"));

    let address = MacAddress::new([0x00, 0x11, 0x22, 0xAA, 0xBB, 0xCC]);

    assert!(driver.establish(true, &address));
    assert!(driver.establish(false, &address));

    assert_eq!(vec!["E,0,001122AABBCC", "E,1,001122AABBCC"], sent_lines(&driver));
}

#[test]
fn signal_strength() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("M", "No Connection\r\n"));

    assert_eq!(Ok(None), driver.signal_strength());

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("M", "-38\r\n"));

    assert_eq!(Ok(Some(-56)), driver.signal_strength());
}

#[test]
fn reboot() {
    init_logging();

    let port = ScriptedSerial::new().respond_in_chunks("R,1", ["Reboot\r\n", "CMD\r\n"]);

    let mut driver = Rn4020Driver::new(port);

    assert!(driver.reboot());
    assert_eq!(Ok(()), driver.try_reboot());

    assert_eq!(vec!["R,1", "R,1"], sent_lines(&driver));
}

#[test]
fn reboot_without_banner() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_to("R,1", "Reboot\r\n"));

    assert_eq!(Err(Error::Serial(serial::Error::Timeout)), driver.try_reboot());

    let mut driver = Rn4020Driver::new(ScriptedSerial::new().respond_in_chunks("R,1", ["Reboot\r\n", "ERR\r\n"]));

    assert!(!driver.reboot());
}

#[test]
fn dump_returns_the_address_line() {
    init_logging();

    let port = ScriptedSerial::new().respond_to("D", "BTA=001122AABBCC\r\nName=RN4020_1234\r\nConnected=no\r\n");

    let mut driver = Rn4020Driver::new(port);

    assert_eq!(Ok("BTA=001122AABBCC".to_string()), driver.dump());

    assert_eq!(0, driver.serial().pending());
    assert_eq!(1, driver.serial().get_ref().flush_count());
}

#[test]
fn server_values() {
    init_logging();

    let port = ScriptedSerial::new()
        .respond_to("SHW", "AOK\r\n")
        .respond_to("SUW", "AOK\r\n")
        .respond_to("SHR,000B", "64\r\n")
        .respond_to("SUR,2A19", "0A0B\r\n");

    let mut driver = Rn4020Driver::new(port);

    let battery_level = Uuid::from_u16(0x2A19);

    driver.write_server_int(0x000B, 0x64u8).unwrap();
    driver.write_server_value(0x000B, &[0x01, 0x02]).unwrap();
    driver.write_server_value_by_uuid(&battery_level, &[0x64]).unwrap();

    assert_eq!(Ok(0x64u8), driver.read_server_int(0x000B));
    assert_eq!(Ok(vec![0x64]), driver.read_server_value(0x000B));
    assert_eq!(Ok(vec![0x0A, 0x0B]), driver.read_server_value_by_uuid(&battery_level));

    let expected = vec![
        "SHW,000B,64",
        "SHW,000B,0102",
        "SUW,2A19,64",
        "SHR,000B",
        "SHR,000B",
        "SUR,2A19",
    ];

    assert_eq!(expected, sent_lines(&driver));
}

#[test]
fn client_values() {
    init_logging();

    let port = ScriptedSerial::new()
        .respond_to("CURV,2A19", "R,64.\r\n")
        .respond_to("CHR,000B", "R,0102.\r\n")
        .respond_to("CURC,2A19", "R,0100.\r\n")
        .respond_to("CURV,2A1A", "64\r\n")
        .respond_to("CUWV", "AOK\r\n")
        .respond_to("CUWC", "AOK\r\n");

    let mut driver = Rn4020Driver::new(port);

    let battery_level = Uuid::from_u16(0x2A19);

    assert_eq!(Ok(vec![0x64]), driver.read_client_value(&battery_level));
    assert_eq!(Ok(0x64u8), driver.read_client_int(&battery_level));
    assert_eq!(Ok(vec![0x01, 0x02]), driver.read_client_value_by_handle(0x000B));
    assert_eq!(Ok(ClientConfiguration::Notifications), driver.client_configuration(&battery_level));

    assert_eq!(
        Err(Error::UnexpectedReply("64".to_string())),
        driver.read_client_value(&Uuid::from_u16(0x2A1A))
    );

    driver.write_client_int(&battery_level, 0x0102u16).unwrap();
    driver.set_client_configuration(&battery_level, true).unwrap();

    let lines = sent_lines(&driver);

    assert_eq!(Some(&"CUWV,2A19,0102".to_string()), lines.get(5));
    assert_eq!(Some(&"CUWC,2A19,1".to_string()), lines.get(6));
}

#[test]
fn dormant_expects_no_reply() {
    init_logging();

    let mut driver = Rn4020Driver::new(ScriptedSerial::new());

    assert_eq!(Ok(()), driver.dormant());

    assert_eq!(vec!["O"], sent_lines(&driver));
}
