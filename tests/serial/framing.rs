//! Tests for the line framing of a DelimiterSerial

use rand::Rng;
use rn4020::serial::scripted::{ScriptedError, ScriptedSerial};
use rn4020::serial::{DelimiterSerial, Error};

fn init_logging() {
    use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

    let _ = TermLogger::init(LevelFilter::Trace, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}

const LINES: &[&str] = &[
    "AOK",
    "TestDevice",
    "",
    "001122AABBCC,0,MyDevice,,C8",
    "CMD",
    "  2A19,000B,V",
    "END",
];

#[test]
fn line_split_at_every_boundary() {
    init_logging();

    let line = b"GN\r\n";

    for split in 1..line.len() {
        let mut port = ScriptedSerial::new();

        port.push_incoming(&line[..split]);
        port.push_incoming(&line[split..]);

        let mut serial = DelimiterSerial::<_, 32>::new(&mut port);
        let mut buffer = [0u8; 32];

        let len = serial.receive(&mut buffer).unwrap();

        assert_eq!(b"GN", &buffer[..len], "split at {}", split);
        assert_eq!(0, buffer[len]);
        assert_eq!(0, serial.pending());
    }
}

#[test]
fn random_fragmentation() {
    init_logging();

    let mut rng = rand::thread_rng();

    let stream: Vec<u8> = LINES.iter().flat_map(|line| [line.as_bytes(), &b"\r\n"[..]].concat()).collect();

    for _ in 0..50 {
        let mut port = ScriptedSerial::new();
        let mut rest = &stream[..];

        while !rest.is_empty() {
            let size = rng.gen_range(1..=rest.len().min(9));

            port.push_incoming(&rest[..size]);

            rest = &rest[size..];
        }

        let mut serial = DelimiterSerial::<_, 128>::new(port);
        let mut buffer = [0u8; 64];

        for expected in LINES {
            let len = serial.receive(&mut buffer).unwrap();

            assert_eq!(expected.as_bytes(), &buffer[..len]);
        }

        assert_eq!(Err(Error::Timeout), serial.receive(&mut buffer));
    }
}

#[test]
fn incomplete_line_is_kept_on_timeout() {
    init_logging();

    let mut serial = DelimiterSerial::<_, 32>::new(ScriptedSerial::new());
    let mut buffer = [0u8; 32];

    serial.get_mut().push_incoming("TestDe");

    assert_eq!(Err(Error::Timeout), serial.receive(&mut buffer));
    assert_eq!(6, serial.pending());

    serial.get_mut().push_incoming("vice\r\nAOK");

    let len = serial.receive(&mut buffer).unwrap();

    assert_eq!(b"TestDevice", &buffer[..len]);
    assert_eq!(3, serial.pending());
}

#[test]
fn ring_overflow() {
    init_logging();

    // the ring holds at most seven bytes
    let mut serial = DelimiterSerial::<_, 8>::new(ScriptedSerial::new());
    let mut buffer = [0u8; 32];

    serial.get_mut().push_incoming("A\r\n0123456789");

    assert_eq!(Err(Error::BufferOverflow), serial.receive(&mut buffer));

    serial.flush();

    assert_eq!(1, serial.get_ref().flush_count());

    serial.get_mut().push_incoming("OK\r\n");

    let len = serial.receive(&mut buffer).unwrap();

    assert_eq!(b"OK", &buffer[..len]);
}

#[test]
fn buffer_filled_without_delimiter() {
    init_logging();

    let mut serial = DelimiterSerial::<_, 32>::new(ScriptedSerial::new());
    let mut buffer = [0u8; 4];

    serial.get_mut().push_incoming("ABCDEFGH\r\n");

    assert_eq!(Err(Error::BufferOverflow), serial.receive(&mut buffer));

    serial.flush();

    assert_eq!(Err(Error::Timeout), serial.receive(&mut buffer));
    assert_eq!(Err(Error::BufferOverflow), serial.receive(&mut []));
}

#[test]
fn transport_failures() {
    init_logging();

    let mut serial = DelimiterSerial::<_, 32>::new(ScriptedSerial::new());
    let mut buffer = [0u8; 32];

    serial.get_mut().fail_receives(true);

    assert_eq!(Err(Error::Transport(ScriptedError)), serial.receive(&mut buffer));

    serial.get_mut().fail_sends(true);

    assert_eq!(Err(Error::Transport(ScriptedError)), serial.send(Some("GN".as_bytes())));
}

#[test]
fn raw_receive_drains_the_ring_first() {
    init_logging();

    let mut serial = DelimiterSerial::<_, 32>::new(ScriptedSerial::new());
    let mut buffer = [0u8; 32];

    serial.get_mut().push_incoming("AOK\r\nxyz");
    serial.get_mut().push_incoming("raw");

    assert_eq!(Ok(3), serial.receive(&mut buffer));

    assert_eq!(Ok(3), serial.receive_raw(&mut buffer));
    assert_eq!(b"xyz", &buffer[..3]);

    assert_eq!(Ok(3), serial.receive_raw(&mut buffer));
    assert_eq!(b"raw", &buffer[..3]);

    assert_eq!(Ok(0), serial.receive_raw(&mut buffer));
}

#[test]
fn send_frames_the_payload() {
    init_logging();

    let mut serial = DelimiterSerial::<_, 32>::new(ScriptedSerial::new());

    assert_eq!(Ok(4), serial.send(Some("GN".as_bytes())));
    assert_eq!(Ok(2), serial.send(None));
    assert_eq!(Ok(2), serial.send(Some(&b""[..])));

    assert_eq!(b"GN\r\n\r\n\r\n", serial.get_ref().sent());
}

#[test]
fn internal_flush_keeps_the_transport() {
    init_logging();

    let mut serial = DelimiterSerial::<_, 32>::new(ScriptedSerial::new());
    let mut buffer = [0u8; 32];

    serial.get_mut().push_incoming("AOK\r\nstale");
    serial.get_mut().push_incoming("CMD\r\n");

    assert_eq!(Ok(3), serial.receive(&mut buffer));

    serial.flush_internal();

    assert_eq!(0, serial.pending());
    assert_eq!(0, serial.get_ref().flush_count());

    let len = serial.receive(&mut buffer).unwrap();

    assert_eq!(b"CMD", &buffer[..len]);
}
