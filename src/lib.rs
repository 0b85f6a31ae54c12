//! A host side driver for the RN4020 Bluetooth Low Energy module
//!
//! The RN4020 is controlled over UART with a line oriented ASCII command protocol. Every command is
//! a short command code optionally followed by comma separated parameters and terminated with
//! `"\r\n"`. Set commands are answered with `AOK` or `ERR`, get commands with a single line of text
//! or hexadecimal, and the listing and scan commands answer with several lines.
//!
//! The layers of this library, from the bottom up, are
//! * [`serial`]: the raw byte transport capability ([`Serial`](serial::Serial)) and the delimiter
//!   framing ([`DelimiterSerial`](serial::DelimiterSerial)) that splits the byte stream into lines.
//! * [`hex`], [`MacAddress`], and [`Uuid`]: conversions between the wire's hexadecimal text and
//!   typed values.
//! * [`driver`]: the command protocol ([`Rn4020Driver`](driver::Rn4020Driver)), including the
//!   parsers for listings and scan results.
//! * [`device`]: a thin facade that strings driver commands into device level actions.
//!
//! There is no concurrency within this library. Every operation blocks until the module has
//! answered or the transport's per read timeout has expired a bounded number of times.
//!
//! ## Features
//! * `serde`: implements `Serialize` and `Deserialize` for the value types.
//! * `uuid-crate`: conversions between [`Uuid`] and [uuid::Uuid](https://docs.rs/uuid).
//! * `test-util`: the scripted fake transport `serial::scripted::ScriptedSerial`.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod address;
pub mod device;
pub mod driver;
pub mod gatt;
pub mod hex;
pub mod peripheral;
pub mod serial;
pub mod uuid;

pub use address::MacAddress;
pub use device::Rn4020Device;
pub use driver::Rn4020Driver;
pub use peripheral::Peripheral;
pub use uuid::Uuid;
