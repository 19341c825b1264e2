//! GSM Modem AT-Command Driver
//!
//! Talks to a serial GSM modem in SMS text mode: issues AT commands over a
//! half-duplex text channel, parses the loosely-delimited multi-line
//! responses, decodes UCS2 payloads, and polls stored messages on a fixed
//! cadence.
//!
//! Receive-only: listing and deleting stored messages. Sending SMS is not
//! supported.

mod channel;
mod command;
pub mod decode;
mod engine;
mod error;
pub mod parser;
mod poller;
pub mod serial;
mod session;

pub use channel::{ModemChannel, SerialChannel, TcpChannel};
pub use command::{AtCommand, INIT_SEQUENCE};
pub use decode::{decode_ucs2, extract_imei};
pub use engine::{CommandEngine, ERROR_TOKEN, OK_TOKEN};
pub use error::ModemError;
pub use parser::parse_list_response;
pub use poller::{PollerConfig, SmsPoller, DEFAULT_POLL_INTERVAL};
pub use serial::{list_ports, open_port, PortInfo};
pub use session::{ModemSession, SessionConfig, SessionState};

use std::time::Duration;

/// Default baud rate for GSM modems
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Default deadline for one command/response round-trip
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
