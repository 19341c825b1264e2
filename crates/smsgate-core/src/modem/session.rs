//! Modem session management
//!
//! Owns the transport and the command engine, tracks the session lifecycle
//! and the device identity, and exposes the high-level operations:
//! initialize, list messages, delete message.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::channel::ModemChannel;
use super::command::{AtCommand, INIT_SEQUENCE};
use super::decode::extract_imei;
use super::engine::{CommandEngine, OK_TOKEN};
use super::error::ModemError;
use super::parser::parse_list_response;
use super::serial::open_port;
use super::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};
use crate::message::SmsRecord;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; setup sequence not yet run
    Created,
    /// Setup sequence in progress
    Initializing,
    /// Setup complete; list/delete available
    Ready,
    /// Session shut down; all operations fail
    Closed,
}

/// Session configuration, fixed at construction
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Serial device path (e.g. `/dev/ttyUSB0`)
    pub device: String,

    /// Baud rate
    pub baud_rate: u32,

    /// Deadline for one command/response round-trip
    pub read_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device: "/dev/ttyUSB0".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// A session with one GSM modem.
///
/// Exclusive owner of the transport: no other component reads or writes
/// the line. All operations are synchronous and blocking for the duration
/// of the round-trip; the session is not designed for concurrent use —
/// correctness depends on exclusive ownership, not internal locking.
pub struct ModemSession {
    engine: CommandEngine,
    device: String,
    state: SessionState,
    imei: String,
}

impl ModemSession {
    /// Open the configured serial device and wrap it in a session
    pub fn open(config: &SessionConfig) -> Result<Self, ModemError> {
        let channel = open_port(&config.device, config.baud_rate)?;
        Self::with_channel(Box::new(channel), &config.device, config.read_timeout)
    }

    /// Build a session over an already-open channel (TCP bridges, tests)
    pub fn with_channel(
        channel: Box<dyn ModemChannel>,
        device: &str,
        read_timeout: Duration,
    ) -> Result<Self, ModemError> {
        Ok(Self {
            engine: CommandEngine::new(channel, read_timeout)?,
            device: device.to_string(),
            state: SessionState::Created,
            imei: String::new(),
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Device path of the transport
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Resolved IMEI; empty until initialization, or when the modem did not
    /// report one
    pub fn imei(&self) -> &str {
        &self.imei
    }

    /// Run the fixed setup sequence, then resolve the device identity.
    ///
    /// All-or-nothing: the first step whose response lacks the success
    /// token aborts with that step named, and no further setup commands
    /// are sent. A missing IMEI is tolerated — identity is informational,
    /// not required for message flow.
    pub fn initialize(&mut self) -> Result<(), ModemError> {
        info!(device = %self.device, "initializing GSM modem");
        self.state = SessionState::Initializing;

        match self.run_setup() {
            Ok(()) => {
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Created;
                Err(e)
            }
        }
    }

    fn run_setup(&mut self) -> Result<(), ModemError> {
        for command in INIT_SEQUENCE {
            let response = self.engine.send(&command.line())?;
            if !response.contains(OK_TOKEN) {
                return Err(ModemError::InitFailed {
                    step: command.description(),
                    response,
                });
            }
            debug!(step = command.description(), "setup step complete");
        }

        let response = self.engine.send(&AtCommand::QueryImei.line())?;
        match extract_imei(&response) {
            Some(imei) => {
                info!(imei = %imei, "modem identity resolved");
                self.imei = imei;
            }
            None => warn!("no IMEI in identity response"),
        }

        Ok(())
    }

    /// List all messages currently in modem storage.
    ///
    /// The raw response must carry the success token before any parsing is
    /// attempted; a token-less response is a failed operation, not a parse
    /// input.
    pub fn list_messages(&mut self) -> Result<Vec<SmsRecord>, ModemError> {
        self.ensure_ready()?;

        let command = AtCommand::ListAll;
        let response = self.engine.send(&command.line())?;
        if !response.contains(OK_TOKEN) {
            return Err(ModemError::CommandFailed {
                command: command.line(),
                response,
            });
        }

        let records = parse_list_response(&response, &self.device, &self.imei);
        debug!(count = records.len(), "listed stored messages");
        Ok(records)
    }

    /// Delete the message at `index` from modem storage (permanent removal)
    pub fn delete_message(&mut self, index: u32) -> Result<(), ModemError> {
        self.ensure_ready()?;

        let response = self.engine.send(&AtCommand::Delete(index).line())?;
        if !response.contains(OK_TOKEN) {
            return Err(ModemError::DeleteFailed { index, response });
        }

        debug!(index, "deleted message");
        Ok(())
    }

    /// Close the session; any further operation fails with `NotReady`
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    fn ensure_ready(&self) -> Result<(), ModemError> {
        if self.state != SessionState::Ready {
            return Err(ModemError::NotReady);
        }
        Ok(())
    }
}
