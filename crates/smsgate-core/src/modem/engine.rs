//! Command/response engine
//!
//! Sends one AT command line and accumulates the response until a terminal
//! token or the deadline. The modem offers no explicit acknowledgment
//! format, so success/failure is judged from content by the caller; the
//! engine only distinguishes hard I/O failures.

use std::io::{ErrorKind, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

use super::channel::ModemChannel;
use super::error::ModemError;

/// Token terminating a successful response
pub const OK_TOKEN: &str = "OK";

/// Token terminating a failed response
pub const ERROR_TOKEN: &str = "ERROR";

/// Per-read timeout on the channel; the overall deadline is the engine's
const CHANNEL_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Pause between empty reads while waiting on the modem
const POLL_SLEEP: Duration = Duration::from_millis(50);

/// Owns the channel and serializes command/response exchanges over it
pub struct CommandEngine {
    channel: Box<dyn ModemChannel>,
    read_timeout: Duration,
}

impl CommandEngine {
    /// Take exclusive ownership of the channel. `read_timeout` is the
    /// deadline for one full command/response round-trip.
    pub fn new(
        mut channel: Box<dyn ModemChannel>,
        read_timeout: Duration,
    ) -> Result<Self, ModemError> {
        channel.set_timeout(CHANNEL_READ_TIMEOUT)?;
        Ok(Self {
            channel,
            read_timeout,
        })
    }

    /// Send one command line (terminator appended here) and return the raw
    /// response text.
    ///
    /// Accumulates until the buffer contains `OK` or `ERROR`, or the
    /// deadline elapses. A timeout is not an error: whatever was read so
    /// far is returned and the caller interprets it. Only hard I/O
    /// failures surface as `Err`. No retries — retry policy belongs to the
    /// caller.
    pub fn send(&mut self, line: &str) -> Result<String, ModemError> {
        // Drop any stale bytes from a previous (possibly timed-out) exchange
        self.channel.clear_input_buffer()?;

        self.channel.write_all(line.as_bytes())?;
        self.channel.write_all(b"\r")?;
        self.channel.flush()?;

        let mut response = Vec::new();
        let mut buf = [0u8; 512];
        let deadline = Instant::now() + self.read_timeout;

        while Instant::now() < deadline {
            match self.channel.read(&mut buf) {
                Ok(0) => break, // EOF
                Ok(n) => {
                    response.extend_from_slice(&buf[..n]);
                    let text = String::from_utf8_lossy(&response);
                    if text.contains(OK_TOKEN) || text.contains(ERROR_TOKEN) {
                        break;
                    }
                }
                Err(e)
                    if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock =>
                {
                    // No data yet; the deadline decides when to give up
                    thread::sleep(POLL_SLEEP);
                }
                Err(e) => return Err(ModemError::Io(e)),
            }
        }

        let text = String::from_utf8_lossy(&response).into_owned();
        trace!(command = line, bytes = response.len(), "modem exchange complete");
        Ok(text)
    }
}
