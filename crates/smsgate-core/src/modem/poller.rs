//! Polling scheduler
//!
//! Drives the session on a fixed cadence: one immediate drain at start,
//! then list → deliver → (delete) on every tick, forever. Shutdown is
//! process-level; in-flight reads are left to time out naturally.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::error::ModemError;
use super::session::ModemSession;
use crate::sink::MessageSink;

/// Default cadence between poll cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polling configuration, fixed at construction
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Interval between poll cycles
    pub interval: Duration,

    /// Delete each message from modem storage once the sink has seen it.
    /// A failed delete is logged, not escalated: the message is re-listed
    /// (and re-delivered) on the next cycle — duplicate delivery is the
    /// accepted trade-off over message loss.
    pub delete_after_read: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            delete_after_read: true,
        }
    }
}

/// Polls the session and fans each received record out to the sink
pub struct SmsPoller {
    session: ModemSession,
    config: PollerConfig,
}

impl SmsPoller {
    /// Take ownership of an initialized session
    pub fn new(session: ModemSession, config: PollerConfig) -> Self {
        Self { session, config }
    }

    /// Run one list → deliver → (delete) cycle. Returns the number of
    /// messages handled.
    ///
    /// The sink sees each record exactly once per cycle; sink failures are
    /// logged and never abort the cycle. Deletion (when enabled) happens
    /// after delivery, per record.
    pub fn poll_once(&mut self, sink: &dyn MessageSink) -> Result<usize, ModemError> {
        let messages = self.session.list_messages()?;

        for message in &messages {
            debug!(index = message.index, length = message.length, "dispatching message");
            if let Err(e) = sink.deliver(message) {
                // Downstream delivery is the sink's concern; the message is
                // still consumed (and deleted) this cycle
                warn!(sink = sink.name(), index = message.index, error = %e, "sink delivery failed");
            }

            if self.config.delete_after_read {
                if let Err(e) = self.session.delete_message(message.index) {
                    warn!(index = message.index, error = %e, "failed to delete consumed message");
                }
            }
        }

        Ok(messages.len())
    }

    /// Poll forever: an immediate drain first, then one cycle per interval.
    ///
    /// Per-cycle failures (a transiently unresponsive modem) are logged and
    /// the next tick proceeds; the loop only ends with the process.
    pub fn run(&mut self, sink: &dyn MessageSink) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            delete_after_read = self.config.delete_after_read,
            "starting SMS polling"
        );

        let mut first = true;
        loop {
            let next_tick = Instant::now() + self.config.interval;

            match self.poll_once(sink) {
                Ok(count) if count > 0 => info!(count, "processed messages"),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "poll cycle failed"),
            }
            if first {
                debug!("initial drain complete");
                first = false;
            }

            // Cadence stays fixed when a cycle runs long; ticks never queue
            thread::sleep(next_tick.saturating_duration_since(Instant::now()));
        }
    }
}
