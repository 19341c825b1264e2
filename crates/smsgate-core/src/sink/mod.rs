//! Message delivery sinks
//!
//! One capability for all downstream fan-out: a sink consumes one record
//! at a time. Email, HTTP relay and Redis publish are separate
//! implementations; multi-channel delivery composes them with
//! [`FanoutSink`].

mod email;
mod http;
mod redis;

pub use email::EmailSink;
pub use http::HttpRelaySink;
pub use redis::RedisSink;

use thiserror::Error;
use tracing::{debug, warn};

use crate::message::SmsRecord;

/// Delivery failures reported by sinks.
///
/// Sink errors never propagate into the polling loop — the poller logs
/// them and moves on.
#[derive(Error, Debug)]
pub enum SinkError {
    /// SMTP transport failure
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Email could not be built
    #[error("Email build error: {0}")]
    Email(#[from] lettre::error::Error),

    /// A configured mailbox address is malformed
    #[error("Address error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// HTTP request failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay server refused the message
    #[error("Relay rejected message: status {status}: {body}")]
    Rejected {
        /// HTTP status code returned by the relay
        status: u16,
        /// Response body, for the log line
        body: String,
    },

    /// Redis connection or publish failure
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// Record could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A downstream consumer of received messages
pub trait MessageSink: Send {
    /// Short sink name for log lines
    fn name(&self) -> &str;

    /// Deliver one message
    fn deliver(&self, message: &SmsRecord) -> Result<(), SinkError>;
}

/// Delivers each message to every configured sink.
///
/// Individual sink failures are logged and swallowed: one dead consumer
/// must not starve the others, and none of them may stall ingestion.
pub struct FanoutSink {
    sinks: Vec<Box<dyn MessageSink>>,
}

impl FanoutSink {
    /// Compose a set of sinks
    pub fn new(sinks: Vec<Box<dyn MessageSink>>) -> Self {
        Self { sinks }
    }

    /// Number of composed sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// True when no sinks are configured
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl MessageSink for FanoutSink {
    fn name(&self) -> &str {
        "fanout"
    }

    fn deliver(&self, message: &SmsRecord) -> Result<(), SinkError> {
        if self.sinks.is_empty() {
            debug!(index = message.index, sender = %message.sender, "no sinks configured, message dropped after logging");
            return Ok(());
        }

        for sink in &self.sinks {
            if let Err(e) = sink.deliver(message) {
                warn!(sink = sink.name(), index = message.index, error = %e, "delivery failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingSink {
        delivered: Arc<Mutex<Vec<u32>>>,
        fail: bool,
    }

    impl MessageSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        fn deliver(&self, message: &SmsRecord) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Rejected {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.delivered.lock().unwrap().push(message.index);
            Ok(())
        }
    }

    fn record(index: u32) -> SmsRecord {
        SmsRecord {
            sender: "+1".to_string(),
            message: "Hi".to_string(),
            sent: String::new(),
            received: String::new(),
            device: "/dev/ttyUSB0".to_string(),
            imei: String::new(),
            alphabet: "UCS2".to_string(),
            index,
            length: 2,
        }
    }

    #[test]
    fn test_fanout_delivers_to_all() {
        let a = Arc::new(Mutex::new(Vec::new()));
        let b = Arc::new(Mutex::new(Vec::new()));
        let fanout = FanoutSink::new(vec![
            Box::new(RecordingSink {
                delivered: a.clone(),
                fail: false,
            }),
            Box::new(RecordingSink {
                delivered: b.clone(),
                fail: false,
            }),
        ]);

        fanout.deliver(&record(3)).unwrap();
        assert_eq!(*a.lock().unwrap(), vec![3]);
        assert_eq!(*b.lock().unwrap(), vec![3]);
    }

    #[test]
    fn test_fanout_continues_past_failing_sink() {
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let fanout = FanoutSink::new(vec![
            Box::new(RecordingSink {
                delivered: delivered.clone(),
                fail: true,
            }),
            Box::new(RecordingSink {
                delivered: delivered.clone(),
                fail: false,
            }),
        ]);

        // The failing sink must not block the second one, and the fanout
        // itself reports success
        fanout.deliver(&record(9)).unwrap();
        assert_eq!(*delivered.lock().unwrap(), vec![9]);
    }

    #[test]
    fn test_empty_fanout_is_ok() {
        let fanout = FanoutSink::new(Vec::new());
        assert!(fanout.is_empty());
        fanout.deliver(&record(1)).unwrap();
    }
}
