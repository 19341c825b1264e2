//! # smsgate Core Library
//!
//! Core functionality for the smsgate SMS gateway.
//!
//! This library provides:
//! - GSM modem AT-command driver (serial transport, command/response
//!   engine, UCS2 decoding, `+CMGL` list parsing)
//! - Session lifecycle and fixed-interval message polling
//! - Delivery sinks: email, HTTP relay queue, Redis publish
//! - Gateway configuration
//!
//! ## Example
//!
//! ```rust,ignore
//! use smsgate_core::modem::{ModemSession, PollerConfig, SessionConfig, SmsPoller};
//! use smsgate_core::sink::FanoutSink;
//!
//! let mut session = ModemSession::open(&SessionConfig::default())?;
//! session.initialize()?;
//!
//! let sink = FanoutSink::new(vec![]);
//! let mut poller = SmsPoller::new(session, PollerConfig::default());
//! poller.run(&sink);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod message;
pub mod modem;
pub mod sink;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ConfigError, GatewayConfig};
    pub use crate::message::{SmsEnqueueRequest, SmsRecord};
    pub use crate::modem::{
        ModemError, ModemSession, PollerConfig, SessionConfig, SessionState, SmsPoller,
    };
    pub use crate::sink::{FanoutSink, MessageSink, SinkError};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
