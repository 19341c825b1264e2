//! Redis publish sink
//!
//! Publishes each message JSON-encoded to a `sms:<folder>` channel for
//! subscribers on the local network.

use std::time::Duration;

use redis::{Client, Commands};
use tracing::debug;

use super::{MessageSink, SinkError};
use crate::config::RedisSettings;
use crate::message::SmsRecord;

/// Deadline for establishing a connection to the Redis server
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes each message to a Redis pub/sub channel
pub struct RedisSink {
    client: Client,
    channel: String,
}

impl RedisSink {
    /// Build the client and ping the server once, so a dead Redis is
    /// caught at startup. The daemon treats that failure as "skip this
    /// sink", not as fatal.
    pub fn new(settings: &RedisSettings) -> Result<Self, SinkError> {
        let client = Client::open(format!("redis://{}:{}/", settings.host, settings.port))?;

        let mut conn = client.get_connection_with_timeout(CONNECT_TIMEOUT)?;
        redis::cmd("PING").query::<String>(&mut conn)?;

        Ok(Self {
            client,
            channel: format!("sms:{}", settings.folder),
        })
    }
}

impl MessageSink for RedisSink {
    fn name(&self) -> &str {
        "redis"
    }

    fn deliver(&self, message: &SmsRecord) -> Result<(), SinkError> {
        let payload = serde_json::to_string(message)?;

        let mut conn = self.client.get_connection_with_timeout(CONNECT_TIMEOUT)?;
        let _: () = conn.publish(&self.channel, payload)?;

        debug!(index = message.index, channel = %self.channel, "published message");
        Ok(())
    }
}
