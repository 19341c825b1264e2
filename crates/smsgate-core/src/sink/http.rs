//! HTTP relay sink
//!
//! Forwards each message to the remote queue endpoint as a JSON envelope.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::{MessageSink, SinkError};
use crate::config::RelaySettings;
use crate::message::{SmsEnqueueRequest, SmsRecord};

/// Per-request deadline against the relay server
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Enqueues each message on the relay server's SMS queue
pub struct HttpRelaySink {
    client: Client,
    endpoint: String,
    api_key: String,
    folder: String,
}

impl HttpRelaySink {
    /// Build the relay client for the configured server
    pub fn new(settings: &RelaySettings) -> Result<Self, SinkError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1/sms/enqueue",
                settings.server_url.trim_end_matches('/')
            ),
            api_key: settings.api_key.clone(),
            folder: settings.folder.clone(),
        })
    }
}

impl MessageSink for HttpRelaySink {
    fn name(&self) -> &str {
        "http-relay"
    }

    fn deliver(&self, message: &SmsRecord) -> Result<(), SinkError> {
        let request = SmsEnqueueRequest {
            sms_message: message.clone(),
            folder_name: self.folder.clone(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-Key", &self.api_key)
            .json(&request)
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(SinkError::Rejected { status, body });
        }

        debug!(index = message.index, "enqueued on server queue");
        Ok(())
    }
}
