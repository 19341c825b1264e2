//! SMTP delivery sink
//!
//! One email per SMS. The subject carries the modem-supplied send stamp
//! and the phone number the message was addressed to, resolved from the
//! record's IMEI via the configured mapping.

use std::collections::HashMap;

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use super::{MessageSink, SinkError};
use crate::config::EmailSettings;
use crate::message::SmsRecord;

/// Delivers each message as a plain-text email over SMTP
pub struct EmailSink {
    transport: SmtpTransport,
    account: Mailbox,
    recipients: Vec<Mailbox>,
    imei_to_phone: HashMap<String, String>,
}

impl EmailSink {
    /// Build a STARTTLS submission transport for the configured account.
    /// Address parsing happens here so a bad config fails at startup, not
    /// on the first message.
    pub fn new(
        settings: &EmailSettings,
        imei_to_phone: HashMap<String, String>,
    ) -> Result<Self, SinkError> {
        let transport = SmtpTransport::starttls_relay(&settings.smtp_host)?
            .credentials(Credentials::new(
                settings.account.clone(),
                settings.password.clone(),
            ))
            .build();

        let account: Mailbox = settings.account.parse()?;
        let recipients = settings
            .recipients
            .iter()
            .map(|r| r.parse())
            .collect::<Result<Vec<Mailbox>, _>>()?;

        Ok(Self {
            transport,
            account,
            recipients,
            imei_to_phone,
        })
    }
}

impl MessageSink for EmailSink {
    fn name(&self) -> &str {
        "email"
    }

    fn deliver(&self, message: &SmsRecord) -> Result<(), SinkError> {
        let sent_to = self
            .imei_to_phone
            .get(&message.imei)
            .map(String::as_str)
            .unwrap_or_default();

        let mut builder = Message::builder()
            .from(self.account.clone())
            .subject(format!("[SMS DATE TO] {} {}", message.sent, sent_to));
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        let email = builder.body(format!(
            "{}\n\n----------------------------\nFrom: {}\nDevice: {}\nIMEI: {}\n----------------------------\n",
            message.message, message.sender, message.device, message.imei
        ))?;

        self.transport.send(&email)?;
        debug!(index = message.index, "email sent");
        Ok(())
    }
}
