//! SMS data model

use serde::{Deserialize, Serialize};

/// One SMS message as produced by the modem driver.
///
/// Serialized field names match the wire format of the original gateway
/// deployment, so downstream consumers keep working unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsRecord {
    /// Sender phone number or alphanumeric ID, UCS2-decoded
    #[serde(rename = "from")]
    pub sender: String,

    /// Decoded message body, UTF-8
    pub message: String,

    /// Modem-supplied send timestamp, passed through verbatim
    pub sent: String,

    /// Driver-assigned receive timestamp, set at parse time
    pub received: String,

    /// Device path of the modem transport (e.g. `/dev/ttyUSB0`)
    #[serde(rename = "modem_device")]
    pub device: String,

    /// 15-digit modem identity, resolved once at initialization.
    /// Empty when the modem did not report one.
    pub imei: String,

    /// Encoding tag of the body
    pub alphabet: String,

    /// Modem-assigned storage slot, required for deletion. Only meaningful
    /// until the message is deleted or modem storage is otherwise mutated;
    /// never cache it across polling cycles.
    pub index: u32,

    /// Character count of the decoded body
    pub length: usize,
}

/// Envelope posted to the HTTP relay queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsEnqueueRequest {
    /// The message being enqueued
    pub sms_message: SmsRecord,

    /// Logical queue folder on the server
    pub folder_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_record() -> SmsRecord {
        SmsRecord {
            sender: "+573001234567".to_string(),
            message: "Hello".to_string(),
            sent: "26/01/17 00:59:09".to_string(),
            received: "2026-01-17 01:00:02".to_string(),
            device: "/dev/ttyUSB0".to_string(),
            imei: "355270044616142".to_string(),
            alphabet: "UCS2".to_string(),
            index: 3,
            length: 5,
        }
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["from"], "+573001234567");
        assert_eq!(json["message"], "Hello");
        assert_eq!(json["modem_device"], "/dev/ttyUSB0");
        assert_eq!(json["index"], 3);
        assert_eq!(json["length"], 5);
    }

    #[test]
    fn test_record_roundtrip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: SmsRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_enqueue_envelope() {
        let request = SmsEnqueueRequest {
            sms_message: sample_record(),
            folder_name: "incoming".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["folder_name"], "incoming");
        assert_eq!(json["sms_message"]["from"], "+573001234567");
    }
}
