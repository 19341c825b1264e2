//! `+CMGL` list-response parsing
//!
//! A list response is a sequence of lines: each stored message is a header
//! line followed (usually) by one line of UCS2-encoded body, the whole
//! thing terminated by `OK`. Header fields are split on literal commas
//! with no quoting support — the observed modem format was never verified
//! against the full AT specification, so the deployed literal-split
//! behavior is preserved rather than replaced with a CSV-aware parser.

use chrono::Local;
use tracing::{debug, warn};

use super::decode::decode_ucs2;
use super::engine::OK_TOKEN;
use crate::message::SmsRecord;

/// Marker token introducing one stored message
const HEADER_MARKER: &str = "+CMGL:";

/// Layout of the driver-assigned receive timestamp
const RECEIVED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a raw `AT+CMGL="ALL"` response into records, in modem-reported
/// order.
///
/// Header format: `+CMGL: 0,"REC READ","002B0031...",,"26/01/17,00:59:09-20"`
/// — field 0 carries the storage index after the colon, field 2 the
/// UCS2-encoded sender in quotes, field 4 (when present) a quoted
/// timestamp. A header with fewer than 4 comma-separated fields is skipped
/// entirely; sibling entries still parse. The body is the next non-blank
/// line before the terminator or the next header; a header with no body
/// yields a record with an empty body.
pub fn parse_list_response(raw: &str, device: &str, imei: &str) -> Vec<SmsRecord> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let mut records = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if !line.contains(HEADER_MARKER) {
            i += 1;
            continue;
        }

        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 4 {
            // Structurally broken entry: drop it, never emit a partial record
            warn!(line, "skipping list entry with too few fields");
            i += 1;
            continue;
        }

        let index = parts[0]
            .split(':')
            .nth(1)
            .map(str::trim)
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(0);
        let sender = decode_ucs2(parts[2].trim().trim_matches('"'));
        let sent = if parts.len() >= 5 {
            parts[4].trim().trim_matches('"').to_string()
        } else {
            String::new()
        };

        // Body is on the next non-blank line, unless the buffer ends or the
        // next header begins first. The scan never consumes a header line,
        // so a later entry's content is never folded into this record.
        let mut body = "";
        i += 1;
        while i < lines.len()
            && !lines[i].contains(OK_TOKEN)
            && !lines[i].contains(HEADER_MARKER)
        {
            if !lines[i].trim().is_empty() {
                body = lines[i].trim();
                break;
            }
            i += 1;
        }

        let message = decode_ucs2(body);
        debug!(index, sender = %sender, length = message.chars().count(), "parsed stored message");

        records.push(SmsRecord {
            sender,
            length: message.chars().count(),
            message,
            sent,
            received: Local::now().format(RECEIVED_FORMAT).to_string(),
            device: device.to_string(),
            imei: imei.to_string(),
            alphabet: "UCS2".to_string(),
            index,
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEVICE: &str = "/dev/ttyUSB0";
    const IMEI: &str = "355270044616142";

    fn parse(raw: &str) -> Vec<SmsRecord> {
        parse_list_response(raw, DEVICE, IMEI)
    }

    #[test]
    fn test_two_entries_in_order() {
        let raw = "\r\n+CMGL: 0,\"REC READ\",\"002B003100320033\",,\"26/01/17 00:59:09\"\r\n\
                   00480065006C006C006F\r\n\
                   +CMGL: 1,\"REC UNREAD\",\"002B0034\",,\"26/01/18 10:00:00\"\r\n\
                   0057006F0072006C0064\r\n\
                   \r\nOK\r\n";
        let records = parse(raw);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].index, 0);
        assert_eq!(records[0].sender, "+123");
        assert_eq!(records[0].message, "Hello");
        assert_eq!(records[0].sent, "26/01/17 00:59:09");
        assert_eq!(records[0].length, 5);
        assert_eq!(records[0].device, DEVICE);
        assert_eq!(records[0].imei, IMEI);
        assert_eq!(records[0].alphabet, "UCS2");

        assert_eq!(records[1].index, 1);
        assert_eq!(records[1].sender, "+4");
        assert_eq!(records[1].message, "World");
    }

    #[test]
    fn test_short_header_skipped_without_corrupting_rest() {
        let raw = "+CMGL: 0,\"REC READ\",\"002B\"\r\n\
                   +CMGL: 1,\"REC READ\",\"002B0035\",,\"26/01/19 08:00:00\"\r\n\
                   00480069\r\n\
                   OK\r\n";
        let records = parse(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[0].sender, "+5");
        assert_eq!(records[0].message, "Hi");
    }

    #[test]
    fn test_header_with_no_body_yields_empty_message() {
        let raw = "+CMGL: 2,\"REC READ\",\"002B0036\",,\"26/01/20 12:00:00\"\r\nOK\r\n";
        let records = parse(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 2);
        assert_eq!(records[0].message, "");
        assert_eq!(records[0].length, 0);
    }

    #[test]
    fn test_header_at_end_of_buffer() {
        let raw = "+CMGL: 3,\"REC READ\",\"002B0037\",,\"26/01/21 09:00:00\"";
        let records = parse(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 3);
        assert_eq!(records[0].message, "");
    }

    #[test]
    fn test_consecutive_headers_never_conflate_bodies() {
        let raw = "+CMGL: 0,\"REC READ\",\"002B0031\",,\"26/01/17 00:00:00\"\r\n\
                   \r\n\
                   +CMGL: 1,\"REC READ\",\"002B0032\",,\"26/01/17 00:01:00\"\r\n\
                   00480069\r\n\
                   OK\r\n";
        let records = parse(raw);
        assert_eq!(records.len(), 2);
        // The blank line between headers must not pull entry 1's body into entry 0
        assert_eq!(records[0].message, "");
        assert_eq!(records[1].message, "Hi");
    }

    #[test]
    fn test_index_taken_after_colon() {
        let raw = "+CMGL: 42,\"REC READ\",\"002B0038\",,\"26/01/22 07:00:00\"\r\n0041\r\nOK\r\n";
        let records = parse(raw);
        assert_eq!(records[0].index, 42);
    }

    #[test]
    fn test_malformed_index_defaults_to_zero() {
        let raw = "+CMGL: x,\"REC READ\",\"002B0039\",,\"26/01/23 07:00:00\"\r\n0041\r\nOK\r\n";
        let records = parse(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 0);
    }

    #[test]
    fn test_missing_timestamp_field() {
        let raw = "+CMGL: 4,\"REC READ\",\"002B0030\",\r\n0041\r\nOK\r\n";
        let records = parse(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sent, "");
    }

    #[test]
    fn test_quoted_comma_in_timestamp_splits_literally() {
        // Known format fragility, preserved on purpose: a comma inside the
        // quoted timestamp is still a field separator.
        let raw =
            "+CMGL: 0,\"REC READ\",\"002B0031\",,\"26/01/17,00:59:09-20\"\r\n0041\r\nOK\r\n";
        let records = parse(raw);
        assert_eq!(records[0].sent, "26/01/17");
    }

    #[test]
    fn test_received_stamp_is_set() {
        let raw = "+CMGL: 0,\"REC READ\",\"002B0031\",,\"26/01/17 00:00:00\"\r\n0041\r\nOK\r\n";
        let records = parse(raw);
        assert!(!records[0].received.is_empty());
    }

    #[test]
    fn test_no_headers_no_records() {
        assert!(parse("\r\nOK\r\n").is_empty());
        assert!(parse("").is_empty());
    }
}
