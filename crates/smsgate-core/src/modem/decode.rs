//! Response decoders
//!
//! Pure text transforms over raw modem output: UCS2 hex payloads and the
//! IMEI identity number.

use regex::Regex;
use tracing::warn;

/// Decode a UCS2 hex payload (e.g. `"00480069"`) into text.
///
/// Whitespace is stripped first; an odd-length hex string loses its last
/// character (the modem occasionally emits a stray nibble). Pairs of hex
/// digits become bytes, consecutive byte pairs become big-endian 16-bit
/// code units, and the unit sequence is decoded with UTF-16 semantics so
/// surrogate pairs combine. Malformed hex degrades softly: the input is
/// returned unchanged rather than aborting ingestion.
///
/// One-directional by design — the gateway never encodes outbound SMS.
pub fn decode_ucs2(text: &str) -> String {
    let mut hex: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    // Stray trailing nibble from the modem: drop it
    if hex.len() % 2 != 0 {
        hex.pop();
    }

    if hex.is_empty() {
        return String::new();
    }

    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        warn!(payload = text, "malformed UCS2 hex, passing through undecoded");
        return text.to_string();
    }

    let bytes: Vec<u8> = (0..hex.len())
        .step_by(2)
        .filter_map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect();

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    String::from_utf16_lossy(&units)
}

/// Extract the first 15-digit run from an identity response.
///
/// Identity is informational: callers tolerate `None` rather than failing.
pub fn extract_imei(response: &str) -> Option<String> {
    let re = Regex::new(r"\d{15}").unwrap();
    re.find(response).map(|m| m.as_str().to_string())
}
