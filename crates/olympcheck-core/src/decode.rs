//! Byte payload → text, with encoding detection.
//!
//! The site serves `codes.js` without a reliable charset, and older years are
//! not always UTF-8. Detection order: BOM, strict UTF-8, then a statistical
//! guess. Decoding never fails; malformed sequences become U+FFFD.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

/// Pick the encoding for `bytes`. Empty input is inconclusive and maps to UTF-8.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if bytes.is_empty() {
        return UTF_8;
    }
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode a response body to text.
pub fn decode_payload(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "payload contained malformed sequences");
    }
    text.into_owned()
}
