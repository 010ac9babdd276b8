//! Body decoding for pages in legacy Japanese encodings.

use encoding_rs::{Encoding, EUC_JP, SHIFT_JIS};
use tracing::debug;

/// Encodings tried, in order, after UTF-8 fails.
///
/// encoding_rs decodes Shift_JIS as Windows-31J, so cp932 pages are covered
/// by the first entry.
const FALLBACK_ENCODINGS: &[(&str, &Encoding)] = &[("shift_jis", SHIFT_JIS), ("euc-jp", EUC_JP)];

/// Decode an HTML body without ever failing.
///
/// Order: the charset declared in Content-Type (if any), UTF-8, the
/// fallback encodings, and finally UTF-8 with invalid bytes dropped.
pub fn decode_html(bytes: &[u8], declared_charset: Option<&str>) -> String {
    if let Some(encoding) = declared_charset.and_then(|c| Encoding::for_label(c.trim().as_bytes()))
    {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return text.into_owned();
        }
        debug!("Body is not valid {}, trying fallbacks", encoding.name());
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    for (name, encoding) in FALLBACK_ENCODINGS {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            debug!("Decoded body as {}", name);
            return text.into_owned();
        }
    }

    debug!("No encoding matched, decoding lossily");
    String::from_utf8_lossy(bytes).replace('\u{FFFD}', "")
}

/// Extract the charset parameter from a Content-Type header value.
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}
