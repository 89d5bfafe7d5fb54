//! Link-target encoding and display-text escaping.
//!
//! Targets use the conventional "quote" rules: ASCII letters, digits and
//! `_ . - ~` pass through, everything else becomes `%XX`. Encoding a whole
//! path additionally keeps `/`.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Characters escaped when a path is encoded as one unit.
const PATH: &AsciiSet = &SEGMENT.remove(b'/');

/// Percent-encode one path segment. A `/` inside it is encoded too.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Percent-encode a whole path, leaving `/` separators intact.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

/// Encode each segment independently and join them with `/`.
pub fn join_encoded<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Escape text for display inside generated markdown/HTML.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
