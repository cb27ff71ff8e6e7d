// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Data URI helpers: building `data:` URLs, stripping their scheme prefix and decoding payloads.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine, engine::general_purpose};

const SCHEME: &str = "data:";
const MARKER: &str = ";base64,";
const FALLBACK_MIME: &str = "application/octet-stream";

/// Decoder that tolerates missing padding and non-zero trailing bits, as `atob` does.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Remove a leading `data:<mime>;base64,` prefix, returning the input unchanged when absent.
///
/// The prefix match is greedy up to the last `;base64,` marker on the first line,
/// so stripping an already-stripped payload is a no-op.
///
/// # Examples
///
/// ```
/// use filedrop::utils::remove_uri_scheme;
/// assert_eq!(remove_uri_scheme("data:text/plain;base64,aGk="), "aGk=");
/// assert_eq!(remove_uri_scheme("aGk="), "aGk=");
/// ```
pub fn remove_uri_scheme(input: &str) -> &str {
    let Some(rest) = input.strip_prefix(SCHEME) else {
        return input;
    };
    let line_end = rest
        .find(['\n', '\r', '\u{2028}', '\u{2029}'])
        .unwrap_or(rest.len());
    match rest[..line_end].rfind(MARKER) {
        Some(pos) => &rest[pos + MARKER.len()..],
        None => input,
    }
}

/// Encode raw bytes as a Base64 data URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = if mime.trim().is_empty() {
        FALLBACK_MIME
    } else {
        mime
    };
    format!(
        "{SCHEME}{mime}{MARKER}{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Decode a bare Base64 payload into text.
///
/// Invalid Base64 or decoded bytes that are not valid UTF-8 yield an empty string.
pub fn decode_base64_text(payload: &str) -> String {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let Ok(bytes) = LENIENT.decode(compact.as_bytes()) else {
        log::debug!("payload is not valid base64; substituting empty content");
        return String::new();
    };
    String::from_utf8(bytes).unwrap_or_else(|_| {
        log::debug!("decoded payload is not valid UTF-8; substituting empty content");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_base64_text, remove_uri_scheme, to_data_url};

    #[test]
    fn remove_uri_scheme_returns_payload() {
        assert_eq!(
            remove_uri_scheme("data:text/plain;base64,SGVsbG8="),
            "SGVsbG8="
        );
        assert_eq!(
            remove_uri_scheme("data:application/vnd.ms-excel;base64,AAAA"),
            "AAAA"
        );
    }

    #[test]
    fn remove_uri_scheme_is_idempotent() {
        let once = remove_uri_scheme("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(remove_uri_scheme(once), once);
    }

    #[test]
    fn remove_uri_scheme_leaves_unprefixed_input_alone() {
        assert_eq!(remove_uri_scheme("plain text"), "plain text");
        assert_eq!(remove_uri_scheme("data:text/plain,hello"), "data:text/plain,hello");
        assert_eq!(remove_uri_scheme(" data:x;base64,AA"), " data:x;base64,AA");
    }

    // The prefix match is greedy but stays on the first line.
    #[test]
    fn remove_uri_scheme_matches_greedily_within_first_line() {
        assert_eq!(remove_uri_scheme("data:a;base64,b;base64,cc"), "cc");
        assert_eq!(
            remove_uri_scheme("data:a\n;base64,cc"),
            "data:a\n;base64,cc"
        );
    }

    #[test]
    fn to_data_url_falls_back_to_octet_stream() {
        assert_eq!(to_data_url("text/plain", b"hi"), "data:text/plain;base64,aGk=");
        assert_eq!(to_data_url("", b""), "data:application/octet-stream;base64,");
    }

    #[test]
    fn decode_base64_text_decodes_utf8() {
        assert_eq!(decode_base64_text("SGVsbG8="), "Hello");
        assert_eq!(decode_base64_text("Q2Fmw6k="), "Café");
        assert_eq!(decode_base64_text("SGVsbG8"), "Hello");
    }

    // Non-canonical final symbols decode the way browsers decode them.
    #[test]
    fn decode_base64_text_ignores_trailing_bits() {
        assert_eq!(decode_base64_text("QR=="), "A");
        assert_eq!(decode_base64_text("SGVsbG9="), "Hello");
    }

    // Valid base64 whose bytes are not text must not fail the batch.
    #[test]
    fn decode_base64_text_returns_empty_for_invalid_text() {
        assert_eq!(decode_base64_text("/w=="), "");
        assert_eq!(decode_base64_text("not base64!"), "");
    }
}
