//! In-band marker convention for "this request wants an encrypted identifier".
//!
//! A single reserved header name carries two meanings over a request's life:
//! before dispatch it may hold [`MARKER_SENTINEL`], a placeholder that tells
//! the dispatcher to act; after dispatch it holds the real encrypted token.
//! The sentinel never reaches the network.
//!
//! Because the name is reused, [`wants_encrypted_identifier`] compares the
//! value against the sentinel *exactly* — a header already holding a token
//! reads as unmarked, so the dispatcher's own output can never re-trigger it.

use http::HeaderMap;

/// Reserved header name, used both as the pre-dispatch marker slot and as
/// the carrier of the encrypted identifier on the wire.
///
/// Callers must not use this name for their own headers; `set_marker`
/// overwrites it unconditionally. Lowercase because [`http::HeaderMap`]
/// normalises header names to lowercase.
pub const ENCRYPTED_IDENTIFIER_HEADER: &str = "x-app-identifier-enc";

/// Sentinel value marking a request for identifier encryption.
///
/// Chosen so it can never collide with a real token: every token is at least
/// 28 bytes of nonce+tag base64-encoded (40 characters), far longer than
/// this literal.
pub const MARKER_SENTINEL: &str = "placeholder";

/// Mark or unmark a request's headers.
///
/// `wanted == true` sets the reserved header to the sentinel, overwriting
/// any prior value. `wanted == false` removes the reserved header entirely;
/// a false marker is never persisted as a header value.
pub fn set_marker(headers: &mut HeaderMap, wanted: bool) {
    if wanted {
        headers.insert(
            ENCRYPTED_IDENTIFIER_HEADER,
            http::HeaderValue::from_static(MARKER_SENTINEL),
        );
    } else {
        headers.remove(ENCRYPTED_IDENTIFIER_HEADER);
    }
}

/// Returns `true` iff the reserved header is present and equals the sentinel
/// exactly. Any other value, including a real encrypted token, reads as
/// `false`.
pub fn wants_encrypted_identifier(headers: &HeaderMap) -> bool {
    headers
        .get(ENCRYPTED_IDENTIFIER_HEADER)
        .map(|v| v.as_bytes() == MARKER_SENTINEL.as_bytes())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn fresh_headers_are_unmarked() {
        assert!(!wants_encrypted_identifier(&HeaderMap::new()));
    }

    #[test]
    fn set_then_read_round_trip() {
        let mut headers = HeaderMap::new();
        set_marker(&mut headers, true);
        assert!(wants_encrypted_identifier(&headers));

        set_marker(&mut headers, false);
        assert!(!wants_encrypted_identifier(&headers));
        assert!(!headers.contains_key(ENCRYPTED_IDENTIFIER_HEADER));
    }

    #[test]
    fn unmarking_fresh_headers_is_a_noop() {
        let mut headers = HeaderMap::new();
        set_marker(&mut headers, false);
        assert!(headers.is_empty());
    }

    #[test]
    fn marking_overwrites_a_prior_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ENCRYPTED_IDENTIFIER_HEADER,
            HeaderValue::from_static("stale"),
        );
        set_marker(&mut headers, true);
        assert_eq!(headers.len(), 1);
        assert!(wants_encrypted_identifier(&headers));
    }

    #[test]
    fn non_sentinel_value_reads_as_unmarked() {
        let mut headers = HeaderMap::new();
        // A realistic injected token: base64, much longer than the sentinel.
        headers.insert(
            ENCRYPTED_IDENTIFIER_HEADER,
            HeaderValue::from_static("3q2+7wAAAAAAAAAAbG9uZy1jaXBoZXJ0ZXh0LXRhZw=="),
        );
        assert!(!wants_encrypted_identifier(&headers));
    }

    #[test]
    fn sentinel_prefix_is_not_enough() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ENCRYPTED_IDENTIFIER_HEADER,
            HeaderValue::from_static("placeholder-extra"),
        );
        assert!(!wants_encrypted_identifier(&headers));
    }
}
