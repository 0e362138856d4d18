//! Line level parsing for the request head.
//!
//! The [`RequestDecoder`](crate::codec::RequestDecoder) cuts the byte stream into
//! CRLF terminated lines; the functions here turn one such line into a start line or
//! a header field, and decide the body length once the header section is complete.
//!
//! # Rules
//!
//! - Start line: exactly three space separated, non-empty tokens
//!   `<method> <path> <protocol>`, the method being one of [`Method`]
//! - Header line: `<name>:<value>`, split on the first colon, leading whitespace
//!   removed from the value; the name must be non-empty and contain no whitespace
//! - Body length: taken from `Content-Length`, zero when absent; any
//!   `Transfer-Encoding` is rejected

use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, Method, ParseError, RequestHead};

/// Parses `GET /path HTTP/1.1` (without the trailing CRLF).
pub(crate) fn parse_start_line(line: &[u8]) -> Result<RequestHead, ParseError> {
    let line = std::str::from_utf8(line).map_err(|_e| ParseError::invalid_start_line("not valid utf-8"))?;

    let mut words = line.splitn(3, ' ');
    let (Some(method), Some(path), Some(protocol)) = (words.next(), words.next(), words.next()) else {
        return Err(ParseError::invalid_start_line(format!("expect 3 tokens in {line:?}")));
    };

    ensure!(
        !method.is_empty() && !path.is_empty() && !protocol.is_empty(),
        ParseError::invalid_start_line(format!("empty token in {line:?}"))
    );
    ensure!(
        !protocol.contains(char::is_whitespace),
        ParseError::invalid_start_line(format!("unexpected whitespace in protocol {protocol:?}"))
    );

    let method: Method = method.parse()?;
    trace!(%method, path, protocol, "parsed start line");

    Ok(RequestHead::new(method, path, protocol))
}

/// Splits a header line into `(name, value)`.
pub(crate) fn parse_header_line(line: &[u8]) -> Result<(&str, &str), ParseError> {
    let line = std::str::from_utf8(line).map_err(|_e| ParseError::invalid_header("not valid utf-8"))?;

    let (name, value) = line.split_once(':').ok_or_else(|| ParseError::invalid_header(format!("missing colon in {line:?}")))?;

    ensure!(!name.is_empty(), ParseError::invalid_header(format!("empty header name in {line:?}")));
    ensure!(
        !name.contains(char::is_whitespace),
        ParseError::invalid_header(format!("whitespace in header name {name:?}"))
    );

    Ok((name, value.trim_start()))
}

/// Determines how many body bytes follow the header section.
///
/// Repeated `Content-Length` values are accepted only when they all agree.
pub(crate) fn parse_content_length(headers: &Headers, max_body_bytes: usize) -> Result<u64, ParseError> {
    // chunked and any other transfer coding is not supported, see RFC 9112 section 6.1
    if let Some(te) = headers.get("Transfer-Encoding") {
        return Err(ParseError::unsupported_transfer_encoding(te));
    }

    let mut length = None;
    for value in headers.get_all("Content-Length") {
        let value = value.trim();
        ensure!(
            !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            ParseError::invalid_content_length(format!("value {value:?} is not a non-negative integer"))
        );
        let parsed = value.parse::<u64>().map_err(|_e| ParseError::invalid_content_length(format!("value {value} is not u64")))?;

        match length {
            Some(previous) if previous != parsed => {
                return Err(ParseError::invalid_content_length(format!("conflicting values {previous} and {parsed}")));
            }
            _ => length = Some(parsed),
        }
    }

    let length = length.unwrap_or(0);
    ensure!(length <= max_body_bytes as u64, ParseError::too_large_body(length, max_body_bytes));
    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_line_ok() {
        let head = parse_start_line(b"PUT /a/b?c=d HTTP/1.1").unwrap();
        assert_eq!(head.method(), Method::Put);
        assert_eq!(head.path(), "/a/b?c=d");
        assert_eq!(head.protocol(), "HTTP/1.1");
        assert!(head.headers().is_empty());
    }

    #[test]
    fn start_line_rejects_bad_shapes() {
        let lines: [&[u8]; 7] = [b"GET /", b"GET", b"", b"GET  HTTP/1.1", b" / HTTP/1.1", b"GET / HTTP/1.1 extra", b"GET / "];
        for line in lines {
            assert!(
                matches!(parse_start_line(line), Err(ParseError::InvalidStartLine { .. })),
                "line {:?} should be rejected",
                String::from_utf8_lossy(line)
            );
        }
    }

    #[test]
    fn start_line_rejects_unsupported_method() {
        assert_eq!(parse_start_line(b"BOGUS /x HTTP/1.1"), Err(ParseError::invalid_method("BOGUS")));
        assert_eq!(parse_start_line(b"HEAD / HTTP/1.1"), Err(ParseError::invalid_method("HEAD")));
    }

    #[test]
    fn start_line_rejects_invalid_utf8() {
        assert!(matches!(parse_start_line(b"GET /\xff HTTP/1.1"), Err(ParseError::InvalidStartLine { .. })));
    }

    #[test]
    fn header_line_split_on_first_colon() {
        assert_eq!(parse_header_line(b"Host: 127.0.0.1:8080").unwrap(), ("Host", "127.0.0.1:8080"));
        assert_eq!(parse_header_line(b"X-Empty:").unwrap(), ("X-Empty", ""));
        assert_eq!(parse_header_line(b"x-raw:\t value ").unwrap(), ("x-raw", "value "));
    }

    #[test]
    fn header_line_rejects_malformed() {
        assert!(matches!(parse_header_line(b"no colon here"), Err(ParseError::InvalidHeader { .. })));
        assert!(matches!(parse_header_line(b": value"), Err(ParseError::InvalidHeader { .. })));
        assert!(matches!(parse_header_line(b"Host : value"), Err(ParseError::InvalidHeader { .. })));
    }

    #[test]
    fn content_length_rules() {
        let max = 1024;
        assert_eq!(parse_content_length(&Headers::new(), max), Ok(0));

        let headers: Headers = [("content-length", " 12 ")].into_iter().collect();
        assert_eq!(parse_content_length(&headers, max), Ok(12));

        let headers: Headers = [("Content-Length", "5"), ("CONTENT-LENGTH", "5")].into_iter().collect();
        assert_eq!(parse_content_length(&headers, max), Ok(5));

        let headers: Headers = [("Content-Length", "5"), ("Content-Length", "6")].into_iter().collect();
        assert!(matches!(parse_content_length(&headers, max), Err(ParseError::InvalidContentLength { .. })));

        for bad in ["-1", "+1", "abc", "", "1 2"] {
            let headers: Headers = [("Content-Length", bad)].into_iter().collect();
            assert!(matches!(parse_content_length(&headers, max), Err(ParseError::InvalidContentLength { .. })), "{bad}");
        }

        let headers: Headers = [("Content-Length", "2048")].into_iter().collect();
        assert_eq!(parse_content_length(&headers, max), Err(ParseError::too_large_body(2048, 1024)));
    }

    #[test]
    fn transfer_encoding_is_rejected() {
        let headers: Headers = [("Transfer-Encoding", "chunked")].into_iter().collect();
        assert_eq!(parse_content_length(&headers, 1024), Err(ParseError::unsupported_transfer_encoding("chunked")));
    }
}
