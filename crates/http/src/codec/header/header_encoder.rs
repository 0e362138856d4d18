//! HTTP header encoder implementation for serializing HTTP response heads
//!
//! The head is written as:
//!
//! ```text
//! HTTP/1.1 <status> <reason-phrase>\r\n
//! <name>: <value>\r\n            for each header and each value, in insertion order
//! Content-Type: <type>\r\n       only if not set explicitly and a content type is given
//! Content-Length: <len>\r\n      only if not set explicitly and a body is present
//! \r\n
//! ```

use crate::protocol::{Response, SendError};

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;
use tracing::error;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

const CONTENT_TYPE: &str = "Content-Type";
const CONTENT_LENGTH: &str = "Content-Length";

/// Encoder for the status line and header block of a [`Response`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<&Response> for HeaderEncoder {
    type Error = SendError;

    /// # Errors
    ///
    /// Returns [`SendError::UnknownStatus`] if the status has no reason phrase.
    fn encode(&mut self, response: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let status = response.status();
        let Some(reason) = status.canonical_reason() else {
            error!(status = status.as_u16(), "no reason phrase for status code");
            return Err(SendError::unknown_status(status.as_u16()));
        };

        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason)?;

        let headers = response.headers();
        for (name, values) in headers {
            for value in values {
                put_header(dst, name, value);
            }
        }

        if let Some(content_type) = response.content_type() {
            if !headers.contains(CONTENT_TYPE) {
                put_header(dst, CONTENT_TYPE, content_type);
            }
        }

        if let Some(body) = response.body() {
            if !headers.contains(CONTENT_LENGTH) {
                write!(FastWrite(dst), "{CONTENT_LENGTH}: {}\r\n", body.len())?;
            }
        }

        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[inline]
fn put_header(dst: &mut BytesMut, name: &str, value: &str) {
    dst.put_slice(name.as_bytes());
    dst.put_slice(b": ");
    dst.put_slice(value.as_bytes());
    dst.put_slice(b"\r\n");
}

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format straight into the buffer we already reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
