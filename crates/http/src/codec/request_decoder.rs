//! HTTP request decoder module
//!
//! This module provides an incremental decoder that turns a growing byte buffer into
//! complete [`Request`]s. It is a state machine over three phases:
//!
//! 1. Start line: `<method> <path> <protocol>\r\n`
//! 2. Headers: `<name>: <value>\r\n` lines until an empty line
//! 3. Body: exactly `Content-Length` bytes (none when the header is absent)
//!
//! Input may be cut at any byte; the decoder keeps whatever it could not use yet in
//! the source buffer and resumes on the next call. Once a malformed message is seen
//! the decoder stays failed.
//!
//! # Example
//!
//! ```
//! use aio_http::codec::{DecoderLimits, RequestDecoder};
//! use bytes::BytesMut;
//! use tokio_util::codec::Decoder;
//!
//! let addr = "127.0.0.1:8080".parse().unwrap();
//! let mut decoder = RequestDecoder::new(addr, addr, DecoderLimits::default());
//!
//! let mut buffer = BytesMut::from(&b"GET /index HTTP/1.1\r\nHost: a\r"[..]);
//! assert!(decoder.decode(&mut buffer).unwrap().is_none());
//!
//! buffer.extend_from_slice(b"\n\r\n");
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.path(), "/index");
//! ```

use std::mem;
use std::net::SocketAddr;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::body::LengthDecoder;
use crate::codec::header::{parse_content_length, parse_header_line, parse_start_line};
use crate::codec::ParsePhase;
use crate::ensure;
use crate::protocol::{ParseError, Request, RequestHead};
use crate::utils::find_crlf;

/// Default maximum size in bytes of the start line plus header section
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8 * 1024;

/// Default maximum number of header values in a request
pub const DEFAULT_MAX_HEADERS: usize = 64;

/// Default maximum size in bytes of a request body
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Size limits applied to every decoded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderLimits {
    pub max_header_bytes: usize,
    pub max_headers: usize,
    pub max_body_bytes: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self { max_header_bytes: DEFAULT_MAX_HEADER_BYTES, max_headers: DEFAULT_MAX_HEADERS, max_body_bytes: DEFAULT_MAX_BODY_BYTES }
    }
}

#[derive(Debug)]
enum State {
    StartLine,
    Headers(RequestHead),
    Body(RequestHead, LengthDecoder),
    Failed,
}

/// Cuts CRLF terminated lines off the front of the buffer and enforces the head size limit.
#[derive(Debug)]
struct LineReader {
    /// bytes of the current message head consumed so far
    head_bytes: usize,
    /// offset up to which the buffer is known to contain no CRLF
    scanned: usize,
    max_head_bytes: usize,
}

impl LineReader {
    fn next_line(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>, ParseError> {
        // a CR at the very end may be completed by the next read
        let from = self.scanned.saturating_sub(1);
        match find_crlf(src, from) {
            Some(pos) => {
                let consumed = self.head_bytes + pos + 2;
                ensure!(consumed <= self.max_head_bytes, ParseError::too_large_header(consumed, self.max_head_bytes));
                self.head_bytes = consumed;
                self.scanned = 0;

                let mut line = src.split_to(pos + 2);
                line.truncate(pos);
                Ok(Some(line.freeze()))
            }
            None => {
                let pending = self.head_bytes + src.len();
                ensure!(pending <= self.max_head_bytes, ParseError::too_large_header(pending, self.max_head_bytes));
                self.scanned = src.len();
                Ok(None)
            }
        }
    }

    fn reset(&mut self) {
        self.head_bytes = 0;
        self.scanned = 0;
    }
}

/// An incremental decoder for HTTP/1.1 requests with Content-Length bounded bodies.
///
/// Each decoded [`Request`] is stamped with the addresses of the connection the
/// decoder belongs to.
#[derive(Debug)]
pub struct RequestDecoder {
    state: State,
    lines: LineReader,
    limits: DecoderLimits,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
}

impl RequestDecoder {
    pub fn new(local_addr: SocketAddr, remote_addr: SocketAddr, limits: DecoderLimits) -> Self {
        Self {
            state: State::StartLine,
            lines: LineReader { head_bytes: 0, scanned: 0, max_head_bytes: limits.max_header_bytes },
            limits,
            local_addr,
            remote_addr,
        }
    }

    pub fn limits(&self) -> &DecoderLimits {
        &self.limits
    }

    /// The phase the next call to `decode` resumes in.
    ///
    /// A decoder never reports [`ParsePhase::Complete`] itself; it is back in
    /// [`ParsePhase::AwaitingStartLine`] as soon as it hands out a request.
    pub fn phase(&self) -> ParsePhase {
        match self.state {
            State::StartLine => ParsePhase::AwaitingStartLine,
            State::Headers(_) => ParsePhase::AwaitingHeaders,
            State::Body(..) => ParsePhase::AwaitingBody,
            State::Failed => ParsePhase::Failed,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed)
    }

    fn finish(&mut self, head: RequestHead, body: Bytes) -> Request {
        self.lines.reset();
        head.finish(body, self.local_addr, self.remote_addr)
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode one request from the front of `src`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: a complete request; bytes after it stay in `src`
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: malformed input, the decoder is failed from now on
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            // any early return through `?` leaves the decoder in the failed state
            match mem::replace(&mut self.state, State::Failed) {
                State::Failed => return Err(ParseError::Failed),

                State::StartLine => match self.lines.next_line(src)? {
                    None => {
                        self.state = State::StartLine;
                        return Ok(None);
                    }
                    Some(line) => self.state = State::Headers(parse_start_line(&line)?),
                },

                State::Headers(mut head) => match self.lines.next_line(src)? {
                    None => {
                        self.state = State::Headers(head);
                        return Ok(None);
                    }
                    Some(line) if line.is_empty() => {
                        let length = parse_content_length(head.headers(), self.limits.max_body_bytes)?;
                        debug!(
                            method = %head.method(),
                            path = head.path(),
                            header_bytes = self.lines.head_bytes,
                            content_length = length,
                            "parsed request head"
                        );
                        self.state = State::Body(head, LengthDecoder::new(length));
                    }
                    Some(line) => {
                        let (name, value) = parse_header_line(&line)?;
                        let max_headers = self.limits.max_headers;
                        ensure!(head.headers().value_count() < max_headers, ParseError::too_many_headers(max_headers));
                        head.headers_mut().append(name, value);
                        self.state = State::Headers(head);
                    }
                },

                State::Body(head, mut length_decoder) => match length_decoder.decode(src)? {
                    None => {
                        trace!(remaining = length_decoder.remaining(), "waiting for more body bytes");
                        self.state = State::Body(head, length_decoder);
                        return Ok(None);
                    }
                    Some(body) => {
                        self.state = State::StartLine;
                        return Ok(Some(self.finish(head, body)));
                    }
                },
            }
        }
    }
}
