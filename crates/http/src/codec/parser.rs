//! The feed driven parser interface used by the session.
//!
//! [`RequestDecoder`] works on a buffer owned by its caller, which suits
//! `tokio_util::codec::FramedRead`. A session instead hands over each read as a plain
//! slice, so [`RequestParser`] owns the accumulation buffer and adds the
//! [`ParsePhase::Complete`] gate: after a request is produced nothing else is parsed
//! until the session has answered it and called [`Parser::reset`].

use std::net::SocketAddr;

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::{DecoderLimits, RequestDecoder};
use crate::protocol::{ParseError, Request};

/// Result of feeding bytes to a [`Parser`].
#[derive(Debug)]
pub enum ParseOutcome {
    NeedMoreData,
    RequestReady(Request),
    ParseError(ParseError),
}

impl ParseOutcome {
    pub fn is_need_more_data(&self) -> bool {
        matches!(self, ParseOutcome::NeedMoreData)
    }

    pub fn into_request(self) -> Option<Request> {
        match self {
            ParseOutcome::RequestReady(request) => Some(request),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePhase {
    AwaitingStartLine,
    AwaitingHeaders,
    AwaitingBody,
    Complete,
    Failed,
}

/// Incremental request parser driven by a connection session.
///
/// Implementations must accept any chunking of the input: one call may carry
/// several lines, a line or a body may span many calls, and `feed(&[])` only
/// re-examines what is already buffered.
pub trait Parser {
    fn feed(&mut self, bytes: &[u8]) -> ParseOutcome;

    /// Leaves [`ParsePhase::Complete`] so buffered bytes are parsed on the next feed.
    ///
    /// A failed parser stays failed.
    fn reset(&mut self);

    fn phase(&self) -> ParsePhase;
}

/// [`Parser`] backed by a [`RequestDecoder`] and a growing accumulation buffer.
#[derive(Debug)]
pub struct RequestParser {
    decoder: RequestDecoder,
    buffer: BytesMut,
    complete: bool,
}

impl RequestParser {
    pub fn new(local_addr: SocketAddr, remote_addr: SocketAddr, limits: DecoderLimits) -> Self {
        Self { decoder: RequestDecoder::new(local_addr, remote_addr, limits), buffer: BytesMut::new(), complete: false }
    }

    /// Number of received bytes not consumed by any request yet.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl Parser for RequestParser {
    fn feed(&mut self, bytes: &[u8]) -> ParseOutcome {
        if self.decoder.is_failed() {
            return ParseOutcome::ParseError(ParseError::Failed);
        }

        self.buffer.extend_from_slice(bytes);

        if self.complete {
            trace!(buffered = self.buffer.len(), "request in flight, keep bytes for the next one");
            return ParseOutcome::NeedMoreData;
        }

        match self.decoder.decode(&mut self.buffer) {
            Ok(Some(request)) => {
                self.complete = true;
                ParseOutcome::RequestReady(request)
            }
            Ok(None) => ParseOutcome::NeedMoreData,
            Err(e) => {
                // nothing after a malformed message can be trusted
                self.buffer.clear();
                ParseOutcome::ParseError(e)
            }
        }
    }

    fn reset(&mut self) {
        self.complete = false;
    }

    fn phase(&self) -> ParsePhase {
        if self.complete { ParsePhase::Complete } else { self.decoder.phase() }
    }
}
