//! Decoder implementation for request bodies delimited by a Content-Length header.
//!
//! See [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112.html#section-6.2).

use std::cmp;

use crate::protocol::ParseError;
use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

/// Upper bound of the buffer reserved before any body byte arrives
const INIT_BODY_CAPACITY: usize = 8 * 1024;

/// Collects exactly `length` bytes of body, across as many `decode` calls as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The number of bytes remaining to be read from the payload
    remaining: u64,
    body: BytesMut,
}

impl LengthDecoder {
    pub fn new(length: u64) -> Self {
        // a declared length is only a claim; grow with the bytes that actually arrive
        let capacity = cmp::min(length, INIT_BODY_CAPACITY as u64) as usize;
        Self { remaining: length, body: BytesMut::with_capacity(capacity) }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn collected(&self) -> usize {
        self.body.len()
    }
}

impl Decoder for LengthDecoder {
    type Item = Bytes;
    type Error = ParseError;

    /// Moves up to the remaining number of bytes from `src` into the body.
    ///
    /// # Returns
    /// * `Ok(Some(body))` once all declared bytes were collected
    /// * `Ok(None)` when more data is needed
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.remaining > 0 && !src.is_empty() {
            let len = cmp::min(self.remaining, src.len() as u64) as usize;
            if self.body.is_empty() && len as u64 == self.remaining {
                // whole body already buffered, hand out the slice without copying
                self.body = src.split_to(len);
            } else {
                self.body.extend_from_slice(&src.split_to(len));
            }
            self.remaining -= len as u64;
        }

        if self.remaining == 0 {
            return Ok(Some(std::mem::take(&mut self.body).freeze()));
        }

        Ok(None)
    }
}
