//! HTTP codec module for decoding requests and encoding responses
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: incremental start line / headers / body state machine,
//!     usable as a `tokio_util` [`Decoder`](tokio_util::codec::Decoder)
//!   - [`RequestParser`]: the [`Parser`] a session feeds each read into
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: serializes a response head and body
//!   - [`HeaderEncoder`]: the head part alone
//!
//! # Example
//!
//! ```
//! use aio_http::codec::{DecoderLimits, ParseOutcome, Parser, RequestParser, ResponseEncoder};
//! use aio_http::protocol::Response;
//!
//! let addr = "127.0.0.1:8080".parse().unwrap();
//! let mut parser = RequestParser::new(addr, addr, DecoderLimits::default());
//!
//! assert!(matches!(parser.feed(b"GET /hello HT"), ParseOutcome::NeedMoreData));
//! let request = parser.feed(b"TP/1.1\r\n\r\n").into_request().unwrap();
//! assert_eq!(request.path(), "/hello");
//!
//! let bytes = ResponseEncoder::serialize(&Response::text("hi")).unwrap();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

mod body;
mod header;
mod parser;
mod request_decoder;
mod response_encoder;

pub use header::HeaderEncoder;
pub use parser::{ParseOutcome, ParsePhase, Parser, RequestParser};
pub use request_decoder::{DecoderLimits, RequestDecoder, DEFAULT_MAX_BODY_BYTES, DEFAULT_MAX_HEADERS, DEFAULT_MAX_HEADER_BYTES};
pub use response_encoder::ResponseEncoder;
