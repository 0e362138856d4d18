//! Core HTTP message types and error definitions.
//!
//! This module holds the plain data that flows through a session:
//!
//! - **Requests** ([`request`]): [`RequestHead`] while the body is still being read,
//!   [`Request`] once the decoder has finished it
//! - **Responses** ([`response`]): [`Response`], built by the handler
//! - **Headers** ([`headers`]): [`Headers`], an ordered, case-preserving multimap
//! - **Methods** ([`method`]): [`Method`], the supported request methods
//! - **Errors** ([`error`]): [`HttpError`], [`ParseError`], [`SendError`]
//!
//! None of these types perform I/O; see [`crate::codec`] for the wire format and
//! [`crate::connection`] for the session that moves them across a transport.

mod method;
pub use method::Method;

mod headers;
pub use headers::Headers;

mod request;
pub use request::Request;
pub use request::RequestHead;

mod response;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
