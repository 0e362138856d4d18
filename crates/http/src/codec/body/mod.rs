//! Request body decoding.
//!
//! Only bodies delimited by `Content-Length` are supported; a request without that
//! header has an empty body.

mod length_decoder;

pub use length_decoder::LengthDecoder;
