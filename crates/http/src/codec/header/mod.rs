//! Request head parsing and response head encoding.
//!
//! - `header_decoder`: start line and header line parsing, body length rules
//! - [`HeaderEncoder`]: status line and header block serialization

mod header_decoder;
mod header_encoder;

pub(crate) use header_decoder::{parse_content_length, parse_header_line, parse_start_line};
pub use header_encoder::HeaderEncoder;
