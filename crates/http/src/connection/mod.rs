//! HTTP connection handling module
//!
//! # Components
//!
//! - [`HttpSession`]: drives one connection through its read, parse, handle and
//!   write cycle, with keep-alive reuse and close on error
//! - [`Transport`]: the asynchronous byte transport a session runs on, with
//!   [`StreamTransport`] adapting tokio streams such as `TcpStream`
//! - [`SessionConfig`]: buffer size, parser limits and idle timeout

mod config;
mod http_session;
mod transport;

pub use config::{SessionConfig, DEFAULT_READ_BUFFER_SIZE};
pub use http_session::{HttpSession, SessionState};
pub use transport::{LocalTransport, StreamTransport, Transport};
