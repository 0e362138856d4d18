//! A completion driven HTTP/1.1 session engine
//!
//! This crate turns one connection's byte stream into requests, hands each request to
//! an application [`handler::Handler`], and writes the response back, looping for
//! keep-alive until the peer leaves or something goes wrong. Reads and writes are
//! never outstanding at the same time.
//!
//! # Features
//!
//! - Incremental parsing that tolerates any fragmentation of the input
//! - Content-Length delimited request bodies
//! - Keep-alive connections
//! - `400 Bad Request` and close on malformed input
//! - Optional idle timeout per read or write
//!
//! # Example
//!
//! ```no_run
//! use aio_http::connection::{HttpSession, SessionConfig, StreamTransport};
//! use aio_http::handler::make_handler;
//! use aio_http::protocol::{Request, Response};
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!     let config = SessionConfig::default();
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!         let config = config.clone();
//!
//!         tokio::spawn(async move {
//!             let transport = match StreamTransport::from_tcp(tcp_stream) {
//!                 Ok(transport) => transport,
//!                 Err(e) => {
//!                     warn!(cause = %e, "can't resolve connection addresses");
//!                     return;
//!                 }
//!             };
//!             match HttpSession::new(transport, &config).process(handler).await {
//!                 Ok(()) => info!("finished process, connection shutdown"),
//!                 Err(e) => error!("service has error, cause {}, connection shutdown", e),
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request) -> Result<Response, Infallible> {
//!     info!(path = request.path(), "request path");
//!     Ok(Response::text("Hello World!\r\n"))
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request, response, header and error types
//! - [`codec`]: the incremental request parser and the response serializer
//! - [`connection`]: the per-connection session and its transport abstraction
//! - [`handler`]: the handler trait and [`handler::make_handler`]
//!
//! # Limitations
//!
//! - HTTP/1.1 only, one request in flight per connection
//! - Methods limited to GET, POST, PUT and DELETE
//! - No chunked transfer encoding; such requests are rejected
//! - No TLS support (use a reverse proxy for HTTPS)

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
