use std::error::Error;
use std::fmt;
use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tracing::{debug, error, info, info_span, trace, warn, Instrument};

use crate::codec::{ParseOutcome, Parser, RequestParser, ResponseEncoder};
use crate::connection::{SessionConfig, Transport};
use crate::handler::Handler;
use crate::protocol::{HttpError, Response, SendError};

/// Where a session is in its read, parse, handle, write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Reading,
    Parsing,
    Handling,
    Writing,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Reading => "reading",
            SessionState::Parsing => "parsing",
            SessionState::Handling => "handling",
            SessionState::Writing => "writing",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Why an awaited transport operation did not complete.
enum Interrupted {
    Io(io::Error),
    Timeout(Duration),
}

/// Awaits one transport operation, bounded by the idle timeout if there is one.
async fn complete<T>(idle_timeout: Option<Duration>, operation: impl Future<Output = io::Result<T>>) -> Result<T, Interrupted> {
    match idle_timeout {
        Some(limit) => match tokio::time::timeout(limit, operation).await {
            Ok(result) => result.map_err(Interrupted::Io),
            Err(_elapsed) => Err(Interrupted::Timeout(limit)),
        },
        None => operation.await.map_err(Interrupted::Io),
    }
}

/// One HTTP/1.1 connection: reads requests, hands them to a [`Handler`], writes the
/// responses back, and keeps doing so until the peer leaves or something fails.
///
/// The session never overlaps operations on its transport. Each exchange is one or
/// more reads, then the handler, then a write of the response head and a write of
/// the body. Bytes that arrive together with a request are kept by the parser and
/// used before the next read is issued.
///
/// # Type Parameters
///
/// * `T`: the [`Transport`] carrying the bytes
/// * `P`: the [`Parser`], [`RequestParser`] unless built with [`HttpSession::with_parser`]
pub struct HttpSession<T, P = RequestParser> {
    transport: T,
    parser: P,
    encoder: ResponseEncoder,
    read_buf: BytesMut,
    write_buf: BytesMut,
    idle_timeout: Option<Duration>,
    state: SessionState,
}

impl<T, P> fmt::Debug for HttpSession<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSession").field("state", &self.state).field("idle_timeout", &self.idle_timeout).finish_non_exhaustive()
    }
}

impl<T: Transport> HttpSession<T> {
    pub fn new(transport: T, config: &SessionConfig) -> Self {
        let parser = RequestParser::new(transport.local_addr(), transport.remote_addr(), config.limits());
        Self::with_parser(transport, parser, config)
    }
}

impl<T, P> HttpSession<T, P>
where
    T: Transport,
    P: Parser,
{
    pub fn with_parser(transport: T, parser: P, config: &SessionConfig) -> Self {
        Self {
            transport,
            parser,
            encoder: ResponseEncoder::new(),
            read_buf: BytesMut::with_capacity(config.read_buffer_size()),
            write_buf: BytesMut::new(),
            idle_timeout: config.idle_timeout(),
            state: SessionState::Reading,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs the session until the connection is closed.
    ///
    /// Returns `Ok(())` when the peer ends the stream between or during requests.
    /// Every other way of closing is reported as an error, after the transport has
    /// been released: a malformed request (answered with `400 Bad Request` first), a
    /// failed read or write, an idle timeout, or a response the encoder rejects.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let span = info_span!("http_session", remote_addr = %self.transport.remote_addr());
        self.run(&*handler).instrument(span).await
    }

    async fn run<H: Handler + ?Sized>(&mut self, handler: &H) -> Result<(), HttpError> {
        // nothing is buffered yet, so this starts with a read
        let mut outcome = self.parser.feed(&[]);

        loop {
            match outcome {
                ParseOutcome::NeedMoreData => {
                    self.transition(SessionState::Reading);
                    self.read_buf.clear();

                    let read = complete(self.idle_timeout, self.transport.read(&mut self.read_buf)).await;
                    let n = match read {
                        Ok(n) => n,
                        Err(Interrupted::Io(e)) => {
                            warn!(cause = %e, "failed to read, connection shutdown");
                            self.close().await;
                            return Err(HttpError::read(e));
                        }
                        Err(Interrupted::Timeout(limit)) => {
                            self.timeout().await;
                            return Err(HttpError::Timeout(limit));
                        }
                    };

                    if n == 0 {
                        info!(phase = ?self.parser.phase(), "cant read more request, break this connection down");
                        self.close().await;
                        return Ok(());
                    }

                    trace!(bytes = n, "read from transport");
                    self.transition(SessionState::Parsing);
                    outcome = self.parser.feed(&self.read_buf[..]);
                }

                ParseOutcome::RequestReady(request) => {
                    self.transition(SessionState::Handling);
                    debug!(method = %request.method(), path = request.path(), "handle request");

                    let response = match handler.call(request).await {
                        Ok(response) => response,
                        Err(e) => {
                            let cause: Box<dyn Error + Send + Sync> = e.into();
                            error!(%cause, "handle response error");
                            Response::internal_server_error()
                        }
                    };

                    self.write_response(&response).await?;

                    // keep-alive: parse what is already buffered before reading again
                    self.parser.reset();
                    self.transition(SessionState::Parsing);
                    outcome = self.parser.feed(&[]);
                }

                ParseOutcome::ParseError(e) => {
                    error!(cause = %e, "can't receive next request");
                    self.transition(SessionState::Handling);

                    let result = self.write_response(&Response::bad_request()).await;
                    // the stream can't be trusted to resynchronize after malformed input
                    self.close().await;
                    result?;
                    return Err(e.into());
                }
            }
        }
    }

    /// Writes the head, then the body if there is one. Closes the session on failure.
    async fn write_response(&mut self, response: &Response) -> Result<(), HttpError> {
        self.transition(SessionState::Writing);

        self.write_buf.clear();
        if let Err(e) = self.encoder.encode_head(response, &mut self.write_buf) {
            self.close().await;
            return Err(e.into());
        }

        let head = complete(self.idle_timeout, self.transport.write_all(&self.write_buf)).await;
        self.check_write(head, "headers").await?;

        if let Some(body) = response.body().filter(|body| !body.is_empty()) {
            let body = complete(self.idle_timeout, self.transport.write_all(body)).await;
            self.check_write(body, "body").await?;
        }

        trace!(status = response.status().as_u16(), "response written");
        Ok(())
    }

    async fn check_write(&mut self, result: Result<(), Interrupted>, part: &'static str) -> Result<(), HttpError> {
        match result {
            Ok(()) => Ok(()),
            Err(Interrupted::Io(e)) => {
                warn!(cause = %e, part, "failed to write response");
                self.close().await;
                Err(SendError::io(e).into())
            }
            Err(Interrupted::Timeout(limit)) => {
                self.timeout().await;
                Err(HttpError::Timeout(limit))
            }
        }
    }

    /// Forces the session closed because an operation took too long.
    ///
    /// Only meaningful while reading or writing; in any other state it does nothing.
    pub async fn timeout(&mut self) {
        if matches!(self.state, SessionState::Reading | SessionState::Writing) {
            warn!(state = %self.state, timeout = ?self.idle_timeout, "connection idle timeout");
            self.close().await;
        }
    }

    /// Releases the transport. Closing a closed session does nothing.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.transition(SessionState::Closed);

        if let Err(e) = self.transport.close().await {
            warn!(cause = %e, "failed to close transport");
        }
    }

    fn transition(&mut self, next: SessionState) {
        trace!(from = %self.state, to = %next, "session state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[derive(Debug, Default)]
    struct CountingTransport {
        closes: usize,
    }

    impl Transport for CountingTransport {
        async fn read(&mut self, _buf: &mut BytesMut) -> io::Result<usize> {
            Ok(0)
        }

        async fn write_all(&mut self, _bytes: &[u8]) -> io::Result<()> {
            Ok(())
        }

        async fn close(&mut self) -> io::Result<()> {
            self.closes += 1;
            Ok(())
        }

        fn local_addr(&self) -> SocketAddr {
            "127.0.0.1:80".parse().unwrap()
        }

        fn remote_addr(&self) -> SocketAddr {
            "127.0.0.1:5000".parse().unwrap()
        }
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let mut session = HttpSession::new(CountingTransport::default(), &SessionConfig::default());
        assert_eq!(session.state(), SessionState::Reading);

        session.close().await;
        session.close().await;

        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.transport().closes, 1);
    }

    #[tokio::test]
    async fn timeout_closes_only_from_io_states() {
        let mut session = HttpSession::new(CountingTransport::default(), &SessionConfig::default());
        session.transition(SessionState::Handling);
        session.timeout().await;
        assert_eq!(session.state(), SessionState::Handling);

        session.transition(SessionState::Writing);
        session.timeout().await;
        assert_eq!(session.state(), SessionState::Closed);
        assert_eq!(session.transport().closes, 1);

        session.timeout().await;
        assert_eq!(session.transport().closes, 1);
    }

    #[tokio::test]
    async fn complete_reports_timeout() {
        let pending = std::future::pending::<io::Result<()>>();
        let result = complete(Some(Duration::from_millis(10)), pending).await;
        assert!(matches!(result, Err(Interrupted::Timeout(limit)) if limit == Duration::from_millis(10)));

        let ready = async { Ok::<_, io::Error>(7) };
        assert!(matches!(complete(None, ready).await, Ok(7)));
    }
}
