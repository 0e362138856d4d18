use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use aio_http::connection::{HttpSession, SessionConfig, StreamTransport};
use aio_http::handler::make_handler;
use aio_http::protocol::{Method, Request, Response};
use tokio::net::TcpListener;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    let handler = Arc::new(make_handler(route));
    let config = SessionConfig::new().with_idle_timeout(Duration::from_secs(30));

    loop {
        let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        let handler = handler.clone();
        let config = config.clone();

        tokio::spawn(async move {
            let transport = match StreamTransport::from_tcp(tcp_stream) {
                Ok(transport) => transport,
                Err(e) => {
                    warn!(cause = %e, %remote_addr, "can't resolve connection addresses");
                    return;
                }
            };

            match HttpSession::new(transport, &config).process(handler).await {
                Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
                Err(e) => error!(%remote_addr, "service has error, cause {}, connection shutdown", e),
            }
        });
    }
}

async fn route(request: Request) -> Result<Response, Infallible> {
    if request.method() == Method::Get && request.path() == "/" {
        return Ok(Response::text("Hello World!\r\n"));
    }

    if request.method() == Method::Post && request.path() == "/echo" {
        let content_type = request.header("Content-Type").unwrap_or("application/octet-stream").to_string();
        return Ok(Response::ok().with_content_type(content_type).with_body(request.into_body()));
    }

    let body = format!("no route for {}\r\n", request.path());
    Ok(Response::text(body).with_status(http::StatusCode::NOT_FOUND))
}
