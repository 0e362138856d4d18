//! Request handler abstraction.
//!
//! A [`Handler`] turns one parsed [`Request`] into one [`Response`]. The session awaits
//! it before reading anything else from the connection. An `Err` is logged by the
//! session and answered with `500 Internal Server Error`.
//!
//! Plain async functions become handlers through [`make_handler`]:
//!
//! ```
//! use aio_http::handler::make_handler;
//! use aio_http::protocol::{Request, Response};
//! use std::convert::Infallible;
//!
//! async fn echo(request: Request) -> Result<Response, Infallible> {
//!     Ok(Response::ok().with_body(request.into_body()))
//! }
//!
//! let handler = make_handler(echo);
//! # let _ = handler;
//! ```

use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::{Request, Response};

#[async_trait]
pub trait Handler: Send + Sync {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    async fn call(&self, req: Request) -> Result<Response, Self::Error>;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    type Error = H::Error;

    async fn call(&self, req: Request) -> Result<Response, Self::Error> {
        (**self).call(req).await
    }
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<Err, F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Err: Into<Box<dyn Error + Send + Sync>>,
    Fut: Future<Output = Result<Response, Err>> + Send,
{
    type Error = Err;

    async fn call(&self, req: Request) -> Result<Response, Self::Error> {
        (self.f)(req).await
    }
}

pub fn make_handler<F, Err, Ret>(f: F) -> HandlerFn<F>
where
    Err: Into<Box<dyn Error + Send + Sync>>,
    Ret: Future<Output = Result<Response, Err>>,
    F: Fn(Request) -> Ret,
{
    HandlerFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use std::convert::Infallible;

    fn request(path: &str) -> Request {
        let addr = "127.0.0.1:80".parse().unwrap();
        crate::protocol::RequestHead::new(crate::protocol::Method::Get, path, "HTTP/1.1").finish(Bytes::new(), addr, addr)
    }

    #[tokio::test]
    async fn handler_fn_calls_closure() {
        let handler = make_handler(|req: Request| async move {
            Ok::<_, Infallible>(Response::text(req.path().to_string()))
        });

        let response = handler.call(request("/hi")).await.unwrap();
        assert_eq!(response.body(), Some(&Bytes::from_static(b"/hi")));
    }

    #[tokio::test]
    async fn arc_handler_delegates() {
        let handler = Arc::new(make_handler(|_req: Request| async { Err::<Response, _>("boom") }));

        let err = handler.call(request("/")).await.unwrap_err();
        let err: Box<dyn Error + Send + Sync> = err.into();
        assert_eq!(err.to_string(), "boom");

        let ok = Arc::new(make_handler(|_req: Request| async { Ok::<_, Infallible>(Response::new(StatusCode::ACCEPTED)) }));
        assert_eq!(ok.call(request("/")).await.unwrap().status(), StatusCode::ACCEPTED);
    }
}
