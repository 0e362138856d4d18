//! HTTP request representation handed to the [`Handler`](crate::handler::Handler).
//!
//! A [`Request`] only comes into existence through [`RequestHead::finish`], which the
//! decoder calls once the body is complete, so every field is always populated.

use std::net::SocketAddr;

use bytes::Bytes;

use crate::protocol::{Headers, Method};

/// Start line and header section of a request that is still waiting for its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    method: Method,
    path: String,
    protocol: String,
    headers: Headers,
}

impl RequestHead {
    pub fn new(method: Method, path: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self { method, path: path.into(), protocol: protocol.into(), headers: Headers::new() }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Attaches the body and connection addresses, producing the immutable request.
    pub fn finish(self, body: Bytes, local_addr: SocketAddr, remote_addr: SocketAddr) -> Request {
        Request { head: self, body, local_addr, remote_addr }
    }
}

/// A fully received HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    head: RequestHead,
    body: Bytes,
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
}

impl Request {
    pub fn method(&self) -> Method {
        self.head.method
    }

    /// The raw request target, exactly as sent (no percent decoding).
    pub fn path(&self) -> &str {
        &self.head.path
    }

    pub fn protocol(&self) -> &str {
        &self.head.protocol
    }

    pub fn headers(&self) -> &Headers {
        &self.head.headers
    }

    /// First value of the header `name`, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name)
    }

    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.head.headers.get_all(name)
    }

    /// Length of the received body; always equals the declared Content-Length.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_carries_every_field() {
        let local: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let remote: SocketAddr = "10.0.0.7:51000".parse().unwrap();

        let mut head = RequestHead::new(Method::Post, "/upload?x=%20", "HTTP/1.1");
        head.headers_mut().append("Content-Length", "3");
        head.headers_mut().append("X-Trace", "a");
        head.headers_mut().append("X-Trace", "b");

        let request = head.finish(Bytes::from_static(b"abc"), local, remote);

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "/upload?x=%20");
        assert_eq!(request.protocol(), "HTTP/1.1");
        assert_eq!(request.header("content-length"), Some("3"));
        assert_eq!(request.header_values("x-trace").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(request.content_length(), 3);
        assert_eq!(request.local_addr(), local);
        assert_eq!(request.remote_addr(), remote);
        assert_eq!(request.into_body(), Bytes::from_static(b"abc"));
    }
}
