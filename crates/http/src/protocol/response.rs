//! HTTP response built by a [`Handler`](crate::handler::Handler).
//!
//! Besides the explicit header list a response carries two convenience fields, the
//! content type and the body. The encoder synthesizes `Content-Type` and
//! `Content-Length` from them unless the handler already set those headers.

use bytes::Bytes;
use http::StatusCode;
use mime::Mime;

use crate::protocol::{Headers, SendError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    content_type: Option<String>,
    body: Option<Bytes>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self { status, headers: Headers::new(), content_type: None, body: None }
    }

    /// Builds a response from a raw status number.
    ///
    /// Numbers outside `100..=999` are rejected here; numbers without a reason phrase
    /// are rejected later by the encoder.
    pub fn from_status(status: u16) -> Result<Self, SendError> {
        StatusCode::from_u16(status).map(Self::new).map_err(|_e| SendError::unknown_status(status))
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND)
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// `200 OK` with a `text/plain; charset=utf-8` body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok().with_mime(&mime::TEXT_PLAIN_UTF_8).with_body(body.into())
    }

    /// `200 OK` with an `application/json` body.
    pub fn json(body: impl Into<Bytes>) -> Self {
        Self::ok().with_mime(&mime::APPLICATION_JSON).with_body(body)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Appends a header value; repeated names produce repeated header lines.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_mime(self, mime: &Mime) -> Self {
        self.with_content_type(mime.to_string())
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<Bytes> {
        self.body
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_sets_content_type_and_body() {
        let response = Response::text("hello");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.content_type(), Some("text/plain; charset=utf-8"));
        assert_eq!(response.body(), Some(&Bytes::from_static(b"hello")));
        assert!(response.headers().is_empty());
    }

    #[test]
    fn status_only_response_has_no_body() {
        let response = Response::bad_request();
        assert_eq!(response.status().as_u16(), 400);
        assert!(response.body().is_none());
        assert!(response.content_type().is_none());
    }

    #[test]
    fn from_status_rejects_out_of_range() {
        assert_eq!(Response::from_status(404).unwrap().status(), StatusCode::NOT_FOUND);
        assert!(matches!(Response::from_status(42), Err(SendError::UnknownStatus { status: 42 })));
    }

    #[test]
    fn with_header_appends() {
        let response = Response::json(r#"{"a":1}"#).with_header("X-Foo", "1").with_header("X-Foo", "2");
        assert_eq!(response.headers().get_all("x-foo").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(response.content_type(), Some("application/json"));
    }
}
