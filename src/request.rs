//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use thiserror::Error;

/// The request body could not be read off the connection.
#[derive(Clone, Debug, Error)]
#[error("failed to read request body: {0}")]
pub struct BodyError(String);

/// An incoming HTTP request with its body already collected.
///
/// The server reads the whole body before dispatch. If that read fails the
/// request still reaches its handler; [`Request::body`] reports the failure
/// and the handler decides what it means.
pub struct Request {
    method: http::Method,
    uri: http::Uri,
    headers: HeaderMap,
    body: Result<Bytes, BodyError>,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: Ok(body),
            params: HashMap::new(),
        }
    }

    pub(crate) fn unreadable(parts: http::request::Parts, cause: impl std::fmt::Display) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: Err(BodyError(cause.to_string())),
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> &http::Method { &self.method }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// The collected body, or why it could not be read.
    pub fn body(&self) -> Result<&[u8], &BodyError> {
        self.body.as_deref()
    }

    /// Header lookup. Names are case-insensitive; values that are not
    /// visible ASCII are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/posts/{*id}`, `req.param("id")` on `/posts/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

/// Build a request from an in-memory `http::Request`, e.g. in tests.
impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts, body)
    }
}
