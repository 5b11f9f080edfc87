//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::method::Method;

/// An incoming HTTP request.
///
/// The server builds one per hyper request with the body already collected,
/// up to the router's body limit.
/// Tests and embedders can build one directly:
///
/// ```rust
/// use quill::{Method, Request};
///
/// let req = Request::new(Method::Post, "/blogs")
///     .with_header("authorization", "Bearer t0ken")
///     .with_body(r#"{"title":"T","body":"B"}"#);
/// assert_eq!(req.header("Authorization"), Some("Bearer t0ken"));
/// ```
pub struct Request {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Converts a hyper request, collecting at most `max_body_bytes` of body.
    ///
    /// A declared `content-length` over the limit is refused before any body
    /// byte is read. Header values that are not valid UTF-8 are decoded
    /// lossily rather than dropped, so a garbled `Authorization` header still
    /// counts as present.
    pub(crate) async fn from_hyper(
        req: hyper::Request<hyper::body::Incoming>,
        max_body_bytes: usize,
    ) -> Result<Self, Error> {
        let (parts, body) = req.into_parts();
        let method = Method::try_from(&parts.method)?;

        let declared = parts.headers.get(http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        if declared.is_some_and(|len| len > max_body_bytes as u64) {
            return Err(Error::PayloadTooLarge(max_body_bytes));
        }

        let headers = parts.headers.iter()
            .map(|(k, v)| (k.as_str().to_owned(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let body = Limited::new(body, max_body_bytes)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    Error::PayloadTooLarge(max_body_bytes)
                } else {
                    Error::Body(e)
                }
            })?
            .to_bytes();

        Ok(Self {
            method,
            path: parts.uri.path().to_owned(),
            headers,
            body,
            params: HashMap::new(),
        })
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/blogs/{id}`, `req.param("id")` on `/blogs/1` returns `Some("1")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the body as JSON.
    ///
    /// Fails with [`Error::MalformedPayload`] on invalid JSON or when a
    /// required field is missing or null.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
