//! Unified error type.

use thiserror::Error;

/// The error type returned by quill's fallible operations.
///
/// Application-level outcomes (401, 404, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. An `Error` that
/// escapes a handler is an unhandled fault: the error boundary turns it into
/// a generic `500` and logs the message server-side.
#[derive(Debug, Error)]
pub enum Error {
    /// Binding to a port or accepting a connection failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The request body could not be read off the connection.
    #[error("failed to read request body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request body is larger than the configured limit.
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    /// The request line carried a method token quill does not know.
    #[error("unsupported method `{0}`")]
    UnsupportedMethod(String),

    /// The request body is not valid JSON for the expected shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}
