//! HTTP Errors

use serde_json::Value;
use thiserror::Error;

/// A request that did not reach the server or whose response could not be read.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server could not be reached.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// Error from the HTTP client.
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}

/// A failed request, as seen by callers of the pipeline.
///
/// `status` is `0` when no response reached the client.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("request failed with status {status}: {message}")]
pub struct HttpError {
    /// HTTP status, `0` for transport failures
    pub status: u16,

    /// Server supplied or synthesized message
    pub message: String,

    /// Response body, if any
    pub body: Option<Value>,
}

impl HttpError {
    /// Build an error from a non-success response.
    pub fn from_response(status: u16, body: Value) -> Self {
        let message = server_message(&body)
            .map_or_else(|| format!("HTTP {status}"), ToString::to_string);

        Self {
            status,
            message,
            body: (!body.is_null()).then_some(body),
        }
    }

    /// The message supplied in the response body, if any.
    pub fn server_message(&self) -> Option<&str> {
        self.body.as_ref().and_then(server_message)
    }
}

impl From<TransportError> for HttpError {
    fn from(error: TransportError) -> Self {
        Self {
            status: 0,
            message: error.to_string(),
            body: None,
        }
    }
}

fn server_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
}

/// Errors from typed requests.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body did not match the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl PipelineError {
    /// The HTTP status, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(error) => Some(error.status),
            Self::Encode(_) | Self::Decode(_) => None,
        }
    }
}
