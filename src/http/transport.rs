//! Transports

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use tracing::debug;

use super::{ApiRequest, ApiResponse, Method, TransportError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends a fully built request and returns whatever response reached the client.
///
/// Non-2xx responses are `Ok`; only failures to get a response are errors.
#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Transport backed by a real HTTP client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport that resolves request paths against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("buyback/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let url = self.url(&request.path);

        debug!(%method, %url, "sending request");

        let mut builder = self.client.request(method, url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_err| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn joins_base_url_and_path() -> TestResult {
        let transport = ReqwestTransport::new("https://api.example.com/v1/")?;

        assert_eq!(transport.base_url(), "https://api.example.com/v1");
        assert_eq!(
            transport.url("/buyback/submissions"),
            "https://api.example.com/v1/buyback/submissions"
        );

        Ok(())
    }
}
