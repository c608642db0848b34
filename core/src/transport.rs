//! The seam between request building and the network.
//!
//! # Design
//! The client only ever talks to a [`Transport`]. It hands over a finished
//! `RestRequest` and gets back the body of the reply, or `None` when the
//! server sent nothing or the operation expects no payload. A body that is
//! not JSON comes back as a JSON string for the resolver to reject. Status interpretation beyond "2xx or not" belongs to
//! the error mapper, so a non-2xx reply comes back as
//! [`TransportError::Status`] with the raw status and body intact.
//!
//! [`HttpTransport`] is the reqwest implementation. Tests swap in their own.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use url::Url;

use crate::operation::HttpMethod;
use crate::request::RestRequest;

/// Failures below the REST layer, before any result envelope is examined.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The endpoint URL cannot be used to build requests.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Connection refused or host lookup failed.
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),

    /// Timeout or any other failure while the request was in flight.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("server returned status {status}")]
    Status { status: u16, body: Option<Value> },
}

/// Executes requests against some backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the body of a 2xx reply.
    async fn execute(&self, request: &RestRequest) -> Result<Option<Value>, TransportError>;
}

/// HTTP transport over reqwest, bound to one endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Validate `endpoint` and build the underlying HTTP client.
    ///
    /// The endpoint must be an absolute `http` or `https` URL with a host.
    /// `timeout` bounds each request as a whole.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        let parsed = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }

        // Every call opens its own connection.
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RestRequest) -> Result<Option<Value>, TransportError> {
        let url = format!("{}{}", self.endpoint, request.url());
        let method = match request.method() {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if request.operation().carries_body() {
            let body = request
                .body()
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()));
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| classify(e, &url))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| classify(e, &url))?;

        if !status.is_success() {
            let body = if text.trim().is_empty() {
                None
            } else {
                Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if !request.operation().expects_payload() || text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(
            serde_json::from_str(&text).unwrap_or(Value::String(text)),
        ))
    }
}

fn classify(err: reqwest::Error, url: &str) -> TransportError {
    if err.is_timeout() {
        TransportError::Network(err.to_string())
    } else if err.is_connect() {
        TransportError::Unreachable(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidEndpoint {
            endpoint: url.to_string(),
            reason: err.to_string(),
        }
    } else {
        TransportError::Network(err.to_string())
    }
}
