//! Entry point: one chain root per operation, plus the shared dispatch step.
//!
//! # Design
//! `RestClient` holds only its transport and carries no mutable state
//! between calls. Every root accessor starts a fresh, empty path, so chains
//! never share accumulated segments. A call goes through the same three
//! steps: the transport executes the request, the response envelope is
//! resolved, and any failure is mapped onto an `AppError` and logged once.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::chain::{Action, Chain, Create, Get, Invoke, List, Remove, Replace, Update};
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::path::ResourcePath;
use crate::request::RestRequest;
use crate::response;
use crate::transport::{HttpTransport, Transport};

/// Fluent REST client.
///
/// ```no_run
/// # async fn demo() -> Result<(), fluent_rest::AppError> {
/// use fluent_rest::RestClient;
/// use serde_json::json;
///
/// let client = RestClient::connect("http://localhost:3000", None)?;
/// let phones = client
///     .list()
///     .segment("personas")
///     .segment(123)
///     .segment("phones")
///     .call(Some(json!({"type": "mobile"})))
///     .await?;
/// let john = client
///     .create()
///     .segment("personas")
///     .call(Some(json!({"name": "John"})), None)
///     .await?;
/// # let _ = (phones, john);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
}

impl RestClient {
    /// Connect to `endpoint` over HTTP. Fails with `invalidEndpoint` when the
    /// URL is unusable.
    pub fn connect(endpoint: &str, timeout: Option<Duration>) -> Result<Self, AppError> {
        let transport = HttpTransport::new(endpoint, timeout)
            .map_err(|e| AppError::from_transport(e, format!("CONNECT {endpoint}")).logged())?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        Self::connect(&config.endpoint, config.timeout)
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// A chain for action `A` starting at `path` instead of the root.
    pub fn chain<A: Action>(&self, path: ResourcePath) -> Chain<A> {
        Chain::new(Arc::clone(&self.transport), path)
    }

    pub fn get(&self) -> Chain<Get> {
        self.chain(ResourcePath::new())
    }

    pub fn list(&self) -> Chain<List> {
        self.chain(ResourcePath::new())
    }

    pub fn create(&self) -> Chain<Create> {
        self.chain(ResourcePath::new())
    }

    pub fn update(&self) -> Chain<Update> {
        self.chain(ResourcePath::new())
    }

    pub fn replace(&self) -> Chain<Replace> {
        self.chain(ResourcePath::new())
    }

    pub fn remove(&self) -> Chain<Remove> {
        self.chain(ResourcePath::new())
    }

    pub fn invoke(&self) -> Chain<Invoke> {
        self.chain(ResourcePath::new())
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient").finish_non_exhaustive()
    }
}

/// Execute `request` and resolve its envelope.
pub(crate) async fn perform(
    transport: &dyn Transport,
    request: &RestRequest,
) -> Result<Option<Value>, AppError> {
    tracing::debug!(request = %request.description(), "dispatching");
    let result = match transport.execute(request).await {
        Ok(body) => response::resolve(body, request),
        Err(e) => Err(AppError::from_transport(e, request.description())),
    };
    result.map_err(AppError::logged)
}
