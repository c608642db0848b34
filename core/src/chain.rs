//! Chainable path accumulator ending in one REST call.
//!
//! # Design
//! `client.get()` returns an empty [`Chain`]. Each `segment(key)` returns a
//! new chain with `key` appended and leaves the receiver untouched, so a
//! partial chain can be stored and branched. Nothing touches the network
//! until `call` runs.
//!
//! The action is a type parameter, which gives every operation its own
//! `call` signature:
//!
//! | action | `call` arguments | resolves to |
//! |--------|------------------|-------------|
//! | `Get` | `impl Into<Lookup>` | `Value` |
//! | `List` | `Option<Value>` options | `Vec<Value>` |
//! | `Create` | `Option<Value>` body, `Option<Value>` options | `Value` |
//! | `Update` | `Option<Value>` object body (required), `Option<Value>` options | `Value` |
//! | `Replace` | `Option<Value>` body, `Option<Value>` options | `Value` |
//! | `Remove` | `impl Into<Lookup>` | `()` |
//! | `Invoke` | `Option<Value>` body, `Option<Value>` options | `Value` |

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::client::perform;
use crate::error::{AppError, ErrorCode};
use crate::operation::Operation;
use crate::path::{PathSegment, ResourcePath};
use crate::request::{Lookup, RestRequest};
use crate::transport::Transport;

mod sealed {
    pub trait Sealed {}
}

/// Marker selecting the operation a [`Chain`] terminates in.
pub trait Action: sealed::Sealed {
    const OPERATION: Operation;
}

macro_rules! actions {
    ($($name:ident),*) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl sealed::Sealed for $name {}

            impl Action for $name {
                const OPERATION: Operation = Operation::$name;
            }
        )*
    };
}

actions!(Get, List, Create, Update, Replace, Remove, Invoke);

/// A resource path under construction, bound to one operation.
pub struct Chain<A> {
    transport: Arc<dyn Transport>,
    path: ResourcePath,
    action: PhantomData<A>,
}

impl<A: Action> Chain<A> {
    pub(crate) fn new(transport: Arc<dyn Transport>, path: ResourcePath) -> Self {
        Self {
            transport,
            path,
            action: PhantomData,
        }
    }

    /// A new chain one level deeper.
    pub fn segment(&self, key: impl Into<PathSegment>) -> Self {
        Self::new(Arc::clone(&self.transport), self.path.join(key))
    }

    /// A new chain with every key in `keys` appended in order.
    pub fn segments<I>(&self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathSegment>,
    {
        let mut path = self.path.clone();
        path.extend(keys);
        Self::new(Arc::clone(&self.transport), path)
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn operation(&self) -> Operation {
        A::OPERATION
    }

    fn request(&self, body: Option<Value>, options: Option<Value>) -> RestRequest {
        RestRequest::new(A::OPERATION, self.path.clone(), body, options)
    }

    async fn fetch(&self, request: &RestRequest) -> Result<Value, AppError> {
        Ok(perform(self.transport.as_ref(), request)
            .await?
            .unwrap_or_default())
    }
}

impl<A> Clone for Chain<A> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            path: self.path.clone(),
            action: PhantomData,
        }
    }
}

impl<A: Action> fmt::Debug for Chain<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("operation", &A::OPERATION)
            .field("path", &self.path)
            .finish()
    }
}

impl Chain<Get> {
    /// Fetch one resource. A key argument names it; an object argument
    /// becomes query options.
    pub async fn call(&self, lookup: impl Into<Lookup>) -> Result<Value, AppError> {
        let request = RestRequest::lookup(Operation::Get, self.path.clone(), lookup.into());
        self.fetch(&request).await
    }
}

impl Chain<List> {
    /// Fetch a collection. The payload must be an array.
    pub async fn call(&self, options: Option<Value>) -> Result<Vec<Value>, AppError> {
        let request = self.request(None, options);
        match self.fetch(&request).await? {
            Value::Array(items) => Ok(items),
            _ => Err(AppError::new(ErrorCode::ResponseError, request.description())
                .with_extra("expected", Value::String("array".into()))
                .logged()),
        }
    }
}

impl Chain<Create> {
    pub async fn call(
        &self,
        body: Option<Value>,
        options: Option<Value>,
    ) -> Result<Value, AppError> {
        self.fetch(&self.request(body, options)).await
    }
}

impl Chain<Update> {
    /// Apply a partial update. A body that is missing or is not a JSON
    /// object fails with `badRequest.objectRequired` without reaching the
    /// transport. `{}` is a valid, empty update.
    pub async fn call(
        &self,
        body: Option<Value>,
        options: Option<Value>,
    ) -> Result<Value, AppError> {
        let request = self.request(body, options);
        if !matches!(request.body(), Some(Value::Object(_))) {
            return Err(AppError::new(ErrorCode::ObjectRequired, request.description()).logged());
        }
        self.fetch(&request).await
    }
}

impl Chain<Replace> {
    pub async fn call(
        &self,
        body: Option<Value>,
        options: Option<Value>,
    ) -> Result<Value, AppError> {
        self.fetch(&self.request(body, options)).await
    }
}

impl Chain<Remove> {
    /// Delete a resource. Takes the same argument forms as `get`.
    pub async fn call(&self, lookup: impl Into<Lookup>) -> Result<(), AppError> {
        let request = RestRequest::lookup(Operation::Remove, self.path.clone(), lookup.into());
        perform(self.transport.as_ref(), &request).await.map(drop)
    }
}

impl Chain<Invoke> {
    pub async fn call(
        &self,
        body: Option<Value>,
        options: Option<Value>,
    ) -> Result<Value, AppError> {
        self.fetch(&self.request(body, options)).await
    }
}
