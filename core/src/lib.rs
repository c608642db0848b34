//! Fluent REST client that turns chained path segments into resource URLs.
//!
//! # Overview
//! `client.list().segment("personas").segment(123).segment("phones")` builds
//! the path `/personas/123/phones` without any I/O. Calling `.call(..)` on the
//! chain builds a `RestRequest`, hands it to a `Transport`, and unwraps the
//! `data` field of the `{ "data": ... }` envelope the server replies with.
//!
//! # Design
//! - `RestClient` is stateless. It holds only a shared transport.
//! - The seven operations are a fixed table (`Operation`). Each chain is
//!   typed by its operation, so every terminal `call` has its own signature.
//! - Every failure, local or remote, surfaces as an `AppError` with a stable
//!   dotted code (`responseError.noData`) and request diagnostics.
//! - The transport is a trait; `HttpTransport` is the reqwest implementation.

pub mod chain;
pub mod client;
pub mod config;
pub mod error;
pub mod operation;
pub mod path;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;

pub use chain::{Action, Chain};
pub use client::RestClient;
pub use config::ClientConfig;
pub use error::{AppError, ErrorCode, ErrorInfo};
pub use operation::{HttpMethod, Operation};
pub use path::{PathSegment, ResourcePath};
pub use request::{Lookup, RestRequest};
pub use transport::{HttpTransport, Transport, TransportError};
