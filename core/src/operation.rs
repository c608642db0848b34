//! The fixed table of REST operations the client supports.
//!
//! # Design
//! Each operation is a named action bound to an HTTP verb and two flags:
//! whether the request carries a JSON body and whether the response must
//! contain a `data` payload. The table is a `match`, so it is immutable and
//! shared by every call without synchronisation.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the seven actions a chain can terminate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    List,
    Create,
    Update,
    Replace,
    Remove,
    Invoke,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Get,
        Operation::List,
        Operation::Create,
        Operation::Update,
        Operation::Replace,
        Operation::Remove,
        Operation::Invoke,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Replace => "replace",
            Operation::Remove => "remove",
            Operation::Invoke => "invoke",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Operation::Get | Operation::List => HttpMethod::Get,
            Operation::Create | Operation::Invoke => HttpMethod::Post,
            Operation::Update => HttpMethod::Patch,
            Operation::Replace => HttpMethod::Put,
            Operation::Remove => HttpMethod::Delete,
        }
    }

    /// Whether the request sends a JSON body.
    pub fn carries_body(self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::Update | Operation::Replace | Operation::Invoke
        )
    }

    /// Whether the response envelope must contain a `data` key.
    pub fn expects_payload(self) -> bool {
        !matches!(self, Operation::Remove)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
