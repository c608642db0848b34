//! Error codes and the error type returned by every client call.
//!
//! # Design
//! `ErrorCode` is the whole taxonomy as a closed enum. Codes render as dotted
//! paths (`responseError.noData`) and sub-kinds know their parent, so
//! `ErrorCode::BadRequest.is(&err)` also matches `badRequest.objectRequired`.
//! HTTP statuses map to codes through one table; anything not listed there
//! is an `internalServerError`.
//!
//! `AppError` carries the chosen code, its canonical message and an
//! `ErrorInfo` with the failing request. Details from a server's error body
//! go into `info`, never into the code or message.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::transport::TransportError;

/// Every error category the client can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadRequest,
    /// `update` called without a body. Raised before dispatch.
    ObjectRequired,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    ProxyAuthenticationRequired,
    RequestTimeout,
    Conflict,
    Gone,
    LengthRequired,
    PreconditionFailed,
    PayloadTooLarge,
    UriTooLong,
    UnsupportedMediaType,
    RequestedRangeNotSatisfiable,
    ExpectationFailed,
    MisdirectedRequest,
    UnprocessableEntity,
    Locked,
    FailedDependency,
    UpgradeRequired,
    PreconditionRequired,
    TooManyRequests,
    RequestFieldsTooLarge,
    UnavailableForLegalReasons,
    InternalServerError,
    NotImplemented,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    HttpVersionNotSupported,
    VariantAlsoNegotiates,
    InsufficientStorage,
    LoopDetected,
    NotExtended,
    NetworkAuthenticationRequired,
    /// The endpoint URL is malformed or the host cannot be reached.
    InvalidEndpoint,
    /// The request failed in transit (timeout, reset connection).
    RequestError,
    ResponseError,
    NoBody,
    NoData,
}

const STATUS_TABLE: &[(u16, ErrorCode)] = &[
    (400, ErrorCode::BadRequest),
    (401, ErrorCode::Unauthorized),
    (403, ErrorCode::Forbidden),
    (404, ErrorCode::NotFound),
    (405, ErrorCode::MethodNotAllowed),
    (406, ErrorCode::NotAcceptable),
    (407, ErrorCode::ProxyAuthenticationRequired),
    (408, ErrorCode::RequestTimeout),
    (409, ErrorCode::Conflict),
    (410, ErrorCode::Gone),
    (411, ErrorCode::LengthRequired),
    (412, ErrorCode::PreconditionFailed),
    (413, ErrorCode::PayloadTooLarge),
    (414, ErrorCode::UriTooLong),
    (415, ErrorCode::UnsupportedMediaType),
    (416, ErrorCode::RequestedRangeNotSatisfiable),
    (417, ErrorCode::ExpectationFailed),
    (421, ErrorCode::MisdirectedRequest),
    (422, ErrorCode::UnprocessableEntity),
    (423, ErrorCode::Locked),
    (424, ErrorCode::FailedDependency),
    (426, ErrorCode::UpgradeRequired),
    (428, ErrorCode::PreconditionRequired),
    (429, ErrorCode::TooManyRequests),
    (431, ErrorCode::RequestFieldsTooLarge),
    (451, ErrorCode::UnavailableForLegalReasons),
    (500, ErrorCode::InternalServerError),
    (501, ErrorCode::NotImplemented),
    (502, ErrorCode::BadGateway),
    (503, ErrorCode::ServiceUnavailable),
    (504, ErrorCode::GatewayTimeout),
    (505, ErrorCode::HttpVersionNotSupported),
    (506, ErrorCode::VariantAlsoNegotiates),
    (507, ErrorCode::InsufficientStorage),
    (508, ErrorCode::LoopDetected),
    (510, ErrorCode::NotExtended),
    (511, ErrorCode::NetworkAuthenticationRequired),
];

impl ErrorCode {
    /// Category for an HTTP status, `InternalServerError` when unmapped.
    pub fn from_status(status: u16) -> Self {
        STATUS_TABLE
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(ErrorCode::InternalServerError, |(_, code)| *code)
    }

    /// The HTTP status this category is bound to, if any.
    pub fn status(self) -> Option<u16> {
        STATUS_TABLE
            .iter()
            .find(|(_, code)| *code == self)
            .map(|(status, _)| *status)
    }

    pub fn parent(self) -> Option<ErrorCode> {
        match self {
            ErrorCode::ObjectRequired => Some(ErrorCode::BadRequest),
            ErrorCode::NoBody | ErrorCode::NoData => Some(ErrorCode::ResponseError),
            _ => None,
        }
    }

    /// True when `err` carries this code or one of its sub-kinds.
    pub fn is(self, err: &AppError) -> bool {
        let mut current = Some(err.code);
        while let Some(code) = current {
            if code == self {
                return true;
            }
            current = code.parent();
        }
        false
    }

    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "badRequest",
            ErrorCode::ObjectRequired => "badRequest.objectRequired",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::NotFound => "notFound",
            ErrorCode::MethodNotAllowed => "methodNotAllowed",
            ErrorCode::NotAcceptable => "notAcceptable",
            ErrorCode::ProxyAuthenticationRequired => "proxyAuthenticationRequired",
            ErrorCode::RequestTimeout => "requestTimeout",
            ErrorCode::Conflict => "conflict",
            ErrorCode::Gone => "gone",
            ErrorCode::LengthRequired => "lengthRequired",
            ErrorCode::PreconditionFailed => "preconditionFailed",
            ErrorCode::PayloadTooLarge => "payloadTooLarge",
            ErrorCode::UriTooLong => "URITooLong",
            ErrorCode::UnsupportedMediaType => "unsupportedMediaType",
            ErrorCode::RequestedRangeNotSatisfiable => "requestedRangeNotSatisfiable",
            ErrorCode::ExpectationFailed => "expectationFailed",
            ErrorCode::MisdirectedRequest => "misdirectedRequest",
            ErrorCode::UnprocessableEntity => "unprocessableEntity",
            ErrorCode::Locked => "locked",
            ErrorCode::FailedDependency => "failedDependency",
            ErrorCode::UpgradeRequired => "upgradeRequired",
            ErrorCode::PreconditionRequired => "preconditionRequired",
            ErrorCode::TooManyRequests => "tooManyRequests",
            ErrorCode::RequestFieldsTooLarge => "requestFieldsTooLarge",
            ErrorCode::UnavailableForLegalReasons => "unavailableForLegalReasons",
            ErrorCode::InternalServerError => "internalServerError",
            ErrorCode::NotImplemented => "notImplemented",
            ErrorCode::BadGateway => "badGateway",
            ErrorCode::ServiceUnavailable => "serviceUnavailable",
            ErrorCode::GatewayTimeout => "gatewayTimeout",
            ErrorCode::HttpVersionNotSupported => "HTTPVersionNotSupported",
            ErrorCode::VariantAlsoNegotiates => "variantAlsoNegotiates",
            ErrorCode::InsufficientStorage => "insufficientStorage",
            ErrorCode::LoopDetected => "loopDetected",
            ErrorCode::NotExtended => "notExtended",
            ErrorCode::NetworkAuthenticationRequired => "networkAuthenticationRequired",
            ErrorCode::InvalidEndpoint => "invalidEndpoint",
            ErrorCode::RequestError => "requestError",
            ErrorCode::ResponseError => "responseError",
            ErrorCode::NoBody => "responseError.noBody",
            ErrorCode::NoData => "responseError.noData",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "Bad request.",
            ErrorCode::ObjectRequired => "This operation requires an argument of type object.",
            ErrorCode::Unauthorized => "Authentication required.",
            ErrorCode::Forbidden => "You're not authorized to execute this operation",
            ErrorCode::NotFound => "Object not found.",
            ErrorCode::MethodNotAllowed => "Operation not allowed.",
            ErrorCode::NotAcceptable => "Not acceptable.",
            ErrorCode::ProxyAuthenticationRequired => "Proxy authentication required.",
            ErrorCode::RequestTimeout => "Request timeout.",
            ErrorCode::Conflict => "Conflict.",
            ErrorCode::Gone => "Gone.",
            ErrorCode::LengthRequired => "Length required.",
            ErrorCode::PreconditionFailed => "Precondition failed.",
            ErrorCode::PayloadTooLarge => "Payload too large.",
            ErrorCode::UriTooLong => "URI too long.",
            ErrorCode::UnsupportedMediaType => "Unsupported media type.",
            ErrorCode::RequestedRangeNotSatisfiable => "Requested range not satisfiable.",
            ErrorCode::ExpectationFailed => "Expectation failed.",
            ErrorCode::MisdirectedRequest => "Misdirected request.",
            ErrorCode::UnprocessableEntity => "Unprocessable entity.",
            ErrorCode::Locked => "Locked.",
            ErrorCode::FailedDependency => "Failed dependency.",
            ErrorCode::UpgradeRequired => "Upgrade required.",
            ErrorCode::PreconditionRequired => "Precondition required.",
            ErrorCode::TooManyRequests => "Too many requests.",
            ErrorCode::RequestFieldsTooLarge => "Request header fields too large.",
            ErrorCode::UnavailableForLegalReasons => "Unavailable for legal reasons.",
            ErrorCode::InternalServerError => "Internal server error.",
            ErrorCode::NotImplemented => "Not implemented.",
            ErrorCode::BadGateway => "Bad gateway.",
            ErrorCode::ServiceUnavailable => "Service unavailable.",
            ErrorCode::GatewayTimeout => "Gateway timeout.",
            ErrorCode::HttpVersionNotSupported => "HTTP version not supported.",
            ErrorCode::VariantAlsoNegotiates => "Variant also negotiates.",
            ErrorCode::InsufficientStorage => "Insufficient storage.",
            ErrorCode::LoopDetected => "Loop detected.",
            ErrorCode::NotExtended => "Not extended.",
            ErrorCode::NetworkAuthenticationRequired => "Network authentication required.",
            ErrorCode::InvalidEndpoint => "Invalid endpoint URL.",
            ErrorCode::RequestError => "Request error.",
            ErrorCode::ResponseError => "Invalid response received.",
            ErrorCode::NoBody => "Response body missing.",
            ErrorCode::NoData => "Data expected but not present in response.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Diagnostics attached to an [`AppError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    /// The failing call, e.g. `GET /personas/123`.
    pub request: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorInfo {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Fields of a server's error body copied into `ErrorInfo::extra`.
const BODY_FIELDS: [&str; 3] = ["message", "code", "stack"];

/// The error every client call fails with.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message} ({code})")]
pub struct AppError {
    code: ErrorCode,
    message: String,
    info: ErrorInfo,
}

impl AppError {
    pub fn new(code: ErrorCode, request: impl Into<String>) -> Self {
        Self {
            code,
            message: code.message().to_string(),
            info: ErrorInfo {
                request: request.into(),
                status: None,
                extra: Map::new(),
            },
        }
    }

    /// Map a non-2xx response onto the taxonomy.
    pub fn from_status(status: u16, body: Option<&Value>, request: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorCode::from_status(status), request).with_status(status);
        if let Some(Value::Object(fields)) = body {
            for key in BODY_FIELDS {
                if let Some(value) = fields.get(key) {
                    err.info.extra.insert(key.to_string(), value.clone());
                }
            }
        }
        err
    }

    pub fn from_transport(err: TransportError, request: impl Into<String>) -> Self {
        match err {
            TransportError::InvalidEndpoint { endpoint, reason } => {
                Self::new(ErrorCode::InvalidEndpoint, request)
                    .with_extra("endpoint", Value::String(endpoint))
                    .with_extra("cause", Value::String(reason))
            }
            TransportError::Unreachable(cause) => Self::new(ErrorCode::InvalidEndpoint, request)
                .with_extra("cause", Value::String(cause)),
            TransportError::Network(cause) => Self::new(ErrorCode::RequestError, request)
                .with_extra("cause", Value::String(cause)),
            TransportError::Status { status, body } => {
                Self::from_status(status, body.as_ref(), request)
            }
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.info.status = Some(status);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.info.extra.insert(key.into(), value);
        self
    }

    /// Emit the failure to the log and hand the error back.
    pub(crate) fn logged(self) -> Self {
        tracing::error!(
            request = %self.info.request,
            code = %self.code,
            status = ?self.info.status,
            "{} FAILED.",
            self.info.request
        );
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn info(&self) -> &ErrorInfo {
        &self.info
    }

    pub fn status(&self) -> Option<u16> {
        self.info.status
    }
}
