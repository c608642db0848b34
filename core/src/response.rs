//! Extraction of the result from a `{ "data": ... }` envelope.

use serde_json::Value;

use crate::error::{AppError, ErrorCode};
use crate::request::RestRequest;

/// Validate a successful response body and pull out its `data` field.
///
/// Operations that expect no payload resolve to `None` whatever the body
/// holds. For the rest the body must be present and must contain a `data`
/// key, though `data` itself may be `null`.
pub fn resolve(body: Option<Value>, request: &RestRequest) -> Result<Option<Value>, AppError> {
    if !request.operation().expects_payload() {
        return Ok(None);
    }

    let envelope = match body {
        Some(value) if !is_blank(&value) => value,
        _ => return Err(AppError::new(ErrorCode::NoBody, request.description())),
    };

    match envelope {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(data) => Ok(Some(data)),
            None => Err(AppError::new(ErrorCode::NoData, request.description())),
        },
        _ => Err(AppError::new(ErrorCode::NoData, request.description())),
    }
}

/// Bodies that carry nothing: `null`, `false`, `0` and `""`.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
