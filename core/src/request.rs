//! Turns an operation, a path and the caller's arguments into a request.
//!
//! # Design
//! `RestRequest` is plain data. The URL is derived from the path and query
//! options on demand, never stored, so the two cannot drift apart. The
//! transport consumes the request; nothing here touches the network.

use serde_json::Value;

use crate::operation::{HttpMethod, Operation};
use crate::path::{PathSegment, ResourcePath};
use crate::query;

/// The single optional argument accepted by `get` and `remove`.
///
/// A key names one more resource level, exactly as if it had been appended
/// with `segment` before the call. Options become the query string and
/// leave the path unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Lookup {
    #[default]
    None,
    Key(PathSegment),
    Options(Value),
}

impl From<()> for Lookup {
    fn from((): ()) -> Self {
        Lookup::None
    }
}

/// Strings and numbers are keys, objects and arrays are options. `null` and
/// booleans name nothing and carry no options, so they mean no argument.
impl From<Value> for Lookup {
    fn from(value: Value) -> Self {
        match value {
            Value::String(name) => Lookup::Key(PathSegment::Name(name)),
            Value::Number(n) => Lookup::Key(match (n.as_i64(), n.as_u64()) {
                (Some(index), _) => PathSegment::Index(index),
                (None, Some(index)) => PathSegment::from(index),
                (None, None) => PathSegment::Name(n.to_string()),
            }),
            Value::Object(_) | Value::Array(_) => Lookup::Options(value),
            Value::Null | Value::Bool(_) => Lookup::None,
        }
    }
}

impl From<Option<Value>> for Lookup {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Lookup::None, Lookup::from)
    }
}

impl From<PathSegment> for Lookup {
    fn from(key: PathSegment) -> Self {
        Lookup::Key(key)
    }
}

macro_rules! key_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Lookup {
                fn from(key: $ty) -> Self {
                    Lookup::Key(PathSegment::from(key))
                }
            }
        )*
    };
}

key_from!(&str, String, &String, i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// A fully resolved call: what to do, where, and with what.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    operation: Operation,
    path: ResourcePath,
    body: Option<Value>,
    query: Option<Value>,
}

impl RestRequest {
    pub fn new(
        operation: Operation,
        path: ResourcePath,
        body: Option<Value>,
        query: Option<Value>,
    ) -> Self {
        Self {
            operation,
            path,
            body,
            query,
        }
    }

    /// Build a body-less request whose argument is either a trailing key or
    /// query options. Used by `get` and `remove`.
    pub fn lookup(operation: Operation, path: ResourcePath, lookup: Lookup) -> Self {
        match lookup {
            Lookup::None => Self::new(operation, path, None, None),
            Lookup::Key(key) => Self::new(operation, path.join(key), None, None),
            Lookup::Options(options) => Self::new(operation, path, None, Some(options)),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn method(&self) -> HttpMethod {
        self.operation.method()
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn query(&self) -> Option<&Value> {
        self.query.as_ref()
    }

    /// Path plus query string, relative to the endpoint: `/a/b?x=1`.
    pub fn url(&self) -> String {
        let mut url = self.path.to_url_path();
        if let Some(qs) = self.query.as_ref().and_then(query::encode) {
            url.push('?');
            url.push_str(&qs);
        }
        url
    }

    /// Human-readable summary used in logs and error diagnostics.
    pub fn description(&self) -> String {
        format!("{} {}", self.method(), self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn personas() -> ResourcePath {
        ResourcePath::new().join("personas")
    }

    #[test]
    fn url_without_options_is_the_path() {
        let req = RestRequest::new(
            Operation::List,
            personas().join(123).join("phones"),
            None,
            None,
        );
        assert_eq!(req.url(), "/personas/123/phones");
        assert_eq!(req.description(), "GET /personas/123/phones");
    }

    #[test]
    fn options_are_appended_as_query_string() {
        let req = RestRequest::new(
            Operation::List,
            personas(),
            None,
            Some(json!({"type": "mobile"})),
        );
        assert_eq!(req.url(), "/personas?type=mobile");
    }

    #[test]
    fn empty_options_add_no_question_mark() {
        let req = RestRequest::new(Operation::List, personas(), None, Some(json!({})));
        assert_eq!(req.url(), "/personas");
    }

    #[test]
    fn root_path_renders_as_slash() {
        let req = RestRequest::new(Operation::Invoke, ResourcePath::new(), None, None);
        assert_eq!(req.url(), "/");
        assert_eq!(req.description(), "POST /");
    }

    #[test]
    fn lookup_key_extends_the_path() {
        let by_key = RestRequest::lookup(Operation::Get, personas(), Lookup::from(123));
        let by_segment = RestRequest::lookup(Operation::Get, personas().join(123), Lookup::None);
        assert_eq!(by_key, by_segment);
        assert_eq!(by_key.url(), "/personas/123");
        assert!(by_key.query().is_none());
    }

    #[test]
    fn lookup_string_key_extends_the_path() {
        let req = RestRequest::lookup(Operation::Remove, personas(), Lookup::from("abc"));
        assert_eq!(req.description(), "DELETE /personas/abc");
    }

    #[test]
    fn lookup_options_become_query() {
        let req = RestRequest::lookup(
            Operation::Remove,
            personas().join(123),
            Lookup::from(json!({"type": "mobile"})),
        );
        assert_eq!(req.path(), &personas().join(123));
        assert_eq!(req.url(), "/personas/123?type=mobile");
        assert!(req.body().is_none());
    }

    #[test]
    fn lookup_value_primitive_is_key() {
        assert_eq!(Lookup::from(json!(123)), Lookup::Key(PathSegment::Index(123)));
        assert_eq!(Lookup::from(json!("abc")), Lookup::Key(PathSegment::from("abc")));
        assert_eq!(Lookup::from(json!(1.5)), Lookup::Key(PathSegment::from("1.5")));
        assert_eq!(
            Lookup::from(json!(u64::MAX)),
            Lookup::Key(PathSegment::from(u64::MAX))
        );

        for operation in [Operation::Get, Operation::Remove] {
            let req = RestRequest::lookup(operation, personas(), Lookup::from(json!(123)));
            assert_eq!(req.url(), "/personas/123");
            let req = RestRequest::lookup(operation, personas(), Lookup::from(Some(json!("abc"))));
            assert_eq!(req.url(), "/personas/abc");
        }
    }

    #[test]
    fn lookup_value_collections_are_options() {
        assert_eq!(
            Lookup::from(json!({"type": "mobile"})),
            Lookup::Options(json!({"type": "mobile"}))
        );
        assert_eq!(Lookup::from(json!(["x"])), Lookup::Options(json!(["x"])));
    }

    #[test]
    fn lookup_value_null_and_bool_mean_no_argument() {
        assert_eq!(Lookup::from(Value::Null), Lookup::None);
        assert_eq!(Lookup::from(json!(true)), Lookup::None);
        assert_eq!(Lookup::from(Some(json!(false))), Lookup::None);
    }

    #[test]
    fn unit_and_none_mean_no_argument() {
        assert_eq!(Lookup::from(()), Lookup::None);
        assert_eq!(Lookup::from(None::<Value>), Lookup::None);
    }

    #[test]
    fn body_is_kept_verbatim() {
        let req = RestRequest::new(
            Operation::Create,
            personas(),
            Some(json!({"name": "John"})),
            Some(json!({"hello": "world"})),
        );
        assert_eq!(req.body(), Some(&json!({"name": "John"})));
        assert_eq!(req.url(), "/personas?hello=world");
    }
}
