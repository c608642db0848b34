//! Echo server for exercising the REST client end to end.
//!
//! Every successful route answers with a `{ "data": ... }` envelope built
//! from what it received, so tests can check the path, query string and
//! body the client produced. A few routes deliberately misbehave:
//! `/noData` omits `data`, `/noBody` sends nothing, `/plain` answers with
//! text instead of JSON, and `/err/{status}` answers with an arbitrary
//! status and echoes its query as the error body.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

pub type QueryParams = Query<BTreeMap<String, String>>;

pub fn app() -> Router {
    Router::new()
        .route("/personas", post(create_persona))
        .route(
            "/personas/{id}",
            get(get_persona)
                .patch(modify_persona)
                .put(modify_persona)
                .delete(remove_persona),
        )
        .route("/personas/{id}/phones", get(list_phones))
        .route("/perform", post(perform))
        .route("/noData", post(no_data).delete(no_data))
        .route("/plain", post(plain_text).delete(plain_text))
        .route("/noBody", post(no_body))
        .route("/err/{status}", post(fail_with))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("mock-server: listening on {addr}");
    }
    axum::serve(listener, app()).await
}

fn query_value(Query(params): QueryParams) -> Value {
    Value::Object(
        params
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

/// `{ id, qs }` overlaid with the fields of `body`.
fn echo_record(id: &str, qs: Value, body: Value) -> Value {
    let mut record = Map::new();
    record.insert("id".into(), Value::String(id.to_string()));
    record.insert("qs".into(), qs);
    if let Value::Object(fields) = body {
        record.extend(fields);
    }
    Value::Object(record)
}

async fn list_phones(query: QueryParams) -> Json<Value> {
    Json(json!({ "data": [1, "Foo", query_value(query)] }))
}

async fn get_persona(query: QueryParams) -> Json<Value> {
    Json(json!({ "data": query_value(query) }))
}

async fn create_persona(query: QueryParams, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "data": echo_record("123", query_value(query), body) }))
}

async fn modify_persona(
    Path(id): Path<String>,
    query: QueryParams,
    Json(body): Json<Value>,
) -> Json<Value> {
    Json(json!({ "data": echo_record(&id, query_value(query), body) }))
}

async fn remove_persona(Path(id): Path<String>) -> StatusCode {
    tracing::debug!("mock-server: removed persona {id}");
    StatusCode::OK
}

async fn perform(query: QueryParams, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "data": { "body": body, "qs": query_value(query) } }))
}

async fn no_data() -> Json<Value> {
    Json(json!({}))
}

async fn no_body() -> StatusCode {
    StatusCode::OK
}

async fn plain_text() -> &'static str {
    "OK"
}

async fn fail_with(Path(status): Path<u16>, query: QueryParams) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(query_value(query)))
}
