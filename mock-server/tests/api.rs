use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_phones_echoes_query() {
    let resp = app()
        .oneshot(empty_request("GET", "/personas/123/phones?type=mobile"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"data": [1, "Foo", {"type": "mobile"}]}));
}

#[tokio::test]
async fn list_phones_without_query_has_empty_object() {
    let resp = app()
        .oneshot(empty_request("GET", "/personas/123/phones"))
        .await
        .unwrap();

    assert_eq!(body_json(resp).await["data"][2], json!({}));
}

// --- get ---

#[tokio::test]
async fn get_persona_echoes_query_as_data() {
    let resp = app()
        .oneshot(empty_request("GET", "/personas/123?type=mobile"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"data": {"type": "mobile"}}));
}

// --- create ---

#[tokio::test]
async fn create_persona_merges_body() {
    let resp = app()
        .oneshot(json_request("POST", "/personas?hello=world", r#"{"name":"John"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"data": {"id": "123", "name": "John", "qs": {"hello": "world"}}})
    );
}

#[tokio::test]
async fn no_data_omits_envelope_field() {
    let resp = app().oneshot(json_request("POST", "/noData", "{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({}));
}

#[tokio::test]
async fn no_body_is_empty() {
    let resp = app().oneshot(json_request("POST", "/noBody", "{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn plain_answers_with_text() {
    for method in ["POST", "DELETE"] {
        let resp = app().oneshot(empty_request(method, "/plain")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[http::header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_bytes(resp).await, "OK");
    }
}

#[tokio::test]
async fn no_data_accepts_delete() {
    let resp = app().oneshot(empty_request("DELETE", "/noData")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({}));
}

// --- update / replace ---

#[tokio::test]
async fn patch_uses_path_id() {
    let resp = app()
        .oneshot(json_request("PATCH", "/personas/42", r#"{"foo":"bar","x":5}"#))
        .await
        .unwrap();

    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["id"], "42");
    assert_eq!(data["foo"], "bar");
    assert_eq!(data["x"], 5);
}

#[tokio::test]
async fn put_echoes_query() {
    let resp = app()
        .oneshot(json_request("PUT", "/personas/123?foo=bar", r#"{"name":"John"}"#))
        .await
        .unwrap();

    assert_eq!(body_json(resp).await["data"]["qs"], json!({"foo": "bar"}));
}

// --- remove ---

#[tokio::test]
async fn delete_returns_empty_ok() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/personas/123"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

// --- invoke ---

#[tokio::test]
async fn perform_echoes_body_and_query() {
    let resp = app()
        .oneshot(json_request("POST", "/perform?hello=world", r#"{"name":"John"}"#))
        .await
        .unwrap();

    assert_eq!(
        body_json(resp).await,
        json!({"data": {"body": {"name": "John"}, "qs": {"hello": "world"}}})
    );
}

// --- errors ---

#[tokio::test]
async fn err_route_uses_requested_status() {
    let resp = app()
        .oneshot(json_request("POST", "/err/404?message=Hello&code=foo", "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({"code": "foo", "message": "Hello"}));
}

#[tokio::test]
async fn err_route_accepts_nonstandard_status() {
    let resp = app().oneshot(empty_request("POST", "/err/499")).await.unwrap();

    assert_eq!(resp.status().as_u16(), 499);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app().oneshot(empty_request("POST", "/qwerty")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
