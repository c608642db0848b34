//! HTTP status and transport failures mapped onto error codes.

use fluent_rest::{ErrorCode, RestClient};
use serde_json::json;
use tokio::net::TcpListener;

async fn start() -> RestClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    RestClient::connect(&format!("http://{addr}"), None).unwrap()
}

#[tokio::test]
async fn status_500_is_internal_server_error() {
    let client = start().await;
    let err = client.invoke().segment("err").segment(500).call(None, None).await.unwrap_err();
    assert!(ErrorCode::InternalServerError.is(&err));
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.info().request, "POST /err/500");
}

#[tokio::test]
async fn unknown_status_is_internal_server_error() {
    let client = start().await;
    let err = client.invoke().segment("err").segment(499).call(None, None).await.unwrap_err();
    assert!(ErrorCode::InternalServerError.is(&err));
    assert_eq!(err.status(), Some(499));
}

#[tokio::test]
async fn status_404_keeps_body_details_in_info() {
    let client = start().await;
    let err = client
        .invoke()
        .segment("err")
        .segment(404)
        .call(
            None,
            Some(json!({"message": "Hello", "code": "foo", "info": "bar", "stack": "this_is_a_stack"})),
        )
        .await
        .unwrap_err();
    assert!(ErrorCode::NotFound.is(&err));
    assert_eq!(err.code().code(), "notFound");
    assert_eq!(err.message(), "Object not found.");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.info().get("message"), Some(&json!("Hello")));
    assert_eq!(err.info().get("code"), Some(&json!("foo")));
    assert_eq!(err.info().get("stack"), Some(&json!("this_is_a_stack")));
    assert_eq!(err.info().get("info"), None);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let client = start().await;
    let err = client.invoke().segment("qwerty").call(None, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn status_409_is_conflict() {
    let client = start().await;
    let err = client.create().segment("err").segment(409).call(None, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn unreachable_host_is_invalid_endpoint() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RestClient::connect(&format!("http://{addr}"), None).unwrap();
    let err = client.invoke().segment("personas").call(None, None).await.unwrap_err();
    assert!(ErrorCode::InvalidEndpoint.is(&err));
    assert!(err.info().get("cause").is_some());
    assert_eq!(err.status(), None);
}

#[test]
fn malformed_endpoint_is_rejected_up_front() {
    let err = RestClient::connect("Bad URL", None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidEndpoint);
    assert_eq!(err.message(), "Invalid endpoint URL.");
}
