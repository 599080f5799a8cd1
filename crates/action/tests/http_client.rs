use conduit_action::{HttpClient, HttpRequest, RequestClient, RequestError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn posts_json_with_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .and(header("X-Api-Key", "secret"))
        .and(body_json(json!({"event": "signed_up"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new().unwrap();
    let response = client
        .send(
            HttpRequest::post(format!("{}/events", server.uri()))
                .header("X-Api-Key", "secret")
                .json(json!({"event": "signed_up"})),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.body, Some(json!({"ok": true})));
}

#[tokio::test]
async fn server_error_is_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = HttpClient::new()
        .unwrap()
        .send(HttpRequest::post(server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, RequestError::Status { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn client_error_is_not_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad event"))
        .mount(&server)
        .await;

    let err = HttpClient::new()
        .unwrap()
        .send(HttpRequest::post(server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unvalidated_status_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = HttpClient::new()
        .unwrap()
        .send(HttpRequest::get(server.uri()).validate_status(false))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert!(response.is_client_error());
}
