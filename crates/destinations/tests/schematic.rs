use conduit_action::{ActionError, ActionInvoker, HttpClient, RequestClient};
use conduit_core::{Event, Settings};
use conduit_destinations::schematic::{self, API_KEY_HEADER};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings() -> Settings {
    Settings::new().with("apiKey", json!("sch-key"))
}

fn event(raw: Value) -> Event {
    Event::from_value(raw).unwrap()
}

async fn server_expecting(requests: u64, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/events"))
        .and(header(API_KEY_HEADER, "sch-key"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"ok": status < 300})))
        .expect(requests)
        .mount(&server)
        .await;
    server
}

async fn sent_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn identify_posts_once() {
    let server = server_expecting(1, 200).await;
    let dest = schematic::destination_with_endpoint(format!("{}/events", server.uri())).unwrap();
    let invoker = ActionInvoker::new(&dest, &settings()).unwrap();
    let client = HttpClient::new().unwrap();

    let identify = event(json!({
        "type": "identify",
        "userId": "u-42",
        "traits": {"name": "Ada Lovelace", "company_name": "Analytical Engines"}
    }));
    let output = invoker
        .invoke(&client as &dyn RequestClient, "identifyUser", &identify, None)
        .await
        .unwrap();

    assert_eq!(output.response().map(|r| r.status), Some(200));
    assert_eq!(
        sent_bodies(&server).await,
        vec![json!({
            "body": {
                "company": {"name": "Analytical Engines"},
                "keys": {"user_id": "u-42"},
                "name": "Ada Lovelace"
            },
            "event_type": "identify"
        })]
    );
}

#[tokio::test]
async fn track_snake_cases_event() {
    let server = server_expecting(1, 200).await;
    let dest = schematic::destination_with_endpoint(format!("{}/events", server.uri())).unwrap();
    let invoker = ActionInvoker::new(&dest, &settings()).unwrap();
    let client = HttpClient::new().unwrap();

    let track = event(json!({"type": "track", "event": "Signed Up", "userId": "u-42"}));
    let outcomes = invoker.dispatch(&client as &dyn RequestClient, &track).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].action.as_str(), "trackEvent");
    assert!(outcomes[0].result.is_ok());
    assert_eq!(
        sent_bodies(&server).await,
        vec![json!({
            "body": {
                "user": {"user_id": "u-42"},
                "traits": {"raw_event_name": "Signed Up"},
                "event": "signed_up"
            },
            "event_type": "track"
        })]
    );
}

#[tokio::test]
async fn missing_event_name_sends_nothing() {
    let server = server_expecting(0, 200).await;
    let dest = schematic::destination_with_endpoint(format!("{}/events", server.uri())).unwrap();
    let invoker = ActionInvoker::new(&dest, &settings()).unwrap();
    let client = HttpClient::new().unwrap();

    let err = invoker
        .invoke(
            &client as &dyn RequestClient,
            "trackEvent",
            &event(json!({"type": "track", "userId": "u-42"})),
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), "ACTION_VALIDATION");
    assert!(sent_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn server_errors_surface_as_retryable_http() {
    let server = server_expecting(1, 503).await;
    let dest = schematic::destination_with_endpoint(format!("{}/events", server.uri())).unwrap();
    let invoker = ActionInvoker::new(&dest, &settings()).unwrap();
    let client = HttpClient::new().unwrap();

    let err = invoker
        .invoke(
            &client as &dyn RequestClient,
            "trackEvent",
            &event(json!({"type": "track", "event": "Signed Up"})),
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn bad_request_is_not_retryable() {
    let server = server_expecting(1, 400).await;
    let dest = schematic::destination_with_endpoint(format!("{}/events", server.uri())).unwrap();
    let invoker = ActionInvoker::new(&dest, &settings()).unwrap();
    let client = HttpClient::new().unwrap();

    let err = invoker
        .invoke(
            &client as &dyn RequestClient,
            "trackEvent",
            &event(json!({"type": "track", "event": "Signed Up"})),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Http { status: 400, .. }));
    assert!(!err.is_retryable());
}

#[test]
fn api_key_is_required() {
    let dest = schematic::destination().unwrap();
    let err = ActionInvoker::new(&dest, &Settings::new()).err().unwrap();
    assert_eq!(err.code(), "ACTION_VALIDATION");
}
