//! End-to-end tests driving the HTTP surface as a tower service.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use digcrab::deferred;
use digcrab::dig::DnsQuerier;
use digcrab::edit::ResponseEditor;
use digcrab::error::Error;
use digcrab::interactions::model::MessageData;
use digcrab::registry::{ComponentResolver, Handler, Registry};
use digcrab::report::{ErrorReporter, Tags};
use digcrab::{Config, Dispatcher};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::ServiceExt;
use trust_dns_client::rr::{Name, RecordType};

const TEST_SEED: [u8; 32] = [11u8; 32];

fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&TEST_SEED)
}

fn test_config(commands: HashMap<String, String>) -> Arc<Config> {
    Arc::new(Config {
        public_key: hex::encode(signing_key().verifying_key().as_bytes()),
        application_id: "9999".to_string(),
        api_bind_addr: "127.0.0.1:0".parse().unwrap(),
        api_timeout: Duration::from_secs(5),
        resolver_addr: "127.0.0.1:5353".parse().unwrap(),
        dns_timeout: Duration::from_secs(5),
        commands,
        server_url: "https://chat.example.com/invite/abc".to_string(),
        github_url: "https://github.com/example/digcrab".to_string(),
    })
}

#[derive(Default)]
struct RecordingReporter {
    reports: Mutex<Vec<(String, String)>>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, _error: &Error, tags: &Tags) {
        self.reports
            .lock()
            .unwrap()
            .push((tags.kind.to_string(), tags.name.clone()));
    }
}

struct RecordingEditor {
    tx: mpsc::UnboundedSender<(String, MessageData)>,
}

#[async_trait::async_trait]
impl ResponseEditor for RecordingEditor {
    async fn edit_original(&self, token: &str, data: &MessageData) -> Result<(), Error> {
        let _ = self.tx.send((token.to_string(), data.clone()));
        Ok(())
    }
}

struct StubQuerier {
    answers: Vec<String>,
}

#[async_trait::async_trait]
impl DnsQuerier for StubQuerier {
    async fn lookup(&self, _name: &Name, _record_type: RecordType) -> Result<Vec<String>, Error> {
        Ok(self.answers.clone())
    }
}

struct NoComponents;

impl ComponentResolver for NoComponents {
    fn resolve(&self, custom_id: &str) -> Result<Arc<dyn Handler>, Error> {
        Err(Error::ComponentNotFound(custom_id.to_string()))
    }
}

struct TestApp {
    router: axum::Router,
    reporter: Arc<RecordingReporter>,
    edits: mpsc::UnboundedReceiver<(String, MessageData)>,
}

fn test_app(commands: HashMap<String, String>, answers: Vec<String>) -> TestApp {
    let config = test_config(commands);
    let registry = if config.commands.is_empty() {
        // An empty registry with a resolver that never loads anything.
        Registry::new(HashMap::default(), Box::new(NoComponents))
    } else {
        Registry::from_config(&config).unwrap()
    };
    let reporter = Arc::new(RecordingReporter::default());
    let (tx, edits) = mpsc::unbounded_channel();
    let (scheduler, supervisor) = deferred::new();
    tokio::spawn(supervisor.run());
    let dispatcher = Arc::new(Dispatcher::new(
        registry,
        config.clone(),
        scheduler,
        reporter.clone(),
        Arc::new(RecordingEditor { tx }),
        Arc::new(StubQuerier { answers }),
    ));
    TestApp {
        router: digcrab::api::router(config, dispatcher).unwrap(),
        reporter,
        edits,
    }
}

fn signed_interaction(body: &Value) -> Request<Body> {
    let body = body.to_string();
    let timestamp = "1690000000";
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(body.as_bytes());
    let signature = hex::encode(signing_key().sign(&message).to_bytes());

    Request::builder()
        .method("POST")
        .uri("/interactions")
        .header("X-Signature-Ed25519", signature)
        .header("X-Signature-Timestamp", timestamp)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    hyper::body::to_bytes(response.into_body())
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn ping_with_valid_signature_pongs() {
    let app = test_app(HashMap::default(), Vec::new());
    let response = app
        .router
        .oneshot(signed_interaction(&json!({ "type": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({ "type": 1 }));
}

#[tokio::test]
async fn unsigned_body_is_rejected_with_empty_401() {
    let app = test_app(HashMap::default(), Vec::new());
    let request = Request::builder()
        .method("POST")
        .uri("/interactions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "type": 1 }).to_string()))
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn tampered_body_is_rejected() {
    let app = test_app(HashMap::default(), Vec::new());
    let mut request = signed_interaction(&json!({ "type": 1 }));
    *request.body_mut() = Body::from(json!({ "type": 2 }).to_string());
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unregistered_command_is_404_and_unreported() {
    let app = test_app(HashMap::default(), Vec::new());
    let response = app
        .router
        .oneshot(signed_interaction(&json!({
            "type": 2,
            "data": { "id": "unregistered" }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
    assert!(app.reporter.reports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn stale_component_is_404_not_500() {
    let app = test_app(HashMap::default(), Vec::new());
    let response = app
        .router
        .oneshot(signed_interaction(&json!({
            "type": 3,
            "data": { "custom_id": "stale-id" }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.reporter.reports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_interaction_type_is_501() {
    let app = test_app(HashMap::default(), Vec::new());
    let response = app
        .router
        .oneshot(signed_interaction(&json!({ "type": 12 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn dig_command_defers_then_edits_with_answers() {
    let commands = HashMap::from([("424242".to_string(), "dig".to_string())]);
    let answers = vec!["example.com. 300 TXT \"v=spf1 -all\"".to_string()];
    let mut app = test_app(commands, answers);

    let response = app
        .router
        .oneshot(signed_interaction(&json!({
            "type": 2,
            "token": "tok-dig",
            "data": {
                "id": "424242",
                "name": "dig",
                "options": [
                    { "name": "name", "type": 3, "value": "example.com" },
                    { "name": "type", "type": 3, "value": "TXT" }
                ]
            }
        })))
        .await
        .unwrap();

    // The immediate response is always the deferred ack.
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({ "type": 5 }));

    // The corrective edit follows with the real answers, against this interaction's token.
    let (token, data) = app.edits.recv().await.unwrap();
    assert_eq!(token, "tok-dig");
    let embed = &data.embeds.unwrap()[0];
    assert!(embed.description.as_ref().unwrap().contains("v=spf1"));
    assert!(app.reporter.reports.lock().unwrap().is_empty());
}

#[tokio::test]
async fn dig_rerun_button_defers_then_edits() {
    let commands = HashMap::from([("424242".to_string(), "dig".to_string())]);
    let mut app = test_app(commands, Vec::new());

    let response = app
        .router
        .oneshot(signed_interaction(&json!({
            "type": 3,
            "token": "tok-button",
            "data": { "custom_id": "dig:example.com:A" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({ "type": 5 }));

    let (token, data) = app.edits.recv().await.unwrap();
    assert_eq!(token, "tok-button");
    let embed = &data.embeds.unwrap()[0];
    assert!(embed.description.as_ref().unwrap().contains("No A records"));
}

#[tokio::test]
async fn health_is_200_ok_and_uncacheable() {
    let app = test_app(HashMap::default(), Vec::new());
    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "no-store, no-cache, must-revalidate, proxy-revalidate"
    );
    assert_eq!(body_bytes(response).await, b"OK");
}

#[tokio::test]
async fn policy_routes_serve_static_text() {
    for path in ["/privacy", "/terms"] {
        let app = test_app(HashMap::default(), Vec::new());
        let response = app
            .router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn redirect_routes_are_301_with_location() {
    let cases = [
        ("/invite", "client_id=9999"),
        ("/server", "chat.example.com"),
        ("/github", "github.com/example"),
        ("/", "github.com/example"),
    ];
    for (path, location_fragment) in cases {
        let app = test_app(HashMap::default(), Vec::new());
        let response = app
            .router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY, "{path}");
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.contains(location_fragment), "{path} -> {location}");
    }
}

#[tokio::test]
async fn unknown_paths_are_404() {
    let app = test_app(HashMap::default(), Vec::new());
    let response = app
        .router
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
