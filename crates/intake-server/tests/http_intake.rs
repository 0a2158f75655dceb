//! End-to-end: real listener on an ephemeral port, driven with reqwest

use intake_form::{Outcome, Platform};
use intake_server::{Ack, ErrorBody, IntakeService, INTAKE_PATH, MAX_BODY_BYTES};
use intake_test_utils::{jane_json, FailingStore, RecordingNotifier, RecordingStore, TestServer};
use pretty_assertions::assert_eq;
use std::sync::Arc;

async fn spawn(store: RecordingStore) -> TestServer {
    TestServer::spawn(IntakeService::new(Arc::new(store))).await
}

#[tokio::test]
async fn accepted_request_is_recorded() {
    let store = RecordingStore::new();
    let server = spawn(store.clone()).await;

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .header("x-forwarded-for", "198.51.100.23, 10.0.0.2")
        .header("user-agent", "Mozilla/5.0 (Macintosh)")
        .json(&jane_json())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Ack>().await.unwrap(), Ack { ok: true });

    let rows = store.rows();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.name, "Jane");
    assert_eq!(row.email, "jane@co.com");
    assert_eq!(row.platform, Platform::Web);
    assert_eq!(row.outcome, Outcome::Foundation);
    assert!(row.consent_files && row.consent_data);
    assert_eq!(row.figma_url, None);
    assert_eq!(row.source_ip.as_deref(), Some("198.51.100.23"));
    assert_eq!(row.user_agent.as_deref(), Some("Mozilla/5.0 (Macintosh)"));
}

#[tokio::test]
async fn peer_address_used_without_forwarding_header() {
    let store = RecordingStore::new();
    let server = spawn(store.clone()).await;

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .json(&jane_json())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(store.rows()[0].source_ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn missing_consent_rejected_without_row() {
    let store = RecordingStore::new();
    let server = spawn(store.clone()).await;

    let mut body = jane_json();
    body.as_object_mut().unwrap().remove("consent_data");

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(
        response.json::<ErrorBody>().await.unwrap().error,
        "Consent required"
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn null_consent_is_consent_required() {
    let store = RecordingStore::new();
    let server = spawn(store.clone()).await;

    let mut body = jane_json();
    body["consent_data"] = serde_json::Value::Null;

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(
        response.json::<ErrorBody>().await.unwrap().error,
        "Consent required"
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn oversized_body_gets_json_413() {
    let store = RecordingStore::new();
    let server = spawn(store.clone()).await;

    let mut body = jane_json();
    body["name"] = "x".repeat(MAX_BODY_BYTES * 2).into();

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 413);
    assert_eq!(
        response.json::<ErrorBody>().await.unwrap().error,
        "Request body too large"
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn unknown_platform_rejected_without_row() {
    let store = RecordingStore::new();
    let server = spawn(store.clone()).await;

    let mut body = jane_json();
    body["platform"] = "Desktop".into();

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(response.json::<ErrorBody>().await.unwrap().error, "Invalid platform");
    assert!(store.is_empty());
}

#[tokio::test]
async fn non_json_body_is_bad_request() {
    let store = RecordingStore::new();
    let server = spawn(store.clone()).await;

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Jane&email=jane%40co.com")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert!(response.json::<ErrorBody>().await.is_ok());
    assert!(store.is_empty());
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let store = RecordingStore::new();
    let server = spawn(store.clone()).await;
    let client = reqwest::Client::new();

    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE] {
        let response = client
            .request(method.clone(), server.url(INTAKE_PATH))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 405, "{method}");
        assert_eq!(
            response.json::<ErrorBody>().await.unwrap().error,
            "Method not allowed"
        );
    }
    assert!(store.is_empty());
}

#[tokio::test]
async fn store_failure_is_generic_500() {
    let notifier = RecordingNotifier::new();
    let service = IntakeService::new(Arc::new(FailingStore { status: 401 }))
        .with_notifier(Arc::new(notifier.clone()));
    let server = TestServer::spawn(service).await;

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .json(&jane_json())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body = response.text().await.unwrap();
    assert_eq!(body, r#"{"error":"Database insert failed"}"#);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn notification_failure_still_succeeds() {
    let store = RecordingStore::new();
    let notifier = RecordingNotifier::failing();
    let service = IntakeService::new(Arc::new(store.clone())).with_notifier(Arc::new(notifier.clone()));
    let server = TestServer::spawn(service).await;

    let response = reqwest::Client::new()
        .post(server.url(INTAKE_PATH))
        .json(&jane_json())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(store.len(), 1);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New Axinite Setup Request");
    assert!(sent[0].html.contains("<b>Figma:</b> —"));
}

#[tokio::test]
async fn health_probe() {
    let server = spawn(RecordingStore::new()).await;

    let response = reqwest::get(server.url("/healthz")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json::<serde_json::Value>().await.unwrap(),
        serde_json::json!({ "status": "ok" })
    );
}
