use async_trait::async_trait;
use axum::{body::to_bytes, body::Body, http::{Request, StatusCode}, Router};
use batimove_backend::app::app::App;
use batimove_backend::config::{AppConfig, StorageBackend};
use batimove_backend::model::record::StoredRecord;
use batimove_backend::model::submission::{Submission, SubmissionKind};
use batimove_backend::router::intake_router::catch_panic_layer;
use batimove_backend::repository::{InMemoryRecordRepository, RecordStore, StoreError, StoreResult};
use batimove_backend::service::notification_service::LogNotifier;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct BrokenStore;

#[async_trait]
impl RecordStore for BrokenStore {
    async fn insert(&self, _submission: Submission) -> StoreResult<StoredRecord> {
        Err(StoreError::database("write concern failed"))
    }

    async fn list_all(&self, _kind: SubmissionKind) -> StoreResult<Vec<StoredRecord>> {
        Ok(Vec::new())
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Durable
    }
}

fn dev_app() -> (Router, Arc<InMemoryRecordRepository>) {
    let store = Arc::new(InMemoryRecordRepository::default());
    let app = App::with_parts(AppConfig::from_test_env(), store.clone(), Arc::new(LogNotifier));
    (app.router(), store)
}

fn broken_app(debug: bool) -> Router {
    let config = AppConfig { debug, ..AppConfig::from_test_env() };
    App::with_parts(config, Arc::new(BrokenStore), Arc::new(LogNotifier)).router()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

fn scenario_quote() -> Value {
    json!({
        "serviceId": "priv",
        "date": "2026-02-15T10:00:00Z",
        "contact": { "name": "Jean Dupont", "email": "jean@example.ch", "phone": "+41 79 123 45 67" },
        "rooms": 3,
        "volume": 45
    })
}

#[tokio::test]
async fn test_create_quote_returns_201_with_uuid() {
    let (app, store) = dev_app();
    let (status, body) = call(&app, post_json("/api/quote", scenario_quote().to_string())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let quote_id = body["quoteId"].as_str().expect("quoteId");
    assert!(uuid::Uuid::parse_str(quote_id).is_ok());
    assert!(body["message"].as_str().unwrap().contains("devis"));

    let records = store.list_all(SubmissionKind::Quote).await.unwrap();
    assert_eq!(records[0].id.as_str(), quote_id);
    assert_eq!(serde_json::to_value(&records[0]).unwrap()["status"], "pending");
}

#[tokio::test]
async fn test_contact_and_business_id_keys() {
    let (app, _) = dev_app();
    let contact = json!({
        "name": "Marie",
        "email": "marie@example.fr",
        "subject": "Question",
        "message": "Avez-vous des cartons à vendre ?"
    });
    let (status, body) = call(&app, post_json("/api/contact", contact.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["messageId"].is_string());

    let lead = json!({
        "companyName": "Acme SA",
        "contactName": "Paul",
        "email": "paul@acme.ch",
        "phone": "022 123 45 67",
        "serviceNeeds": "Déménagement de bureaux."
    });
    let (status, body) = call(&app, post_json("/api/business", lead.to_string())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["leadId"].is_string());
}

#[tokio::test]
async fn test_validation_failure_is_422_and_nothing_stored() {
    let (app, store) = dev_app();
    let contact = json!({ "name": "Marie", "email": "marie@example.fr", "subject": "Hi", "message": "Salut" });
    let (status, body) = call(&app, post_json("/api/contact", contact.to_string())).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation failed");
    assert!(body["detail"].as_str().unwrap().starts_with("message:"));
    assert_eq!(body["errors"][0]["field"], "message");
    assert_eq!(body["errors"][0]["kind"], "invalid_length");
    assert_eq!(store.len(SubmissionKind::Contact).await, 0);
}

#[tokio::test]
async fn test_unparseable_body_is_400() {
    let (app, _) = dev_app();
    let (status, body) = call(&app, post_json("/api/quote", "{not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = call(&app, post_json("/api/quote", "[1, 2]".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_hides_detail_unless_debug() {
    let (status, body) = call(&broken_app(false), post_json("/api/quote", scenario_quote().to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create quote");
    assert!(body.get("detail").is_none());

    let (status, body) = call(&broken_app(true), post_json("/api/quote", scenario_quote().to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("write concern"));
}

#[tokio::test]
async fn test_root_api_and_health() {
    let (app, _) = dev_app();
    let (status, body) = call(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Batimove API is running");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mode"], "development");

    let (_, body) = call(&app, get("/api")).await;
    assert_eq!(body["endpoints"]["business"], "/api/business");

    let (status, body) = call(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));

    let (_, body) = call(&broken_app(false), get("/")).await;
    assert_eq!(body["mode"], "production");
}

#[tokio::test]
async fn test_dev_listing_only_on_ephemeral_backend() {
    let (app, _) = dev_app();
    call(&app, post_json("/api/quote", scenario_quote().to_string())).await;

    let (status, body) = call(&app, get("/api/dev/quotes")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["records"][0]["serviceId"], "priv");

    let (status, _) = call(&app, get("/api/dev/invoices")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&broken_app(false), get("/api/dev/quotes")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_404_json() {
    let (app, _) = dev_app();
    let (status, body) = call(&app, get("/api/nothing-here")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

async fn exploding_handler() -> &'static str {
    panic!("secret connection string mongodb://admin:hunter2@db")
}

#[tokio::test]
async fn test_panicking_handler_is_generic_500() {
    let app = Router::new()
        .route("/explode", axum::routing::get(exploding_handler))
        .layer(catch_panic_layer(false));
    let (status, body) = call(&app, get("/explode")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Internal server error");
    assert!(body.get("detail").is_none());

    let debug_app = Router::new()
        .route("/explode", axum::routing::get(exploding_handler))
        .layer(catch_panic_layer(true));
    let (_, body) = call(&debug_app, get("/explode")).await;
    assert!(body["detail"].as_str().unwrap().contains("secret connection string"));
}
