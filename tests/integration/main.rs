//! Integration tests against a real MongoDB server.
//!
//! These tests require a reachable MongoDB at MONGO_URI.
//! Run with: cargo test --test integration -- --ignored
//!
//! Each test uses its own collection and drops its documents when done.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_service::api::{create_router, AppState};
use todo_service::config::Config;
use todo_service::lifecycle;
use todo_service::metrics::{scrape_value, Metrics, METRIC_ACTIVE_TODOS, METRIC_TODOS_COMPLETED};
use todo_service::store::{MongoTodoStore, NewTodo, TodoId, TodoPatch, TodoStore};

/// Get a test config from environment.
fn test_config(collection: &str) -> Config {
    dotenvy::dotenv().ok();

    Config {
        mongo_uri: std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
        mongo_db: "todo-app-test".to_string(),
        mongo_collection: collection.to_string(),
        ..Config::default()
    }
}

async fn connect(collection: &str) -> Arc<MongoTodoStore> {
    let store = MongoTodoStore::connect(&test_config(collection))
        .await
        .expect("MongoDB client");
    store.ping().await.expect("MongoDB reachable");
    store.clear().await.expect("clean collection");
    Arc::new(store)
}

/// Test the store operations directly.
#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_store_round_trip() {
    let store = connect("store_round_trip").await;

    let created = store
        .insert(NewTodo {
            title: "Learn Rust".to_string(),
            description: Some("Read the book".to_string()),
        })
        .await
        .unwrap();
    assert!(!created.completed);

    let found = store.find_by_id(&created.id).await.unwrap();
    assert_eq!(found.as_ref(), Some(&created));

    let patch = TodoPatch {
        completed: Some(true),
        ..Default::default()
    };
    let updated = store.update_fields(&created.id, &patch).await.unwrap().unwrap();
    assert!(updated.completed);
    assert_eq!(updated.title, "Learn Rust");
    assert_eq!(store.count_active().await.unwrap(), 0);

    assert!(store.delete_by_id(&created.id).await.unwrap());
    assert!(!store.delete_by_id(&created.id).await.unwrap());

    let absent = TodoId::parse(&"0".repeat(24)).unwrap();
    assert_eq!(store.find_by_id(&absent).await.unwrap(), None);

    store.clear().await.unwrap();
}

/// Test the full HTTP flow against MongoDB.
#[tokio::test]
#[ignore = "requires MongoDB"]
async fn test_http_flow() {
    let store = connect("http_flow").await;
    let metrics = Arc::new(Metrics::new().unwrap());
    lifecycle::startup(store.as_ref(), &metrics).await.unwrap();

    let app = create_router(AppState::new(store.clone() as Arc<dyn TodoStore>, Arc::clone(&metrics)));

    let call = |method: &'static str, uri: String, body: Option<Value>| {
        let app = app.clone();
        async move {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let response = app.oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }
    };

    let (status, created) = call("POST", "/todos".to_string(), Some(json!({"title": "Todo 1"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/todos/{}", created["id"].as_str().unwrap());

    let (status, _) = call("PUT", uri.clone(), Some(json!({"completed": true}))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call("PUT", uri.clone(), Some(json!({"completed": true}))).await;
    assert_eq!(status, StatusCode::OK);

    let rendered = metrics.render();
    assert_eq!(scrape_value(&rendered, METRIC_TODOS_COMPLETED), Some(1.0));
    assert_eq!(scrape_value(&rendered, METRIC_ACTIVE_TODOS), Some(0.0));

    let (status, _) = call("GET", "/ready".to_string(), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call("DELETE", uri.clone(), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call("DELETE", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    store.clear().await.unwrap();
    lifecycle::shutdown(store.as_ref(), &metrics).await;
}
