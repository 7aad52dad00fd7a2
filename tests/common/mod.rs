use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::{delete, get, post},
};
use catalog_backend::{AppState, handlers, store::MemoryStore};
use serde_json::Value;
use tower::ServiceExt;

/// Build the full application router over a fresh in-memory store, so every
/// test runs isolated and without a database.
pub fn build_test_router() -> Router {
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
    };

    Router::new()
        .route("/imports", post(handlers::imports::import_units))
        .route("/delete/{id}", delete(handlers::delete::delete_unit))
        .route("/nodes/{id}", get(handlers::nodes::get_node))
        .route("/sales", get(handlers::sales::get_sales))
        .route(
            "/node/{id}/statistic",
            get(handlers::statistic::get_statistic),
        )
        .with_state(state)
}

/// Fire one request at the router and decode the response body as JSON
/// (`Null` for empty bodies).
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
