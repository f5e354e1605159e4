use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use todod::api::{build_router, AppContext};
use todod::attachments::DiskSink;
use todod::identity::TokenTable;
use todod::store::Store;
use tower::ServiceExt;

pub const ALICE_TOKEN: &str = "tok-alice";
pub const BOB_TOKEN: &str = "tok-bob";

/// In-memory test instance of the service: a router wired to a store in a
/// temp directory, with two known owners registered.
pub struct TestApp {
    _dir: TempDir,
    router: Router,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::spawn_with_limit(10)
    }

    pub fn spawn_with_limit(default_limit: usize) -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let store = Store::open(dir.path().join("data")).expect("failed to open store");

        let mut tokens = TokenTable::default();
        tokens.insert(ALICE_TOKEN, "alice");
        tokens.insert(BOB_TOKEN, "bob");

        let ctx = Arc::new(AppContext {
            store: Arc::new(store),
            identity: Arc::new(tokens),
            attachments: Arc::new(DiskSink::new(dir.path().join("data").join("uploads"))),
            default_limit,
        });

        Self {
            _dir: dir,
            router: build_router(ctx),
        }
    }

    /// Send a request and decode the JSON response body. Pass `None` for
    /// token to exercise the unauthenticated path.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Create a todo for the given token and return its id.
    pub async fn create_todo(&self, token: &str, body: Value) -> String {
        let (status, json) = self.post("/api/todos", token, body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
        json["id"].as_str().expect("todo id").to_string()
    }
}
