#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use skybook_api::auth::{AuthConfig, Role};
use skybook_api::{app, AppState};
use skybook_store::app_config::PaginationConfig;
use skybook_store::Repositories;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_ID: i64 = 1;
pub const USER_ID: i64 = 2;
pub const OTHER_USER_ID: i64 = 3;

pub struct TestApp {
    pub router: Router,
    pub admin: String,
    pub user: String,
    pub other: String,
    pub media: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let auth = AuthConfig::new("test-secret", 3600);
        let media = tempfile::tempdir().expect("create media dir");
        let state = AppState::new(
            Repositories::memory(),
            auth.clone(),
            media.path().to_path_buf(),
            PaginationConfig::default(),
        );
        Self {
            router: app(state),
            admin: auth.issue_token(ADMIN_ID, Role::Admin).expect("admin token"),
            user: auth.issue_token(USER_ID, Role::User).expect("user token"),
            other: auth.issue_token(OTHER_USER_ID, Role::User).expect("other token"),
            media,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("route request");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read response body");
        let parsed = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("parse response body")
        };
        (status, parsed)
    }

    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(format!("/api/airport{}", uri));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(payload) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&payload).expect("serialize body")))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Creates an airplane (10x10 unless told otherwise) flying a fresh
    /// route and one flight on it. Returns the flight id.
    pub async fn seed_flight(&self, airplane_name: &str) -> i64 {
        let (status, kind) = self.post("/airplane_types", &self.admin, json!({ "name": "Narrow-body" })).await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, src) = self
            .post("/airports", &self.admin, json!({ "name": "Boryspil", "closest_big_city": "Kyiv" }))
            .await;
        let (_, dst) = self
            .post("/airports", &self.admin, json!({ "name": "Chopin", "closest_big_city": "Warsaw" }))
            .await;
        let (status, route) = self
            .post(
                "/routes",
                &self.admin,
                json!({ "source": src["id"], "destination": dst["id"], "distance": 690 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, airplane) = self
            .post(
                "/airplanes",
                &self.admin,
                json!({ "name": airplane_name, "rows": 10, "seats_in_row": 10, "airplane_type": kind["id"] }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, flight) = self
            .post(
                "/flights",
                &self.admin,
                json!({
                    "route": route["id"],
                    "airplane": airplane["id"],
                    "departure_time": "2024-06-01T10:00:00Z",
                    "arrival_time": "2024-06-01T12:00:00Z",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", flight);
        flight["id"].as_i64().expect("flight id")
    }
}
