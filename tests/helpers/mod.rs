//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tower::ServiceExt;

use files_api::{Backends, build_app, build_executor, build_state};
use files_core::config::AppConfig;
use files_worker::{JobOutcome, WorkerRunner};

/// Test application over in-memory backends and a temporary storage folder.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backends shared by the router and the worker
    pub backends: Backends,
    /// Application config
    pub config: AppConfig,
    _dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create storage folder");

        let mut config = AppConfig::default();
        config.storage.folder_path = dir.path().to_string_lossy().into_owned();
        config.auth.password_memory_kib = 1024;
        config.auth.password_iterations = 1;
        config.worker.enabled = false;

        let backends = Backends::connect(&config)
            .await
            .expect("Failed to connect backends");
        let state = build_state(config.clone(), &backends).expect("Failed to build state");

        Self {
            router: build_app(state),
            backends,
            config,
            _dir: dir,
        }
    }

    /// Process every queued job to completion on the current task.
    pub async fn run_jobs(&self) -> Vec<JobOutcome> {
        let executor = build_executor(&self.config, &self.backends).expect("Failed to build executor");
        WorkerRunner::new(
            Arc::clone(&self.backends.queue),
            Arc::new(executor),
            self.config.worker.clone(),
            "test-worker",
        )
        .drain()
        .await
        .expect("Failed to drain queues")
    }

    /// Send a request through the router.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if body.is_some() {
            req = req.header("Content-Type", "application/json");
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let body = body
            .map(|b| Body::from(serde_json::to_vec(&b).expect("Failed to serialize body")))
            .unwrap_or_else(Body::empty);
        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
            .await
            .expect("Failed to read body")
            .to_vec();
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }

    /// Register a user through the API and return its `{id, email}` body.
    pub async fn register(&self, email: &str, password: &str) -> Value {
        let response = self
            .request(
                "POST",
                "/users",
                Some(json!({ "email": email, "password": password })),
                &[],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }

    /// Log in through the API and return the session token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let header = basic_auth(email, password);
        let response = self
            .request("GET", "/connect", None, &[("Authorization", &header)])
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["token"]
            .as_str()
            .expect("token in body")
            .to_string()
    }

    /// Register and log in a fresh user; returns `(user id, token)`.
    pub async fn signed_in(&self, email: &str) -> (String, String) {
        let user = self.register(email, "toto1234!").await;
        let token = self.login(email, "toto1234!").await;
        (user["id"].as_str().expect("id").to_string(), token)
    }

    /// Upload through the API with the given session.
    pub async fn upload(&self, token: &str, body: Value) -> TestResponse {
        self.request("POST", "/files", Some(body), &[("X-Token", token)])
            .await
    }
}

/// `Basic base64(email:password)`.
pub fn basic_auth(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}

/// Base64 of `data`, as uploads expect.
pub fn b64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// A solid PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("Failed to encode PNG");
    out
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub bytes: Vec<u8>,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
}
