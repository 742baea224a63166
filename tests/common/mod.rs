#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::Client;
use serde_json::{json, Value};

use leadform::config::Config;
use leadform::site::SiteId;
use leadform::transport::ResponseMode;

/// How the fake webhook receiver answers.
#[derive(Debug, Clone, Copy)]
pub enum ReceiverMode {
    Accept,
    Reject(u16),
    Delay(Duration),
}

/// An in-process webhook receiver that records every JSON body posted to it.
pub struct Receiver {
    pub addr: SocketAddr,
    pub bodies: Arc<Mutex<Vec<Value>>>,
}

impl Receiver {
    pub fn url(&self) -> String {
        format!("http://{}/hook", self.addr)
    }

    pub fn received(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct ReceiverState {
    mode: ReceiverMode,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn record(State(state): State<ReceiverState>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.bodies.lock().unwrap().push(body);
    match state.mode {
        ReceiverMode::Accept => (StatusCode::OK, "ok".to_string()),
        ReceiverMode::Reject(code) => (
            StatusCode::from_u16(code).unwrap(),
            "rejected by receiver".to_string(),
        ),
        ReceiverMode::Delay(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, "late".to_string())
        }
    }
}

pub async fn spawn_receiver(mode: ReceiverMode) -> Receiver {
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/hook", post(record))
        .with_state(ReceiverState {
            mode,
            bodies: bodies.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind receiver");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Receiver failed");
    });

    Receiver { addr, bodies }
}

/// A URL on a port nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/hook")
}

pub fn test_config(webhook: Option<String>) -> Config {
    let mut webhooks = HashMap::new();
    if let Some(url) = webhook {
        webhooks.insert(SiteId::Portfolio, url.clone());
        webhooks.insert(SiteId::ClientSite, url);
    }

    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        webhooks,
        webhook_timeout: Duration::from_secs(5),
        response_mode: ResponseMode::Opaque,
        static_dir: PathBuf::from("static"),
        max_body_size: 65_536,
        cors_origins: vec![],
        log_level: "warn".to_string(),
    }
}

/// A running relay instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit JSON fields to a site, return (body, status).
    pub async fn submit_json(&self, site: &str, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/v1/sites/{site}/submissions")))
            .header("user-agent", "leadform-tests/1.0")
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit form-urlencoded fields to a site, return (body, status).
    pub async fn submit_form(&self, site: &str, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/v1/sites/{site}/submissions")))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Forward a widget message to a site, return (body, status).
    pub async fn send_message(&self, site: &str, message: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/v1/sites/{site}/messages")))
            .json(message)
            .send()
            .await
            .expect("send message failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Report a call-to-action click, return (body, status).
    pub async fn send_event(&self, site: &str, click: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(&format!("/v1/sites/{site}/events")))
            .json(click)
            .send()
            .await
            .expect("send event failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// CORS preflight from `origin`.
    pub async fn preflight(&self, path: &str, origin: &str) -> reqwest::Response {
        self.client
            .request(reqwest::Method::OPTIONS, self.url(path))
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .send()
            .await
            .expect("preflight failed")
    }
}

pub async fn spawn_app(config: Config) -> TestApp {
    let app = leadform::build_app(config).expect("Failed to build app");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}

pub fn portfolio_lead() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "projectType": "web-app",
        "budget": "10k-25k",
        "message": "I need a landing page for a new product.",
    })
}

pub fn client_lead() -> Value {
    json!({
        "fullName": "Grace Hopper",
        "email": "grace@navy.example",
        "company": "Compiler Co",
        "industry": "manufacturing",
        "companySize": "51-200",
        "challenge": "We want to automate our quoting process with AI.",
    })
}
