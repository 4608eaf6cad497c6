#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use fanout_api::config::ServerConfig;
use fanout_api::router::build_app_router;
use fanout_api::state::AppState;
use fanout_dispatch::{Dispatcher, FileConfigProvider};
use fanout_storage::BundleStore;

/// Peer address used when a test does not care who submits.
pub const DEFAULT_PEER: &str = "10.0.0.5:54321";

/// A scratch directory holding `servers.json`, `sessions.json` and `saved/`.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Write the worker roster and credentials the app will read.
    pub fn new(workers: &[String], credentials: Value) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("servers.json"),
            serde_json::to_string(workers).unwrap(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("sessions.json"),
            serde_json::to_string(&credentials).unwrap(),
        )
        .unwrap();
        Self { dir }
    }

    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            servers_file: self.dir.path().join("servers.json"),
            sessions_file: self.dir.path().join("sessions.json"),
            saved_dir: self.saved_dir(),
        }
    }

    pub fn saved_dir(&self) -> PathBuf {
        self.dir.path().join("saved")
    }

    /// Build the full application router, as `main.rs` does.
    pub fn app(&self) -> Router {
        self.app_with_config(self.config())
    }

    pub fn app_with_config(&self, config: ServerConfig) -> Router {
        let provider = FileConfigProvider::new(&config.servers_file, &config.sessions_file);
        self.app_with(config, Dispatcher::new(Arc::new(provider)))
    }

    /// Build the router around a dispatcher with its own config provider.
    pub fn app_with_dispatcher(&self, dispatcher: Dispatcher) -> Router {
        self.app_with(self.config(), dispatcher)
    }

    fn app_with(&self, config: ServerConfig, dispatcher: Dispatcher) -> Router {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            store: BundleStore::new(&config.saved_dir),
        };
        build_app_router(state, &config)
    }
}

pub type Received = Arc<Mutex<Vec<Value>>>;

/// Start a mock worker on an ephemeral port that records every task body.
pub async fn spawn_worker(status: StatusCode) -> (String, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route(
            "/task",
            post(
                move |State(received): State<Received>, Json(body): Json<Value>| async move {
                    received.lock().unwrap().push(body);
                    (status, Json(serde_json::json!({"accepted": true})))
                },
            ),
        )
        .with_state(Arc::clone(&received));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, received)
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    post_json_from(app, uri, body, DEFAULT_PEER).await
}

/// POST a JSON body as if it arrived on a connection from `peer`.
pub async fn post_json_from(app: Router, uri: &str, body: Value, peer: &str) -> Response {
    let peer: SocketAddr = peer.parse().unwrap();
    let mut request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    request.extensions_mut().insert(ConnectInfo(peer));
    app.oneshot(request).await.unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(DEFAULT_PEER.parse::<SocketAddr>().unwrap()));
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
