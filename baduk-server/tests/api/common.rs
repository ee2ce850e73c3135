#![allow(dead_code)]

use baduk_server::AppState;
use baduk_server::config::Config;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// A running server on an ephemeral port plus a client pointed at it.
pub struct TestServer {
    pub base: String,
    pub client: reqwest::Client,
    pub state: AppState,
}

/// 9×9 boards and small budgets keep the suite fast.
pub fn test_config() -> Config {
    Config {
        board_size: 9,
        simulations: 40,
        ..Config::default()
    }
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_state(AppState::new(test_config())).await
    }

    pub async fn start_with_state(state: AppState) -> Self {
        let router = baduk_server::build_router_with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            use axum::extract::Request;
            use tower::Layer as _;
            use tower_http::normalize_path::NormalizePathLayer;

            let app = NormalizePathLayer::trim_trailing_slash().layer(router);
            axum::serve(
                listener,
                axum::ServiceExt::<Request>::into_make_service(app),
            )
            .await
            .unwrap();
        });

        TestServer {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            state,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// Create a game and return its id.
    pub async fn create_game(&self, size: u8) -> i64 {
        let resp = self.post("/api/games", json!({ "size": size })).await;
        assert_eq!(resp.status(), 201);
        let body: Value = resp.json().await.unwrap();
        body["gameId"].as_i64().unwrap()
    }

    pub async fn game(&self, id: i64) -> Value {
        let resp = self.get(&format!("/api/games/{id}")).await;
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    pub async fn play(&self, id: i64, color: &str, x: i32, y: i32) -> reqwest::Response {
        self.post(
            &format!("/api/games/{id}/moves"),
            json!({ "x": x, "y": y, "color": color }),
        )
        .await
    }

    /// Play a move that must be accepted; returns the MoveResponse.
    pub async fn play_ok(&self, id: i64, color: &str, x: i32, y: i32) -> Value {
        let resp = self.play(id, color, x, y).await;
        let status = resp.status();
        let body: Value = resp.json().await.unwrap();
        assert_eq!(status, 200, "{color} ({x},{y}) rejected: {body}");
        body
    }

    /// Play a sequence alternating from Black.
    pub async fn play_sequence(&self, id: i64, moves: &[(i32, i32)]) {
        for (i, &(x, y)) in moves.iter().enumerate() {
            let color = if i % 2 == 0 { "black" } else { "white" };
            self.play_ok(id, color, x, y).await;
        }
    }

    pub async fn pass(&self, id: i64, color: &str) -> reqwest::Response {
        self.post(&format!("/api/games/{id}/pass"), json!({ "color": color }))
            .await
    }
}

/// Assert an error response and return its body.
pub async fn expect_error(resp: reqwest::Response, status: u16, code: &str) -> Value {
    assert_eq!(resp.status(), status);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], code, "unexpected error body: {body}");
    assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    body
}
