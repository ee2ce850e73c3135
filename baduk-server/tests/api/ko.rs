use std::sync::Arc;

use baduk_engine::{Board, Evaluation, Evaluator, EvaluatorError, Position, Stone};
use baduk_server::AppState;
use serde_json::{Value, json};

use crate::common::{TestServer, expect_error, test_config};

/// Puts almost all prior mass on the ko point and none on passing.
struct KoFixated;

impl Evaluator for KoFixated {
    fn evaluate(&self, board: &Board, _: Stone) -> Result<Evaluation, EvaluatorError> {
        let ko = board.index(Position::new(1, 1));
        let empties = board.empty_points().count().max(1) as f32;
        let mut priors = vec![0.0; board.len() + 1];
        for pos in board.empty_points() {
            if let Some(i) = board.index(pos) {
                priors[i] = if Some(i) == ko { 0.9 } else { 0.1 / empties };
            }
        }
        Ok(Evaluation { priors, value: 0.0 })
    }
}

/// Build the ko shape on a 9×9 board and let Black take.
///
/// ```text
///      x0  x1  x2  x3
/// y0:   .   B   W   .
/// y1:   B   W   .   W
/// y2:   .   B   W   .
/// ```
///
/// Black then captures at (2,1), leaving a ko at (1,1).
async fn setup_ko(server: &TestServer) -> i64 {
    let id = server.create_game(9).await;
    server
        .play_sequence(
            id,
            &[
                (1, 0),
                (2, 0),
                (0, 1),
                (1, 1),
                (1, 2),
                (3, 1),
                (8, 8),
                (2, 2),
            ],
        )
        .await;

    let body = server.play_ok(id, "black", 2, 1).await;
    assert_eq!(body["captured"], json!([{ "x": 1, "y": 1 }]));
    id
}

#[tokio::test]
async fn ko_immediate_recapture_blocked() {
    let server = TestServer::start().await;
    let id = setup_ko(&server).await;

    let before = server.game(id).await;
    let resp = server.play(id, "white", 1, 1).await;
    expect_error(resp, 422, "ko").await;

    // The rejected retake changes nothing.
    assert_eq!(server.game(id).await, before);
}

#[tokio::test]
async fn ko_recapture_after_exchange() {
    let server = TestServer::start().await;
    let id = setup_ko(&server).await;

    // Ko threat and answer elsewhere.
    server.play_ok(id, "white", 7, 7).await;
    server.play_ok(id, "black", 6, 6).await;

    let body = server.play_ok(id, "white", 1, 1).await;
    assert_eq!(body["captured"], json!([{ "x": 2, "y": 1 }]));
    assert_eq!(body["state"]["whiteCaptures"], 1);
    assert_eq!(body["state"]["blackCaptures"], 1);
}

#[tokio::test]
async fn ko_point_open_to_the_capturing_side() {
    let server = TestServer::start().await;
    let id = setup_ko(&server).await;

    // White plays elsewhere; Black may fill the ko.
    server.play_ok(id, "white", 7, 7).await;
    let body = server.play_ok(id, "black", 1, 1).await;
    assert_eq!(body["captured"], json!([]));
}

#[tokio::test]
async fn bot_move_skips_the_ko_retake() {
    let state = AppState::with_evaluator(test_config(), Arc::new(KoFixated));
    let server = TestServer::start_with_state(state).await;
    let id = setup_ko(&server).await;

    let resp = server
        .post(&format!("/api/games/{id}/bot-move"), json!({ "color": "white" }))
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    assert!(body["move"].is_object(), "bot passed: {body}");
    assert_ne!(body["move"], json!({ "x": 1, "y": 1 }));
    assert_eq!(body["state"]["moveNumber"], 10);
    assert_eq!(body["state"]["nextPlayer"], "black");
    assert_eq!(body["state"]["blackCaptures"], 1);
}

#[tokio::test]
async fn suggest_skips_the_ko_retake() {
    let state = AppState::with_evaluator(test_config(), Arc::new(KoFixated));
    let server = TestServer::start_with_state(state).await;
    let id = setup_ko(&server).await;

    let resp = server
        .post(&format!("/api/games/{id}/suggest"), json!({ "color": "white" }))
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["move"].is_object(), "suggested a pass: {body}");
    assert_ne!(body["move"], json!({ "x": 1, "y": 1 }));

    // Black may fill the ko, so the same point is fine for them.
    let resp = server
        .post(&format!("/api/games/{id}/suggest"), json!({ "color": "black" }))
        .await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["move"], json!({ "x": 1, "y": 1 }));
}
