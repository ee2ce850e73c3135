use serde_json::{Value, json};

use crate::common::{TestServer, expect_error};

#[tokio::test]
async fn single_pass_hands_over_the_turn() {
    let server = TestServer::start().await;
    let id = server.create_game(9).await;

    let resp = server.pass(id, "black").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["move"].is_null());
    assert_eq!(body["captured"], json!([]));
    assert_eq!(body["state"]["nextPlayer"], "white");
    assert_eq!(body["state"]["moveNumber"], 1);
    assert_eq!(body["state"]["isFinished"], false);
}

#[tokio::test]
async fn two_passes_end_the_game() {
    let server = TestServer::start().await;
    let id = server.create_game(9).await;
    server.play_ok(id, "black", 4, 4).await;

    assert_eq!(server.pass(id, "white").await.status(), 200);
    let resp = server.pass(id, "black").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["state"]["isFinished"], true);
    assert!(body["state"]["winner"].is_null());
    assert_eq!(body["state"]["moveNumber"], 2);

    let resp = server.play(id, "black", 0, 0).await;
    expect_error(resp, 422, "game_finished").await;
    let resp = server.pass(id, "white").await;
    expect_error(resp, 422, "game_finished").await;
}

#[tokio::test]
async fn move_between_passes_resets_the_streak() {
    let server = TestServer::start().await;
    let id = server.create_game(9).await;

    server.pass(id, "black").await;
    server.play_ok(id, "white", 2, 2).await;
    let resp = server.pass(id, "black").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["state"]["isFinished"], false);
}

#[tokio::test]
async fn pass_out_of_turn() {
    let server = TestServer::start().await;
    let id = server.create_game(9).await;
    expect_error(server.pass(id, "white").await, 422, "wrong_turn").await;
}

#[tokio::test]
async fn resign_names_the_winner() {
    let server = TestServer::start().await;
    let id = server.create_game(9).await;
    server.play_ok(id, "black", 4, 4).await;

    // Resigning does not need the turn.
    let resp = server
        .post(&format!("/api/games/{id}/resign"), json!({ "color": "black" }))
        .await;
    assert_eq!(resp.status(), 200);
    let game: Value = resp.json().await.unwrap();
    assert_eq!(game["isFinished"], true);
    assert_eq!(game["winner"], "white");

    let again = server
        .post(&format!("/api/games/{id}/resign"), json!({ "color": "white" }))
        .await;
    expect_error(again, 422, "game_finished").await;
}
