use serde_json::{Value, json};

use crate::common::{TestServer, expect_error};

#[tokio::test]
async fn health_check() {
    let server = TestServer::start().await;
    let resp = server.get("/up").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn create_game_uses_configured_size() {
    let server = TestServer::start().await;
    let resp = server.post("/api/games", json!({})).await;
    assert_eq!(resp.status(), 201);

    let game: Value = resp.json().await.unwrap();
    assert!(game["gameId"].as_i64().is_some());
    assert_eq!(game["size"], 9);
    assert_eq!(game["nextPlayer"], "black");
    assert_eq!(game["moveNumber"], 0);
    assert_eq!(game["stage"], "in_progress");
    assert_eq!(game["isFinished"], false);
    assert!(game["winner"].is_null());
    assert_eq!(game["blackCaptures"], 0);
    assert_eq!(game["whiteCaptures"], 0);
    assert!(game["createdAt"].as_str().is_some());
    assert_eq!(game["moves"], json!([]));

    let board = game["board"].as_array().unwrap();
    assert_eq!(board.len(), 9);
    assert!(board.iter().all(|row| row == "........."));
}

#[tokio::test]
async fn create_game_without_a_body() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .post(server.url("/api/games"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let game: Value = resp.json().await.unwrap();
    assert_eq!(game["size"], 9);
    assert_eq!(game["moveNumber"], 0);
}

#[tokio::test]
async fn create_game_with_explicit_size() {
    let server = TestServer::start().await;
    let id = server.create_game(13).await;
    let game = server.game(id).await;
    assert_eq!(game["size"], 13);
    assert_eq!(game["board"].as_array().unwrap().len(), 13);
}

#[tokio::test]
async fn invalid_sizes_are_rejected() {
    let server = TestServer::start().await;
    for size in [0, 1, 26, 361] {
        let resp = server.post("/api/games", json!({ "size": size })).await;
        expect_error(resp, 400, "bad_request").await;
    }
}

#[tokio::test]
async fn game_lists_its_moves() {
    let server = TestServer::start().await;
    let id = server.create_game(9).await;
    server.play_ok(id, "black", 2, 3).await;
    server.pass(id, "white").await;
    server
        .post(&format!("/api/games/{id}/resign"), json!({ "color": "black" }))
        .await;

    let game = server.game(id).await;
    assert_eq!(game["stage"], "finished");
    assert_eq!(
        game["moves"],
        json!([
            { "kind": "play", "color": "black", "pos": { "x": 2, "y": 3 } },
            { "kind": "pass", "color": "white" },
            { "kind": "resign", "color": "black" },
        ])
    );
}

#[tokio::test]
async fn ids_are_distinct() {
    let server = TestServer::start().await;
    let a = server.create_game(9).await;
    let b = server.create_game(9).await;
    assert_ne!(a, b);
}

#[tokio::test]
async fn unknown_game_is_not_found() {
    let server = TestServer::start().await;
    expect_error(server.get("/api/games/9999").await, 404, "not_found").await;
    let resp = server.play(9999, "black", 0, 0).await;
    expect_error(resp, 404, "not_found").await;
}

#[tokio::test]
async fn delete_game() {
    let server = TestServer::start().await;
    let id = server.create_game(9).await;

    let resp = server
        .client
        .delete(server.url(&format!("/api/games/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["deleted"], true);

    expect_error(server.get(&format!("/api/games/{id}")).await, 404, "not_found").await;

    let again = server
        .client
        .delete(server.url(&format!("/api/games/{id}")))
        .send()
        .await
        .unwrap();
    expect_error(again, 404, "not_found").await;
}

#[tokio::test]
async fn trailing_slash_is_ignored() {
    let server = TestServer::start().await;
    let id = server.create_game(9).await;
    let resp = server.get(&format!("/api/games/{id}/")).await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .get(server.url("/up"))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
}
