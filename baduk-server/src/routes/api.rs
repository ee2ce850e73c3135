use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use baduk_engine::{Position, SearchOutcome, Turn};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiError, AppError};
use crate::registry::{GameId, GameRecord};
use crate::services::game_actions::{self, MoveOutcome};
use crate::services::state_serializer::{board_rows, color_name, parse_color};

// -- Response types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameResponse {
    game_id: GameId,
    size: u8,
    next_player: &'static str,
    move_number: u32,
    stage: String,
    is_finished: bool,
    winner: Option<&'static str>,
    black_captures: u32,
    white_captures: u32,
    board: Vec<String>,
    moves: Vec<TurnResponse>,
    created_at: DateTime<Utc>,
}

impl GameResponse {
    fn from_record(record: &GameRecord) -> Self {
        let game = &record.state;
        Self {
            game_id: record.id,
            size: game.size(),
            next_player: color_name(game.next_to_move()),
            move_number: game.move_number(),
            stage: game.stage().to_string(),
            is_finished: game.is_finished(),
            winner: game.winner().map(color_name),
            black_captures: game.captures().black,
            white_captures: game.captures().white,
            board: board_rows(game.board()),
            moves: game.moves().iter().map(TurnResponse::from_turn).collect(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct TurnResponse {
    kind: &'static str,
    color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pos: Option<Position>,
}

impl TurnResponse {
    fn from_turn(turn: &Turn) -> Self {
        Self {
            kind: turn.kind(),
            color: color_name(turn.stone()),
            pos: turn.position(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MoveResponse {
    #[serde(rename = "move")]
    played: Option<Position>,
    captured: Vec<Position>,
    state: GameResponse,
}

impl MoveResponse {
    fn from_outcome(outcome: &MoveOutcome) -> Self {
        Self {
            played: outcome.result.position,
            captured: outcome.result.captured.clone(),
            state: GameResponse::from_record(&outcome.record),
        }
    }
}

#[derive(Debug, Serialize)]
struct SuggestResponse {
    #[serde(rename = "move")]
    suggestion: Option<Position>,
    simulations: u32,
    failed: u32,
    cancelled: bool,
}

impl SuggestResponse {
    fn from_search(search: &SearchOutcome) -> Self {
        Self {
            suggestion: search.choice.position(),
            simulations: search.completed,
            failed: search.failed,
            cancelled: search.cancelled,
        }
    }
}

// -- Request types --

#[derive(Deserialize)]
struct CreateGameRequest {
    size: Option<i64>,
}

#[derive(Deserialize)]
struct PlayRequest {
    x: Option<i32>,
    y: Option<i32>,
    color: String,
    #[serde(default)]
    pass: bool,
}

#[derive(Deserialize)]
struct ColorRequest {
    color: String,
}

#[derive(Deserialize)]
struct SuggestRequest {
    color: String,
    simulations: Option<u32>,
}

#[derive(Deserialize)]
struct BotMoveRequest {
    color: Option<String>,
    simulations: Option<u32>,
}

// -- Router --

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/{id}", get(get_game).delete(delete_game))
        .route("/games/{id}/moves", post(play_move))
        .route("/games/{id}/pass", post(pass))
        .route("/games/{id}/resign", post(resign))
        .route("/games/{id}/suggest", post(suggest))
        .route("/games/{id}/bot-move", post(bot_move))
}

// -- Game handlers --

async fn create_game(
    State(state): State<AppState>,
    body: Option<Json<CreateGameRequest>>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let size = body.and_then(|Json(body)| body.size);
    let record = game_actions::create_game(&state, size).await?;
    Ok((StatusCode::CREATED, Json(GameResponse::from_record(&record))))
}

async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<GameResponse>, ApiError> {
    let record = game_actions::find_game(&state, id).await?;
    Ok(Json(GameResponse::from_record(&record)))
}

async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    game_actions::delete_game(&state, id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}

// -- Game action handlers --

async fn play_move(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(body): Json<PlayRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let stone = parse_color(&body.color)?;
    let outcome = if body.pass {
        game_actions::pass(&state, id, stone).await?
    } else {
        let (Some(x), Some(y)) = (body.x, body.y) else {
            return Err(AppError::BadRequest("Both x and y are required".to_string()).into());
        };
        game_actions::play_move(&state, id, stone, Position::new(x, y)).await?
    };
    Ok(Json(MoveResponse::from_outcome(&outcome)))
}

async fn pass(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(body): Json<ColorRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let stone = parse_color(&body.color)?;
    let outcome = game_actions::pass(&state, id, stone).await?;
    Ok(Json(MoveResponse::from_outcome(&outcome)))
}

async fn resign(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(body): Json<ColorRequest>,
) -> Result<Json<GameResponse>, ApiError> {
    let stone = parse_color(&body.color)?;
    let record = game_actions::resign(&state, id, stone).await?;
    Ok(Json(GameResponse::from_record(&record)))
}

// -- Search handlers --

async fn suggest(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(body): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let stone = parse_color(&body.color)?;
    let search = game_actions::suggest(&state, id, stone, body.simulations).await?;
    Ok(Json(SuggestResponse::from_search(&search)))
}

async fn bot_move(
    State(state): State<AppState>,
    Path(id): Path<GameId>,
    Json(body): Json<BotMoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let stone = body.color.as_deref().map(parse_color).transpose()?;
    let bot = game_actions::bot_move(&state, id, stone, body.simulations).await?;
    Ok(Json(MoveResponse::from_outcome(&bot.played)))
}
