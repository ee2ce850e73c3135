use baduk_engine::{
    Board, CancelToken, Choice, GameState, GoError, MAX_SIZE, MoveResult, Position,
    SearchConfig, SearchController, SearchOutcome, Stone,
};

use crate::AppState;
use crate::error::AppError;
use crate::registry::{GameId, GameRecord};
use crate::services::state_serializer::color_name;

/// Upper bound on a per-request simulation budget.
pub const MAX_SIMULATIONS: u32 = 20_000;

// -- Return types --

pub struct MoveOutcome {
    pub result: MoveResult,
    pub record: GameRecord,
}

pub struct BotMove {
    pub search: SearchOutcome,
    pub played: MoveOutcome,
}

// -- Lifecycle --

pub async fn create_game(state: &AppState, size: Option<i64>) -> Result<GameRecord, AppError> {
    let size = match size {
        None => state.config.board_size,
        Some(s) if (2..=MAX_SIZE as i64).contains(&s) => s as u8,
        Some(s) => {
            return Err(AppError::BadRequest(format!(
                "Board size must be between 2 and {MAX_SIZE}, got {s}"
            )));
        }
    };

    let record = state.registry.create(size).await;
    tracing::info!(game_id = record.id, size, "Game created");
    Ok(record)
}

pub async fn find_game(state: &AppState, game_id: GameId) -> Result<GameRecord, AppError> {
    state
        .registry
        .get(game_id)
        .await
        .ok_or_else(|| not_found(game_id))
}

pub async fn delete_game(state: &AppState, game_id: GameId) -> Result<(), AppError> {
    if !state.registry.remove(game_id).await {
        return Err(not_found(game_id));
    }
    tracing::info!(game_id, "Game deleted");
    Ok(())
}

// -- Core game actions --
// Each action runs under the game's write lock and returns the committed
// state; a rejected move leaves the game untouched.

pub async fn play_move(
    state: &AppState,
    game_id: GameId,
    stone: Stone,
    pos: Position,
) -> Result<MoveOutcome, AppError> {
    apply_mutation(state, game_id, |game| game.play_move(pos, stone)).await
}

pub async fn pass(state: &AppState, game_id: GameId, stone: Stone) -> Result<MoveOutcome, AppError> {
    apply_mutation(state, game_id, |game| game.pass(stone)).await
}

pub async fn resign(state: &AppState, game_id: GameId, stone: Stone) -> Result<GameRecord, AppError> {
    let outcome = state
        .registry
        .with_game_mut(game_id, |record| {
            record.state.resign(stone).map(|()| record.clone())
        })
        .await
        .ok_or_else(|| not_found(game_id))?;

    match outcome {
        Ok(record) => {
            tracing::info!(game_id, color = color_name(stone), "Player resigned");
            Ok(record)
        }
        Err(e) => {
            tracing::warn!(game_id, "Resignation rejected: {e}");
            Err(AppError::Rule(e))
        }
    }
}

// -- Search --

/// Search the current position for `stone` without touching the game. The
/// reported choice is the best ranked candidate the position's history
/// allows, whoever's turn it is.
pub async fn suggest(
    state: &AppState,
    game_id: GameId,
    stone: Stone,
    simulations: Option<u32>,
) -> Result<SearchOutcome, AppError> {
    let budget = simulation_budget(state, simulations)?;
    let record = find_game(state, game_id).await?;
    let mut search = run_search(state, record.state.board().clone(), stone, budget).await?;
    search.choice = search.first_legal(|pos| record.state.is_playable(pos, stone));
    Ok(search)
}

/// Search for `stone` (default: the side to move) and play the result.
///
/// The search runs on a snapshot and does not know the game's position
/// history, so candidates are re-checked against the live game in ranked
/// order. The bot passes when none of them is legal.
pub async fn bot_move(
    state: &AppState,
    game_id: GameId,
    stone: Option<Stone>,
    simulations: Option<u32>,
) -> Result<BotMove, AppError> {
    let budget = simulation_budget(state, simulations)?;
    let record = find_game(state, game_id).await?;
    let stone = stone.unwrap_or(record.state.next_to_move());
    if record.state.is_finished() {
        return Err(AppError::Rule(GoError::GameFinished));
    }
    if stone != record.state.next_to_move() {
        return Err(AppError::Rule(GoError::WrongTurn));
    }

    let search = run_search(state, record.state.board().clone(), stone, budget).await?;

    let played = apply_mutation(state, game_id, |game| {
        let choice = search.first_legal(|pos| game.is_legal(pos, stone));
        if choice != search.choice {
            tracing::debug!(
                game_id,
                searched = ?search.choice,
                played = ?choice,
                "Top choice is illegal here"
            );
        }
        match choice {
            Choice::Play(pos) => game.play_move(pos, stone),
            Choice::Pass => game.pass(stone),
        }
    })
    .await?;

    Ok(BotMove { search, played })
}

async fn run_search(
    state: &AppState,
    board: Board,
    stone: Stone,
    budget: u32,
) -> Result<SearchOutcome, AppError> {
    let cancel = CancelToken::new();
    let timer = {
        let cancel = cancel.clone();
        let timeout = state.config.search_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        })
    };

    let controller = SearchController::new(SearchConfig {
        exploration: state.config.exploration,
        ..SearchConfig::default()
    });
    let evaluator = state.evaluator.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        controller.search(&board, stone, budget, evaluator.as_ref(), &cancel)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Search task failed: {e}")));
    timer.abort();

    let outcome = outcome?;
    if outcome.cancelled {
        tracing::warn!(
            completed = outcome.completed,
            budget,
            "Search hit the time limit"
        );
    }
    Ok(outcome)
}

fn simulation_budget(state: &AppState, requested: Option<u32>) -> Result<u32, AppError> {
    match requested {
        None => Ok(state.config.simulations),
        Some(n) if n <= MAX_SIMULATIONS => Ok(n),
        Some(n) => Err(AppError::BadRequest(format!(
            "At most {MAX_SIMULATIONS} simulations per request, got {n}"
        ))),
    }
}

// -- Helpers --

async fn apply_mutation<F>(
    state: &AppState,
    game_id: GameId,
    f: F,
) -> Result<MoveOutcome, AppError>
where
    F: FnOnce(&mut GameState) -> Result<MoveResult, GoError>,
{
    let outcome = state
        .registry
        .with_game_mut(game_id, |record| {
            f(&mut record.state).map(|result| MoveOutcome {
                result,
                record: record.clone(),
            })
        })
        .await
        .ok_or_else(|| not_found(game_id))?;

    match outcome {
        Ok(outcome) => {
            let game = &outcome.record.state;
            tracing::debug!(
                game_id,
                color = color_name(outcome.result.stone),
                pass = outcome.result.pass,
                captured = outcome.result.captured.len(),
                move_number = game.move_number(),
                "Move accepted"
            );
            if game.is_finished() {
                tracing::info!(game_id, "Game finished after consecutive passes");
            }
            Ok(outcome)
        }
        Err(e) => {
            tracing::warn!(game_id, code = e.code(), "Move rejected: {e}");
            Err(AppError::Rule(e))
        }
    }
}

fn not_found(game_id: GameId) -> AppError {
    AppError::NotFound(format!("Game {game_id} not found"))
}
