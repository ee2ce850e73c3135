pub mod board;
pub mod error;
pub mod game;
pub mod rules;
pub mod search;
pub mod stone;
pub mod turn;

pub use board::{Board, DEFAULT_SIZE, MAX_SIZE, Position, Signature};
pub use error::{ErrorCategory, GoError};
pub use game::{Captures, GameState, Stage};
pub use rules::MoveResult;
pub use search::{
    CancelToken, Choice, Evaluation, Evaluator, EvaluatorError, HeuristicEvaluator,
    SearchConfig, SearchController, SearchOutcome, UniformEvaluator,
};
pub use stone::Stone;
pub use turn::Turn;
