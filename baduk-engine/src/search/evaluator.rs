use std::fmt;

use crate::board::{Board, Position};
use crate::stone::Stone;

/// Evaluator output for one position.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// One probability per cell in row-major order, followed by the pass slot.
    pub priors: Vec<f32>,
    /// Expected outcome in [-1, 1] for the color to move.
    pub value: f32,
}

impl Evaluation {
    pub fn uniform(board: &Board) -> Self {
        let slots = board.len() + 1;
        Evaluation {
            priors: vec![1.0 / slots as f32; slots],
            value: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluatorError {
    Failed(String),
    MalformedPriors { expected: usize, actual: usize },
    NonFiniteValue,
}

impl fmt::Display for EvaluatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluatorError::Failed(msg) => write!(f, "evaluation failed: {msg}"),
            EvaluatorError::MalformedPriors { expected, actual } => {
                write!(f, "expected {expected} priors, got {actual}")
            }
            EvaluatorError::NonFiniteValue => write!(f, "value is not a finite number"),
        }
    }
}

impl std::error::Error for EvaluatorError {}

/// Position evaluator consulted at every search leaf.
pub trait Evaluator {
    fn evaluate(&self, board: &Board, to_move: Stone) -> Result<Evaluation, EvaluatorError>;
}

/// Flat priors and a neutral value.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, board: &Board, _to_move: Stone) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation::uniform(board))
    }
}

const CAPTURE_BONUS: f32 = 4.0;
const OWN_EYE_PENALTY: f32 = 0.1;
/// Raw pass weight, a small fraction of a single cell's.
const PASS_WEIGHT: f32 = 0.05;
const VALUE_SCALE: f32 = 10.0;

/// Cheap hand-written evaluator: favours the centre and capturing moves,
/// discourages filling single-point own eyes, and scores positions by
/// material balance.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    fn weight(board: &Board, pos: Position, to_move: Stone) -> f32 {
        let center = (board.size() as f32 - 1.0) / 2.0;
        let reach = (center * 2.0).max(1.0);
        let dist = (pos.x as f32 - center).abs() + (pos.y as f32 - center).abs();
        let mut weight = 1.0 + (reach - dist) / reach;

        let neighbors = board.neighbors(pos);
        let captures = board
            .adjacent_groups(pos, to_move.opp())
            .iter()
            .any(|g| board.count_liberties(g) == 1);
        if captures {
            weight *= CAPTURE_BONUS;
        } else if neighbors.iter().all(|&n| board.get(n) == Some(to_move)) {
            weight *= OWN_EYE_PENALTY;
        }
        weight
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, board: &Board, to_move: Stone) -> Result<Evaluation, EvaluatorError> {
        let mut priors = vec![0.0; board.len() + 1];
        for pos in board.empty_points() {
            if let Some(i) = board.index(pos) {
                priors[i] = Self::weight(board, pos, to_move);
            }
        }

        let any_move = priors.iter().any(|&p| p > 0.0);
        priors[board.len()] = if any_move { PASS_WEIGHT } else { 1.0 };

        let total: f32 = priors.iter().sum();
        for p in &mut priors {
            *p /= total;
        }

        let balance =
            board.stone_count(to_move) as f32 - board.stone_count(to_move.opp()) as f32;
        Ok(Evaluation {
            priors,
            value: (balance / VALUE_SCALE).tanh(),
        })
    }
}
