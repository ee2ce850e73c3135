use std::sync::Arc;

use baduk_engine::{
    Board, Evaluation, Evaluator, EvaluatorError, HeuristicEvaluator, Stone, UniformEvaluator,
};
use rand::RngExt;

use crate::config::EvaluatorKind;

pub type SharedEvaluator = Arc<dyn Evaluator + Send + Sync>;

pub fn build_evaluator(kind: EvaluatorKind) -> SharedEvaluator {
    match kind {
        EvaluatorKind::Heuristic => Arc::new(HeuristicEvaluator),
        EvaluatorKind::Uniform => Arc::new(UniformEvaluator),
        EvaluatorKind::Random => Arc::new(RandomEvaluator),
    }
}

/// Random priors over empty cells and a random value. Useful as a weak
/// sparring partner and for exercising the search without a real model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEvaluator;

impl Evaluator for RandomEvaluator {
    fn evaluate(&self, board: &Board, _to_move: Stone) -> Result<Evaluation, EvaluatorError> {
        let mut rng = rand::rng();
        let mut priors: Vec<f32> = board
            .cells()
            .iter()
            .map(|&cell| {
                if cell == 0 {
                    rng.random_range(0.0f32..1.0)
                } else {
                    0.0
                }
            })
            .collect();
        priors.push(rng.random_range(0.01f32..0.1));

        let total: f32 = priors.iter().sum();
        for p in &mut priors {
            *p /= total;
        }

        Ok(Evaluation {
            priors,
            value: rng.random_range(-1.0f32..=1.0),
        })
    }
}
