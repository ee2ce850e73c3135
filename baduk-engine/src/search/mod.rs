//! Monte Carlo tree search guided by an [`Evaluator`].
//!
//! Each simulation walks the tree by PUCT score on a private scratch copy of
//! the root board, asks the evaluator about the leaf, expands it and backs the
//! value up with alternating sign. The tree lives only for one call.

pub mod evaluator;
pub mod tree;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::board::{Board, Position};
use crate::rules;
use crate::stone::Stone;

pub use evaluator::{Evaluation, Evaluator, EvaluatorError, HeuristicEvaluator, UniformEvaluator};
pub use tree::{Action, NodeId, ROOT, SearchNode, SearchTree};

pub const DEFAULT_EXPLORATION: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// PUCT exploration constant.
    pub exploration: f32,
    /// Failed evaluator calls tolerated before giving up. `None` means as
    /// many as the simulation budget.
    pub max_failures: Option<u32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            exploration: DEFAULT_EXPLORATION,
            max_failures: None,
        }
    }
}

/// Shared stop flag. Cloning hands out another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Play(Position),
    Pass,
}

impl Choice {
    pub fn position(self) -> Option<Position> {
        match self {
            Choice::Play(pos) => Some(pos),
            Choice::Pass => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub choice: Choice,
    /// Simulations that reached backpropagation.
    pub completed: u32,
    /// Evaluator calls that failed and were discarded.
    pub failed: u32,
    pub cancelled: bool,
    pub root_visits: u32,
    /// Every root candidate, most visited first. `choice` is the head of
    /// this list, or a pass when it is empty.
    pub ranked: Vec<Choice>,
}

impl SearchOutcome {
    /// Walk the ranking and return the first candidate `legal` accepts. A pass
    /// ranked above every acceptable play wins, and so does running out.
    pub fn first_legal(&self, mut legal: impl FnMut(Position) -> bool) -> Choice {
        self.ranked
            .iter()
            .copied()
            .find(|choice| match choice {
                Choice::Play(pos) => legal(*pos),
                Choice::Pass => true,
            })
            .unwrap_or(Choice::Pass)
    }
}

pub struct SearchController {
    config: SearchConfig,
}

impl SearchController {
    pub fn new(config: SearchConfig) -> Self {
        SearchController { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Pick a move for `to_move` on `board` after `budget` completed
    /// simulations, or fewer when cancelled or when the evaluator keeps
    /// failing. Never fails: without statistics the answer is a pass.
    pub fn search<E: Evaluator + ?Sized>(
        &self,
        board: &Board,
        to_move: Stone,
        budget: u32,
        evaluator: &E,
        cancel: &CancelToken,
    ) -> SearchOutcome {
        let (tree, mut outcome) = self.build_tree(board, to_move, budget, evaluator, cancel);

        outcome.ranked = tree
            .ranked_children(ROOT)
            .into_iter()
            .map(|id| match tree.node(id).action {
                Some(Action::Play(index)) => Choice::Play(board.position_of(index)),
                _ => Choice::Pass,
            })
            .collect();
        outcome.choice = outcome.ranked.first().copied().unwrap_or(Choice::Pass);

        tracing::debug!(
            completed = outcome.completed,
            failed = outcome.failed,
            cancelled = outcome.cancelled,
            nodes = tree.len(),
            choice = ?outcome.choice,
            "search finished"
        );
        outcome
    }

    /// Run the simulation loop and hand back the tree itself. The returned
    /// outcome always carries `Choice::Pass` and an empty ranking;
    /// [`search`](Self::search) fills both in.
    pub fn build_tree<E: Evaluator + ?Sized>(
        &self,
        board: &Board,
        to_move: Stone,
        budget: u32,
        evaluator: &E,
        cancel: &CancelToken,
    ) -> (SearchTree, SearchOutcome) {
        let max_failures = self.config.max_failures.unwrap_or(budget);
        let mut tree = SearchTree::new();
        let mut completed = 0;
        let mut failed = 0;
        let mut cancelled = false;

        while completed < budget {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            match self.simulate(&mut tree, board, to_move, evaluator) {
                Ok(()) => completed += 1,
                Err(err) => {
                    failed += 1;
                    tracing::warn!(failed, "evaluator failed, simulation discarded: {err}");
                    if failed >= max_failures {
                        break;
                    }
                }
            }
        }

        let outcome = SearchOutcome {
            choice: Choice::Pass,
            completed,
            failed,
            cancelled,
            root_visits: tree.root().visits,
            ranked: Vec::new(),
        };
        (tree, outcome)
    }

    /// One select/evaluate/expand/backpropagate pass. On error the tree is
    /// left as it was.
    fn simulate<E: Evaluator + ?Sized>(
        &self,
        tree: &mut SearchTree,
        root_board: &Board,
        root_color: Stone,
        evaluator: &E,
    ) -> Result<(), EvaluatorError> {
        let mut scratch = root_board.clone();
        let mut color = root_color;
        let mut leaf = ROOT;

        while let Some(child) = tree.select_child(leaf, self.config.exploration) {
            if let Some(Action::Play(index)) = tree.node(child).action {
                let pos = scratch.position_of(index);
                // An illegal candidate leaves the scratch board unchanged.
                let _ = rules::place_stone(&mut scratch, pos, color);
            }
            color = color.opp();
            leaf = child;
        }

        let evaluation = checked_evaluation(evaluator, &scratch, color)?;

        for (index, &cell) in scratch.cells().iter().enumerate() {
            if cell == 0 {
                tree.add_child(leaf, Action::Play(index), evaluation.priors[index]);
            }
        }
        tree.add_child(leaf, Action::Pass, evaluation.priors[scratch.len()]);

        // The evaluator scores the leaf for `color`; the leaf's own move was
        // made by the other side.
        tree.backpropagate(leaf, -evaluation.value);
        Ok(())
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

fn checked_evaluation<E: Evaluator + ?Sized>(
    evaluator: &E,
    board: &Board,
    to_move: Stone,
) -> Result<Evaluation, EvaluatorError> {
    let mut evaluation = evaluator.evaluate(board, to_move)?;

    let expected = board.len() + 1;
    if evaluation.priors.len() != expected {
        return Err(EvaluatorError::MalformedPriors {
            expected,
            actual: evaluation.priors.len(),
        });
    }
    if !evaluation.value.is_finite() {
        return Err(EvaluatorError::NonFiniteValue);
    }

    evaluation.value = evaluation.value.clamp(-1.0, 1.0);
    for prior in &mut evaluation.priors {
        if !prior.is_finite() || *prior < 0.0 {
            *prior = 0.0;
        }
    }
    Ok(evaluation)
}
