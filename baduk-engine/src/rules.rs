//! Stateless move validation.
//!
//! A candidate move is applied to a copy of the board; the copy is only handed
//! back when every rule passes, so a rejected move never touches the caller's
//! board.

use std::collections::HashSet;

use crate::board::{Board, Position, Signature};
use crate::error::GoError;
use crate::stone::Stone;

/// Outcome of an accepted play or pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    pub stone: Stone,
    /// `None` for a pass.
    pub position: Option<Position>,
    pub captured: Vec<Position>,
    /// Board after the move.
    pub board: Board,
    /// Signature of `board` with the opponent to move.
    pub signature: Signature,
    pub pass: bool,
}

impl MoveResult {
    pub fn pass(stone: Stone, board: Board) -> Self {
        let signature = board.signature(stone.opp());
        MoveResult {
            stone,
            position: None,
            captured: Vec::new(),
            board,
            signature,
            pass: true,
        }
    }
}

/// Validate `stone` playing at `pos` against `board` and the superko `history`.
pub fn try_move(
    board: &Board,
    pos: Position,
    stone: Stone,
    history: &HashSet<Signature>,
) -> Result<MoveResult, GoError> {
    let mut next = board.clone();
    let captured = place_stone(&mut next, pos, stone)?;

    let signature = next.signature(stone.opp());
    if history.contains(&signature) {
        return Err(GoError::Ko);
    }

    Ok(MoveResult {
        stone,
        position: Some(pos),
        captured,
        board: next,
        signature,
        pass: false,
    })
}

/// Place a stone in place, remove every opponent group left without
/// liberties and reject suicide. Repetition is not checked.
///
/// On error `board` is left exactly as it was.
pub fn place_stone(
    board: &mut Board,
    pos: Position,
    stone: Stone,
) -> Result<Vec<Position>, GoError> {
    if !board.contains(pos) {
        return Err(GoError::OutOfBounds);
    }
    if board.get(pos).is_some() {
        return Err(GoError::Occupied);
    }

    board.place(pos, stone);

    let mut captured = Vec::new();
    for group in board.adjacent_groups(pos, stone.opp()) {
        if board.count_liberties(&group) == 0 {
            captured.extend(group);
        }
    }
    for &p in &captured {
        board.remove(p);
    }

    // Captures come first: a capturing move always has a liberty afterwards.
    if captured.is_empty() {
        let own = board.collect_group(pos);
        if board.count_liberties(&own) == 0 {
            board.remove(pos);
            return Err(GoError::Suicide);
        }
    }

    Ok(captured)
}
