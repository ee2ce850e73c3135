use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, Signature};
use crate::error::GoError;
use crate::rules::{self, MoveResult};
use crate::stone::Stone;
use crate::turn::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    InProgress,
    Finished,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::InProgress => write!(f, "in_progress"),
            Stage::Finished => write!(f, "finished"),
        }
    }
}

/// Stones captured, indexed by the capturing color.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub fn get(&self, stone: Stone) -> u32 {
        match stone {
            Stone::Black => self.black,
            Stone::White => self.white,
        }
    }

    fn add(&mut self, stone: Stone, count: u32) {
        match stone {
            Stone::Black => self.black += count,
            Stone::White => self.white += count,
        }
    }
}

/// A game in progress: the board plus everything needed to judge the next move.
///
/// Mutated only through [`GameState::play_move`], [`GameState::pass`],
/// [`GameState::resign`] and [`GameState::finish`]; a rejected move leaves
/// every field untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    next: Stone,
    move_number: u32,
    captures: Captures,
    finished: bool,
    winner: Option<Stone>,
    last_was_pass: bool,
    history: HashSet<Signature>,
    moves: Vec<Turn>,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new(crate::board::DEFAULT_SIZE)
    }
}

impl GameState {
    pub fn new(size: u8) -> Self {
        Self::from_board(Board::new(size), Stone::Black)
    }

    /// Start a game from an arbitrary position with `next` to move.
    pub fn from_board(board: Board, next: Stone) -> Self {
        let mut history = HashSet::new();
        history.insert(board.signature(next));
        GameState {
            board,
            next,
            move_number: 0,
            captures: Captures::default(),
            finished: false,
            winner: None,
            last_was_pass: false,
            history,
            moves: Vec::new(),
        }
    }

    // -- Accessors --

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> u8 {
        self.board.size()
    }

    pub fn next_to_move(&self) -> Stone {
        self.next
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    /// Whether the most recent action was a pass.
    pub fn last_was_pass(&self) -> bool {
        self.last_was_pass
    }

    pub fn moves(&self) -> &[Turn] {
        &self.moves
    }

    pub fn has_seen(&self, signature: &Signature) -> bool {
        self.history.contains(signature)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn stone_at(&self, pos: Position) -> Option<Stone> {
        self.board.get(pos)
    }

    pub fn stage(&self) -> Stage {
        if self.finished {
            Stage::Finished
        } else {
            Stage::InProgress
        }
    }

    // -- Game actions --

    pub fn play_move(&mut self, pos: Position, stone: Stone) -> Result<MoveResult, GoError> {
        self.check_turn(stone)?;

        let result = rules::try_move(&self.board, pos, stone, &self.history)?;

        self.board = result.board.clone();
        self.history.insert(result.signature.clone());
        self.move_number += 1;
        self.captures.add(stone, result.captured.len() as u32);
        self.last_was_pass = false;
        self.next = stone.opp();
        self.moves.push(Turn::Play { stone, pos });

        Ok(result)
    }

    /// Pass the turn. A second consecutive pass ends the game without a
    /// winner; scoring is left to the caller, who may then call [`finish`].
    ///
    /// [`finish`]: GameState::finish
    pub fn pass(&mut self, stone: Stone) -> Result<MoveResult, GoError> {
        self.check_turn(stone)?;

        self.moves.push(Turn::Pass { stone });
        if self.last_was_pass {
            self.finished = true;
        } else {
            self.last_was_pass = true;
            self.move_number += 1;
            self.next = stone.opp();
        }

        Ok(MoveResult::pass(stone, self.board.clone()))
    }

    /// Concede the game. Allowed regardless of whose turn it is.
    pub fn resign(&mut self, stone: Stone) -> Result<(), GoError> {
        if self.finished {
            return Err(GoError::GameFinished);
        }
        self.moves.push(Turn::Resign { stone });
        self.finish(Some(stone.opp()));
        Ok(())
    }

    /// Terminal transition for an external scorer. Also valid after the
    /// double pass, which finishes the game without naming a winner.
    pub fn finish(&mut self, winner: Option<Stone>) {
        self.finished = true;
        self.winner = winner;
    }

    /// Dry-run a move without changing the game.
    pub fn is_legal(&self, pos: Position, stone: Stone) -> bool {
        self.check_turn(stone).is_ok() && self.is_playable(pos, stone)
    }

    /// Like [`is_legal`](Self::is_legal) but ignores whose turn it is and
    /// whether the game is over; only the position and its history count.
    pub fn is_playable(&self, pos: Position, stone: Stone) -> bool {
        rules::try_move(&self.board, pos, stone, &self.history).is_ok()
    }

    fn check_turn(&self, stone: Stone) -> Result<(), GoError> {
        if self.finished {
            return Err(GoError::GameFinished);
        }
        if stone != self.next {
            return Err(GoError::WrongTurn);
        }
        Ok(())
    }
}
