use std::fmt;

/// Why a play or pass was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoError {
    OutOfBounds,
    Occupied,
    Suicide,
    Ko,
    WrongTurn,
    GameFinished,
}

/// Coarse grouping of [`GoError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The move names an impossible intersection.
    Validation,
    /// The move is well-formed but breaks a rule of Go.
    RuleViolation,
    /// The move is out of sequence.
    Turn,
}

impl GoError {
    pub fn category(self) -> ErrorCategory {
        match self {
            GoError::OutOfBounds | GoError::Occupied => ErrorCategory::Validation,
            GoError::Suicide | GoError::Ko => ErrorCategory::RuleViolation,
            GoError::WrongTurn | GoError::GameFinished => ErrorCategory::Turn,
        }
    }

    /// Stable machine-readable identifier.
    pub fn code(self) -> &'static str {
        match self {
            GoError::OutOfBounds => "out_of_bounds",
            GoError::Occupied => "occupied",
            GoError::Suicide => "suicide",
            GoError::Ko => "ko",
            GoError::WrongTurn => "wrong_turn",
            GoError::GameFinished => "game_finished",
        }
    }
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::OutOfBounds => write!(f, "move is outside the board"),
            GoError::Occupied => write!(f, "intersection is already occupied"),
            GoError::Suicide => write!(f, "move is suicidal"),
            GoError::Ko => write!(f, "move repeats a previous board position"),
            GoError::WrongTurn => write!(f, "not this color's turn"),
            GoError::GameFinished => write!(f, "game is already finished"),
        }
    }
}

impl std::error::Error for GoError {}
