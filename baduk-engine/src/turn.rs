use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::stone::Stone;

/// One entry of a game's move log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Turn {
    Play { stone: Stone, pos: Position },
    Pass { stone: Stone },
    Resign { stone: Stone },
}

impl Turn {
    pub fn stone(&self) -> Stone {
        match *self {
            Turn::Play { stone, .. } | Turn::Pass { stone } | Turn::Resign { stone } => stone,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match *self {
            Turn::Play { pos, .. } => Some(pos),
            Turn::Pass { .. } | Turn::Resign { .. } => None,
        }
    }

    /// Wire name, matching the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Turn::Play { .. } => "play",
            Turn::Pass { .. } => "pass",
            Turn::Resign { .. } => "resign",
        }
    }
}
