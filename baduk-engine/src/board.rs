use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::stone::Stone;

pub const DEFAULT_SIZE: u8 = 19;
pub const MAX_SIZE: u8 = 25;

/// An intersection. Coordinates are signed so that off-board requests can be
/// represented and rejected rather than wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Repetition key: every intersection in row-major order followed by the
/// color to move next.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Square Go board stored as a flat row-major array (`y * size + x`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: u8,
    cells: Vec<i8>,
}

#[derive(Deserialize)]
struct RawBoard {
    size: u8,
    cells: Vec<i8>,
}

impl TryFrom<RawBoard> for Board {
    type Error = String;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.size == 0 || raw.size > MAX_SIZE {
            return Err(format!("unsupported board size {}", raw.size));
        }
        let expected = raw.size as usize * raw.size as usize;
        if raw.cells.len() != expected {
            return Err(format!(
                "board of size {} needs {expected} cells, got {}",
                raw.size,
                raw.cells.len()
            ));
        }
        if let Some(bad) = raw.cells.iter().find(|c| !(-1..=1).contains(*c)) {
            return Err(format!("invalid cell value {bad}"));
        }
        Ok(Board {
            size: raw.size,
            cells: raw.cells,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new(DEFAULT_SIZE)
    }
}

impl Board {
    /// Create an empty board.
    pub fn new(size: u8) -> Self {
        assert!(
            size > 0 && size <= MAX_SIZE,
            "board size must be within 1..={MAX_SIZE}"
        );
        Board {
            size,
            cells: vec![0; size as usize * size as usize],
        }
    }

    /// Create a board from a square matrix of rows (`rows[y][x]`), using the
    /// `Stone::to_int` encoding with 0 for empty.
    pub fn from_rows(rows: Vec<Vec<i8>>) -> Self {
        let size = rows.len();
        assert!(
            size > 0 && size <= MAX_SIZE as usize && rows.iter().all(|r| r.len() == size),
            "malformed board matrix"
        );
        Board {
            size: size as u8,
            cells: rows.into_iter().flatten().map(i8::signum).collect(),
        }
    }

    // -- Accessors --

    pub fn size(&self) -> u8 {
        self.size
    }

    /// Number of intersections.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    pub fn contains(&self, pos: Position) -> bool {
        let n = self.size as i32;
        (0..n).contains(&pos.x) && (0..n).contains(&pos.y)
    }

    /// Row-major cell index, or `None` when off the board.
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.size as usize + pos.x as usize)
    }

    pub fn position_of(&self, index: usize) -> Position {
        let n = self.size as usize;
        Position::new((index % n) as i32, (index / n) as i32)
    }

    pub fn get(&self, pos: Position) -> Option<Stone> {
        self.index(pos).and_then(|i| Stone::from_int(self.cells[i]))
    }

    pub fn stone_count(&self, stone: Stone) -> usize {
        self.cells.iter().filter(|&&c| c == stone.to_int()).count()
    }

    pub fn empty_points(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 0)
            .map(|(i, _)| self.position_of(i))
    }

    // -- Mutation --

    /// Set an intersection to `stone`. Off-board positions are ignored.
    pub fn place(&mut self, pos: Position, stone: Stone) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = stone.to_int();
        }
    }

    pub fn remove(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = 0;
        }
    }

    // -- Graph algorithms --

    /// The 4-connected neighbors that are on the board.
    pub fn neighbors(&self, pos: Position) -> ArrayVec<Position, 4> {
        let mut result = ArrayVec::new();
        if !self.contains(pos) {
            return result;
        }
        let Position { x, y } = pos;
        let n = self.size as i32;
        if x > 0 {
            result.push(Position::new(x - 1, y));
        }
        if x + 1 < n {
            result.push(Position::new(x + 1, y));
        }
        if y > 0 {
            result.push(Position::new(x, y - 1));
        }
        if y + 1 < n {
            result.push(Position::new(x, y + 1));
        }
        result
    }

    /// Flood-fill the maximal 4-connected region sharing the content of
    /// `start`. For a stone this is its group; for an empty point it is the
    /// surrounding empty region. Off-board starts yield nothing.
    pub fn collect_group(&self, start: Position) -> Vec<Position> {
        let Some(si) = self.index(start) else {
            return Vec::new();
        };
        let content = self.cells[si];

        let mut visited = vec![false; self.cells.len()];
        let mut result = Vec::new();
        let mut stack = vec![start];
        visited[si] = true;

        while let Some(p) = stack.pop() {
            result.push(p);
            for n in self.neighbors(p) {
                let ni = self.flat(n);
                if !visited[ni] && self.cells[ni] == content {
                    visited[ni] = true;
                    stack.push(n);
                }
            }
        }

        result
    }

    /// Count the distinct empty intersections adjacent to any member of `group`.
    pub fn count_liberties(&self, group: &[Position]) -> usize {
        let mut seen = vec![false; self.cells.len()];
        let mut count = 0;
        for &p in group {
            for n in self.neighbors(p) {
                let ni = self.flat(n);
                if !seen[ni] && self.cells[ni] == 0 {
                    seen[ni] = true;
                    count += 1;
                }
            }
        }
        count
    }

    /// Groups of `stone` touching `pos`, each reported once.
    pub fn adjacent_groups(&self, pos: Position, stone: Stone) -> Vec<Vec<Position>> {
        let mut groups: Vec<Vec<Position>> = Vec::new();
        for n in self.neighbors(pos) {
            if self.get(n) != Some(stone) || groups.iter().any(|g| g.contains(&n)) {
                continue;
            }
            groups.push(self.collect_group(n));
        }
        groups
    }

    pub fn signature(&self, next: Stone) -> Signature {
        let mut s = String::with_capacity(self.cells.len() + 1);
        s.extend(self.cells.iter().map(|&c| match Stone::from_int(c) {
            Some(stone) => stone.letter(),
            None => '.',
        }));
        s.push(next.letter());
        Signature(s)
    }

    #[inline]
    fn flat(&self, pos: Position) -> usize {
        pos.y as usize * self.size as usize + pos.x as usize
    }
}
