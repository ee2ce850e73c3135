use baduk_engine::{Board, Stone};

use crate::error::AppError;

/// Board as one string per row, `.` for empty, `B`/`W` for stones.
pub fn board_rows(board: &Board) -> Vec<String> {
    let n = board.size() as usize;
    board
        .cells()
        .chunks(n)
        .map(|row| {
            row.iter()
                .map(|&c| Stone::from_int(c).map_or('.', Stone::letter))
                .collect()
        })
        .collect()
}

/// Wire name of a color.
pub fn color_name(stone: Stone) -> &'static str {
    match stone {
        Stone::Black => "black",
        Stone::White => "white",
    }
}

pub fn parse_color(raw: &str) -> Result<Stone, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid color '{raw}', expected black or white")))
}
