//! Core Connect Four game logic: board representation, player types, and the
//! authoritative game state with its placement and turn rules.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, Orientation, Window, CENTER_COL, COLS, ROWS, WIN_LENGTH};
pub use player::Player;
pub use state::{GameOutcome, GameState};

#[cfg(test)]
pub(crate) mod testing {
    use super::{Board, Cell, COLS, ROWS};

    /// A full grid with no four in a row: rows alternate `R R Y Y R R Y` and
    /// its inverse. The top of the last column is Red.
    pub(crate) fn drawn_board() -> Board {
        let pattern = [
            Cell::Red,
            Cell::Red,
            Cell::Yellow,
            Cell::Yellow,
            Cell::Red,
            Cell::Red,
            Cell::Yellow,
        ];
        let mut board = Board::new();
        for level in 0..ROWS {
            for (col, &cell) in pattern.iter().enumerate().take(COLS) {
                let cell = match (level % 2, cell) {
                    (0, cell) => cell,
                    (_, Cell::Red) => Cell::Yellow,
                    _ => Cell::Red,
                };
                board
                    .drop_piece(col, cell)
                    .expect("pattern fills each column once per level");
            }
        }
        board
    }
}
