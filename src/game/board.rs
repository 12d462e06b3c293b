use std::fmt;

use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const CENTER_COL: usize = COLS / 2;
pub const WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

/// Line directions a window or a run can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right, `\`.
    DiagonalDown,
    /// Bottom-left to top-right, `/`.
    DiagonalUp,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::DiagonalDown,
        Orientation::DiagonalUp,
    ];

    /// Row/column step for one cell along this orientation.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
            Orientation::DiagonalDown => (1, 1),
            Orientation::DiagonalUp => (-1, 1),
        }
    }
}

/// Four consecutive cells along one orientation.
pub type Window = [Cell; WIN_LENGTH];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row 5 is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Signed lookup, `None` when off the board.
    pub fn cell_at(&self, row: isize, col: isize) -> Option<Cell> {
        if row < 0 || col < 0 || row >= ROWS as isize || col >= COLS as isize {
            return None;
        }
        Some(self.cells[row as usize][col as usize])
    }

    /// Check if a column is full
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        self.cells[0][col] != Cell::Empty
    }

    /// A column is playable iff it is in range and its top cell is empty.
    pub fn is_valid_location(&self, col: usize) -> bool {
        !self.is_column_full(col)
    }

    /// Lowest empty row in the column, scanning from the bottom.
    pub fn next_open_row(&self, col: usize) -> Option<usize> {
        if col >= COLS {
            return None;
        }
        (0..ROWS).rev().find(|&row| self.cells[row][col] == Cell::Empty)
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        if col >= COLS {
            return Err(MoveError::InvalidColumn(col));
        }

        let row = self.next_open_row(col).ok_or(MoveError::ColumnFull(col))?;
        self.cells[row][col] = cell;
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.is_column_full(col))
    }

    /// Scan every orientation for four consecutive `cell`s. Stops at the first
    /// line found, in horizontal, vertical, `\`, `/` order.
    pub fn has_four(&self, cell: Cell) -> bool {
        if cell == Cell::Empty {
            return false;
        }
        self.windows()
            .any(|(_, window)| window.iter().all(|&c| c == cell))
    }

    /// Every 4-cell window on the board with its orientation.
    pub fn windows(&self) -> impl Iterator<Item = (Orientation, Window)> + '_ {
        Orientation::ALL.into_iter().flat_map(move |orientation| {
            let (dr, dc) = orientation.delta();
            (0..ROWS as isize).flat_map(move |row| {
                (0..COLS as isize).filter_map(move |col| {
                    let mut window = [Cell::Empty; WIN_LENGTH];
                    for (i, slot) in window.iter_mut().enumerate() {
                        let i = i as isize;
                        *slot = self.cell_at(row + dr * i, col + dc * i)?;
                    }
                    Some((orientation, window))
                })
            })
        })
    }

    /// Number of `cell` pieces in each column.
    pub fn column_counts(&self, cell: Cell) -> [usize; COLS] {
        let mut counts = [0; COLS];
        for row in &self.cells {
            for (col, &c) in row.iter().enumerate() {
                if c == cell {
                    counts[col] += 1;
                }
            }
        }
        counts
    }

    /// Count of non-empty cells.
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&c| c != Cell::Empty)
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &cell in row {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Red => 'R',
                    Cell::Yellow => 'Y',
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        for col in 0..COLS {
            write!(f, " {col}")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.piece_count(), 0);
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        // Drop first piece in column 3
        let row = board.drop_piece(3, Cell::Red).unwrap();
        assert_eq!(row, 5); // Should land at bottom
        assert_eq!(board.get(5, 3), Cell::Red);

        // Drop second piece in same column
        let row = board.drop_piece(3, Cell::Yellow).unwrap();
        assert_eq!(row, 4); // Should land on top of first piece
        assert_eq!(board.get(4, 3), Cell::Yellow);
    }

    #[test]
    fn test_column_accepts_exactly_rows_pieces() {
        let mut board = Board::new();

        for expected_row in (0..ROWS).rev() {
            assert!(board.is_valid_location(0));
            assert_eq!(board.next_open_row(0), Some(expected_row));
            assert_eq!(board.drop_piece(0, Cell::Red), Ok(expected_row));
        }

        assert!(board.is_column_full(0));
        assert!(!board.is_valid_location(0));
        assert_eq!(board.next_open_row(0), None);
        assert_eq!(board.drop_piece(0, Cell::Yellow), Err(MoveError::ColumnFull(0)));
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(board.drop_piece(7, Cell::Red), Err(MoveError::InvalidColumn(7)));
        assert!(!board.is_valid_location(7));
        assert_eq!(board.next_open_row(7), None);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Cell::Red).unwrap();
            }
        }
        assert!(board.is_full());
        assert_eq!(board.piece_count(), ROWS * COLS);
    }

    #[test]
    fn test_window_counts() {
        let board = Board::new();
        let count = |o: Orientation| board.windows().filter(|(w, _)| *w == o).count();
        assert_eq!(count(Orientation::Horizontal), 24);
        assert_eq!(count(Orientation::Vertical), 21);
        assert_eq!(count(Orientation::DiagonalDown), 12);
        assert_eq!(count(Orientation::DiagonalUp), 12);
    }

    #[test]
    fn test_horizontal_four() {
        let mut board = Board::new();
        for col in 0..4 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        assert!(board.has_four(Cell::Red));
        assert!(!board.has_four(Cell::Yellow));
    }

    #[test]
    fn test_vertical_four() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop_piece(3, Cell::Yellow).unwrap();
        }
        assert!(board.has_four(Cell::Yellow));
    }

    #[test]
    fn test_diagonal_up_four() {
        let mut board = Board::new();
        // Create diagonal / pattern
        board.drop_piece(0, Cell::Red).unwrap();

        board.drop_piece(1, Cell::Yellow).unwrap();
        board.drop_piece(1, Cell::Red).unwrap();

        board.drop_piece(2, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Yellow).unwrap();
        board.drop_piece(2, Cell::Red).unwrap();

        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        assert!(!board.has_four(Cell::Red));
        board.drop_piece(3, Cell::Red).unwrap();

        assert!(board.has_four(Cell::Red));
    }

    #[test]
    fn test_diagonal_down_four() {
        let mut board = Board::new();
        // Create diagonal \ pattern
        board.drop_piece(6, Cell::Red).unwrap();

        board.drop_piece(5, Cell::Yellow).unwrap();
        board.drop_piece(5, Cell::Red).unwrap();

        board.drop_piece(4, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Yellow).unwrap();
        board.drop_piece(4, Cell::Red).unwrap();

        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Yellow).unwrap();
        board.drop_piece(3, Cell::Red).unwrap();

        assert!(board.has_four(Cell::Red));
    }

    #[test]
    fn test_no_four_with_three() {
        let mut board = Board::new();
        for col in 0..3 {
            board.drop_piece(col, Cell::Red).unwrap();
        }
        assert!(!board.has_four(Cell::Red));
        assert!(!board.has_four(Cell::Empty));
    }

    #[test]
    fn test_column_counts() {
        let mut board = Board::new();
        board.drop_piece(2, Cell::Red).unwrap();
        board.drop_piece(2, Cell::Red).unwrap();
        board.drop_piece(5, Cell::Yellow).unwrap();
        assert_eq!(board.column_counts(Cell::Red), [0, 0, 2, 0, 0, 0, 0]);
        assert_eq!(board.column_counts(Cell::Yellow), [0, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_display_marks_pieces() {
        let mut board = Board::new();
        board.drop_piece(0, Cell::Red).unwrap();
        board.drop_piece(6, Cell::Yellow).unwrap();
        let text = board.to_string();
        let bottom = text.lines().nth(ROWS - 1).unwrap();
        assert_eq!(bottom, " R . . . . . Y");
    }
}
