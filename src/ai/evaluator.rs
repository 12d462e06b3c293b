//! Static evaluation of a position from one side's point of view.
//!
//! The score is a weighted sum over every 4-cell window plus positional terms.
//! The center column is deliberately weighted lightly and horizontal spread is
//! rewarded, so the engine does not fall into stacking the middle column.

use crate::game::{
    Board, Cell, GameOutcome, GameState, Orientation, Player, Window, CENTER_COL, COLS, ROWS,
};

/// Score of a decided game. Heuristic sums stay far below it.
pub const WIN_SCORE: i32 = 1_000_000;

const FOUR_SCORE: i32 = 1000;
const THREE_SCORE: i32 = 80;
const TWO_SCORE: i32 = 15;
const OPP_THREE_SCORE: i32 = -70;
const OPP_TWO_SCORE: i32 = -10;

const HORIZONTAL_WEIGHT: i32 = 12;
const VERTICAL_WEIGHT: i32 = 8;
const DIAGONAL_WEIGHT: i32 = 15;

const CENTER_WEIGHT: i32 = 1;
const NEAR_CENTER_WEIGHT: i32 = 2;
const DIVERSITY_BONUS: i32 = 8;
const CONCENTRATION_PENALTY: i32 = 100;

const SPREAD_CENTER_PIECE: i32 = 5;
const SPREAD_OFF_CENTER_WEIGHT: i32 = 4;
const SPREAD_MIN_PIECES: usize = 3;
/// (ratio numerator over 10, penalty), steepest first.
const SPREAD_CONCENTRATION: [(usize, i32); 3] = [(7, 150), (6, 80), (5, 40)];
const THREAT_DIVERSITY_BONUS: i32 = 25;

/// Positional terms layered on top of the line-window score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positional {
    /// Light center weight, near-center bonus, flat concentration penalty.
    Balanced,
    /// Flat center credit, rewards every off-center piece, escalating
    /// concentration penalty and a bonus for threats spread over columns.
    Spread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    player: Player,
    positional: Positional,
}

impl Evaluator {
    pub fn new(player: Player, positional: Positional) -> Self {
        Evaluator { player, positional }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn opponent(&self) -> Player {
        self.player.other()
    }

    /// Higher is better for `player`. Decided games score exactly
    /// `±WIN_SCORE`, draws 0.
    pub fn evaluate(&self, state: &GameState) -> i32 {
        if let Some(outcome) = state.outcome() {
            return match outcome {
                GameOutcome::Winner(p) if p == self.player => WIN_SCORE,
                GameOutcome::Winner(_) => -WIN_SCORE,
                GameOutcome::Draw => 0,
            };
        }

        let board = state.board();
        let positional = match self.positional {
            Positional::Balanced => self.balanced_terms(board),
            Positional::Spread => self.spread_terms(board),
        };
        self.line_score(board) + positional
    }

    /// Weighted window score: own view minus the opponent's view per window.
    pub fn line_score(&self, board: &Board) -> i32 {
        let own = self.player.to_cell();
        let opp = self.opponent().to_cell();
        board
            .windows()
            .map(|(orientation, window)| {
                let diff = score_window(&window, own, opp) - score_window(&window, opp, own);
                diff * direction_weight(orientation)
            })
            .sum()
    }

    fn balanced_terms(&self, board: &Board) -> i32 {
        let own = self.player.to_cell();
        let mut score = 0;

        for row in 0..ROWS {
            let height = (ROWS - row) as i32;
            if board.get(row, CENTER_COL) == own {
                score += height * CENTER_WEIGHT;
            }
            for col in [CENTER_COL - 2, CENTER_COL - 1, CENTER_COL + 1, CENTER_COL + 2] {
                if board.get(row, col) == own {
                    score += height * NEAR_CENTER_WEIGHT;
                }
            }
        }

        let counts = board.column_counts(own);
        score + distinct_columns(&counts) * DIVERSITY_BONUS - balanced_concentration(&counts)
    }

    fn spread_terms(&self, board: &Board) -> i32 {
        let own = self.player.to_cell();
        let mut score = 0;

        for row in 0..ROWS {
            for col in 0..COLS {
                if board.get(row, col) != own {
                    continue;
                }
                if col == CENTER_COL {
                    score += SPREAD_CENTER_PIECE;
                } else {
                    score += (ROWS - row) as i32 * SPREAD_OFF_CENTER_WEIGHT;
                }
            }
        }

        let counts = board.column_counts(own);
        score += distinct_columns(&counts) * DIVERSITY_BONUS - spread_concentration(&counts);

        score + threat_diversity(board, self.player) as i32 * THREAT_DIVERSITY_BONUS
    }
}

/// Score one window from `own`'s perspective.
pub fn score_window(window: &Window, own: Cell, opp: Cell) -> i32 {
    let own_count = window.iter().filter(|&&c| c == own).count();
    let opp_count = window.iter().filter(|&&c| c == opp).count();
    let empty = window.len() - own_count - opp_count;

    match (own_count, opp_count, empty) {
        (4, _, _) => FOUR_SCORE,
        (3, _, 1) => THREE_SCORE,
        (2, _, 2) => TWO_SCORE,
        (_, 3, 1) => OPP_THREE_SCORE,
        (_, 2, 2) => OPP_TWO_SCORE,
        _ => 0,
    }
}

fn direction_weight(orientation: Orientation) -> i32 {
    match orientation {
        Orientation::Horizontal => HORIZONTAL_WEIGHT,
        Orientation::Vertical => VERTICAL_WEIGHT,
        Orientation::DiagonalDown | Orientation::DiagonalUp => DIAGONAL_WEIGHT,
    }
}

fn distinct_columns(counts: &[usize; COLS]) -> i32 {
    counts.iter().filter(|&&n| n > 0).count() as i32
}

/// Penalty when more than 70% of the pieces share one column.
fn balanced_concentration(counts: &[usize; COLS]) -> i32 {
    let total: usize = counts.iter().sum();
    let max = counts.iter().copied().max().unwrap_or(0);
    if total > 0 && max * 10 > total * 7 {
        CONCENTRATION_PENALTY
    } else {
        0
    }
}

/// Escalating penalty for the busiest column's share, once more than
/// `SPREAD_MIN_PIECES` pieces are down.
fn spread_concentration(counts: &[usize; COLS]) -> i32 {
    let total: usize = counts.iter().sum();
    if total <= SPREAD_MIN_PIECES {
        return 0;
    }
    let max = counts.iter().copied().max().unwrap_or(0);
    SPREAD_CONCENTRATION
        .iter()
        .find(|&&(tenths, _)| max * 10 > total * tenths)
        .map_or(0, |&(_, penalty)| penalty)
}

/// Unweighted window score for `player` over horizontal, vertical and
/// descending (`\`, [`Orientation::DiagonalDown`]) windows. Ascending `/`
/// windows are left out. Used to compare candidate moves rather than to
/// search.
pub fn window_threats(board: &Board, player: Player) -> i32 {
    let own = player.to_cell();
    let opp = player.other().to_cell();
    board
        .windows()
        .filter(|(orientation, _)| *orientation != Orientation::DiagonalUp)
        .map(|(_, window)| score_window(&window, own, opp))
        .sum()
}

/// Number of playable columns whose landing cell would join at least one
/// existing `player` piece in a straight line.
pub fn threat_diversity(board: &Board, player: Player) -> usize {
    let own = player.to_cell();
    (0..COLS)
        .filter(|&col| {
            let Some(row) = board.next_open_row(col) else {
                return false;
            };
            Orientation::ALL.iter().any(|&orientation| {
                let (dr, dc) = orientation.delta();
                let run = 1
                    + contiguous(board, row, col, (dr, dc), own)
                    + contiguous(board, row, col, (-dr, -dc), own);
                run >= 2
            })
        })
        .count()
}

/// Count `cell`s directly adjacent to (row, col) along `delta`, up to three.
fn contiguous(board: &Board, row: usize, col: usize, delta: (isize, isize), cell: Cell) -> usize {
    let (dr, dc) = delta;
    (1..=3)
        .take_while(|&i| board.cell_at(row as isize + dr * i, col as isize + dc * i) == Some(cell))
        .count()
}
