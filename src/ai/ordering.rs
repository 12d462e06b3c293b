//! Move ordering for the alpha-beta search.
//!
//! Forcing columns first, then the remaining off-center columns shuffled, then
//! the center column last.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::{GameState, CENTER_COL, COLS};

/// Legal columns of `state` in search order.
pub fn order_moves<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Vec<usize> {
    let mut strategic = Vec::new();
    let mut center = Vec::new();
    let mut others = Vec::new();

    for col in (0..COLS).filter(|&c| state.is_valid_location(c)) {
        if is_strategic(state, col) {
            strategic.push(col);
        } else if col == CENTER_COL {
            center.push(col);
        } else {
            others.push(col);
        }
    }

    others.shuffle(rng);

    strategic.extend(others);
    strategic.extend(center);
    strategic
}

/// A column is strategic when the side to move wins there at once, or when
/// the opponent would win there on their next drop (a forced block).
pub fn is_strategic(state: &GameState, col: usize) -> bool {
    if !state.is_valid_location(col) {
        return false;
    }
    let mover = state.current_player();
    state.wins_immediately(mover, col) || state.wins_immediately(mover.other(), col)
}
