//! Minimax search with alpha-beta pruning.
//!
//! Every simulated move works on its own copy of the game state, so the
//! caller's state is never touched. Depth alone bounds the work: at most
//! 7 columns per ply and a handful of plies.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::evaluator::{Evaluator, Positional};
use super::ordering::order_moves;
use crate::game::{GameState, Player};

/// Alpha-beta engine playing for one fixed side.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    evaluator: Evaluator,
    max_depth: usize,
    nodes_evaluated: u64,
}

impl SearchEngine {
    /// `max_depth` is in plies and is raised to at least one.
    pub fn new(player: Player, max_depth: usize, positional: Positional) -> Self {
        SearchEngine {
            evaluator: Evaluator::new(player, positional),
            max_depth: max_depth.max(1),
            nodes_evaluated: 0,
        }
    }

    pub fn player(&self) -> Player {
        self.evaluator.player()
    }

    pub fn opponent(&self) -> Player {
        self.evaluator.opponent()
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Nodes visited by the most recent root search.
    pub fn nodes_evaluated(&self) -> u64 {
        self.nodes_evaluated
    }

    /// Best column for the engine's side, or `None` when it is not that side's
    /// turn or nothing is playable. Equal-valued columns are broken uniformly
    /// at random.
    pub fn get_best_move<R: Rng + ?Sized>(&mut self, state: &GameState, rng: &mut R) -> Option<usize> {
        self.best_move_among(state, None, rng)
    }

    /// Like [`SearchEngine::get_best_move`] but only root columns contained in
    /// `allowed` are considered.
    pub fn get_best_move_among<R: Rng + ?Sized>(
        &mut self,
        state: &GameState,
        allowed: &[usize],
        rng: &mut R,
    ) -> Option<usize> {
        self.best_move_among(state, Some(allowed), rng)
    }

    fn best_move_among<R: Rng + ?Sized>(
        &mut self,
        state: &GameState,
        allowed: Option<&[usize]>,
        rng: &mut R,
    ) -> Option<usize> {
        self.nodes_evaluated = 0;

        if state.is_terminal() || state.current_player() != self.player() {
            return None;
        }

        let mut best_score = i32::MIN;
        let mut best_moves: Vec<usize> = Vec::new();
        let mut alpha = i32::MIN;
        let beta = i32::MAX;

        for col in order_moves(state, rng) {
            if allowed.is_some_and(|cols| !cols.contains(&col)) {
                continue;
            }
            let next = state.simulate(col);
            let score = self.minimax_ab(&next, self.max_depth - 1, alpha, beta, false, rng);

            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(col);
            } else if score == best_score {
                best_moves.push(col);
            }
            // One below the best, so a sibling that only ties is searched
            // exactly instead of being cut off at the bound.
            alpha = alpha.max(best_score.saturating_sub(1));
        }

        let choice = best_moves.choose(rng).copied();
        debug!(
            player = self.player().name(),
            depth = self.max_depth,
            nodes = self.nodes_evaluated,
            score = best_score,
            candidates = ?best_moves,
            choice = ?choice,
            "search finished"
        );
        choice
    }

    /// Score of `state` for the engine's side, searched `depth` plies deep.
    pub fn minimax_ab<R: Rng + ?Sized>(
        &mut self,
        state: &GameState,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        rng: &mut R,
    ) -> i32 {
        self.nodes_evaluated += 1;

        if depth == 0 || state.is_terminal() {
            return self.evaluator.evaluate(state);
        }

        let moves = order_moves(state, rng);
        if moves.is_empty() {
            return self.evaluator.evaluate(state);
        }

        if maximizing {
            let mut best = i32::MIN;
            for col in moves {
                let next = state.simulate(col);
                let score = self.minimax_ab(&next, depth - 1, alpha, beta, false, rng);
                best = best.max(score);
                alpha = alpha.max(score);
                if alpha >= beta {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for col in moves {
                let next = state.simulate(col);
                let score = self.minimax_ab(&next, depth - 1, alpha, beta, true, rng);
                best = best.min(score);
                beta = beta.min(score);
                if alpha >= beta {
                    break;
                }
            }
            best
        }
    }
}
