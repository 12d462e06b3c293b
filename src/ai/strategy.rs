//! Difficulty tiers over the shared search engine.
//!
//! A tier is a [`StrategyConfig`] value: search depth, chance of playing a
//! random column, the evaluator's positional terms and which Hard policies
//! are switched on. [`Strategy`] carries the small per-game memory those
//! policies need.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::agent::Agent;
use super::evaluator::{window_threats, Positional};
use super::search::SearchEngine;
use crate::game::{Board, Cell, GameState, Orientation, Player, CENTER_COL, COLS, ROWS};

/// A column chosen this many turns in a row is withheld from the next search.
const REPEAT_LIMIT: u32 = 2;
/// Consecutive center picks before alternatives are considered.
const CENTER_LIMIT: u32 = 2;
/// An alternative to the center must score above this to replace it.
const ALTERNATIVE_THRESHOLD: i32 = 50;
/// Strategic value above which a column is reported as a candidate.
const STRATEGIC_THRESHOLD: i32 = 60;
const STRATEGIC_REPORT_LEN: usize = 3;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Built-in settings for this tier.
    pub fn config(self) -> StrategyConfig {
        match self {
            Difficulty::Easy => StrategyConfig::EASY,
            Difficulty::Medium => StrategyConfig::MEDIUM,
            Difficulty::Hard => StrategyConfig::HARD,
        }
    }
}

/// Everything that distinguishes one tier from another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyConfig {
    /// Search depth in plies.
    pub depth: usize,
    /// Probability of skipping the search and playing a random column.
    pub randomness: f64,
    pub positional: Positional,
    /// Take immediate wins, then block immediate losses, before anything else.
    pub tactical_shortcuts: bool,
    pub anti_repetition: bool,
    pub anti_center: bool,
}

impl StrategyConfig {
    pub const EASY: StrategyConfig = StrategyConfig {
        depth: 2,
        randomness: 0.4,
        positional: Positional::Balanced,
        tactical_shortcuts: false,
        anti_repetition: false,
        anti_center: false,
    };

    pub const MEDIUM: StrategyConfig = StrategyConfig {
        depth: 4,
        randomness: 0.1,
        positional: Positional::Balanced,
        tactical_shortcuts: false,
        anti_repetition: false,
        anti_center: false,
    };

    pub const HARD: StrategyConfig = StrategyConfig {
        depth: 5,
        randomness: 0.03,
        positional: Positional::Spread,
        tactical_shortcuts: true,
        anti_repetition: true,
        anti_center: true,
    };
}

/// A computer player for one side at one difficulty.
#[derive(Debug, Clone)]
pub struct Strategy {
    difficulty: Difficulty,
    config: StrategyConfig,
    engine: SearchEngine,
    rng: StdRng,
    last_move: Option<usize>,
    repeat_streak: u32,
    center_streak: u32,
}

impl Strategy {
    pub fn new(difficulty: Difficulty, player: Player) -> Self {
        Self::with_config(difficulty, difficulty.config(), player, StdRng::from_os_rng())
    }

    /// Reproducible strategy for tests and seeded sessions.
    pub fn seeded(difficulty: Difficulty, player: Player, seed: u64) -> Self {
        Self::with_config(
            difficulty,
            difficulty.config(),
            player,
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn with_config(
        difficulty: Difficulty,
        config: StrategyConfig,
        player: Player,
        rng: StdRng,
    ) -> Self {
        Strategy {
            difficulty,
            config,
            engine: SearchEngine::new(player, config.depth, config.positional),
            rng,
            last_move: None,
            repeat_streak: 0,
            center_streak: 0,
        }
    }

    pub fn player(&self) -> Player {
        self.engine.player()
    }

    /// Clear the per-game memory.
    pub fn reset(&mut self) {
        self.last_move = None;
        self.repeat_streak = 0;
        self.center_streak = 0;
    }

    /// Pick a column for this strategy's side. `None` when it is not this
    /// side's turn, the game is over, or the search produced nothing.
    pub fn choose_move(&mut self, state: &GameState) -> Option<usize> {
        if state.is_terminal() || state.current_player() != self.player() {
            return None;
        }
        let legal = state.legal_actions();
        if legal.is_empty() {
            return None;
        }

        if self.config.tactical_shortcuts {
            if let Some(col) = self.immediate_win(state, &legal) {
                debug!(difficulty = self.difficulty.name(), col, "taking immediate win");
                self.remember(col);
                return Some(col);
            }
            if let Some(col) = self.immediate_block(state, &legal) {
                debug!(difficulty = self.difficulty.name(), col, "blocking immediate loss");
                self.remember(col);
                return Some(col);
            }
        }

        if self.plays_randomly() {
            let col = legal.choose(&mut self.rng).copied()?;
            debug!(difficulty = self.difficulty.name(), col, "playing a random column");
            self.remember(col);
            return Some(col);
        }

        if self.config.tactical_shortcuts {
            let strategic = self.strategic_candidates(state, &legal);
            if !strategic.is_empty() {
                debug!(candidates = ?strategic, "strategic columns available");
            }
        }

        let mut candidates = legal;
        if self.config.anti_repetition {
            self.withhold_repeated(&mut candidates);
        }

        let chosen = self
            .engine
            .get_best_move_among(state, &candidates, &mut self.rng)?;

        let chosen = if self.config.anti_center {
            self.center_guard(state, &candidates, chosen)
        } else {
            chosen
        };

        self.remember(chosen);
        Some(chosen)
    }

    /// Roll against the tier's randomness.
    fn plays_randomly(&mut self) -> bool {
        self.rng.random::<f64>() < self.config.randomness
    }

    fn immediate_win(&self, state: &GameState, legal: &[usize]) -> Option<usize> {
        let me = self.player();
        legal.iter().copied().find(|&col| state.wins_immediately(me, col))
    }

    fn immediate_block(&self, state: &GameState, legal: &[usize]) -> Option<usize> {
        let opponent = self.engine.opponent();
        legal
            .iter()
            .copied()
            .find(|&col| state.wins_immediately(opponent, col))
    }

    fn withhold_repeated(&mut self, candidates: &mut Vec<usize>) {
        let Some(last) = self.last_move else {
            return;
        };
        if self.repeat_streak >= REPEAT_LIMIT && candidates.len() > 1 && candidates.contains(&last) {
            candidates.retain(|&col| col != last);
            self.repeat_streak = 0;
            debug!(col = last, "withholding repeated column");
        }
    }

    /// Replace a repeated center pick with the best off-center column when
    /// that column scores well enough on its own.
    fn center_guard(&mut self, state: &GameState, candidates: &[usize], chosen: usize) -> usize {
        if chosen != CENTER_COL {
            self.center_streak = 0;
            return chosen;
        }

        self.center_streak += 1;
        if self.center_streak < CENTER_LIMIT || candidates.len() <= 1 {
            return chosen;
        }

        match self.best_alternative(state, candidates) {
            Some((alt, score)) if score > ALTERNATIVE_THRESHOLD => {
                debug!(from = CENTER_COL, to = alt, score, "leaving the center column");
                self.center_streak = 0;
                alt
            }
            _ => chosen,
        }
    }

    fn best_alternative(&self, state: &GameState, candidates: &[usize]) -> Option<(usize, i32)> {
        let mut best: Option<(usize, i32)> = None;
        for &col in candidates.iter().filter(|&&c| c != CENTER_COL) {
            let score = self.score_alternative(&state.simulate(col));
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((col, score));
            }
        }
        best
    }

    /// Quick score of a position reached by an off-center move: own threats,
    /// opponent threats, column spread and a stacking penalty.
    fn score_alternative(&self, after: &GameState) -> i32 {
        let board = after.board();
        let me = self.player();
        let mut score = window_threats(board, me) * 10 - window_threats(board, me.other()) * 8;

        let counts = board.column_counts(me.to_cell());
        let used = counts.iter().filter(|&&n| n > 0).count();
        score += used as i32 * 15;

        let total: usize = counts.iter().sum();
        let max = counts.iter().copied().max().unwrap_or(0);
        if total > 0 && max * 10 > total * 6 {
            score -= 80;
        }
        score
    }

    /// Up to three columns with a strategic value above the threshold, best
    /// first.
    fn strategic_candidates(&self, state: &GameState, legal: &[usize]) -> Vec<usize> {
        let mut scored: Vec<(i32, usize)> = legal
            .iter()
            .filter_map(|&col| {
                let value = self.strategic_value(state, col)?;
                (value > STRATEGIC_THRESHOLD).then_some((value, col))
            })
            .collect();
        scored.sort_unstable_by(|a, b| b.cmp(a));
        scored
            .into_iter()
            .take(STRATEGIC_REPORT_LEN)
            .map(|(_, col)| col)
            .collect()
    }

    fn strategic_value(&self, state: &GameState, col: usize) -> Option<i32> {
        let row = state.get_next_open_row(col)?;
        let me = self.player();

        let mut value = threat_potential(state.board(), row, col, me);

        // Each opponent reply that wins straight after this move.
        let after = state.simulate(col);
        let losing_replies = (0..COLS)
            .filter(|&reply| after.wins_immediately(me.other(), reply))
            .count();
        value -= losing_replies as i32 * 100;

        value += (20 - 5 * col.abs_diff(CENTER_COL) as i32).max(0);
        value += (ROWS - row) as i32 * 3;

        if col == CENTER_COL && self.center_streak >= CENTER_LIMIT {
            value -= 30;
        }
        Some(value)
    }

    fn remember(&mut self, col: usize) {
        if self.last_move == Some(col) {
            self.repeat_streak += 1;
        } else {
            self.repeat_streak = 1;
        }
        self.last_move = Some(col);
    }
}

/// Per orientation, own pieces reachable from the landing cell (empty cells
/// are stepped over, opponent pieces stop the scan): 3+ scores 100, 2 scores
/// 30, alone 5.
fn threat_potential(board: &Board, row: usize, col: usize, player: Player) -> i32 {
    let own = player.to_cell();
    let reach = |dr: isize, dc: isize| {
        let mut count = 0;
        for i in 1..=3 {
            match board.cell_at(row as isize + dr * i, col as isize + dc * i) {
                Some(cell) if cell == own => count += 1,
                Some(Cell::Empty) => {}
                _ => break,
            }
        }
        count
    };

    Orientation::ALL
        .iter()
        .map(|orientation| {
            let (dr, dc) = orientation.delta();
            match 1 + reach(dr, dc) + reach(-dr, -dc) {
                n if n >= 3 => 100,
                2 => 30,
                _ => 5,
            }
        })
        .sum()
}

impl Agent for Strategy {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        self.choose_move(state)
    }

    fn name(&self) -> &str {
        self.difficulty.name()
    }

    fn reset(&mut self) {
        Strategy::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deterministic(difficulty: Difficulty, depth: usize, player: Player, seed: u64) -> Strategy {
        let config = StrategyConfig {
            depth,
            randomness: 0.0,
            ..difficulty.config()
        };
        Strategy::with_config(difficulty, config, player, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn tier_settings() {
        assert_eq!(Difficulty::Easy.config().depth, 2);
        assert_eq!(Difficulty::Medium.config().depth, 4);
        assert_eq!(Difficulty::Hard.config().depth, 5);
        assert!((Difficulty::Easy.config().randomness - 0.4).abs() < 1e-9);
        assert!((Difficulty::Medium.config().randomness - 0.1).abs() < 1e-9);
        assert!(Difficulty::Hard.config().randomness < 0.05);
        assert!(Difficulty::Hard.config().tactical_shortcuts);
        assert!(!Difficulty::Easy.config().anti_center);
    }

    #[test]
    fn random_move_rate_matches_tier() {
        let trials = 10_000;
        for (difficulty, expected) in [(Difficulty::Easy, 0.4), (Difficulty::Medium, 0.1)] {
            let mut strategy = Strategy::seeded(difficulty, Player::Red, 77);
            let hits = (0..trials).filter(|_| strategy.plays_randomly()).count();
            let rate = hits as f64 / trials as f64;
            assert!(
                (rate - expected).abs() < 0.03,
                "{} random rate {rate}, expected about {expected}",
                difficulty.name()
            );
        }

        let mut never = deterministic(Difficulty::Medium, 2, Player::Red, 5);
        assert!((0..1000).all(|_| !never.plays_randomly()));
    }

    #[test]
    fn easy_strays_from_search_more_than_medium() {
        // Same depth, so only the random roll separates the two tiers from a
        // pure search.
        let state = GameState::from_moves(&[0, 6, 1, 6]).unwrap();
        let mut reference = deterministic(Difficulty::Medium, 2, Player::Red, 1);
        let searched: Vec<usize> = (0..200)
            .map(|_| reference.choose_move(&state).unwrap())
            .collect();
        let searched_cols: std::collections::HashSet<usize> = searched.into_iter().collect();

        let off_search = |difficulty: Difficulty| {
            let config = StrategyConfig {
                depth: 2,
                ..difficulty.config()
            };
            let mut strategy =
                Strategy::with_config(difficulty, config, Player::Red, StdRng::seed_from_u64(3));
            (0..400)
                .filter(|_| {
                    let col = strategy.choose_move(&state).unwrap();
                    !searched_cols.contains(&col)
                })
                .count()
        };
        assert!(off_search(Difficulty::Easy) > off_search(Difficulty::Medium));
    }

    #[test]
    fn hard_takes_immediate_win() {
        let state = GameState::from_moves(&[0, 0, 1, 1, 2, 2]).unwrap();
        for seed in 0..10 {
            let mut hard = Strategy::seeded(Difficulty::Hard, Player::Red, seed);
            assert_eq!(hard.choose_move(&state), Some(3));
        }
    }

    #[test]
    fn hard_blocks_immediate_loss() {
        let state = GameState::from_moves(&[6, 0, 6, 1, 5, 2]).unwrap();
        for seed in 0..10 {
            let mut hard = Strategy::seeded(Difficulty::Hard, Player::Red, seed);
            assert_eq!(hard.choose_move(&state), Some(3));
        }
    }

    #[test]
    fn win_takes_precedence_over_block() {
        // Red threatens column 3 on the bottom row, Yellow threatens column 6
        // vertically.
        let state = GameState::from_moves(&[0, 6, 1, 6, 2, 6]).unwrap();
        assert!(state.wins_immediately(Player::Yellow, 6));
        for seed in 0..10 {
            let mut hard = Strategy::seeded(Difficulty::Hard, Player::Red, seed);
            assert_eq!(hard.choose_move(&state), Some(3));
        }
    }

    #[test]
    fn declines_out_of_turn_and_after_game_over() {
        let mut easy = Strategy::seeded(Difficulty::Easy, Player::Yellow, 1);
        assert_eq!(easy.choose_move(&GameState::initial()), None);

        let over = GameState::from_moves(&[0, 1, 0, 1, 0, 1, 0]).unwrap();
        let mut hard = Strategy::seeded(Difficulty::Hard, over.current_player(), 1);
        assert_eq!(hard.choose_move(&over), None);
    }

    #[test]
    fn every_tier_returns_legal_columns() {
        for difficulty in Difficulty::ALL {
            let mut strategy = Strategy::seeded(difficulty, Player::Yellow, 21);
            let state = GameState::from_moves(&[3, 3, 3, 3, 3, 3, 2]).unwrap();
            for _ in 0..5 {
                let col = strategy.choose_move(&state).unwrap();
                assert!(state.is_valid_location(col), "{} chose full column {col}", difficulty.name());
            }
        }
    }

    #[test]
    fn full_randomness_is_still_legal() {
        let config = StrategyConfig {
            randomness: 1.0,
            ..StrategyConfig::EASY
        };
        let mut strategy =
            Strategy::with_config(Difficulty::Easy, config, Player::Red, StdRng::seed_from_u64(4));
        let state = GameState::from_moves(&[5, 5, 5, 5, 5, 5]).unwrap();
        for _ in 0..50 {
            let col = strategy.choose_move(&state).unwrap();
            assert_ne!(col, 5);
        }
    }

    #[test]
    fn repeated_column_is_withheld() {
        for col in 0..COLS {
            let mut hard = deterministic(Difficulty::Hard, 3, Player::Red, col as u64);
            hard.last_move = Some(col);
            hard.repeat_streak = 2;
            let chosen = hard.choose_move(&GameState::initial()).unwrap();
            assert_ne!(chosen, col);
            assert_eq!(hard.last_move, Some(chosen));
            assert_eq!(hard.repeat_streak, 1);
        }
    }

    #[test]
    fn single_repeat_is_allowed() {
        let mut hard = deterministic(Difficulty::Hard, 3, Player::Red, 9);
        hard.remember(4);
        let mut candidates = vec![0, 1, 2, 3, 4, 5, 6];
        hard.withhold_repeated(&mut candidates);
        assert_eq!(candidates.len(), COLS);

        hard.remember(4);
        hard.withhold_repeated(&mut candidates);
        assert!(!candidates.contains(&4));
    }

    #[test]
    fn center_guard_switches_to_strong_alternative() {
        // Red holds (5,0) and (5,1); column 2 makes an open three.
        let state = GameState::from_moves(&[0, 6, 1, 6]).unwrap();
        let mut hard = deterministic(Difficulty::Hard, 3, Player::Red, 2);
        hard.center_streak = 1;
        let candidates = state.legal_actions();
        assert_eq!(hard.center_guard(&state, &candidates, CENTER_COL), 2);
        assert_eq!(hard.center_streak, 0);
    }

    #[test]
    fn center_guard_keeps_center_without_good_alternative() {
        let state = GameState::initial();
        let mut hard = deterministic(Difficulty::Hard, 3, Player::Red, 3);
        let candidates = state.legal_actions();

        assert_eq!(hard.center_guard(&state, &candidates, CENTER_COL), CENTER_COL);
        assert_eq!(hard.center_streak, 1);
        // Lone pieces never beat the threshold.
        assert_eq!(hard.center_guard(&state, &candidates, CENTER_COL), CENTER_COL);
        assert_eq!(hard.center_streak, 2);

        assert_eq!(hard.center_guard(&state, &candidates, 1), 1);
        assert_eq!(hard.center_streak, 0);
    }

    #[test]
    fn strategic_scan_ranks_columns() {
        // Columns 3 and 2 both line up with (5,0) and (5,1); column 3 also
        // sits on the center. Column 1 stacks on Red's own piece.
        let state = GameState::from_moves(&[0, 6, 1, 6]).unwrap();
        let hard = deterministic(Difficulty::Hard, 3, Player::Red, 5);
        let candidates = hard.strategic_candidates(&state, &state.legal_actions());
        assert_eq!(candidates, vec![3, 2, 1]);
    }

    #[test]
    fn reset_clears_memory() {
        let mut hard = deterministic(Difficulty::Hard, 3, Player::Red, 6);
        hard.remember(2);
        hard.remember(2);
        hard.center_streak = 2;
        hard.reset();
        assert_eq!(hard.last_move, None);
        assert_eq!(hard.repeat_streak, 0);
        assert_eq!(hard.center_streak, 0);
    }
}
