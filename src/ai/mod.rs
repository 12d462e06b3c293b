//! The computer opponent: static evaluation, move ordering, alpha-beta search
//! and the difficulty tiers built on top of them.

mod agent;
pub mod evaluator;
pub mod ordering;
mod random;
pub mod search;
pub mod strategy;

pub use agent::Agent;
pub use evaluator::{Evaluator, Positional, WIN_SCORE};
pub use random::{random_legal_column, RandomAgent};
pub use search::SearchEngine;
pub use strategy::{Difficulty, Strategy, StrategyConfig};
