//! # Connect Four AI
//!
//! Connect Four on the standard 6×7 board with a computer opponent built on
//! alpha-beta minimax. Three difficulty tiers share one search engine and
//! differ in depth, randomness, evaluation terms and a few tactical policies.
//!
//! ## Modules
//!
//! - [`game`]: board, players, turn and outcome bookkeeping
//! - [`ai`]: evaluator, move ordering, search engine, difficulty strategies
//! - [`session`]: game controller seating humans and computer players
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: structured error types
//! - [`ui`]: terminal UI

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod session;
pub mod ui;
