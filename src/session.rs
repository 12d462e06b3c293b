//! Game controller: owns the authoritative [`GameState`], seats a computer
//! player on zero, one or both sides, and applies every accepted move.
//!
//! The controller is the only place a column coming out of an agent is
//! trusted. Anything missing or unplayable is replaced by a random legal
//! column so a faulty agent can never stall the game.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

use crate::ai::{random_legal_column, Agent, Strategy};
use crate::config::AppConfig;
use crate::error::{MoveError, SessionError};
use crate::game::{GameOutcome, GameState, Player};

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
pub enum GameMode {
    #[serde(rename = "pvp")]
    #[value(name = "pvp")]
    PlayerVsPlayer,
    #[default]
    #[serde(rename = "pvai")]
    #[value(name = "pvai")]
    PlayerVsAi,
    #[serde(rename = "aivai")]
    #[value(name = "aivai")]
    AiVsAi,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::PlayerVsPlayer => "Player vs Player",
            GameMode::PlayerVsAi => "Player vs AI",
            GameMode::AiVsAi => "AI vs AI",
        }
    }
}

/// What happened on one accepted placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub player: Player,
    pub column: usize,
    pub row: usize,
    pub outcome: Option<GameOutcome>,
    /// The agent's own choice was unusable and a random column was played.
    pub fallback: bool,
}

pub struct GameSession {
    state: GameState,
    mode: GameMode,
    red: Option<Box<dyn Agent>>,
    yellow: Option<Box<dyn Agent>>,
    rng: StdRng,
}

impl GameSession {
    /// A seat holding `None` is played by a human through
    /// [`GameSession::play_column`].
    pub fn new(
        mode: GameMode,
        red: Option<Box<dyn Agent>>,
        yellow: Option<Box<dyn Agent>>,
        rng: StdRng,
    ) -> Self {
        GameSession {
            state: GameState::initial(),
            mode,
            red,
            yellow,
            rng,
        }
    }

    /// Seat strategies according to the `[game]` section of `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        let game = &config.game;
        let strategy = |player: Player, stream: u64| -> Box<dyn Agent> {
            Box::new(Strategy::with_config(
                game.difficulty,
                config.strategy_config(game.difficulty),
                player,
                seeded_rng(game.seed, stream),
            ))
        };

        let (red, yellow) = match game.mode {
            GameMode::PlayerVsPlayer => (None, None),
            GameMode::PlayerVsAi => match game.ai_player {
                Player::Red => (Some(strategy(Player::Red, 1)), None),
                Player::Yellow => (None, Some(strategy(Player::Yellow, 2))),
            },
            GameMode::AiVsAi => (Some(strategy(Player::Red, 1)), Some(strategy(Player::Yellow, 2))),
        };

        Self::new(game.mode, red, yellow, seeded_rng(game.seed, 0))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    fn seat(&self, player: Player) -> Option<&dyn Agent> {
        match player {
            Player::Red => self.red.as_deref(),
            Player::Yellow => self.yellow.as_deref(),
        }
    }

    fn seat_mut(&mut self, player: Player) -> Option<&mut Box<dyn Agent>> {
        match player {
            Player::Red => self.red.as_mut(),
            Player::Yellow => self.yellow.as_mut(),
        }
    }

    /// Whether the side to move is computer-controlled and the game is live.
    pub fn is_ai_turn(&self) -> bool {
        !self.state.is_terminal() && self.seat(self.state.current_player()).is_some()
    }

    /// Display label such as `Red` or `Yellow (Hard AI)`.
    pub fn player_label(&self, player: Player) -> String {
        match self.seat(player) {
            Some(agent) => format!("{} ({} AI)", player.name(), agent.name()),
            None => player.name().to_string(),
        }
    }

    /// Human placement for the side to move.
    pub fn play_column(&mut self, column: usize) -> Result<MoveReport, SessionError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameOver.into());
        }
        if self.seat(self.state.current_player()).is_some() {
            return Err(SessionError::NotHumanTurn);
        }
        self.place(column, false)
    }

    /// Ask the seated agent for a move and play it, falling back to a random
    /// legal column when the agent's answer is unusable.
    pub fn play_ai_turn(&mut self) -> Result<MoveReport, SessionError> {
        if self.state.is_terminal() {
            return Err(MoveError::GameOver.into());
        }
        let player = self.state.current_player();
        let state = self.state;
        let proposed = self
            .seat_mut(player)
            .ok_or(SessionError::NotAiTurn)?
            .select_action(&state);

        let (column, fallback) = match proposed {
            Some(col) if self.state.is_valid_location(col) => (col, false),
            other => {
                warn!(
                    player = player.name(),
                    proposed = ?other,
                    "agent gave no playable column, playing a random one"
                );
                let col = random_legal_column(&self.state, &mut self.rng).ok_or_else(|| {
                    error!(
                        player = player.name(),
                        "no legal column on a board that is not finished"
                    );
                    SessionError::NoLegalMove
                })?;
                (col, true)
            }
        };

        self.place(column, fallback)
    }

    /// Play computer turns until the game ends.
    pub fn play_to_end(&mut self) -> Result<GameOutcome, SessionError> {
        while !self.state.is_terminal() {
            self.play_ai_turn()?;
        }
        self.state.outcome().ok_or(SessionError::NoLegalMove)
    }

    /// Start a new game: empty board, Red to move, agent memory cleared.
    pub fn reset(&mut self) {
        self.state.reset();
        for agent in [self.red.as_mut(), self.yellow.as_mut()].into_iter().flatten() {
            agent.reset();
        }
        info!(mode = self.mode.label(), "new game");
    }

    fn place(&mut self, column: usize, fallback: bool) -> Result<MoveReport, SessionError> {
        let player = self.state.current_player();
        let row = self.state.try_drop(column)?;
        let outcome = self.state.outcome();

        match outcome {
            Some(GameOutcome::Winner(winner)) => info!(winner = winner.name(), "game over"),
            Some(GameOutcome::Draw) => info!("game over, board full"),
            None => self.state.switch_turn(),
        }

        Ok(MoveReport {
            player,
            column,
            row,
            outcome,
            fallback,
        })
    }
}

/// Play one computer-vs-computer game from the empty board.
pub fn play_match(
    red: Box<dyn Agent>,
    yellow: Box<dyn Agent>,
    rng: StdRng,
) -> Result<GameOutcome, SessionError> {
    GameSession::new(GameMode::AiVsAi, Some(red), Some(yellow), rng).play_to_end()
}

fn seeded_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_os_rng(),
    }
}

/// Results over a series of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchTally {
    pub red_wins: u32,
    pub yellow_wins: u32,
    pub draws: u32,
}

impl MatchTally {
    pub fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Winner(Player::Red) => self.red_wins += 1,
            GameOutcome::Winner(Player::Yellow) => self.yellow_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
    }

    pub fn games(&self) -> u32 {
        self.red_wins + self.yellow_wins + self.draws
    }

    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::Red => self.red_wins,
            Player::Yellow => self.yellow_wins,
        }
    }
}
