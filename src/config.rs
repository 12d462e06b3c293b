use std::path::Path;

use tracing::warn;

use crate::ai::{Difficulty, StrategyConfig};
use crate::error::ConfigError;
use crate::game::Player;
use crate::session::GameMode;

/// Deepest search a tier may be configured with.
pub const MAX_DEPTH: usize = 8;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub ai: AiConfig,
}

/// Who plays, and against what.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Side taken by the computer in player-vs-AI games.
    pub ai_player: Player,
    /// Fixed seed for reproducible games; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: GameMode::PlayerVsAi,
            difficulty: Difficulty::Medium,
            ai_player: Player::Yellow,
            seed: None,
        }
    }
}

/// Per-tier overrides of search depth and randomness.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub easy: TierConfig,
    pub medium: TierConfig,
    pub hard: TierConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            easy: TierConfig::from(StrategyConfig::EASY),
            medium: TierConfig::from(StrategyConfig::MEDIUM),
            hard: TierConfig::from(StrategyConfig::HARD),
        }
    }
}

impl AiConfig {
    pub fn tier(&self, difficulty: Difficulty) -> &TierConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TierConfig {
    pub depth: usize,
    pub randomness: f64,
}

impl From<StrategyConfig> for TierConfig {
    fn from(config: StrategyConfig) -> Self {
        TierConfig {
            depth: config.depth,
            randomness: config.randomness,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for difficulty in Difficulty::ALL {
            let tier = self.ai.tier(difficulty);
            let section = difficulty.name().to_lowercase();
            if !(1..=MAX_DEPTH).contains(&tier.depth) {
                return Err(ConfigError::Validation(format!(
                    "ai.{section}.depth must be in 1..={MAX_DEPTH}"
                )));
            }
            if !(0.0..=1.0).contains(&tier.randomness) {
                return Err(ConfigError::Validation(format!(
                    "ai.{section}.randomness must be in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// Tier settings for `difficulty` with the configured depth and
    /// randomness applied.
    pub fn strategy_config(&self, difficulty: Difficulty) -> StrategyConfig {
        let tier = self.ai.tier(difficulty);
        StrategyConfig {
            depth: tier.depth,
            randomness: tier.randomness,
            ..difficulty.config()
        }
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
