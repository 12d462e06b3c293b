use crate::game::GameState;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;

use super::agent::Agent;

/// Uniformly random legal column, or `None` when nothing is playable.
pub fn random_legal_column<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Option<usize> {
    state.legal_actions().choose(rng).copied()
}

/// An agent that selects uniformly at random from legal actions.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, state: &GameState) -> Option<usize> {
        random_legal_column(state, &mut self.rng)
    }

    fn name(&self) -> &str {
        "Random"
    }
}
