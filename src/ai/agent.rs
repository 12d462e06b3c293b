use crate::game::GameState;

/// Anything that can pick a column for the side to move.
pub trait Agent {
    /// Choose a column for the current player, or `None` when the agent has
    /// no move to offer. Callers must still validate the column.
    fn select_action(&mut self, state: &GameState) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Forget any per-game memory. Called when a new game starts.
    fn reset(&mut self) {}
}
