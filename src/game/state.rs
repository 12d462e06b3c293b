use super::board::{Board, COLS};
use super::Player;
use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// The authoritative game: grid, side to move, result and last placement.
///
/// Placing a piece never advances the turn. Callers inspect the outcome first
/// and then call [`GameState::switch_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    turn: Player,
    outcome: Option<GameOutcome>,
    last_move: Option<(usize, usize)>,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            turn: Player::Red, // Red starts
            outcome: None,
            last_move: None,
        }
    }

    /// Replay alternating moves from the initial position, switching turn
    /// after each one.
    pub fn from_moves(columns: &[usize]) -> Result<Self, MoveError> {
        let mut state = Self::initial();
        for &col in columns {
            state.try_drop(col)?;
            state.switch_turn();
        }
        Ok(state)
    }

    /// Wrap an arbitrary grid with `turn` to move. The outcome is derived from
    /// the grid: a line for either colour wins, a full grid is a draw.
    pub fn with_board(board: Board, turn: Player) -> Self {
        let outcome = [Player::Red, Player::Yellow]
            .into_iter()
            .find(|p| board.has_four(p.to_cell()))
            .map(GameOutcome::Winner)
            .or_else(|| board.is_full().then_some(GameOutcome::Draw));
        GameState {
            board,
            turn,
            outcome,
            last_move: None,
        }
    }

    /// Restore the empty initial position.
    pub fn reset(&mut self) {
        *self = Self::initial();
    }

    /// Side whose piece is placed next.
    pub fn current_player(&self) -> Player {
        self.turn
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(GameOutcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Same as [`GameState::is_terminal`]: a win or a draw has been recorded.
    pub fn game_over(&self) -> bool {
        self.is_terminal()
    }

    /// (row, column) of the most recent placement.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    pub fn is_valid_location(&self, col: usize) -> bool {
        self.board.is_valid_location(col)
    }

    pub fn get_next_open_row(&self, col: usize) -> Option<usize> {
        self.board.next_open_row(col)
    }

    /// Get list of legal columns (not full)
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }

        (0..COLS)
            .filter(|&col| self.board.is_valid_location(col))
            .collect()
    }

    /// Place the side to move's piece in `col` and run win/draw detection.
    /// Returns the landing row.
    pub fn try_drop(&mut self, col: usize) -> Result<usize, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let row = self.board.drop_piece(col, self.turn.to_cell())?;
        self.last_move = Some((row, col));
        self.check_win();
        Ok(row)
    }

    /// Boolean form of [`GameState::try_drop`]: false on any rejection, with
    /// no state change.
    pub fn drop_piece(&mut self, col: usize) -> bool {
        self.try_drop(col).is_ok()
    }

    /// Record a win for the side that just moved, or a draw on a full board.
    /// The outcome is only ever set once.
    pub fn check_win(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if self.board.has_four(self.turn.to_cell()) {
            self.outcome = Some(GameOutcome::Winner(self.turn));
        } else if self.board.is_full() {
            self.outcome = Some(GameOutcome::Draw);
        }
    }

    pub fn switch_turn(&mut self) {
        self.turn = self.turn.other();
    }

    /// Copy of this state after the side to move plays `col`, with the turn
    /// switched if the drop was accepted.
    pub fn simulate(&self, col: usize) -> GameState {
        let mut next = *self;
        if next.drop_piece(col) {
            next.switch_turn();
        }
        next
    }

    /// Copy of this state after `player` plays `col` regardless of whose turn
    /// it is. The turn is left with `player`.
    pub fn simulate_as(&self, player: Player, col: usize) -> GameState {
        let mut next = *self;
        next.turn = player;
        next.drop_piece(col);
        next
    }

    /// Whether `player` dropping into `col` right now completes four in a row.
    pub fn wins_immediately(&self, player: Player, col: usize) -> bool {
        self.simulate_as(player, col).winner() == Some(player)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
