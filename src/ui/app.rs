use crate::error::{MoveError, SessionError};
use crate::game::{GameOutcome, CENTER_COL, COLS};
use crate::session::{GameSession, MoveReport};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};
use std::io;
use tracing::error;

pub struct App {
    session: GameSession,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(session: GameSession) -> Self {
        App {
            session,
            selected_column: CENTER_COL,
            should_quit: false,
            message: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Main application loop. A computer move is played after each frame so
    /// the board is drawn between turns.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.draw(terminal)?;

            if self.should_quit {
                break;
            }

            if self.session.is_ai_turn() {
                self.play_ai_turn();
            }

            self.handle_events()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|f| self.render(f))?;
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.session.reset();
                self.selected_column = CENTER_COL;
                self.message = Some("New game started!".to_string());
            }
            _ => {}
        }
    }

    fn drop_piece(&mut self) {
        let result = self.session.play_column(self.selected_column);
        self.message = Some(match result {
            Ok(report) => self.describe(&report),
            Err(SessionError::Move(MoveError::GameOver)) => {
                "Game over! Press 'r' to restart.".to_string()
            }
            Err(SessionError::Move(MoveError::ColumnFull(col))) => {
                format!("Column {} is full!", col + 1)
            }
            Err(err) => err.to_string(),
        });
    }

    fn play_ai_turn(&mut self) {
        match self.session.play_ai_turn() {
            Ok(report) => self.message = Some(self.describe(&report)),
            Err(err) => {
                error!(%err, "computer turn failed");
                self.message = Some(err.to_string());
            }
        }
    }

    fn describe(&self, report: &MoveReport) -> String {
        match report.outcome {
            Some(GameOutcome::Winner(player)) => {
                format!("{} wins!", self.session.player_label(player))
            }
            Some(GameOutcome::Draw) => "It's a draw!".to_string(),
            None => format!(
                "{} played column {}",
                self.session.player_label(report.player),
                report.column + 1
            ),
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, &self.session, self.selected_column, &self.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::game::Player;
    use crate::session::GameMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;

    fn pvp() -> App {
        App::new(GameSession::new(
            GameMode::PlayerVsPlayer,
            None,
            None,
            StdRng::seed_from_u64(0),
        ))
    }

    #[test]
    fn selection_stays_on_the_board() {
        let mut app = pvp();
        for _ in 0..10 {
            app.handle_key(KeyEvent::from(KeyCode::Right));
        }
        assert_eq!(app.selected_column, COLS - 1);
        for _ in 0..10 {
            app.handle_key(KeyEvent::from(KeyCode::Left));
        }
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn enter_drops_in_selected_column() {
        let mut app = pvp();
        app.handle_key(KeyEvent::from(KeyCode::Left));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.session().state().last_move(), Some((5, 2)));
        assert_eq!(app.message.as_deref(), Some("Red played column 3"));
    }

    #[test]
    fn full_column_reports_error() {
        let mut app = pvp();
        for _ in 0..6 {
            app.handle_key(KeyEvent::from(KeyCode::Char(' ')));
        }
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.message.as_deref(), Some("Column 4 is full!"));
    }

    #[test]
    fn computer_answers_and_restart_clears() {
        let mut app = App::new(GameSession::new(
            GameMode::PlayerVsAi,
            None,
            Some(Box::new(RandomAgent::from_seed(4))),
            StdRng::seed_from_u64(4),
        ));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(app.session().is_ai_turn());
        app.play_ai_turn();
        assert_eq!(app.session().state().current_player(), Player::Red);
        assert_eq!(app.session().state().board().piece_count(), 2);

        app.handle_key(KeyEvent::from(KeyCode::Char('r')));
        assert_eq!(app.session().state().board().piece_count(), 0);
        assert_eq!(app.message.as_deref(), Some("New game started!"));
    }

    #[test]
    fn draws_into_any_backend() {
        let mut app = pvp();
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        app.draw(&mut terminal).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Red played column 4"));
        assert!(text.contains("Yellow to move"));
    }

    #[test]
    fn quit_keys() {
        let mut app = pvp();
        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
