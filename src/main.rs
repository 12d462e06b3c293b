use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect_four_ai::ai::Difficulty;
use connect_four_ai::config::AppConfig;
use connect_four_ai::game::{GameOutcome, Player};
use connect_four_ai::session::{GameMode, GameSession, MatchTally};
use connect_four_ai::ui::App;

/// Play Connect Four against a friend or an alpha-beta computer opponent.
#[derive(Parser)]
#[command(name = "connect-four", about = "Connect Four with a minimax AI")]
struct Cli {
    /// Who plays: pvp, pvai or aivai
    #[arg(long, value_enum)]
    mode: Option<GameMode>,

    /// Computer strength
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Side taken by the computer in pvai games
    #[arg(long, value_enum)]
    ai_player: Option<Player>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "connect-four.toml")]
    config: PathBuf,

    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Play computer-vs-computer games as text instead of opening the TUI
    #[arg(long)]
    headless: bool,

    /// Number of games to play in headless mode
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Write logs to this file (the TUI otherwise logs nothing)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    init_tracing(cli.headless, cli.log.as_deref())?;

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(mode) = cli.mode {
        config.game.mode = mode;
    }
    if let Some(difficulty) = cli.difficulty {
        config.game.difficulty = difficulty;
    }
    if let Some(player) = cli.ai_player {
        config.game.ai_player = player;
    }
    if cli.seed.is_some() {
        config.game.seed = cli.seed;
    }

    if cli.headless {
        config.game.mode = GameMode::AiVsAi;
        run_headless(&config, cli.games)
    } else {
        run_tui(&config).context("running terminal UI")
    }
}

fn init_tracing(headless: bool, log: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if headless => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        // The TUI owns the terminal; stay silent.
        None => {}
    }
    Ok(())
}

fn run_headless(config: &AppConfig, games: u32) -> Result<()> {
    let mut session = GameSession::from_config(config);
    let mut tally = MatchTally::default();

    for game in 1..=games {
        if game > 1 {
            session.reset();
        }
        let outcome = session
            .play_to_end()
            .with_context(|| format!("playing game {game}"))?;
        tally.record(outcome);

        let result = match outcome {
            GameOutcome::Winner(player) => format!("{} wins", session.player_label(player)),
            GameOutcome::Draw => "draw".to_string(),
        };
        println!("Game {game}: {result}");
        println!("{}", session.state().board());
    }

    info!(
        games = tally.games(),
        red = tally.red_wins,
        yellow = tally.yellow_wins,
        draws = tally.draws,
        "series finished"
    );
    println!(
        "{}: {}  |  {}: {}  |  Draws: {}",
        session.player_label(Player::Red),
        tally.red_wins,
        session.player_label(Player::Yellow),
        tally.yellow_wins,
        tally.draws
    );
    Ok(())
}

fn run_tui(config: &AppConfig) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(GameSession::from_config(config));
    let res = app.run(&mut terminal);

    // Restore terminal: always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
