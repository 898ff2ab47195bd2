use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use tile_fusion::config::AppConfig;
use tile_fusion::game::{GameSession, InputPolicy, Scenario};
use tile_fusion::highscore;
use tile_fusion::logging;
use tile_fusion::ui::App;

/// Slide and fuse numbered tiles in the terminal.
#[derive(Parser)]
#[command(name = "tile-fusion", about = "Slide and fuse tiles until you reach 2048")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "tile-fusion.toml")]
    config: PathBuf,

    /// Override board size
    #[arg(long)]
    board_size: Option<usize>,

    /// Override high score file location
    #[arg(long)]
    highscore: Option<PathBuf>,

    /// Start from a prepared board: merge-showcase or end-game
    #[arg(long)]
    scenario: Option<Scenario>,

    /// What to do with input during animations: drop or queue-latest
    #[arg(long)]
    input_policy: Option<InputPolicy>,

    /// Seed for tile spawning
    #[arg(long)]
    seed: Option<u64>,

    /// Print a configuration file with every default value and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let loaded = AppConfig::load_if_exists(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let config_missing = loaded.is_none();
    let mut config = loaded.unwrap_or_default();

    // Apply CLI overrides
    if let Some(board_size) = cli.board_size {
        config.game.board_size = board_size;
    }
    if let Some(path) = cli.highscore {
        config.highscore.path = Some(path);
    }
    if let Some(policy) = cli.input_policy {
        config.game.input_policy = policy;
    }
    config.validate().context("invalid configuration")?;

    let _log_guard = logging::init(&config.logging)?;
    if config_missing {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let store = highscore::open_store(&config.highscore);
    let mut session = match cli.seed {
        Some(seed) => GameSession::with_seed(config.game.clone(), store, seed),
        None => GameSession::new(config.game.clone(), store),
    };
    if let Some(scenario) = cli.scenario {
        session
            .load_scenario(scenario)
            .with_context(|| format!("loading scenario '{scenario}'"))?;
    }

    run(App::new(session, config.animation.clone())).context("terminal UI failed")
}

fn run(mut app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
