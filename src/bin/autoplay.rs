use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use tile_fusion::autoplay::{play_to_end, AutoplayStats, RandomMover};
use tile_fusion::config::AppConfig;
use tile_fusion::game::GameSession;
use tile_fusion::highscore::MemoryStore;
use tile_fusion::logging;

/// Play tile-fusion games headlessly with a random mover.
#[derive(Parser)]
#[command(name = "autoplay", about = "Play tile-fusion games with a random mover")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Base seed; game `i` uses `seed + i`. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Override board size
    #[arg(long)]
    board_size: Option<usize>,

    /// Give up on a game after this many moves
    #[arg(long, default_value_t = 100_000)]
    max_turns: usize,

    /// Path to TOML configuration file
    #[arg(long, default_value = "tile-fusion.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.games == 0 {
        bail!("--games must be at least 1");
    }

    let loaded = AppConfig::load_if_exists(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let config_missing = loaded.is_none();
    let mut config = loaded.unwrap_or_default();
    if let Some(board_size) = cli.board_size {
        config.game.board_size = board_size;
    }
    config.validate().context("invalid configuration")?;

    let _log_guard = logging::init(&config.logging)?;
    if config_missing {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let base_seed = cli.seed.unwrap_or_else(rand::random);
    println!(
        "Playing {} game(s) on a {}x{} board (seed {})",
        cli.games, config.game.board_size, config.game.board_size, base_seed
    );

    let mut stats = AutoplayStats::new();
    for i in 0..cli.games {
        let seed = base_seed.wrapping_add(i as u64);
        let mut session =
            GameSession::with_seed(config.game.clone(), Box::new(MemoryStore::default()), seed);
        let mut mover = RandomMover::with_seed(seed);
        let summary = play_to_end(&mut session, &mut mover, cli.max_turns);
        stats.record(&summary);
        println!("game {:>4}: {}", i + 1, summary);
    }

    println!();
    println!("games:         {}", stats.games());
    println!("wins:          {} ({:.1}%)", stats.wins(), stats.win_rate() * 100.0);
    println!("unfinished:    {}", stats.unfinished());
    println!("average score: {:.1}", stats.average_score());
    println!("best score:    {}", stats.best_score());
    println!("best tile:     {}", 1u32 << stats.best_value());
    println!("average turns: {:.1}", stats.average_turns());
    Ok(())
}
