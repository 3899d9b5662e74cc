//! Rankings CLI
//!
//! Loads the baseline and current ranking snapshots plus any annotation
//! update feeds, reconciles them and prints board reports.

mod loader;
mod logging;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use player_rankings::RankingsConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "rankings-cli")]
#[command(about = "Reconcile draft-board ranking snapshots and inspect the result")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML config file; defaults plus RANKINGS_* env vars when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Baseline snapshot (overrides config)
    #[arg(long)]
    baseline: Option<PathBuf>,

    /// Current snapshot (overrides config)
    #[arg(long)]
    current: Option<PathBuf>,

    /// Annotation update feed; repeat for several. Replaces the configured list.
    #[arg(long = "updates")]
    updates: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Round-grouped draft board
    Board {
        /// Teams in the league (round size)
        #[arg(long)]
        teams: Option<usize>,

        /// Maximum players to show
        #[arg(long, default_value = "200")]
        limit: usize,
    },

    /// Biggest risers and fallers since the baseline
    Movers {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Players with no baseline match
    Unmatched,

    /// One player with all of their annotations
    Player {
        id: String,

        /// Print the reconciled player as JSON
        #[arg(long)]
        json: bool,
    },

    /// Draft players by id into a roster and show what's left
    Draft {
        ids: Vec<String>,

        #[arg(long)]
        teams: Option<usize>,
    },

    /// Print the effective configuration
    Config,
}

impl Cli {
    /// File (or defaults), then env, then command-line flags
    fn resolve_config(&self) -> Result<RankingsConfig> {
        let mut config = match &self.config {
            Some(path) => RankingsConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
                .with_env_overrides(),
            None => RankingsConfig::from_env(),
        };

        if let Some(path) = &self.baseline {
            config.feeds.baseline = path.clone();
        }
        if let Some(path) = &self.current {
            config.feeds.current = path.clone();
        }
        if !self.updates.is_empty() {
            config.feeds.updates = self.updates.clone();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    logging::initialize_logging(&config.logging.level);

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let ctx = loader::load_context(&config).await?;
    info!("Reconciled {} players", ctx.players().len());

    match cli.command {
        Commands::Board { teams, limit } => {
            report::print_board(&ctx, teams.unwrap_or(config.board.teams), limit);
        }
        Commands::Movers { limit } => {
            report::print_movers(&ctx, limit.unwrap_or(config.board.movers_limit));
        }
        Commands::Unmatched => {
            report::print_unmatched(&ctx);
        }
        Commands::Player { id, json } => {
            report::print_player(&ctx, &id, json)?;
        }
        Commands::Draft { ids, teams } => {
            report::print_mock_draft(&ctx, &ids, teams.unwrap_or(config.board.teams))?;
        }
        Commands::Config => {}
    }

    Ok(())
}
