//! Command line entry point for caro-rating
//!
//! Lets operators inspect the rank ladder, resolve a CP value, preview a CP
//! delta and dry-run a match through the recorder.

use anyhow::Result;
use caro_rating::config::AppConfig;
use caro_rating::metrics::MetricsCollector;
use caro_rating::rank::RankResolver;
use caro_rating::rating::{
    EloRatingCalculator, InMemoryRatingStorage, MatchRecorder, RatingCalculator, RatingEntry,
    RatingStorage,
};
use caro_rating::types::{Cp, MatchResult};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Caro Rating - CP ranks and Elo-style rating updates
#[derive(Parser)]
#[command(
    name = "caro-rating",
    version,
    about = "Resolve CP ranks and compute rating changes for Caro matches"
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, help = "Print results as JSON instead of text")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the rank badge for a CP value
    Rank {
        #[arg(allow_negative_numbers = true)]
        cp: f64,
    },
    /// Compute the CP delta for one player after a match
    Delta {
        #[arg(allow_negative_numbers = true)]
        player_cp: Cp,
        #[arg(allow_negative_numbers = true)]
        opponent_cp: Cp,
        result: MatchResult,
    },
    /// Print the rank ladder
    Table,
    /// Run one match through the recorder with the given starting ratings
    Record {
        player: String,
        #[arg(allow_negative_numbers = true)]
        player_cp: Cp,
        opponent: String,
        #[arg(allow_negative_numbers = true)]
        opponent_cp: Cp,
        /// Result from the first player's point of view
        result: MatchResult,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    caro_rating::config::validate_config(&config)?;
    Ok(config)
}

fn print_output<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn print_table(resolver: &RankResolver, json: bool) -> Result<()> {
    let table = resolver.table();
    print_output(json, table, || {
        let tiers = table.tiers();
        tiers
            .iter()
            .enumerate()
            .map(|(index, tier)| match tiers.get(index + 1) {
                Some(next) => format!(
                    "{} {:<10} {:>5} - {:<5} ({} sub-tiers)",
                    tier.icon,
                    tier.name,
                    tier.min_rating,
                    next.min_rating - 1,
                    tier.sub_tier_count
                ),
                None => format!("{} {:<10} {:>5}+", tier.icon, tier.name, tier.min_rating),
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

async fn record(
    config: &AppConfig,
    resolver: RankResolver,
    calculator: Arc<EloRatingCalculator>,
    players: [(String, Cp); 2],
    result: MatchResult,
    json: bool,
) -> Result<()> {
    let storage = Arc::new(InMemoryRatingStorage::new(
        config.rating.max_stored_players,
    ));
    for (player_id, cp) in &players {
        storage
            .store_rating(RatingEntry::new(player_id.clone(), *cp))
            .await?;
    }

    let metrics = Arc::new(MetricsCollector::new()?);
    let recorder = MatchRecorder::new(storage, calculator, resolver)
        .with_clamp(config.rating.clamp_non_negative)
        .with_metrics(metrics.clone());

    let report = recorder
        .record_match(&players[0].0, &players[1].0, result)
        .await?;

    print_output(json, &report, || {
        [&report.player, &report.opponent]
            .iter()
            .map(|change| {
                format!(
                    "{:<12} {:<5} {:>5} -> {:<5} ({:+}) {} -> {} [{}]",
                    change.player_id,
                    change.result,
                    change.old_cp,
                    change.new_cp,
                    change.delta,
                    change.old_rank.display_name,
                    change.new_rank.display_name,
                    change.rank_movement.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })?;

    debug!("Metrics after recording:\n{}", metrics.export()?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let resolver = config.rank_resolver()?;
    let calculator = Arc::new(EloRatingCalculator::new(config.rating.elo_config())?);
    info!(
        service = %config.service.name,
        tiers = resolver.table().len(),
        k_factor = config.rating.k_factor,
        "Configuration loaded"
    );

    match args.command {
        Command::Rank { cp } => {
            let rank = resolver.resolve(Some(cp));
            print_output(args.json, &rank, || {
                format!("{} (progress {})", rank, rank.sub_tier_progress)
            })?;
        }
        Command::Delta {
            player_cp,
            opponent_cp,
            result,
        } => {
            let delta = calculator.compute_delta(player_cp, opponent_cp, result);
            print_output(args.json, &serde_json::json!({ "delta": delta }), || {
                format!("{:+}", delta)
            })?;
        }
        Command::Table => print_table(&resolver, args.json)?,
        Command::Record {
            player,
            player_cp,
            opponent,
            opponent_cp,
            result,
        } => {
            record(
                &config,
                resolver,
                calculator,
                [(player, player_cp), (opponent, opponent_cp)],
                result,
                args.json,
            )
            .await?;
        }
    }

    Ok(())
}
