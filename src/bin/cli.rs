//! Census CLI
//!
//! Collects main-hand equipment for top ranked Mythic+ characters.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use census::{
    error::{AppError, Result},
    models::{Config, ProberKind},
    pipeline::{self, Collector, FileStatus},
    services::{BlizzardProber, RaiderIoProber, RaiderIoRankings, auth},
    storage::{CheckpointStore, JsonArrayStore},
    utils::{http, log as console},
};

/// census - Mythic+ equipment census
#[derive(Parser, Debug)]
#[command(name = "census", version, about = "Mythic+ equipment census collector")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Override the data directory from the configuration
    #[arg(long)]
    data_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress console progress output
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect records for every category, resuming from the checkpoint
    Run,

    /// Show checkpoint and record counts per category
    Status,

    /// Count records with and without the item
    Tally,

    /// Check that every record file is a complete JSON array
    Verify,

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

async fn build_collector(config: &Config) -> Result<Collector> {
    let client = http::create_client(&config.crawler)?;
    let rankings = RaiderIoRankings::new(client.clone(), config);
    let store = JsonArrayStore::new(config.paths.data_dir());

    let mut collector = Collector::new(config.clone(), Box::new(rankings), Box::new(store));
    for kind in Collector::required_probers(config) {
        collector = match kind {
            ProberKind::RaiderIo => {
                collector.with_prober(kind, Box::new(RaiderIoProber::new(client.clone(), config)))
            }
            ProberKind::Blizzard => {
                let token =
                    auth::access_token_or_empty(&client, &config.endpoints, &config.blizzard)
                        .await;
                collector.with_prober(
                    kind,
                    Box::new(BlizzardProber::new(client.clone(), config, token)),
                )
            }
        };
    }
    Ok(collector)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    console::set_quiet(cli.quiet);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(dir) = cli.data_dir {
        config.paths.data_dir = dir;
    }
    log::debug!("Data directory: {}", config.paths.data_dir);

    let store = JsonArrayStore::new(config.paths.data_dir());

    match cli.command {
        Command::Run => {
            config.validate()?;
            let collector = build_collector(&config).await?;
            collector.run().await?;
        }

        Command::Status => {
            let checkpoints = CheckpointStore::open(config.paths.checkpoint_path()).await?;
            let mut items = Vec::new();
            for category in &config.categories {
                let status = match pipeline::check_bytes(
                    &store.read_bytes(category).await?.unwrap_or_else(|| b"[]".to_vec()),
                ) {
                    FileStatus::Valid(n) => format!("{n} records"),
                    _ => "unreadable records".to_string(),
                };
                items.push((
                    category.name.as_str(),
                    format!(
                        "page {}/{}, {}",
                        checkpoints.page(category),
                        config.collect.max_page,
                        status
                    ),
                ));
            }
            console::summary("Collection status", &items);
        }

        Command::Tally => {
            let tallies = pipeline::tally(&store, &config.categories).await?;
            let items: Vec<_> = tallies
                .iter()
                .map(|t| {
                    (
                        t.category.as_str(),
                        format!(
                            "{} with item, {} without ({:.1}% of {})",
                            t.equipped,
                            t.without_item(),
                            t.equipped_percent(),
                            t.total
                        ),
                    )
                })
                .collect();
            console::summary("Item tally", &items);
        }

        Command::Verify => {
            let report = pipeline::verify(&store, &config.categories).await?;
            let mut invalid = 0;
            for (category, status) in &report {
                match status {
                    FileStatus::Valid(n) => console::sub_item(&format!("{category}: {n} records")),
                    FileStatus::Missing => console::sub_item(&format!("{category}: no file")),
                    FileStatus::Invalid(reason) => {
                        invalid += 1;
                        console::sub_item(&format!("{category}: INVALID ({reason})"));
                    }
                }
            }
            if invalid > 0 {
                return Err(AppError::validation(format!(
                    "{invalid} record file(s) are not complete arrays"
                )));
            }
            console::success("All record files are valid");
        }

        Command::Validate => {
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            console::success("Config OK");
        }
    }

    Ok(())
}
