#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the earthquake ingestion tool.

use clap::{Parser, Subcommand};
use quake_feed_database::earthquake_db;
use quake_feed_feed::registry::all_feeds;
use quake_feed_ingest::trigger::{TriggerOutcome, trigger};
use quake_feed_ingest::{Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(name = "quake_feed_ingest", about = "Earthquake feed ingestion tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one fetch cycle against the configured feed
    Run {
        /// Feed identifier (overrides the `QUAKE_FEED` env var)
        #[arg(long)]
        feed: Option<String>,
    },
    /// Create the earthquakes table if it does not exist
    Schema,
    /// List all registered feeds
    Feeds,
    /// Call a running server's trigger endpoint once (for cron-style scheduling)
    Trigger {
        /// Trigger endpoint URL
        #[arg(long, default_value = "http://localhost:5000/fetch-data")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { feed } => {
            let mut config = PipelineConfig::from_env();
            if let Some(feed) = feed {
                config.feed_id = feed;
            }
            let pipeline = Pipeline::from_config(&config)?;
            let inserted = pipeline.run_cycle().await?;
            log::info!("Fetched and stored {inserted} new earthquake records");
        }
        Commands::Schema => {
            let config = PipelineConfig::from_env();
            earthquake_db::open(&config.db_path)?;
            log::info!("Table 'earthquakes' is ready at {}", config.db_path.display());
        }
        Commands::Feeds => {
            println!("{:<24} NAME", "ID");
            println!("{}", "-".repeat(60));
            for feed in all_feeds() {
                println!("{:<24} {}", feed.id, feed.name);
            }
        }
        Commands::Trigger { url } => {
            match trigger(&reqwest::Client::new(), &url).await {
                Ok(TriggerOutcome::Completed(body)) => {
                    log::info!("Scheduled fetch completed: {body}");
                }
                Ok(TriggerOutcome::Skipped(body)) => {
                    log::info!("Scheduled fetch skipped, a cycle is already running: {body}");
                }
                Err(e) => {
                    log::error!("Error during scheduled fetch: {e}");
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
