//! Command-line dashboard for the pricewatch comparison engine.

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pricewatch_analytics::{aggregate, AlertReport, AlertSink, Delivery, LogFileSink};
use pricewatch_compare::{classify, search, top_alerts};
use pricewatch_core::{Config, PriceStatus};
use pricewatch_store::{delete_database, read_csv_path, RecordStore, SqliteStore};

#[derive(Parser)]
#[command(name = "pricewatch", about = "Compare our prices against competitors")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path (overrides the configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import price records from a CSV file
    Import { csv: PathBuf },
    /// Show every product with its comparison status
    Table,
    /// Show dashboard statistics and the top price-drop alerts
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search by product or competitor name
    Search {
        term: String,
        /// Only products where the competitor is cheaper
        #[arg(long, conflicts_with = "cheaper")]
        undercut: bool,
        /// Only products where we are cheaper
        #[arg(long)]
        cheaper: bool,
    },
    /// Preview current price alerts and optionally deliver them
    Alerts {
        /// Recipient address (defaults to the configured one)
        #[arg(long)]
        recipient: Option<String>,
        /// Deliver the report through the alert log
        #[arg(long)]
        send: bool,
    },
    /// Delete the database
    Reset,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricewatch=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(db) = &cli.db {
        config.storage.db_path = db.clone();
    }
    Ok(config)
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = &config.storage.db_path;
    SqliteStore::open(path).with_context(|| format!("opening database {}", path.display()))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Import { csv } => {
            let mut store = open_store(&config)?;
            let records = read_csv_path(&csv)
                .with_context(|| format!("reading {}", csv.display()))?;
            store.save_records(&records)?;
            println!("Data saved successfully ({} records)", records.len());
        }
        Command::Table => {
            let store = open_store(&config)?;
            let classified = classify(&store.load_all_records()?);
            if classified.is_empty() {
                println!("No data available. Please upload data first.");
            } else {
                print!("{}", render::price_table(&classified));
            }
        }
        Command::Stats { json } => {
            let store = open_store(&config)?;
            let records = store.load_all_records()?;
            let classified = classify(&records);
            let stats = aggregate(&classified);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else if classified.is_empty() {
                println!("No data available. Please upload data first.");
            } else {
                print!("{}", render::dashboard(&stats, store.last_update_date()?));
                println!();
                let top = top_alerts(&classified, config.dashboard.top_alerts);
                if top.is_empty() {
                    println!("No price drop alerts currently!");
                } else {
                    println!("Top Price Drop Alerts");
                    print!("{}", render::alert_table(&top));
                }
            }
        }
        Command::Search {
            term,
            undercut,
            cheaper,
        } => {
            let store = open_store(&config)?;
            let classified = classify(&store.load_all_records()?);
            let mut hits = search(&classified, &term);
            if undercut {
                hits.retain(|c| c.status == PriceStatus::Alert);
            } else if cheaper {
                hits.retain(|c| c.status == PriceStatus::Good);
            }

            if hits.is_empty() {
                println!("No results found for '{}'", term);
            } else {
                println!("Found {} results:", hits.len());
                print!("{}", render::price_table(hits));
            }
        }
        Command::Alerts { recipient, send } => {
            let store = open_store(&config)?;
            let classified = classify(&store.load_all_records()?);
            let report = AlertReport::from_classified(&classified, chrono::Local::now().naive_local());

            if report.is_empty() {
                println!("No current price alerts!");
                return Ok(());
            }

            println!("{} products have competitor prices lower than ours:", report.len());
            let alerts = top_alerts(&classified, classified.len());
            print!("{}", render::alert_table(&alerts));

            if send {
                let recipient = recipient.unwrap_or_else(|| config.alerts.recipient.clone());
                let sink = LogFileSink::from_config(&config.alerts);
                match sink.deliver(&report, &recipient)? {
                    Delivery::Logged { path } => {
                        info!(sender = %config.alerts.sender, "alert delivery is log-only");
                        println!("Alert logged to {}", path.display());
                    }
                    Delivery::Skipped => println!("No price alerts to send."),
                }
            }
        }
        Command::Reset => {
            if delete_database(&config.storage.db_path)? {
                println!("Database deleted successfully.");
            } else {
                println!("Database file not found.");
            }
        }
    }

    Ok(())
}
