use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

mod config;
use config::Settings;

mod error;

mod leaderboard;
use leaderboard::{Record, fetch_leaderboard};

mod downloader;
use downloader::{Outcome, Report, download_all};

mod utils;

#[derive(Parser)]
#[command(name = "gutenberg-dl")]
#[command(about = "Download the most popular Project Gutenberg books as plain text")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    settings: Settings,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Fetch the leaderboard and download every book (default)
    Download {
        #[arg(long, help = "write a JSON report of every download")]
        report: Option<PathBuf>,
    },
    /// Print the leaderboard without downloading
    List {
        #[arg(long, help = "print records as JSON")]
        json: bool,
    },
}

fn print_records(records: &[Record]) {
    for (rank, record) in records.iter().enumerate() {
        println!(
            "{}. {} by {} ({})",
            rank + 1,
            record.title,
            record.author,
            record.link
        );
    }
}

fn pretty_json<T: serde::Serialize>(value: &T) -> error::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn write_report(path: &Path, report: &Report) -> error::Result<()> {
    tokio::fs::write(path, pretty_json(report)?).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gutenberg_dl=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;
    let client = settings.client()?;

    let records = fetch_leaderboard(&client, &settings.base_url, settings.limit).await?;

    match cli.command.unwrap_or(Commands::Download { report: None }) {
        Commands::List { json } => {
            if json {
                println!("{}", pretty_json(&records)?);
            } else {
                print_records(&records);
            }
        }
        Commands::Download { report } => {
            let result = download_all(&client, &records, &settings.download_options()).await?;
            for outcome in result.outcomes.iter() {
                if let Outcome::Failed { reason, .. } = outcome {
                    debug!(title = outcome.title(), %reason, "not saved");
                }
            }
            if let Some(path) = report {
                write_report(&path, &result).await?;
            }
        }
    }

    Ok(())
}
