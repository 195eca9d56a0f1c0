mod executor;
mod planer;

use planer::Planer;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::leaderboard::Record;

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub concurrency: usize,
}

/// Why a single book was not saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Failure {
    /// Server answered with something other than 200
    #[error("{0}")]
    Status(u16),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Io(String),
}

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        Failure::Transport(err.to_string())
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Failure::Io(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Downloaded {
        title: String,
        path: PathBuf,
        bytes: usize,
    },
    Failed {
        title: String,
        reason: Failure,
    },
}

impl Outcome {
    pub fn title(&self) -> &str {
        match self {
            Outcome::Downloaded { title, .. } | Outcome::Failed { title, .. } => title,
        }
    }

    pub fn is_downloaded(&self) -> bool {
        matches!(self, Outcome::Downloaded { .. })
    }
}

/// The console line printed when a download finishes.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Downloaded { title, .. } => write!(f, "Downloaded: {}", title),
            Outcome::Failed { title, reason } => write!(f, "Failed to download {}: {}", title, reason),
        }
    }
}

/// Per-book outcomes of one run, in leaderboard order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn downloaded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_downloaded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.downloaded()
    }
}

/// Downloads every record's text into `options.output_dir`, at most
/// `options.concurrency` at a time, and waits for all of them.
pub async fn download_all(
    client: &reqwest::Client,
    records: &[Record],
    options: &DownloadOptions,
) -> Result<Report> {
    let actions = Planer::new(&options.base_url, &options.output_dir).plan(records);
    info!(
        books = records.len(),
        concurrency = options.concurrency,
        output = %options.output_dir.display(),
        "starting downloads"
    );

    let outcomes = executor::execute_actions(client, actions, options.concurrency).await?;
    let report = Report { outcomes };
    info!(
        downloaded = report.downloaded(),
        failed = report.failed(),
        "downloads finished"
    );
    Ok(report)
}
