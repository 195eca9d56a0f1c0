mod parser;

pub use parser::parse_leaderboard;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::LEADERBOARD_PATH;
use crate::error::Result;

/// One leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub title: String,
    pub author: String,
    /// Site-relative link, e.g. `/ebooks/1342`
    pub link: String,
}

/// The console line printed when the leaderboard page is not available.
pub fn retrieve_failed_line(status: u16) -> String {
    format!("Failed to retrieve data: {}", status)
}

/// Fetches the leaderboard page and returns at most `limit` records.
///
/// A non-success status is reported on stdout and yields an empty list.
/// Transport errors are returned.
pub async fn fetch_leaderboard(
    client: &reqwest::Client,
    base_url: &str,
    limit: usize,
) -> Result<Vec<Record>> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), LEADERBOARD_PATH);
    debug!(%url, "fetching leaderboard");

    let response = client.get(url.as_str()).send().await?;
    let status = response.status();
    if !status.is_success() {
        println!("{}", retrieve_failed_line(status.as_u16()));
        return Ok(Vec::new());
    }

    let body = response.text().await?;
    let records = parse_leaderboard(&body, limit)?;
    info!(count = records.len(), limit, "parsed leaderboard");
    Ok(records)
}
