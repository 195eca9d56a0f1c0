use std::path::PathBuf;

use clap::Args;

use crate::downloader::DownloadOptions;
use crate::error::Result;

pub const DEFAULT_BASE_URL: &str = "https://www.gutenberg.org";
pub const LEADERBOARD_PATH: &str = "/browse/scores/top";
pub const DEFAULT_LIMIT: usize = 100;
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_OUTPUT_DIR: &str = "archive";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    #[arg(long, global = true, help = "site root", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    #[arg(long, global = true, help = "max books to take from the leaderboard", default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,
    #[arg(
        short,
        long,
        global = true,
        help = "concurrent downloads",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = parse_concurrency
    )]
    pub concurrency: usize,
    #[arg(short, long, global = true, help = "output directory", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            concurrency: DEFAULT_CONCURRENCY,
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Settings {
    pub fn client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
    }

    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            base_url: self.base_url.clone(),
            output_dir: self.output.clone(),
            concurrency: self.concurrency,
        }
    }
}

// A zero-permit pool never runs anything.
fn parse_concurrency(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}
