//! Error types for gutenberg-dl
//!
//! Only conditions that abort the whole run live here. A single book that
//! fails to download is reported through [`crate::downloader::Failure`]
//! instead and never becomes an `Error`.

use thiserror::Error;

/// Result type alias for gutenberg-dl operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Network failure while talking to the leaderboard
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Output directory or report file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker task panicked
    #[error("worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The worker pool was closed while tasks were still queued
    #[error("worker pool closed: {0}")]
    Pool(#[from] tokio::sync::AcquireError),

    /// A CSS selector failed to compile
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
