use std::path::{Path, PathBuf};

use crate::leaderboard::Record;
use crate::utils::sanitize::sanitize_title;

pub const TEXT_SUFFIX: &str = ".txt.utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Download {
        title: String,
        url: String,
        path: PathBuf,
    },
    MakeDir {
        path: PathBuf,
    },
}

/// Plain-text URL for a leaderboard link. Absolute links are kept as-is.
pub fn text_url(base_url: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        format!("{}{}", link, TEXT_SUFFIX)
    } else {
        format!("{}{}{}", base_url.trim_end_matches('/'), link, TEXT_SUFFIX)
    }
}

pub fn text_path(output_dir: &Path, title: &str) -> PathBuf {
    output_dir.join(format!("{}.txt", sanitize_title(title)))
}

pub struct Planer<'a> {
    base_url: &'a str,
    output_dir: &'a Path,
}

impl<'a> Planer<'a> {
    pub fn new(base_url: &'a str, output_dir: &'a Path) -> Self {
        Planer {
            base_url,
            output_dir,
        }
    }

    /// The output directory first, then one download per record in order.
    pub fn plan(&self, records: &[Record]) -> Vec<Action> {
        let mut result = Vec::with_capacity(records.len() + 1);
        result.push(Action::MakeDir {
            path: self.output_dir.to_path_buf(),
        });

        for record in records {
            result.push(Action::Download {
                title: record.title.clone(),
                url: text_url(self.base_url, &record.link),
                path: text_path(self.output_dir, &record.title),
            });
        }

        result
    }
}
