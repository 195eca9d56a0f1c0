use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};
use crate::leaderboard::Record;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

const ITEM_SELECTOR: &str = "ol li";
const TITLE_SELECTOR: &str = "a";
const AUTHOR_SELECTOR: &str = "span.subtitle";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| Error::Selector {
        selector: css.to_string(),
        message: err.to_string(),
    })
}

fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts at most `limit` records from a leaderboard page, in document
/// order. Items without a titled, linked anchor are skipped.
pub fn parse_leaderboard(html: &str, limit: usize) -> Result<Vec<Record>> {
    let item_sel = selector(ITEM_SELECTOR)?;
    let title_sel = selector(TITLE_SELECTOR)?;
    let author_sel = selector(AUTHOR_SELECTOR)?;

    let document = Html::parse_document(html);

    let records = document
        .select(&item_sel)
        .filter_map(|item| {
            let anchor = item.select(&title_sel).next()?;
            let link = anchor.value().attr("href")?.trim();
            let title = trimmed_text(anchor);
            if link.is_empty() || title.is_empty() {
                return None;
            }

            let author = item
                .select(&author_sel)
                .next()
                .map(trimmed_text)
                .filter(|author| !author.is_empty())
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

            Some(Record {
                title,
                author,
                link: link.to_string(),
            })
        })
        .take(limit)
        .collect();

    Ok(records)
}
