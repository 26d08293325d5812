use crate::error::{BotError, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

pub mod attachments;
pub mod avatar;
pub mod leaderboard;
pub mod mail;

/// Selectors shared by the extractors, compiled once.
pub struct Selectors {
    pub item_block: Selector,
    pub image: Selector,
    pub div: Selector,
    pub table: Selector,
    pub row: Selector,
    pub cell: Selector,
}

impl Selectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            item_block: parse(".item")?,
            image: parse("img")?,
            div: parse("div")?,
            table: parse("table")?,
            row: parse("tr")?,
            cell: parse("td")?,
        })
    }
}

fn parse(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| BotError::Selector(e.to_string()))
}

pub(crate) static SELECTORS: Lazy<Selectors> =
    Lazy::new(|| Selectors::new().expect("built-in selectors are valid CSS"));

/// Text of an element as one string.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect()
}
