use super::{element_text, SELECTORS};
use crate::domain::{LeaderboardResult, RunRecord, SubboardResult};
use crate::utils::{collapse_whitespace, leading_int};
use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use tracing::{debug, info};

/// Sub-board titles start with one of these. First letter is exact, the rest
/// is case-insensitive.
static BOARD_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:F(?i:ast|unn)|B(?i:est)|M(?i:ost goo|ost elf))").unwrap()
});

/// Header rows at the top of every run table.
const HEADER_ROWS: usize = 2;

/// The update comment reads `<!-- updated: TIMESTAMP -->`; the timestamp
/// sits between these offsets of the comment body.
const COMMENT_PREFIX_CHARS: usize = 10;
const COMMENT_SUFFIX_CHARS: usize = 1;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

pub fn parse_leaderboard(page: &str) -> LeaderboardResult {
    let document = Html::parse_document(page);
    let mut tables = document.select(&SELECTORS.table);

    let Some(container) = tables.next() else {
        debug!("Leaderboard page has no tables");
        return LeaderboardResult {
            title: String::new(),
            boards: Vec::new(),
        };
    };

    let title = direct_rows(container)
        .first()
        .map(|row| collapse_whitespace(&element_text(row)))
        .unwrap_or_default();

    // The table right after the container is page furniture, never a board.
    let boards: Vec<SubboardResult> = tables
        .skip(1)
        .filter_map(|table| {
            let rows = direct_rows(table);
            if rows.len() <= 1 {
                return None;
            }
            let board_title = collapse_whitespace(&element_text(&rows[0]));
            if !BOARD_TITLE.is_match(&board_title) {
                return None;
            }
            Some(parse_subboard(table, board_title))
        })
        .collect();

    info!("Parsed leaderboard '{}' with {} boards", title, boards.len());

    LeaderboardResult { title, boards }
}

fn parse_subboard(table: ElementRef, title: String) -> SubboardResult {
    let runs: Vec<RunRecord> = run_rows(table)
        .into_iter()
        .skip(HEADER_ROWS)
        .filter_map(parse_run)
        .collect();

    let last_updated = table.next_sibling().and_then(|node| match node.value() {
        Node::Comment(comment) => parse_update_comment(comment),
        _ => None,
    });

    debug!("Board '{}': {} runs, updated {:?}", title, runs.len(), last_updated);

    SubboardResult {
        title,
        runs,
        last_updated,
    }
}

fn parse_run(row: ElementRef) -> Option<RunRecord> {
    let cells: Vec<String> = row
        .select(&SELECTORS.cell)
        .map(|cell| {
            element_text(&cell)
                .replace("&amp;nbsp;", "")
                .replace("&nbsp;", "")
                .trim()
                .to_string()
        })
        .collect();

    let (primary, rest) = cells.split_last()?;

    // A numeric second-to-last cell means the board has a secondary column.
    let has_secondary = rest
        .last()
        .and_then(|cell| leading_int(cell))
        .is_some_and(|n| n != 0);

    let (label_cells, secondary) = if has_secondary {
        let (secondary, label_cells) = rest.split_last()?;
        (label_cells, secondary.clone())
    } else {
        (rest, String::new())
    };

    let primary = if primary.is_empty() {
        "0".to_string()
    } else {
        primary.clone()
    };

    Some(RunRecord {
        player_label: label_cells.concat().trim().to_string(),
        primary_metric: primary,
        secondary_metric: secondary,
    })
}

/// Rows that belong to `table` itself rather than to a table nested in it.
fn direct_rows(table: ElementRef) -> Vec<ElementRef> {
    table
        .select(&SELECTORS.row)
        .filter(|row| owning_table(row) == Some(table))
        .collect()
}

/// Rows of the run tables sitting one level inside `table`. Rows of `table`
/// itself and of any table around it are left out.
fn run_rows(table: ElementRef) -> Vec<ElementRef> {
    table
        .select(&SELECTORS.row)
        .filter(|row| {
            owning_table(row).and_then(|inner| owning_table(&inner)) == Some(table)
        })
        .collect()
}

fn owning_table<'a>(row: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "table")
}

fn parse_update_comment(comment: &str) -> Option<DateTime<Utc>> {
    let chars: Vec<char> = comment.chars().collect();
    if chars.len() <= COMMENT_PREFIX_CHARS + COMMENT_SUFFIX_CHARS {
        return None;
    }
    let stamp: String = chars[COMMENT_PREFIX_CHARS..chars.len() - COMMENT_SUFFIX_CHARS]
        .iter()
        .collect();

    parse_timestamp(stamp.trim())
}

fn parse_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(stamp) {
        return Some(parsed.with_timezone(&Utc));
    }

    let parsed = TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(stamp, format).ok())
        .map(|naive| naive.and_utc());

    if parsed.is_none() {
        debug!("Unrecognised leaderboard timestamp: {:?}", stamp);
    }
    parsed
}
