use super::attachments::extract_attachments;
use crate::domain::{MailKind, MailParseResult};
use crate::utils::{decode_entities, parse_number};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Any normal mail opening with this is a valentine card, whatever follows.
const VALENTINE_OPENING: &str = "<center><table>";
const VALENTINE_CLOSING: &str = "</center>";
const VALENTINE_FALLBACK: &str = "unknown";

const INSIDE_NOTE_DELIMITER: &str = "<p>Inside Note:<p>";

static VALENTINE_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)src\s*=\s*["']?(?:[^"'\s>]*/)?([\w-]+)\.gif"#).unwrap()
});

static MEAT_GAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"You (?:gain|acquire) (?:<b>)?(\d[\d,]*)(?:</b>)? Meat").unwrap()
});

/// Splits a raw mail body into its note text, the optional gift-shop inside
/// note, attached items and meat.
pub fn parse_mail(raw_body: &str, kind: MailKind) -> MailParseResult {
    let mut remaining = raw_body;
    let mut valentine_ref = None;

    let (outside, inside) = match kind {
        MailKind::Normal => {
            if raw_body.starts_with(VALENTINE_OPENING) {
                let header_end = raw_body
                    .find(VALENTINE_CLOSING)
                    .map(|i| i + VALENTINE_CLOSING.len())
                    .unwrap_or(raw_body.len());
                let header = &raw_body[..header_end];

                let card = VALENTINE_IMAGE
                    .captures(header)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| VALENTINE_FALLBACK.to_string());
                debug!("Valentine card: {}", card);

                valentine_ref = Some(card);
                remaining = &raw_body[header_end..];
            }
            (remaining, None)
        }
        MailKind::Giftshop => match remaining.split_once(INSIDE_NOTE_DELIMITER) {
            Some((outside, inside)) => (outside, Some(inside)),
            None => (remaining, None),
        },
    };

    let (outside_note, outside_markup) = split_note(outside);
    let (inside_note, inside_markup) = match inside.map(split_note) {
        Some((note, markup)) => (Some(note), markup),
        None => (None, ""),
    };

    let markup = format!("{}{}", outside_markup, inside_markup);
    let (attachments, meat_amount) = if markup.is_empty() {
        (Vec::new(), 0)
    } else {
        (extract_attachments(&markup), scan_meat(&markup))
    };

    MailParseResult {
        body_text: decode_entities(outside_note),
        kind,
        valentine_ref,
        attachments,
        meat_amount,
        inside_note: inside_note.map(decode_entities),
    }
}

/// Everything before the first tag is the note, the rest is attachment
/// markup.
fn split_note(text: &str) -> (&str, &str) {
    match text.find('<') {
        Some(i) => text.split_at(i),
        None => (text, ""),
    }
}

/// First "You gain/acquire N Meat" in the markup, 0 when there is none.
fn scan_meat(markup: &str) -> u64 {
    MEAT_GAIN
        .captures(markup)
        .and_then(|caps| caps.get(1))
        .map(|m| parse_number(m.as_str()).max(0) as u64)
        .unwrap_or(0)
}
