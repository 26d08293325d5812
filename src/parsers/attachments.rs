use super::SELECTORS;
use crate::domain::AttachmentRecord;
use crate::utils::parse_number;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::collections::HashMap;
use tracing::{debug, warn};
use url::form_urlencoded;

static DESCRIPTION_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"descitem\((\d+)").unwrap());

/// Extracts every item block in `fragment`, in document order.
pub fn extract_attachments(fragment: &str) -> Vec<AttachmentRecord> {
    let document = Html::parse_fragment(fragment);

    document
        .select(&SELECTORS.item_block)
        .map(parse_item_block)
        .collect()
}

fn parse_item_block(block: ElementRef) -> AttachmentRecord {
    let params: HashMap<String, String> = block
        .value()
        .attr("rel")
        .map(|rel| form_urlencoded::parse(rel.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let id = params
        .get("id")
        .and_then(|id| id.trim().parse::<u64>().ok())
        .unwrap_or_else(|| {
            warn!("Item block without a usable id: {:?}", params.get("id"));
            0
        });

    let quantity = match params.get("n").map(|n| parse_number(n)) {
        Some(n) if n >= 1 => n as u64,
        _ => 1,
    };

    let image = block.select(&SELECTORS.image).next();

    let name = image
        .and_then(|img| img.value().attr("title").or_else(|| img.value().attr("alt")))
        .map(|name| name.trim().to_string())
        .unwrap_or_default();

    let description_ref = image
        .and_then(|img| img.value().attr("onclick"))
        .and_then(|handler| DESCRIPTION_REF.captures(handler))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    if description_ref.is_empty() {
        debug!("No description reference for item {} ({})", id, name);
    }

    AttachmentRecord {
        id,
        name,
        quantity,
        description_ref,
    }
}
