use once_cell::sync::Lazy;
use regex::Regex;

/// Origin that serves every game-hosted image.
pub const ASSET_ORIGIN: &str = "https://d2uyhvukfffg5a.cloudfront.net";

/// Path prefixes the game used for images before they moved to the CDN.
const LEGACY_IMAGE_PREFIXES: [&str; 2] = ["/iii", "/images"];

/// Decodes HTML character entities (`&amp;`, `&quot;`, `&apos;`, numeric
/// references, ...). Call this last, after tags are gone.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Rewrites a legacy relative image path against [`ASSET_ORIGIN`].
pub fn resolve_image_url(src: &str) -> String {
    resolve_image_url_with(src, ASSET_ORIGIN)
}

/// Same as [`resolve_image_url`] with an explicit origin.
///
/// Absolute `http(s)://` URLs pass through, protocol-relative ones get
/// `https:`, and anything else that is not under a legacy prefix is left
/// alone.
pub fn resolve_image_url_with(src: &str, origin: &str) -> String {
    let src = src.trim();

    if src.starts_with("http://") || src.starts_with("https://") {
        return src.to_string();
    }
    if let Some(rest) = src.strip_prefix("//") {
        return format!("https://{}", rest);
    }

    for prefix in LEGACY_IMAGE_PREFIXES {
        if let Some(rest) = src.strip_prefix(prefix) {
            // "/imagesfoo" is not under "/images"
            if rest.is_empty() || rest.starts_with('/') {
                return format!("{}{}", origin.trim_end_matches('/'), rest);
            }
        }
    }

    src.to_string()
}

/// Parses an integer that may carry thousands separators ("5,000").
/// Absent or unparseable input is 0.
pub fn parse_number(text: &str) -> i64 {
    text.trim().replace(',', "").parse().unwrap_or(0)
}

/// Parses the leading integer of `text`, ignoring whatever follows it
/// ("12 turns" is 12). `None` when the text does not open with a number.
pub fn leading_int(text: &str) -> Option<i64> {
    static LEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

    LEADING
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_common_entities() {
        assert_eq!(
            decode_entities("Tom &amp; Jerry &quot;say&quot; it&apos;s &lt;fine&gt;"),
            "Tom & Jerry \"say\" it's <fine>"
        );
        assert_eq!(decode_entities("&#39;quoted&#39;"), "'quoted'");
    }

    #[test]
    fn legacy_prefixes_resolve_against_origin() {
        assert_eq!(
            resolve_image_url("/images/otherimages/nopic.gif"),
            format!("{}/otherimages/nopic.gif", ASSET_ORIGIN)
        );
        assert_eq!(
            resolve_image_url("/iii/adventureimages/knob.gif"),
            format!("{}/adventureimages/knob.gif", ASSET_ORIGIN)
        );
        assert_eq!(
            resolve_image_url_with("/images/a.gif", "https://cdn.test/"),
            "https://cdn.test/a.gif"
        );
    }

    #[test]
    fn absolute_and_unknown_urls_pass_through() {
        let absolute = "https://example.com/images/a.gif";
        assert_eq!(resolve_image_url(absolute), absolute);
        assert_eq!(resolve_image_url("http://x.test/a.png"), "http://x.test/a.png");
        assert_eq!(resolve_image_url("//x.test/a.png"), "https://x.test/a.png");
        assert_eq!(resolve_image_url("/imagesfoo/a.png"), "/imagesfoo/a.png");
        assert_eq!(resolve_image_url("otherimages/a.png"), "otherimages/a.png");
    }

    #[test]
    fn numbers_with_separators() {
        assert_eq!(parse_number("5,000"), 5000);
        assert_eq!(parse_number(" 1,234,567 "), 1234567);
        assert_eq!(parse_number(""), 0);
        assert_eq!(parse_number("lots"), 0);
    }

    #[test]
    fn leading_int_behaves_like_a_prefix_parse() {
        assert_eq!(leading_int("12 turns"), Some(12));
        assert_eq!(leading_int("  -3"), Some(-3));
        assert_eq!(leading_int("0"), Some(0));
        assert_eq!(leading_int("Jick"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}
