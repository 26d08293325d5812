use chrono::{TimeZone, Utc};
use kolbot::domain::{AttachmentRecord, MailKind, OverlayColour};
use kolbot::error::{BotError, Result};
use kolbot::infrastructure::ImageFetcher;
use kolbot::{extract_attachments, parse_leaderboard, parse_mail, AvatarCompositor};
use std::collections::HashMap;

const GIFTSHOP_MAIL: &str = include_str!("fixtures/giftshop_mail.html");
const VALENTINE_MAIL: &str = include_str!("fixtures/valentine_mail.html");
const LEADERBOARD: &str = include_str!("fixtures/leaderboard.html");
const LEADERBOARD_NESTED: &str = include_str!("fixtures/leaderboard_nested.html");
const PROFILE: &str = include_str!("fixtures/profile.html");

struct MapFetcher(HashMap<String, Vec<u8>>);

impl ImageFetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| BotError::Other(format!("404 {}", url)))
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbaImage::new(width, height)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn giftshop_mail_splits_notes_items_and_meat() {
    let result = parse_mail(GIFTSHOP_MAIL, MailKind::Giftshop);

    assert_eq!(result.body_text, "Happy birthday & many more!");
    assert_eq!(result.inside_note.as_deref(), Some("From your \"secret\" admirer"));
    assert_eq!(result.valentine_ref, None);
    assert_eq!(result.meat_amount, 1500);
    assert_eq!(
        result.attachments,
        vec![
            AttachmentRecord {
                id: 641,
                name: "toast".to_string(),
                quantity: 2,
                description_ref: "931984879".to_string(),
            },
            AttachmentRecord {
                id: 2429,
                name: "box of sunshine".to_string(),
                quantity: 1,
                description_ref: "555123".to_string(),
            },
        ]
    );
    assert!(result.has_gifts());
}

#[test]
fn giftshop_mail_read_as_normal_keeps_delimiter_out_of_note() {
    let result = parse_mail(GIFTSHOP_MAIL, MailKind::Normal);

    assert_eq!(result.body_text, "Happy birthday & many more!");
    assert_eq!(result.inside_note, None);
    assert_eq!(result.attachments.len(), 2);
}

#[test]
fn valentine_mail_reports_card_and_remaining_text() {
    let result = parse_mail(VALENTINE_MAIL, MailKind::Normal);

    assert_eq!(result.valentine_ref.as_deref(), Some("kiss"));
    assert_eq!(result.body_text, "Will you be mine?");
    assert!(!result.has_gifts());
}

#[test]
fn parsing_is_deterministic() {
    assert_eq!(
        parse_mail(GIFTSHOP_MAIL, MailKind::Giftshop),
        parse_mail(GIFTSHOP_MAIL, MailKind::Giftshop)
    );
    assert_eq!(parse_leaderboard(LEADERBOARD), parse_leaderboard(LEADERBOARD));
    assert_eq!(
        extract_attachments(GIFTSHOP_MAIL),
        extract_attachments(GIFTSHOP_MAIL)
    );
}

#[test]
fn attachments_of_a_whole_body() {
    let names: Vec<String> = extract_attachments(GIFTSHOP_MAIL)
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["toast", "box of sunshine"]);
}

#[test]
fn leaderboard_page() {
    let result = parse_leaderboard(LEADERBOARD);

    assert_eq!(result.title, "Leaderboards: Hardcore Standard Runs");

    let titles: Vec<&str> = result.boards.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Fastest Hardcore Standard Runs", "Most Goo Gathered"]);

    let fastest = &result.boards[0];
    assert_eq!(fastest.runs.len(), 2);
    assert_eq!(fastest.runs[0].player_label, "Jick");
    assert_eq!(fastest.runs[0].secondary_metric, "3");
    assert_eq!(fastest.runs[0].primary_metric, "1,024");
    assert_eq!(fastest.runs[1].player_label, "Mr. Skullhead");
    assert_eq!(
        fastest.last_updated,
        Utc.with_ymd_and_hms(2024, 3, 5, 1, 2, 3).single()
    );

    let goo = &result.boards[1];
    assert_eq!(goo.runs[0].player_label, "Hank");
    assert_eq!(goo.runs[0].secondary_metric, "");
    assert_eq!(goo.runs[0].primary_metric, "77");
    assert_eq!(goo.runs[1].primary_metric, "0");
    assert_eq!(goo.last_updated, None);
}

#[test]
fn leaderboard_with_boards_inside_the_container() {
    let result = parse_leaderboard(LEADERBOARD_NESTED);

    assert_eq!(result.title, "Leaderboards: Softcore Runs");

    let titles: Vec<&str> = result.boards.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Best Softcore Runs", "Funniest Runs"]);

    let best = &result.boards[0];
    let players: Vec<&str> = best.runs.iter().map(|r| r.player_label.as_str()).collect();
    assert_eq!(players, vec!["Jick", "Hank"]);
    assert_eq!(best.runs[0].secondary_metric, "2");
    assert_eq!(best.runs[0].primary_metric, "640");
    assert_eq!(
        best.last_updated,
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single()
    );

    let funniest = &result.boards[1];
    assert_eq!(funniest.runs.len(), 1);
    assert_eq!(funniest.runs[0].player_label, "Clown");
    assert_eq!(funniest.runs[0].primary_metric, "12");
}

#[tokio::test]
async fn profile_avatar_as_svg() {
    let fetcher = MapFetcher(HashMap::from([
        (
            "https://d2uyhvukfffg5a.cloudfront.net/otherimages/classav1_f.gif".to_string(),
            png(60, 100),
        ),
        (
            "https://d2uyhvukfffg5a.cloudfront.net/adventureimages/hat.gif".to_string(),
            png(30, 30),
        ),
    ]));
    let compositor = AvatarCompositor::new(fetcher);

    let composite = compositor.compose(PROFILE).await.unwrap();
    assert_eq!(composite.player_name, "Jick & Co");
    assert_eq!(composite.player_id, 1);
    assert_eq!(composite.overlay_colour, OverlayColour::Gold);
    assert_eq!(composite.layers.len(), 2);
    assert_eq!(composite.layers[1].offset_top_px, -8);
    assert_eq!(composite.layers[1].rotation_deg, 12);
    assert_eq!(composite.canvas_width(), 70);

    let svg = composite.to_svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains("<title>Jick &amp; Co (#1)</title>"));
    assert!(svg.contains(r#"flood-color="gold""#));
    assert_eq!(svg.matches("<image ").count(), 2);
    assert!(svg.contains("data:image/png;base64,"));
}

#[tokio::test]
async fn pages_without_an_avatar_have_no_svg() {
    let compositor = AvatarCompositor::new(MapFetcher(HashMap::new()));

    assert_eq!(compositor.generate(LEADERBOARD).await, None);
    assert_eq!(compositor.generate("").await, None);
}
