use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Every avatar is drawn on a 100px tall canvas.
pub const CANVAS_HEIGHT: i64 = 100;

const FILTER_ID: &str = "colorSelector";

/// Tint applied to the dark pixels of every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayColour {
    Gold,
    Red,
    #[default]
    Black,
}

impl OverlayColour {
    /// Picks the colour from an avatar div's class list: gold wins over red,
    /// anything else is black.
    pub fn from_classes<'a>(mut classes: impl Iterator<Item = &'a str> + Clone) -> Self {
        if classes.clone().any(|c| c == "gold") {
            OverlayColour::Gold
        } else if classes.any(|c| c == "red") {
            OverlayColour::Red
        } else {
            OverlayColour::Black
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayColour::Gold => "gold",
            OverlayColour::Red => "red",
            OverlayColour::Black => "black",
        }
    }
}

impl fmt::Display for OverlayColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarLayer {
    /// `src` as written in the page, kept for debugging.
    pub source_ref: String,
    /// Absolute URL the bytes came from.
    pub url: String,
    /// Empty when nothing could be fetched; the layer then links `url`.
    pub image_bytes: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    pub offset_top_px: i64,
    pub offset_left_px: i64,
    pub rotation_deg: i64,
    /// Set on the stand-in used when the first layer could not be fetched.
    pub synthetic: bool,
}

impl AvatarLayer {
    fn href(&self) -> String {
        if self.image_bytes.is_empty() {
            return self.url.clone();
        }

        let mime = image::guess_format(&self.image_bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or("image/png");
        format!("data:{};base64,{}", mime, STANDARD.encode(&self.image_bytes))
    }

    fn right_edge(&self) -> i64 {
        self.offset_left_px + i64::from(self.width_px)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarComposite {
    pub player_name: String,
    pub player_id: u64,
    pub overlay_colour: OverlayColour,
    /// Back to front, in page order.
    pub layers: Vec<AvatarLayer>,
}

impl AvatarComposite {
    pub fn canvas_width(&self) -> i64 {
        self.layers
            .iter()
            .map(AvatarLayer::right_edge)
            .max()
            .unwrap_or(0)
            .max(0)
    }

    pub fn to_svg(&self) -> String {
        let width = self.canvas_width();
        let mut svg = String::new();

        // Writing into a String cannot fail.
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = CANVAS_HEIGHT
        );
        let _ = write!(
            svg,
            "<title>{} (#{})</title>",
            html_escape::encode_text(&self.player_name),
            self.player_id
        );

        // Dark pixels become an opaque binary mask, the mask is filled with the
        // overlay colour and the result is laid back over the source.
        let _ = write!(
            svg,
            concat!(
                r#"<defs><filter id="{id}" color-interpolation-filters="sRGB">"#,
                r#"<feColorMatrix in="SourceGraphic" type="matrix" values="0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 -1 -1 -1 1 0" result="darkness"/>"#,
                r#"<feComponentTransfer in="darkness" result="mask"><feFuncA type="discrete" tableValues="0 1"/></feComponentTransfer>"#,
                r#"<feFlood flood-color="{colour}" result="flood"/>"#,
                r#"<feComposite in="flood" in2="mask" operator="in" result="tint"/>"#,
                r#"<feComposite in="tint" in2="SourceGraphic" operator="over"/>"#,
                r#"</filter></defs>"#
            ),
            id = FILTER_ID,
            colour = self.overlay_colour
        );

        let _ = write!(svg, r#"<g filter="url(#{})">"#, FILTER_ID);
        for layer in &self.layers {
            let centre_x = layer.offset_left_px as f64 + f64::from(layer.width_px) / 2.0;
            let centre_y = layer.offset_top_px as f64 + f64::from(layer.height_px) / 2.0;
            let _ = write!(
                svg,
                r#"<image x="{x}" y="{y}" width="{w}" height="{h}" transform="rotate({r} {cx} {cy})" title="{title}" href="{href}"/>"#,
                x = layer.offset_left_px,
                y = layer.offset_top_px,
                w = layer.width_px,
                h = layer.height_px,
                r = layer.rotation_deg,
                cx = centre_x,
                cy = centre_y,
                title = html_escape::encode_double_quoted_attribute(&layer.source_ref),
                href = html_escape::encode_double_quoted_attribute(&layer.href()),
            );
        }
        svg.push_str("</g></svg>");

        svg
    }
}
