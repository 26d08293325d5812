//! Avatar composition.
//!
//! A profile page draws the character as a stack of absolutely positioned
//! `<img>` layers inside one `<div>`. This module carves that block out of
//! the raw page, reads each layer's offsets and rotation, fetches the layer
//! images and lays them out again as a single SVG.
//!
//! Layer fetches run one after another in page order. Only the first layer
//! is essential: if it cannot be fetched a "no picture" stand-in of known
//! size takes its place, while any later layer that fails is dropped.

use super::SELECTORS;
use crate::domain::{AvatarComposite, AvatarLayer, OverlayColour};
use crate::error::Result;
use crate::infrastructure::{measure_image, ImageFetcher};
use crate::utils::{decode_entities, resolve_image_url_with, ASSET_ORIGIN};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::{debug, info, warn};

/// Stand-in drawn when the base layer is unavailable.
pub const NO_PICTURE: &str = "/images/otherimages/nopic.gif";
pub const NO_PICTURE_WIDTH: u32 = 60;
pub const NO_PICTURE_HEIGHT: u32 = 100;

/// The avatar cell, followed by the cell holding `<b>Name</b> (#id)`.
static AVATAR_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<td[^>]*>\s*(<div[^>]*>.*?</div>)\s*</td>\s*<td[^>]*>\s*(?:<center>\s*)?<b>([^<]+)</b>\s*\(#(\d+)\)",
    )
    .unwrap()
});

static TOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:^|[;\s])top\s*:\s*(-?\d+)").unwrap());
static LEFT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(?:^|[;\s])left\s*:\s*(-?\d+)").unwrap());
static ROTATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)rotate\(\s*(-?\d+)").unwrap());

/// What the header pattern captured from the raw page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarHeader {
    pub block: String,
    pub name: String,
    pub id: u64,
}

/// A layer as described by the markup, before any image is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSpec {
    pub source_ref: String,
    pub offset_top_px: i64,
    pub offset_left_px: i64,
    pub rotation_deg: i64,
}

pub fn parse_avatar_header(profile_page: &str) -> Option<AvatarHeader> {
    let caps = AVATAR_HEADER.captures(profile_page)?;

    Some(AvatarHeader {
        block: caps.get(1)?.as_str().to_string(),
        name: decode_entities(caps.get(2)?.as_str().trim()),
        id: caps.get(3)?.as_str().parse().ok()?,
    })
}

/// Overlay colour and layer list of an avatar block. `None` when the block
/// holds no `<div>`.
pub fn parse_layer_specs(block: &str) -> Option<(OverlayColour, Vec<LayerSpec>)> {
    let fragment = Html::parse_fragment(block);
    let div = fragment.select(&SELECTORS.div).next()?;

    let classes: Vec<&str> = div.value().classes().collect();
    let colour = OverlayColour::from_classes(classes.iter().copied());

    let specs = div
        .select(&SELECTORS.image)
        .filter_map(|img| {
            let src = img.value().attr("src").map(str::trim).filter(|s| !s.is_empty())?;
            let style = img.value().attr("style").unwrap_or("");

            Some(LayerSpec {
                source_ref: src.to_string(),
                offset_top_px: style_px(&TOP, style),
                offset_left_px: style_px(&LEFT, style),
                rotation_deg: style_px(&ROTATE, style),
            })
        })
        .collect();

    Some((colour, specs))
}

fn style_px(pattern: &Regex, style: &str) -> i64 {
    pattern
        .captures(style)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

pub struct AvatarCompositor<F> {
    fetcher: F,
    asset_origin: String,
}

impl<F: ImageFetcher> AvatarCompositor<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            asset_origin: ASSET_ORIGIN.to_string(),
        }
    }

    pub fn with_asset_origin(mut self, asset_origin: impl Into<String>) -> Self {
        self.asset_origin = asset_origin.into();
        self
    }

    /// Composite SVG for a profile page, or `None` if it has no avatar.
    pub async fn generate(&self, profile_page: &str) -> Option<String> {
        self.compose(profile_page)
            .await
            .map(|composite| composite.to_svg())
    }

    pub async fn compose(&self, profile_page: &str) -> Option<AvatarComposite> {
        let Some(header) = parse_avatar_header(profile_page) else {
            debug!("No avatar block on page");
            return None;
        };
        let (overlay_colour, specs) = parse_layer_specs(&header.block)?;

        let mut layers = Vec::with_capacity(specs.len());
        for (index, spec) in specs.into_iter().enumerate() {
            let url = resolve_image_url_with(&spec.source_ref, &self.asset_origin);

            match self.load(&url).await {
                Ok((image_bytes, width_px, height_px)) => layers.push(AvatarLayer {
                    source_ref: spec.source_ref,
                    url,
                    image_bytes,
                    width_px,
                    height_px,
                    offset_top_px: spec.offset_top_px,
                    offset_left_px: spec.offset_left_px,
                    rotation_deg: spec.rotation_deg,
                    synthetic: false,
                }),
                Err(e) if index == 0 => {
                    warn!("Base layer {} unavailable ({}), using stand-in", url, e);
                    layers.push(self.stand_in(&spec).await);
                }
                Err(e) => {
                    warn!("Dropping avatar layer {}: {}", url, e);
                }
            }
        }

        info!(
            "Composed avatar for {} (#{}) with {} layers",
            header.name,
            header.id,
            layers.len()
        );

        Some(AvatarComposite {
            player_name: header.name,
            player_id: header.id,
            overlay_colour,
            layers,
        })
    }

    async fn load(&self, url: &str) -> Result<(Vec<u8>, u32, u32)> {
        let bytes = self.fetcher.fetch(url).await?;
        let (width, height) = measure_image(&bytes)?;
        Ok((bytes, width, height))
    }

    /// The stand-in has a fixed size, so its bytes are never measured. If
    /// even those cannot be fetched the layer links the URL instead.
    async fn stand_in(&self, spec: &LayerSpec) -> AvatarLayer {
        let url = resolve_image_url_with(NO_PICTURE, &self.asset_origin);
        let image_bytes = match self.fetcher.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Stand-in image {} unavailable: {}", url, e);
                Vec::new()
            }
        };

        AvatarLayer {
            source_ref: NO_PICTURE.to_string(),
            url,
            image_bytes,
            width_px: NO_PICTURE_WIDTH,
            height_px: NO_PICTURE_HEIGHT,
            offset_top_px: spec.offset_top_px,
            offset_left_px: spec.offset_left_px,
            rotation_deg: spec.rotation_deg,
            synthetic: true,
        }
    }
}
