use crate::error::{BotError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One item granted by an attachment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub id: u64,
    pub name: String,
    pub quantity: u64,
    /// Numeric description id from the item's click handler; empty when the
    /// handler is missing or does not match.
    pub description_ref: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailKind {
    Normal,
    Giftshop,
}

impl MailKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailKind::Normal => "normal",
            MailKind::Giftshop => "giftshop",
        }
    }
}

impl fmt::Display for MailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailKind {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(MailKind::Normal),
            "giftshop" => Ok(MailKind::Giftshop),
            other => Err(BotError::InvalidKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailParseResult {
    pub body_text: String,
    pub kind: MailKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valentine_ref: Option<String>,
    pub attachments: Vec<AttachmentRecord>,
    #[serde(default)]
    pub meat_amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inside_note: Option<String>,
}

impl MailParseResult {
    pub fn has_gifts(&self) -> bool {
        !self.attachments.is_empty() || self.meat_amount > 0
    }
}
