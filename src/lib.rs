//! HTML extraction for a Kingdom of Loathing chat bot: mail bodies, item
//! attachments, leaderboards and player avatars.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod parsers;
pub mod services;
pub mod utils;

pub use error::{BotError, Result};
pub use parsers::attachments::extract_attachments;
pub use parsers::avatar::AvatarCompositor;
pub use parsers::leaderboard::parse_leaderboard;
pub use parsers::mail::parse_mail;
