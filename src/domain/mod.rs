mod avatar;
mod leaderboard;
mod mail;
pub(crate) mod storage;

pub use avatar::{AvatarComposite, AvatarLayer, OverlayColour, CANVAS_HEIGHT};
pub use leaderboard::{LeaderboardResult, RunRecord, SubboardResult};
pub use mail::{AttachmentRecord, MailKind, MailParseResult};
pub use storage::{Storage, StorageKeys};
