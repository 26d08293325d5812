use crate::error::Result;
use serde_json::Value;

/// Named-record store for parsed results. The parsers never cache; callers
/// that want persistence go through this.
pub trait Storage: Send + Sync {
    fn save_record(&self, family: &str, key: &str, record: &Value) -> Result<()>;
    fn load_record(&self, family: &str, key: &str) -> Result<Option<Value>>;
    fn save_markup(&self, family: &str, key: &str, markup: &str) -> Result<()>;
}

pub struct StorageKeys;

impl StorageKeys {
    pub const MAIL_DIR: &'static str = "mail";
    pub const LEADERBOARDS_DIR: &'static str = "leaderboards";
    pub const ATTACHMENTS_DIR: &'static str = "attachments";
    pub const AVATARS_DIR: &'static str = "avatars";
}
