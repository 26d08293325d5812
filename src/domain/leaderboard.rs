use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResult {
    pub title: String,
    pub boards: Vec<SubboardResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubboardResult {
    pub title: String,
    pub runs: Vec<RunRecord>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// A ranked row. The parser only knows "last numeric column" (primary) and
/// "the one before it, if numeric" (secondary); on the live boards these are
/// turns and days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub player_label: String,
    pub primary_metric: String,
    pub secondary_metric: String,
}
