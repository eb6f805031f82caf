use chrono::{DateTime, Utc};
use shared::LeaderboardEntry;
use sqlx::types::Json;

/// Snapshot of the last successful refresh stored under `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub key: String,
    pub data: Vec<LeaderboardEntry>,
    pub last_updated: DateTime<Utc>,
}

impl CacheRecord {
    pub fn new(key: &str, data: Vec<LeaderboardEntry>, last_updated: DateTime<Utc>) -> Self {
        Self {
            key: key.to_string(),
            data,
            last_updated,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.last_updated
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        self.age(now) < ttl
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CacheRecordRow {
    pub key: String,
    pub data: Json<Vec<LeaderboardEntry>>,
    pub last_updated: DateTime<Utc>,
}

impl From<CacheRecordRow> for CacheRecord {
    fn from(row: CacheRecordRow) -> Self {
        Self {
            key: row.key,
            data: row.data.0,
            last_updated: row.last_updated,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryRecord {
    pub position: i32,
    pub username: String,
    pub prs: i32,
    pub contributions: i32,
    pub avatar: String,
    pub profile_url: String,
    pub points: i64,
    pub progress: i32,
}

impl From<EntryRecord> for LeaderboardEntry {
    fn from(record: EntryRecord) -> Self {
        Self {
            username: record.username,
            prs: record.prs as u32,
            contributions: record.contributions as u32,
            avatar: record.avatar,
            profile_url: record.profile_url,
            points: record.points as u64,
            progress: record.progress as u32,
        }
    }
}
