use serde::{Deserialize, Serialize};
use shared::LeaderboardEntry;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryResponse {
    pub username: String,
    pub prs: u32,
    pub contributions: u32,
    pub avatar: String,
    pub profile_url: String,
    pub points: u64,
    pub progress: u32,
}

impl From<LeaderboardEntry> for LeaderboardEntryResponse {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            username: entry.username,
            prs: entry.prs,
            contributions: entry.contributions,
            avatar: entry.avatar,
            profile_url: entry.profile_url,
            points: entry.points,
            progress: entry.progress,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub success: bool,
    pub data: Vec<LeaderboardEntryResponse>,
}

impl LeaderboardResponse {
    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        Self {
            success: true,
            data: entries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl ToString) -> Self {
        Self {
            success: false,
            error: error.to_string(),
        }
    }
}
