use shared::github::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("Failed to access leaderboard storage: {0}")]
    Persistence(#[from] sqlx::Error),
}
