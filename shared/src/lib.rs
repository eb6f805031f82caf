mod leaderboard;

#[cfg(feature = "client")]
pub mod github;

pub use leaderboard::*;

/// Key of the singleton cache record holding the ranked leaderboard.
pub const LEADERBOARD_KEY: &str = "leaderboard";
