use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const POINTS_PER_PR: u64 = 10;

/// A row of the `/contributors` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub contributions: u32,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestAuthor {
    pub login: Option<String>,
}

/// A row of the `/pulls` listing. Only the author is relevant for ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub user: Option<PullRequestAuthor>,
}

impl PullRequest {
    pub fn author_login(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.login.as_deref())
            .filter(|login| !login.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub prs: u32,
    pub contributions: u32,
    pub avatar: String,
    pub profile_url: String,
    pub points: u64,
    pub progress: u32,
}

pub fn points(prs: u32, contributions: u32) -> u64 {
    prs as u64 * POINTS_PER_PR + contributions as u64
}

/// Percentage of `max_points`, rounded half-up.
pub fn progress(points: u64, max_points: u64) -> u32 {
    let max_points = max_points.max(1);
    ((points * 200 + max_points) / (max_points * 2)) as u32
}

pub fn count_prs_by_author(pull_requests: &[PullRequest]) -> HashMap<String, u32> {
    pull_requests
        .iter()
        .filter_map(PullRequest::author_login)
        .counts()
        .into_iter()
        .map(|(login, count)| (login.to_string(), count as u32))
        .collect()
}

/// Builds the full leaderboard batch, ordered by descending points.
/// Contributors with equal points keep the order the source returned them in.
pub fn rank_contributors(
    contributors: Vec<Contributor>,
    pull_requests: &[PullRequest],
) -> Vec<LeaderboardEntry> {
    let prs_by_author = count_prs_by_author(pull_requests);

    let mut entries: Vec<LeaderboardEntry> = contributors
        .into_iter()
        .map(|contributor| {
            let prs = prs_by_author
                .get(&contributor.login)
                .copied()
                .unwrap_or_default();
            let avatar = contributor
                .avatar_url
                .unwrap_or_else(|| format!("https://github.com/{}.png", contributor.login));
            let profile_url = contributor
                .html_url
                .unwrap_or_else(|| format!("https://github.com/{}", contributor.login));
            LeaderboardEntry {
                points: points(prs, contributor.contributions),
                username: contributor.login,
                prs,
                contributions: contributor.contributions,
                avatar,
                profile_url,
                progress: 0,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.points.cmp(&a.points));

    let max_points = entries.first().map(|entry| entry.points).unwrap_or(1);
    for entry in entries.iter_mut() {
        entry.progress = progress(entry.points, max_points);
    }

    entries
}
