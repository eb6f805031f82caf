use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use shared::{
    github::{ContributorSource, UpstreamError},
    Contributor, LeaderboardEntry, PullRequest, PullRequestAuthor,
};

use crate::{cache::LeaderboardStore, db::types::CacheRecord};

pub fn contributor(login: &str, contributions: u32) -> Contributor {
    Contributor {
        login: login.to_string(),
        contributions,
        avatar_url: None,
        html_url: None,
    }
}

pub fn pull_request(login: &str) -> PullRequest {
    PullRequest {
        user: Some(PullRequestAuthor {
            login: Some(login.to_string()),
        }),
    }
}

pub fn sample_entry(username: &str, points: u64) -> LeaderboardEntry {
    LeaderboardEntry {
        username: username.to_string(),
        prs: 0,
        contributions: points as u32,
        avatar: format!("https://github.com/{username}.png"),
        profile_url: format!("https://github.com/{username}"),
        points,
        progress: 100,
    }
}

/// Upstream source answering from fixed data. Counts refreshes and can be
/// switched to fail with an HTTP status.
pub struct ScriptedSource {
    contributors: Vec<Contributor>,
    pull_requests: Vec<PullRequest>,
    failure_status: AtomicU16,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(contributors: Vec<Contributor>, pull_requests: Vec<PullRequest>) -> Self {
        Self {
            contributors,
            pull_requests,
            failure_status: AtomicU16::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_with_status(&self, status: u16) {
        self.failure_status.store(status, Ordering::SeqCst);
    }

    /// Number of contributor fetches, one per refresh.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, endpoint: &'static str) -> Result<(), UpstreamError> {
        match self.failure_status.load(Ordering::SeqCst) {
            0 => Ok(()),
            status => Err(UpstreamError::Status { endpoint, status }),
        }
    }
}

#[async_trait]
impl ContributorSource for ScriptedSource {
    async fn contributors(&self) -> Result<Vec<Contributor>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        rocket::tokio::task::yield_now().await;
        self.check("contributors")?;
        Ok(self.contributors.clone())
    }

    async fn pull_requests(&self) -> Result<Vec<PullRequest>, UpstreamError> {
        rocket::tokio::task::yield_now().await;
        self.check("pulls")?;
        Ok(self.pull_requests.clone())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, CacheRecord>>,
    entries: Mutex<Vec<LeaderboardEntry>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn insert_record(&self, record: CacheRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.key.clone(), record);
    }

    pub fn record(&self, key: &str) -> Option<CacheRecord> {
        self.records.lock().unwrap().get(key).cloned()
    }

    pub fn insert_entries(&self, entries: Vec<LeaderboardEntry>) {
        *self.entries.lock().unwrap() = entries;
    }

    pub fn stored_entries(&self) -> Vec<LeaderboardEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), sqlx::Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }
}

#[async_trait]
impl LeaderboardStore for MemoryStore {
    async fn cache_record(&self, key: &str) -> Result<Option<CacheRecord>, sqlx::Error> {
        Ok(self.record(key))
    }

    async fn save_leaderboard(&self, record: &CacheRecord) -> Result<(), sqlx::Error> {
        self.check_writable()?;
        self.insert_entries(record.data.clone());
        self.insert_record(record.clone());
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        Ok(self.stored_entries())
    }
}
