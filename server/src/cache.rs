use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rocket::{fairing::AdHoc, tokio::sync::Mutex};
use rocket_db_pools::Database;
use shared::{github::ContributorSource, LeaderboardEntry, LEADERBOARD_KEY};
use tracing::{debug, info, instrument};

use crate::{
    db::{types::CacheRecord, DB},
    error::LeaderboardError,
};

pub const DEFAULT_TTL_IN_MINUTES: u32 = 30;

/// Durable state behind the leaderboard: the cache record and its entry mirror.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    async fn cache_record(&self, key: &str) -> Result<Option<CacheRecord>, sqlx::Error>;

    /// Stores `record` and replaces the entry mirror with its data, all or nothing.
    async fn save_leaderboard(&self, record: &CacheRecord) -> Result<(), sqlx::Error>;

    async fn entries(&self) -> Result<Vec<LeaderboardEntry>, sqlx::Error>;
}

/// Serves the leaderboard from the cache record while it is younger than the
/// TTL and recomputes it from the upstream source otherwise.
pub struct LeaderboardCache {
    source: Arc<dyn ContributorSource>,
    store: Arc<dyn LeaderboardStore>,
    ttl: chrono::Duration,
    refresh_lock: Mutex<()>,
}

impl LeaderboardCache {
    pub fn new(
        source: Arc<dyn ContributorSource>,
        store: Arc<dyn LeaderboardStore>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            source,
            store,
            ttl,
            refresh_lock: Mutex::new(()),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_leaderboard(
        &self,
        force_refresh: bool,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        if !force_refresh {
            if let Some(data) = self.fresh_data().await? {
                debug!("Serving cached leaderboard");
                return Ok(data);
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Someone else may have refreshed while we were waiting for the lock
        if !force_refresh {
            if let Some(data) = self.fresh_data().await? {
                debug!("Serving leaderboard refreshed by a concurrent request");
                return Ok(data);
            }
        }

        self.refresh().await
    }

    /// Persisted mirror of the last computed ranking.
    pub async fn stored_entries(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        Ok(self.store.entries().await?)
    }

    async fn fresh_data(&self) -> Result<Option<Vec<LeaderboardEntry>>, LeaderboardError> {
        let record = self.store.cache_record(LEADERBOARD_KEY).await?;
        Ok(record
            .filter(|record| record.is_fresh(Utc::now(), self.ttl))
            .map(|record| record.data))
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let (contributors, pull_requests) = rocket::tokio::try_join!(
            self.source.contributors(),
            self.source.pull_requests()
        )?;
        info!(
            "Fetched {} contributors and {} pull requests",
            contributors.len(),
            pull_requests.len()
        );

        let entries = shared::rank_contributors(contributors, &pull_requests);

        self.store
            .save_leaderboard(&CacheRecord::new(
                LEADERBOARD_KEY,
                entries.clone(),
                Utc::now(),
            ))
            .await?;

        info!("Leaderboard refreshed with {} entries", entries.len());
        Ok(entries)
    }
}

pub fn stage(source: Arc<dyn ContributorSource>, ttl: chrono::Duration) -> AdHoc {
    AdHoc::on_ignite("Leaderboard cache", move |rocket| async move {
        // Nested so it runs after the database pool has been initialized
        rocket.attach(AdHoc::try_on_ignite(
            "Leaderboard cache controller",
            move |rocket| async move {
                let db = match DB::fetch(&rocket) {
                    Some(db) => db.clone(),
                    None => {
                        tracing::error!("Database pool is not initialized");
                        return Err(rocket);
                    }
                };
                let cache = LeaderboardCache::new(source, Arc::new(db), ttl);
                Ok(rocket.manage(Arc::new(cache)))
            },
        ))
    })
}
