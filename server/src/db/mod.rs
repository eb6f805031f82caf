use async_trait::async_trait;
use rocket::{
    fairing::{self, AdHoc},
    Build, Rocket,
};
use rocket_db_pools::Database;
use shared::LeaderboardEntry;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::cache::LeaderboardStore;

pub mod types;

use types::{CacheRecord, CacheRecordRow, EntryRecord};

#[derive(Database, Clone, Debug)]
#[database("leaderboard")]
pub struct DB(PgPool);

impl DB {
    #[instrument(skip(self))]
    pub async fn get_cache_record(&self, key: &str) -> Result<Option<CacheRecord>, sqlx::Error> {
        let rec = sqlx::query_as::<_, CacheRecordRow>(
            r#"
            SELECT key, data, last_updated
            FROM leaderboard_cache
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.0)
        .await?;

        Ok(rec.map(Into::into))
    }

    /// Replaces the entry mirror with `record.data` and upserts `record`.
    /// Both writes share a transaction, so a failure leaves the previous
    /// record and mirror in place.
    #[instrument(skip(self, record), fields(key = %record.key, entries = record.data.len()))]
    pub async fn save_leaderboard(&self, record: &CacheRecord) -> Result<(), sqlx::Error> {
        let mut tx = self.0.begin().await?;
        Self::replace_entries_tx(&mut tx, &record.data).await?;
        Self::upsert_cache_record_tx(&mut tx, record).await?;
        tx.commit().await
    }

    async fn upsert_cache_record_tx(
        tx: &mut Transaction<'static, Postgres>,
        record: &CacheRecord,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO leaderboard_cache (key, data, last_updated)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET data = EXCLUDED.data,
                last_updated = EXCLUDED.last_updated
            "#,
        )
        .bind(&record.key)
        .bind(sqlx::types::Json(&record.data))
        .bind(record.last_updated)
        .execute(tx.as_mut())
        .await?;
        Ok(())
    }

    async fn replace_entries_tx(
        tx: &mut Transaction<'static, Postgres>,
        entries: &[LeaderboardEntry],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM leaderboard_entries")
            .execute(tx.as_mut())
            .await?;

        for (position, entry) in entries.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO leaderboard_entries (position, username, prs, contributions, avatar, profile_url, points, progress)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(position as i32)
            .bind(&entry.username)
            .bind(entry.prs as i32)
            .bind(entry.contributions as i32)
            .bind(&entry.avatar)
            .bind(&entry.profile_url)
            .bind(entry.points as i64)
            .bind(entry.progress as i32)
            .execute(tx.as_mut())
            .await?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_entries(&self) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        let records = sqlx::query_as::<_, EntryRecord>(
            r#"
            SELECT position, username, prs, contributions, avatar, profile_url, points, progress
            FROM leaderboard_entries
            ORDER BY position
            "#,
        )
        .fetch_all(&self.0)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LeaderboardStore for DB {
    async fn cache_record(&self, key: &str) -> Result<Option<CacheRecord>, sqlx::Error> {
        self.get_cache_record(key).await
    }

    async fn save_leaderboard(&self, record: &CacheRecord) -> Result<(), sqlx::Error> {
        DB::save_leaderboard(self, record).await
    }

    async fn entries(&self) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        self.get_entries().await
    }
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    match DB::fetch(&rocket) {
        Some(db) => match sqlx::migrate!("./migrations").run(&**db).await {
            Ok(_) => Ok(rocket),
            Err(e) => {
                tracing::error!("Failed to initialize SQLx database: {}", e);
                Err(rocket)
            }
        },
        None => Err(rocket),
    }
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("SQLx Stage", |rocket| async {
        rocket
            .attach(DB::init())
            .attach(AdHoc::try_on_ignite("SQLx Migrations", run_migrations))
    })
}
