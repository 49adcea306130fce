use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, sqlite::SqlitePool};
use thiserror::Error;

use crate::domain::{Profile, ProfileError};

/// Storage key of the profile record.
pub const PROFILE_KEY: &str = "userData";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage query failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored profile is unreadable: {0}")]
    Corrupt(#[from] ProfileError),
}

/// Durable home of the user profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Current profile; an all-empty profile when nothing was saved yet.
    async fn get(&self) -> Result<Profile, StoreError>;

    async fn set(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;

    /// Time of the last write, `None` when no record exists.
    async fn last_saved(&self) -> Result<Option<DateTime<Utc>>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn get(&self) -> Result<Profile, StoreError> {
        let row: Option<(String,)> = query_as(r#"SELECT value FROM storage WHERE key = ?1"#)
            .bind(PROFILE_KEY)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some((value,)) => Ok(Profile::from_json_str(&value)?),
            None => Ok(Profile::default()),
        }
    }

    async fn set(&self, profile: &Profile) -> Result<(), StoreError> {
        let value = profile.to_json_pretty()?;
        query(
            r#"INSERT OR REPLACE INTO storage (key, value, updated_at)
                VALUES (?1, ?2, ?3)"#,
        )
        .bind(PROFILE_KEY)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        tracing::debug!(target: "store", key = PROFILE_KEY, "profile saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let affected = query(r#"DELETE FROM storage WHERE key = ?1"#)
            .bind(PROFILE_KEY)
            .execute(&self.pool)
            .await?
            .rows_affected();
        tracing::debug!(target: "store", key = PROFILE_KEY, affected, "profile cleared");
        Ok(())
    }

    async fn last_saved(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let row: Option<(DateTime<Utc>,)> =
            query_as(r#"SELECT updated_at FROM storage WHERE key = ?1"#)
                .bind(PROFILE_KEY)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(updated_at,)| updated_at))
    }
}
