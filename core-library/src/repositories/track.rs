//! Cached track blob repository

use crate::error::Result;
use crate::models::{StoreStats, StoredTrack, TrackId};
use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, SqlitePool};

/// Repository for locally cached track content.
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Insert or replace a cached track by id. Idempotent.
    async fn put(&self, track: &StoredTrack) -> Result<()>;

    /// Find a cached track by id.
    ///
    /// # Returns
    /// - `Ok(Some(track))` if a blob is cached under this id
    /// - `Ok(None)` if absent, whether never stored or evicted by the host
    async fn get(&self, id: TrackId) -> Result<Option<StoredTrack>>;

    /// Delete a cached track.
    ///
    /// # Returns
    /// - `Ok(true)` if an entry was deleted
    /// - `Ok(false)` if nothing was cached under this id
    async fn delete(&self, id: TrackId) -> Result<bool>;

    /// Check whether a blob is cached under this id, without loading it.
    async fn contains(&self, id: TrackId) -> Result<bool>;

    /// All cached track ids, ascending.
    async fn ids(&self) -> Result<Vec<TrackId>>;

    /// Aggregate size statistics over the collection.
    async fn stats(&self) -> Result<StoreStats>;
}

/// SQLite implementation of [`TrackStore`].
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    async fn put(&self, track: &StoredTrack) -> Result<()> {
        query(
            "INSERT OR REPLACE INTO stored_tracks (id, blob, mime, sha256, size)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(track.id)
        .bind(&track.blob)
        .bind(&track.mime)
        .bind(&track.sha256)
        .bind(track.size)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: TrackId) -> Result<Option<StoredTrack>> {
        let track = query_as::<_, StoredTrack>(
            "SELECT id, blob, mime, sha256, size FROM stored_tracks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(track)
    }

    async fn delete(&self, id: TrackId) -> Result<bool> {
        let result = query("DELETE FROM stored_tracks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn contains(&self, id: TrackId) -> Result<bool> {
        let found: Option<i64> = query_scalar("SELECT 1 FROM stored_tracks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    async fn ids(&self) -> Result<Vec<TrackId>> {
        let ids = query_scalar::<_, TrackId>("SELECT id FROM stored_tracks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn stats(&self) -> Result<StoreStats> {
        let (count, bytes): (i64, i64) = query_as(
            "SELECT COUNT(*), COALESCE(SUM(size), 0) FROM stored_tracks",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreStats {
            track_count: count as u64,
            total_bytes: bytes as u64,
        })
    }
}
