//! Playlist snapshot repository

use crate::error::{LibraryError, Result};
use crate::models::{PlaylistId, StoredPlaylist, TrackId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, query_scalar, SqlitePool};

/// Repository for offline playlist snapshots.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Insert or replace a playlist snapshot by id. Idempotent.
    async fn put(&self, playlist: &StoredPlaylist) -> Result<()>;

    /// Find a snapshot by id; `Ok(None)` when absent or evicted.
    async fn get(&self, id: PlaylistId) -> Result<Option<StoredPlaylist>>;

    /// Delete a snapshot, reporting whether one existed.
    async fn delete(&self, id: PlaylistId) -> Result<bool>;

    /// All snapshot ids, ascending.
    async fn ids(&self) -> Result<Vec<PlaylistId>>;
}

/// SQLite implementation of [`PlaylistStore`].
pub struct SqlitePlaylistStore {
    pool: SqlitePool,
}

impl SqlitePlaylistStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; `track_ids` is a JSON array column.
#[derive(sqlx::FromRow)]
struct PlaylistRow {
    id: PlaylistId,
    name: String,
    track_ids: String,
    updated_at: DateTime<Utc>,
}

impl PlaylistRow {
    fn into_model(self) -> Result<StoredPlaylist> {
        let track_ids: Vec<TrackId> =
            serde_json::from_str(&self.track_ids).map_err(|e| LibraryError::InvalidRecord {
                field: "track_ids".to_string(),
                message: e.to_string(),
            })?;

        Ok(StoredPlaylist {
            id: self.id,
            name: self.name,
            track_ids,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl PlaylistStore for SqlitePlaylistStore {
    async fn put(&self, playlist: &StoredPlaylist) -> Result<()> {
        let track_ids =
            serde_json::to_string(&playlist.track_ids).map_err(|e| LibraryError::InvalidRecord {
                field: "track_ids".to_string(),
                message: e.to_string(),
            })?;

        query(
            "INSERT OR REPLACE INTO stored_playlists (id, name, track_ids, updated_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(playlist.id)
        .bind(&playlist.name)
        .bind(track_ids)
        .bind(playlist.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: PlaylistId) -> Result<Option<StoredPlaylist>> {
        let row = query_as::<_, PlaylistRow>(
            "SELECT id, name, track_ids, updated_at FROM stored_playlists WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(PlaylistRow::into_model).transpose()
    }

    async fn delete(&self, id: PlaylistId) -> Result<bool> {
        let result = query("DELETE FROM stored_playlists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ids(&self) -> Result<Vec<PlaylistId>> {
        let ids = query_scalar::<_, PlaylistId>("SELECT id FROM stored_playlists ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }
}
