//! Playback state repository
//!
//! Exactly one `PlaybackState` record exists, stored under the fixed key
//! `'main'` and overwritten in place on every persist. Last write wins; there
//! is no versioning.

use crate::error::{LibraryError, Result};
use crate::models::{PlaybackState, RepeatMode, TrackId};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};

/// Repository for the singleton playback state.
#[async_trait]
pub trait PlaybackStateStore: Send + Sync {
    /// Overwrite the singleton record.
    async fn save(&self, state: &PlaybackState) -> Result<()>;

    /// Load the singleton record; `Ok(None)` when never persisted or evicted.
    async fn load(&self) -> Result<Option<PlaybackState>>;
}

/// SQLite implementation of [`PlaybackStateStore`].
pub struct SqlitePlaybackStateStore {
    pool: SqlitePool,
}

impl SqlitePlaybackStateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StateRow {
    last_track_id: Option<TrackId>,
    position_ms: i64,
    queue: String,
    shuffle: bool,
    repeat_mode: String,
}

impl StateRow {
    fn into_model(self) -> Result<PlaybackState> {
        let queue: Vec<TrackId> =
            serde_json::from_str(&self.queue).map_err(|e| LibraryError::InvalidRecord {
                field: "queue".to_string(),
                message: e.to_string(),
            })?;

        Ok(PlaybackState {
            last_track_id: self.last_track_id,
            position_ms: self.position_ms.max(0) as u64,
            queue,
            shuffle: self.shuffle,
            // Unknown stored values degrade to the default rather than fail;
            // the engine starts from load-or-default anyway.
            repeat: RepeatMode::parse(&self.repeat_mode).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl PlaybackStateStore for SqlitePlaybackStateStore {
    async fn save(&self, state: &PlaybackState) -> Result<()> {
        let queue =
            serde_json::to_string(&state.queue).map_err(|e| LibraryError::InvalidRecord {
                field: "queue".to_string(),
                message: e.to_string(),
            })?;

        query(
            "INSERT OR REPLACE INTO playback_state
                 (key, last_track_id, position_ms, queue, shuffle, repeat_mode)
             VALUES ('main', ?, ?, ?, ?, ?)",
        )
        .bind(state.last_track_id)
        .bind(state.position_ms as i64)
        .bind(queue)
        .bind(state.shuffle)
        .bind(state.repeat.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load(&self) -> Result<Option<PlaybackState>> {
        let row = query_as::<_, StateRow>(
            "SELECT last_track_id, position_ms, queue, shuffle, repeat_mode
             FROM playback_state WHERE key = 'main'",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(StateRow::into_model).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = SqlitePlaybackStateStore::new(create_test_pool().await.unwrap());

        let state = PlaybackState {
            last_track_id: Some(TrackId(5)),
            position_ms: 12_000,
            queue: vec![TrackId(5), TrackId(6)],
            shuffle: true,
            repeat: RepeatMode::All,
        };

        store.save(&state).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn never_persisted_loads_as_none() {
        let store = SqlitePlaybackStateStore::new(create_test_pool().await.unwrap());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_in_place() {
        let store = SqlitePlaybackStateStore::new(create_test_pool().await.unwrap());

        store.save(&PlaybackState::default()).await.unwrap();

        let updated = PlaybackState {
            last_track_id: Some(TrackId(2)),
            position_ms: 500,
            queue: vec![TrackId(2)],
            shuffle: false,
            repeat: RepeatMode::One,
        };
        store.save(&updated).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, updated);

        // Still exactly one row
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM playback_state")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn unknown_repeat_mode_degrades_to_off() {
        let store = SqlitePlaybackStateStore::new(create_test_pool().await.unwrap());

        sqlx::query(
            "INSERT INTO playback_state (key, last_track_id, position_ms, queue, shuffle, repeat_mode)
             VALUES ('main', NULL, 0, '[]', 0, 'bogus')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.repeat, RepeatMode::Off);
    }
}
