//! Domain models for the offline content store
//!
//! The store holds three independent collections: cached track blobs, playlist
//! snapshots, and the singleton playback state. These models map one-to-one
//! onto the persisted records; descriptive track metadata stays in the remote
//! catalog and is never duplicated here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a track, assigned by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct TrackId(pub i64);

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a playlist, assigned by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct PlaylistId(pub i64);

impl From<i64> for PlaylistId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Store Records
// =============================================================================

/// Locally cached track content.
///
/// `sha256` is the digest of `blob` AS STORED. Comparing it against the
/// current manifest digest for the same id is how staleness and corruption are
/// detected; an entry whose digest differs from the manifest's must not be
/// treated as a valid offline source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredTrack {
    pub id: TrackId,
    pub blob: Vec<u8>,
    pub mime: String,
    pub sha256: String,
    pub size: i64,
}

/// Local snapshot of a playlist.
///
/// Mirrors a manifest (name, ordered track ids, version marker) so offline
/// playback can reconstruct a queue without network access. Superseded
/// wholesale when a newer manifest is downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPlaylist {
    pub id: PlaylistId,
    pub name: String,
    pub track_ids: Vec<TrackId>,
    pub updated_at: DateTime<Utc>,
}

/// Repeat behavior when a track finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

impl RepeatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::One => "one",
            RepeatMode::All => "all",
        }
    }

    /// Parse a stored value. Unknown strings load as `None`; callers fall back
    /// to the default to match load-or-default startup semantics.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(RepeatMode::Off),
            "one" => Some(RepeatMode::One),
            "all" => Some(RepeatMode::All),
            _ => None,
        }
    }

    /// The next mode in the user-facing cycle: off -> one -> all -> off.
    pub fn cycled(&self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Singleton playback state, overwritten in place on every persist.
///
/// `position_ms` is only meaningful for `last_track_id`; switching tracks
/// resets it logically even though the stored value may lag until the next
/// persist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub last_track_id: Option<TrackId>,
    pub position_ms: u64,
    pub queue: Vec<TrackId>,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

/// Aggregate statistics over the cached track collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub track_count: u64,
    pub total_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_id_displays_raw_value() {
        assert_eq!(TrackId(42).to_string(), "42");
    }

    #[test]
    fn track_ids_serialize_transparently() {
        let ids = vec![TrackId(5), TrackId(6)];
        assert_eq!(serde_json::to_string(&ids).unwrap(), "[5,6]");
    }

    #[test]
    fn repeat_mode_round_trips_through_strings() {
        for mode in [RepeatMode::Off, RepeatMode::One, RepeatMode::All] {
            assert_eq!(RepeatMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(RepeatMode::parse("bogus"), None);
    }

    #[test]
    fn repeat_mode_cycle() {
        assert_eq!(RepeatMode::Off.cycled(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycled(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycled(), RepeatMode::Off);
    }

    #[test]
    fn playback_state_defaults_are_empty() {
        let state = PlaybackState::default();
        assert_eq!(state.last_track_id, None);
        assert_eq!(state.position_ms, 0);
        assert!(state.queue.is_empty());
        assert!(!state.shuffle);
        assert_eq!(state.repeat, RepeatMode::Off);
    }
}
