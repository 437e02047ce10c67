//! Repository traits and SQLite implementations for the content store.
//!
//! Each collection gets its own repository: cached track blobs, playlist
//! snapshots, and the singleton playback state. Repositories never distinguish
//! "key never existed" from "key was evicted by the host"; both surface as
//! `Ok(None)`; the repair coordinator is responsible for recovery.

pub mod playback_state;
pub mod playlist;
pub mod track;

pub use playback_state::{PlaybackStateStore, SqlitePlaybackStateStore};
pub use playlist::{PlaylistStore, SqlitePlaylistStore};
pub use track::{SqliteTrackStore, TrackStore};
