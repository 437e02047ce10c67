//! Remote Catalog Contracts
//!
//! The remote catalog service is the source of truth for tracks, playlists,
//! and playlist manifests. The types here mirror its wire format; the core
//! never invents or mutates catalog data, it only consumes snapshots.
//!
//! A [`PlaylistManifest`] is the authoritative description of what SHOULD be
//! cached for a playlist at a point in time: the ordered tracks, their content
//! digests, and a short-lived authorized download URL per track. Manifests are
//! superseded wholesale on each fetch; there is no partial merge.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Catalog track descriptor.
///
/// `sha256` is the authoritative content digest, assigned by the catalog and
/// immutable once issued. Cached blobs are only ever valid when their own
/// digest equals this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<i64>,
    pub mime: String,
    pub size_bytes: i64,
    pub sha256: String,
}

/// Playlist listing entry as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: i64,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

/// One manifest line: a track plus the short-lived URL its bytes can be
/// fetched from. The URL is credential-scoped to the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(flatten)]
    pub track: CatalogTrack,
    pub download_url: String,
}

/// Authoritative snapshot of a playlist's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistManifest {
    pub playlist_id: i64,
    pub name: String,
    /// Monotonic version marker. Carried through to the stored snapshot but
    /// never merged; a newer manifest replaces the older one wholesale.
    pub updated_at: DateTime<Utc>,
    pub tracks: Vec<ManifestEntry>,
}

impl PlaylistManifest {
    /// Ordered track ids, in manifest order.
    pub fn track_ids(&self) -> Vec<i64> {
        self.tracks.iter().map(|entry| entry.track.id).collect()
    }
}

/// Async catalog service trait.
///
/// Implementations talk to the remote catalog; the exact wire format is owned
/// by that service. `stream_url` is synchronous because the streaming endpoint
/// is a pure function of the track id.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the full track catalog snapshot.
    async fn list_tracks(&self) -> Result<Vec<CatalogTrack>>;

    /// Fetch all known playlists.
    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>>;

    /// Fetch the current manifest for a playlist, including fresh authorized
    /// download URLs.
    async fn fetch_manifest(&self, playlist_id: i64) -> Result<PlaylistManifest>;

    /// Streaming URL for a track, used as the fallback source when no cached
    /// blob is available.
    fn stream_url(&self, track_id: i64) -> String;
}
