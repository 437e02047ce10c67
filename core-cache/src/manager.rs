//! # Cache Manager
//!
//! Orchestrates fetch → verify → store for the tracks of a playlist manifest.
//!
//! The playlist snapshot is persisted before any track body so the playlist's
//! existence and track order are available offline even mid-download. Tracks
//! are then processed strictly in manifest order, sequential on purpose, so
//! progress counters are monotonic and memory stays bounded. A failure on any
//! track halts the whole pass; tracks already verified remain cached and the
//! next invocation of the same operation picks up where this one stopped.

use crate::digest::{digests_match, sha256_hex};
use crate::error::{CacheError, Result};
use crate::stats::DownloadReport;
use bridge_traits::catalog::{ManifestEntry, PlaylistManifest};
use bridge_traits::http::{HttpClient, HttpRequest};
use core_library::models::{PlaylistId, StoredPlaylist, StoredTrack, TrackId};
use core_library::repositories::{PlaylistStore, TrackStore};
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Offline cache manager.
///
/// Overlapping invocations for the same playlist are not mutually excluded; a
/// newer pass simply re-validates and supersedes. The resulting last-write-wins
/// races on store records are accepted and reconciled by the next repair pass.
pub struct CacheManager {
    tracks: Arc<dyn TrackStore>,
    playlists: Arc<dyn PlaylistStore>,
    http: Arc<dyn HttpClient>,
    event_bus: Option<Arc<EventBus>>,
}

impl CacheManager {
    pub fn new(
        tracks: Arc<dyn TrackStore>,
        playlists: Arc<dyn PlaylistStore>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            tracks,
            playlists,
            http,
            event_bus: None,
        }
    }

    /// Attach an event bus for download progress events.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Cache(event)).ok();
        }
    }

    /// Download a playlist's content into the cache.
    ///
    /// Emits `CacheEvent::DownloadProgress` after every track, whether skipped
    /// because already valid or freshly stored. On success, every track in the
    /// manifest has a stored blob whose digest equals the manifest digest;
    /// re-running on an unchanged manifest performs zero fetches.
    ///
    /// # Errors
    ///
    /// The first failing track aborts the pass. The error names the track and
    /// the progress already recorded stays valid; no rollback of prior
    /// successes.
    #[instrument(skip(self, manifest), fields(playlist_id = manifest.playlist_id))]
    pub async fn download_playlist(&self, manifest: &PlaylistManifest) -> Result<DownloadReport> {
        let total = manifest.tracks.len();
        info!(total, name = %manifest.name, "Starting playlist download");

        // Snapshot first: the playlist must be reconstructable offline even if
        // this pass never finishes.
        self.playlists
            .put(&StoredPlaylist {
                id: PlaylistId(manifest.playlist_id),
                name: manifest.name.clone(),
                track_ids: manifest.track_ids().into_iter().map(TrackId).collect(),
                updated_at: manifest.updated_at,
            })
            .await?;

        self.emit(CacheEvent::DownloadStarted {
            playlist_id: manifest.playlist_id,
            total,
        });

        let mut done = 0;
        let mut fetched = 0;
        for entry in &manifest.tracks {
            match self.ensure_track(entry).await {
                Ok(was_fetched) => {
                    done += 1;
                    if was_fetched {
                        fetched += 1;
                    }
                    self.emit(CacheEvent::DownloadProgress {
                        playlist_id: manifest.playlist_id,
                        done,
                        total,
                    });
                }
                Err(e) => {
                    warn!(
                        track_id = entry.track.id,
                        done, total,
                        error = %e,
                        "Playlist download halted"
                    );
                    self.emit(CacheEvent::DownloadFailed {
                        playlist_id: manifest.playlist_id,
                        message: e.to_string(),
                        done,
                        total,
                    });
                    return Err(e);
                }
            }
        }

        info!(total, fetched, "Playlist download completed");
        self.emit(CacheEvent::DownloadCompleted {
            playlist_id: manifest.playlist_id,
            total,
        });

        Ok(DownloadReport {
            playlist_id: manifest.playlist_id,
            done,
            total,
            fetched,
        })
    }

    /// Bring one manifest entry up to date. Returns whether bytes were fetched.
    async fn ensure_track(&self, entry: &ManifestEntry) -> Result<bool> {
        let id = TrackId(entry.track.id);

        if let Some(stored) = self.tracks.get(id).await? {
            if digests_match(&stored.sha256, &entry.track.sha256) {
                debug!(track_id = %id, "Track already valid, skipping fetch");
                return Ok(false);
            }
            debug!(track_id = %id, "Stored digest is stale, re-fetching");
        }

        let response = self
            .http
            .execute(HttpRequest::get(&entry.download_url))
            .await
            .map_err(|source| CacheError::Network {
                track_id: entry.track.id,
                source,
            })?;

        if !response.is_success() {
            return Err(CacheError::Download {
                track_id: entry.track.id,
                status: response.status,
            });
        }

        let data = response.body;
        let digest = sha256_hex(&data);
        if !digests_match(&digest, &entry.track.sha256) {
            // Fail closed: never store content under a digest it does not match.
            return Err(CacheError::IntegrityMismatch {
                track_id: entry.track.id,
                expected: entry.track.sha256.clone(),
                actual: digest,
            });
        }

        let size = data.len() as i64;
        self.tracks
            .put(&StoredTrack {
                id,
                blob: data.to_vec(),
                mime: entry.track.mime.clone(),
                sha256: digest,
                size,
            })
            .await?;

        self.emit(CacheEvent::TrackCached {
            track_id: entry.track.id,
            size: size as u64,
        });

        Ok(true)
    }

    /// Whether a blob is cached for this track.
    ///
    /// This only checks existence; validity against the current manifest is
    /// the repair coordinator's concern.
    pub async fn is_track_downloaded(&self, id: TrackId) -> Result<bool> {
        Ok(self.tracks.contains(id).await?)
    }

    /// Remove a single track from the cache.
    pub async fn remove_track(&self, id: TrackId) -> Result<bool> {
        Ok(self.tracks.delete(id).await?)
    }
}
