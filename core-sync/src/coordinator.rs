//! # Repair Coordinator
//!
//! Walks all known playlists, re-validates every cached track against the
//! latest manifest, and re-triggers the cache manager for any playlist with
//! missing or corrupted content.
//!
//! Validation recomputes the digest of each stored blob rather than trusting
//! the stored digest field, so bit rot is caught even when the metadata still
//! looks right. The first detected fault in a playlist is a sufficient
//! trigger: the cache manager re-validates every track during the download
//! pass anyway, so checking the playlist's remaining tracks would only repeat
//! digesting work.
//!
//! A repair pass is idempotent and safe to re-run. It may overlap a
//! user-initiated download of the same playlist; no mutual exclusion is
//! enforced, the resulting store races are last-write-wins, and the next pass
//! reconciles whatever state they left behind.

use crate::error::Result;
use bridge_traits::catalog::{CatalogService, PlaylistManifest, PlaylistSummary};
use core_cache::{digests_match, sha256_hex, CacheManager};
use core_library::models::TrackId;
use core_library::repositories::TrackStore;
use core_runtime::events::{CoreEvent, EventBus, RepairEvent};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Outcome of one repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Playlists validated and found healthy.
    pub healthy: Vec<i64>,
    /// Playlists that needed and received a fresh download pass.
    pub repaired: Vec<i64>,
    /// Playlists whose validation or remediation failed, with the reason.
    /// A failure here never blocks the remaining playlists.
    pub failed: Vec<(i64, String)>,
}

impl RepairReport {
    /// Whether every playlist was either healthy or successfully repaired.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Orchestrates cache validation and remediation.
pub struct RepairCoordinator {
    catalog: Arc<dyn CatalogService>,
    tracks: Arc<dyn TrackStore>,
    cache: Arc<CacheManager>,
    event_bus: Option<Arc<EventBus>>,
}

impl RepairCoordinator {
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        tracks: Arc<dyn TrackStore>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            catalog,
            tracks,
            cache,
            event_bus: None,
        }
    }

    /// Attach an event bus for repair pass events.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    fn emit(&self, event: RepairEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Repair(event)).ok();
        }
    }

    /// Validate and repair every given playlist.
    ///
    /// Failures are collected per playlist in the report; a broken playlist
    /// never prevents the next one from being checked.
    #[instrument(skip(self, playlists), fields(playlists = playlists.len()))]
    pub async fn repair_all(&self, playlists: &[PlaylistSummary]) -> RepairReport {
        info!(count = playlists.len(), "Starting repair pass");
        self.emit(RepairEvent::Started {
            playlists: playlists.len(),
        });

        let mut report = RepairReport::default();
        for summary in playlists {
            match self.repair_playlist(summary.id).await {
                Ok(true) => {
                    self.emit(RepairEvent::PlaylistRepaired {
                        playlist_id: summary.id,
                    });
                    report.repaired.push(summary.id);
                }
                Ok(false) => {
                    self.emit(RepairEvent::PlaylistHealthy {
                        playlist_id: summary.id,
                    });
                    report.healthy.push(summary.id);
                }
                Err(e) => {
                    warn!(playlist_id = summary.id, error = %e, "Playlist repair failed");
                    self.emit(RepairEvent::PlaylistFailed {
                        playlist_id: summary.id,
                        message: e.to_string(),
                    });
                    report.failed.push((summary.id, e.to_string()));
                }
            }
        }

        info!(
            repaired = report.repaired.len(),
            healthy = report.healthy.len(),
            failed = report.failed.len(),
            "Repair pass completed"
        );
        self.emit(RepairEvent::Completed {
            repaired: report.repaired.len(),
            failed: report.failed.len(),
        });

        report
    }

    /// Validate one playlist against its current manifest, re-downloading it
    /// when a fault is found. Returns whether a download pass ran.
    async fn repair_playlist(&self, playlist_id: i64) -> Result<bool> {
        let manifest = self.catalog.fetch_manifest(playlist_id).await?;

        if self.needs_repair(&manifest).await? {
            info!(playlist_id, "Fault detected, re-downloading playlist");
            self.cache.download_playlist(&manifest).await?;
            Ok(true)
        } else {
            debug!(playlist_id, "Playlist is healthy");
            Ok(false)
        }
    }

    /// Check the manifest's tracks in order, stopping at the first fault.
    async fn needs_repair(&self, manifest: &PlaylistManifest) -> Result<bool> {
        for entry in &manifest.tracks {
            let Some(stored) = self.tracks.get(TrackId(entry.track.id)).await? else {
                debug!(track_id = entry.track.id, "Cached blob missing");
                return Ok(true);
            };

            let digest = sha256_hex(&stored.blob);
            if !digests_match(&digest, &entry.track.sha256) {
                debug!(track_id = entry.track.id, "Cached blob digest mismatch");
                return Ok(true);
            }
        }

        Ok(false)
    }
}
