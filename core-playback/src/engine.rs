//! Playback engine state machine.

use crate::error::{PlaybackError, Result};
use bridge_traits::catalog::{CatalogService, CatalogTrack};
use bridge_traits::playback::{AudioSource, PlaybackAdapter};
use bytes::Bytes;
use core_library::models::{PlaybackState, PlaylistId, RepeatMode, TrackId};
use core_library::repositories::{PlaybackStateStore, PlaylistStore, TrackStore};
use core_runtime::events::{CoreEvent, EventBus, PlayerEvent};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Transport state for the current track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Playback engine.
///
/// Owns the singleton [`PlaybackState`] record: all mutation goes through the
/// engine's own transport and tick handlers, which run on one cooperative
/// task, so no lock guards the state. An embedding that drives the engine from
/// multiple threads must wrap it in a mutex; the state is a single mutable
/// resource.
pub struct PlayerEngine {
    catalog: Arc<dyn CatalogService>,
    tracks: Arc<dyn TrackStore>,
    playlists: Arc<dyn PlaylistStore>,
    state_store: Arc<dyn PlaybackStateStore>,
    adapter: Arc<dyn PlaybackAdapter>,
    event_bus: Option<Arc<EventBus>>,

    /// In-memory catalog snapshot used to seed queues and resolve stream
    /// fallbacks. Refreshed explicitly; may be empty when offline.
    catalog_tracks: Vec<CatalogTrack>,
    state: PlaybackState,
    player_state: PlayerState,
}

impl PlayerEngine {
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        tracks: Arc<dyn TrackStore>,
        playlists: Arc<dyn PlaylistStore>,
        state_store: Arc<dyn PlaybackStateStore>,
        adapter: Arc<dyn PlaybackAdapter>,
    ) -> Self {
        Self {
            catalog,
            tracks,
            playlists,
            state_store,
            adapter,
            event_bus: None,
            catalog_tracks: Vec::new(),
            state: PlaybackState::default(),
            player_state: PlayerState::Idle,
        }
    }

    /// Attach an event bus for transport events.
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Player(event)).ok();
        }
    }

    /// Load the persisted playback state, or start from defaults when nothing
    /// was persisted (or the host evicted it). The engine stays idle; nothing
    /// starts playing on its own.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Result<()> {
        self.state = self.state_store.load().await?.unwrap_or_default();
        self.player_state = PlayerState::Idle;
        info!(
            last_track = ?self.state.last_track_id,
            queue_len = self.state.queue.len(),
            "Playback state restored"
        );
        Ok(())
    }

    /// Refresh the in-memory catalog snapshot from the remote catalog.
    ///
    /// Failing here is normal when offline; cached playback keeps working with
    /// the previous (possibly empty) snapshot.
    pub async fn refresh_catalog(&mut self) -> Result<()> {
        self.catalog_tracks = self
            .catalog
            .list_tracks()
            .await
            .map_err(PlaybackError::Catalog)?;
        debug!(tracks = self.catalog_tracks.len(), "Catalog snapshot refreshed");
        Ok(())
    }

    /// Start playing a track.
    ///
    /// Seeds an empty queue with the full catalog in catalog order, resolves a
    /// source preferring the cache, and resumes at the persisted position only
    /// when replaying the same track that was current before.
    #[instrument(skip(self), fields(track_id = %track_id))]
    pub async fn play(&mut self, track_id: TrackId) -> Result<()> {
        if self.state.queue.is_empty() {
            self.state.queue = self
                .catalog_tracks
                .iter()
                .map(|track| TrackId(track.id))
                .collect();
            debug!(queue_len = self.state.queue.len(), "Seeded queue from catalog");
        }

        let resuming = self.state.last_track_id == Some(track_id);
        let position_ms = if resuming { self.state.position_ms } else { 0 };

        match self.start_playback(track_id, position_ms).await {
            Ok(from_cache) => {
                self.state.last_track_id = Some(track_id);
                self.state.position_ms = position_ms;
                self.player_state = PlayerState::Playing;
                self.emit(PlayerEvent::Started {
                    track_id: track_id.0,
                    from_cache,
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to start playback");
                self.player_state = PlayerState::Idle;
                self.emit(PlayerEvent::Error {
                    track_id: Some(track_id.0),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Resolve, load, seek, and start the adapter. Returns whether the source
    /// came from the cache.
    async fn start_playback(&self, track_id: TrackId, position_ms: u64) -> Result<bool> {
        let source = self.resolve_source(track_id).await?;
        let from_cache = !source.is_remote();

        self.adapter.load(source).await?;
        if position_ms > 0 {
            self.adapter.seek(Duration::from_millis(position_ms)).await?;
        }
        self.adapter.play().await?;

        Ok(from_cache)
    }

    /// Resolve a playable source for a track: a cached blob when one exists,
    /// else the remote stream URL for catalog tracks.
    async fn resolve_source(&self, track_id: TrackId) -> Result<AudioSource> {
        if let Some(stored) = self.tracks.get(track_id).await? {
            debug!(track_id = %track_id, "Resolved source from cache");
            return Ok(AudioSource::MemoryBuffer {
                data: Bytes::from(stored.blob),
                mime: stored.mime,
            });
        }

        if self.catalog_tracks.iter().any(|t| t.id == track_id.0) {
            debug!(track_id = %track_id, "Falling back to remote stream");
            return Ok(AudioSource::RemoteStream {
                url: self.catalog.stream_url(track_id.0),
            });
        }

        Err(PlaybackError::Unavailable(track_id))
    }

    /// Pause playback. Delegates to the adapter; the engine merely reflects
    /// the transport state.
    pub async fn pause(&mut self) -> Result<()> {
        self.adapter.pause().await?;
        if self.player_state == PlayerState::Playing {
            self.player_state = PlayerState::Paused;
            if let Some(track_id) = self.state.last_track_id {
                self.emit(PlayerEvent::Paused {
                    track_id: track_id.0,
                    position_ms: self.state.position_ms,
                });
            }
        }
        Ok(())
    }

    /// Index of the current track in the queue, when it is in the queue.
    fn current_index(&self) -> Option<usize> {
        let current = self.state.last_track_id?;
        self.state.queue.iter().position(|id| *id == current)
    }

    /// Advance the queue. No-op on an empty queue.
    ///
    /// With shuffle on, the next index is uniformly random over the whole
    /// queue and may re-select the current track; candidate behavior to
    /// revisit, kept as-is to preserve observable semantics.
    pub async fn next(&mut self) -> Result<Option<TrackId>> {
        let len = self.state.queue.len();
        if len == 0 {
            return Ok(None);
        }

        let next_index = if self.state.shuffle {
            fastrand::usize(..len)
        } else {
            match self.current_index() {
                Some(index) => (index + 1) % len,
                None => 0,
            }
        };

        let next_id = self.state.queue[next_index];
        self.play(next_id).await?;
        Ok(Some(next_id))
    }

    /// Step back in the queue. Does not wrap past the start: calling this at
    /// index 0 replays index 0. No-op on an empty queue.
    pub async fn previous(&mut self) -> Result<Option<TrackId>> {
        if self.state.queue.is_empty() {
            return Ok(None);
        }

        let prev_index = match self.current_index() {
            Some(index) if index > 0 => index - 1,
            _ => 0,
        };

        let prev_id = self.state.queue[prev_index];
        self.play(prev_id).await?;
        Ok(Some(prev_id))
    }

    /// Handle the current track finishing naturally.
    ///
    /// Repeat one replays from position 0, repeat all advances through the
    /// queue, repeat off stops without auto-advance.
    #[instrument(skip(self))]
    pub async fn on_track_ended(&mut self) -> Result<()> {
        match self.state.repeat {
            RepeatMode::One => {
                if let Some(track_id) = self.state.last_track_id {
                    // Reset before play so the resume logic starts at 0.
                    self.state.position_ms = 0;
                    self.play(track_id).await?;
                }
                Ok(())
            }
            RepeatMode::All => {
                self.next().await?;
                Ok(())
            }
            RepeatMode::Off => {
                self.adapter.stop().await?;
                self.player_state = PlayerState::Idle;
                if let Some(track_id) = self.state.last_track_id {
                    self.emit(PlayerEvent::Stopped {
                        track_id: track_id.0,
                    });
                }
                Ok(())
            }
        }
    }

    /// Handle a playback time-update tick: record the position and persist the
    /// whole state record, last write wins.
    pub async fn on_position_tick(&mut self, position_ms: u64) -> Result<()> {
        self.state.position_ms = position_ms;
        self.state_store.save(&self.state).await?;

        if let Some(track_id) = self.state.last_track_id {
            self.emit(PlayerEvent::PositionChanged {
                track_id: track_id.0,
                position_ms,
            });
        }
        Ok(())
    }

    /// Replace the queue with a stored playlist snapshot and play its first
    /// track. Returns the track started, or `None` when no usable snapshot
    /// exists (never cached, or evicted).
    #[instrument(skip(self), fields(playlist_id = %playlist_id))]
    pub async fn play_playlist_offline(
        &mut self,
        playlist_id: PlaylistId,
    ) -> Result<Option<TrackId>> {
        let Some(snapshot) = self.playlists.get(playlist_id).await? else {
            debug!("No stored snapshot for playlist");
            return Ok(None);
        };
        let Some(&first) = snapshot.track_ids.first() else {
            return Ok(None);
        };

        self.state.queue = snapshot.track_ids;
        self.play(first).await?;
        Ok(Some(first))
    }

    /// Toggle shuffle mode. Persisted with the next position tick.
    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
    }

    /// Cycle repeat mode: off -> one -> all -> off.
    pub fn cycle_repeat(&mut self) {
        self.state.repeat = self.state.repeat.cycled();
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn current_track_id(&self) -> Option<TrackId> {
        self.state.last_track_id
    }

    /// Catalog metadata for the current track, when it is in the snapshot.
    pub fn current_track(&self) -> Option<&CatalogTrack> {
        let current = self.state.last_track_id?;
        self.catalog_tracks.iter().find(|t| t.id == current.0)
    }

    pub fn queue(&self) -> &[TrackId] {
        &self.state.queue
    }

    pub fn shuffle(&self) -> bool {
        self.state.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.state.repeat
    }

    pub fn position_ms(&self) -> u64 {
        self.state.position_ms
    }

    pub fn player_state(&self) -> PlayerState {
        self.player_state
    }

    /// The catalog snapshot currently used for queue seeding and stream
    /// fallback resolution.
    pub fn catalog_tracks(&self) -> &[CatalogTrack] {
        &self.catalog_tracks
    }
}
