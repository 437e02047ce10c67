//! # Event Bus System
//!
//! Decoupled communication between core modules and the host shell through
//! typed events over `tokio::sync::broadcast`.
//!
//! The cache manager publishes per-track download progress here, the repair
//! coordinator publishes pass outcomes, and the playback engine publishes
//! transport transitions. Subscribers are independent: a slow one receives
//! `RecvError::Lagged` without blocking the fast ones, and `Closed` signals
//! shutdown.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Cache(CacheEvent::DownloadProgress {
//!         playlist_id: 1,
//!         done: 2,
//!         total: 10,
//!     }))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.severity(), core_runtime::events::EventSeverity::Debug);
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall behind by more than this receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Cache download events
    Cache(CacheEvent),
    /// Repair pass events
    Repair(RepairEvent),
    /// Playback transport events
    Player(PlayerEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Cache(e) => e.description(),
            CoreEvent::Repair(e) => e.description(),
            CoreEvent::Player(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Cache(CacheEvent::DownloadFailed { .. }) => EventSeverity::Error,
            CoreEvent::Repair(RepairEvent::PlaylistFailed { .. }) => EventSeverity::Error,
            CoreEvent::Player(PlayerEvent::Error { .. }) => EventSeverity::Error,
            CoreEvent::Cache(CacheEvent::DownloadCompleted { .. }) => EventSeverity::Info,
            CoreEvent::Repair(RepairEvent::Completed { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Cache Events
// ============================================================================

/// Events emitted by the cache manager while downloading a playlist.
///
/// `done`/`total` form the progress stream consumed by the shell's downloads
/// view; `done` is monotonic within one download pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CacheEvent {
    /// A playlist download pass began.
    DownloadStarted {
        /// The playlist being downloaded.
        playlist_id: i64,
        /// Number of tracks in the manifest.
        total: usize,
    },
    /// A track was verified (freshly stored or already valid).
    DownloadProgress {
        /// The playlist being downloaded.
        playlist_id: i64,
        /// Tracks verified so far.
        done: usize,
        /// Number of tracks in the manifest.
        total: usize,
    },
    /// A track's bytes were fetched, verified, and stored.
    TrackCached {
        /// The cached track.
        track_id: i64,
        /// Stored blob size in bytes.
        size: u64,
    },
    /// The whole manifest was verified.
    DownloadCompleted {
        /// The downloaded playlist.
        playlist_id: i64,
        /// Number of tracks in the manifest.
        total: usize,
    },
    /// The pass halted. Tracks verified before the failure stay cached.
    DownloadFailed {
        /// The playlist whose download halted.
        playlist_id: i64,
        /// Human-readable error message.
        message: String,
        /// Tracks verified before the failure.
        done: usize,
        /// Number of tracks in the manifest.
        total: usize,
    },
}

impl CacheEvent {
    fn description(&self) -> &str {
        match self {
            CacheEvent::DownloadStarted { .. } => "Playlist download started",
            CacheEvent::DownloadProgress { .. } => "Playlist download in progress",
            CacheEvent::TrackCached { .. } => "Track cached",
            CacheEvent::DownloadCompleted { .. } => "Playlist download completed",
            CacheEvent::DownloadFailed { .. } => "Playlist download failed",
        }
    }
}

// ============================================================================
// Repair Events
// ============================================================================

/// Events emitted by the repair coordinator during a repair pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum RepairEvent {
    /// Repair pass initiated.
    Started {
        /// Number of playlists to validate.
        playlists: usize,
    },
    /// A playlist was validated and found healthy.
    PlaylistHealthy {
        /// The validated playlist.
        playlist_id: i64,
    },
    /// A fault was detected and the playlist was re-downloaded.
    PlaylistRepaired {
        /// The repaired playlist.
        playlist_id: i64,
    },
    /// Validation or re-download of one playlist failed. The pass continues
    /// with the remaining playlists.
    PlaylistFailed {
        /// The failed playlist.
        playlist_id: i64,
        /// Human-readable error message.
        message: String,
    },
    /// Repair pass finished.
    Completed {
        /// Playlists that needed and received a fresh download pass.
        repaired: usize,
        /// Playlists whose validation or repair failed.
        failed: usize,
    },
}

impl RepairEvent {
    fn description(&self) -> &str {
        match self {
            RepairEvent::Started { .. } => "Repair pass started",
            RepairEvent::PlaylistHealthy { .. } => "Playlist verified healthy",
            RepairEvent::PlaylistRepaired { .. } => "Playlist repaired",
            RepairEvent::PlaylistFailed { .. } => "Playlist repair failed",
            RepairEvent::Completed { .. } => "Repair pass completed",
        }
    }
}

// ============================================================================
// Player Events
// ============================================================================

/// Events emitted by the playback engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    /// Playback started.
    Started {
        /// The track being played.
        track_id: i64,
        /// Whether the source came from the offline cache.
        from_cache: bool,
    },
    /// Playback paused.
    Paused {
        /// The current track.
        track_id: i64,
        /// Position when paused (milliseconds).
        position_ms: u64,
    },
    /// Playback stopped (end of queue, or repeat off).
    Stopped {
        /// The track that was playing.
        track_id: i64,
    },
    /// Playback position changed (tick or seek).
    PositionChanged {
        /// The current track.
        track_id: i64,
        /// New position (milliseconds).
        position_ms: u64,
    },
    /// Playback error occurred.
    Error {
        /// The track, when known.
        track_id: Option<i64>,
        /// Human-readable error message.
        message: String,
    },
}

impl PlayerEvent {
    fn description(&self) -> &str {
        match self {
            PlayerEvent::Started { .. } => "Playback started",
            PlayerEvent::Paused { .. } => "Playback paused",
            PlayerEvent::Stopped { .. } => "Playback stopped",
            PlayerEvent::PositionChanged { .. } => "Playback position changed",
            PlayerEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally: multiple producers (clone the
/// bus), multiple consumers (each `subscribe()` creates a new receiver),
/// non-blocking sends, and lagging detection for slow subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// when there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that observes all future
    /// events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
