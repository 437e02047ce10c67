use bridge_traits::error::BridgeError;
use core_library::models::TrackId;
use core_library::LibraryError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No playable source could be resolved: the track has neither a cached
    /// blob nor a stream URL resolvable through the catalog. Playback stays
    /// idle.
    #[error("No playable source for track {0}")]
    Unavailable(TrackId),

    /// The host playback adapter rejected a transport command.
    #[error("Playback adapter error: {0}")]
    Adapter(#[from] BridgeError),

    /// Refreshing the catalog snapshot failed (typically: offline).
    #[error("Catalog unavailable: {0}")]
    Catalog(#[source] BridgeError),

    /// Reading cached content or persisting playback state failed.
    #[error("Content store error: {0}")]
    Store(#[from] LibraryError),
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
