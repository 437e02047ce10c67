use bridge_traits::error::BridgeError;
use core_library::LibraryError;
use thiserror::Error;

/// Errors raised while downloading and verifying playlist content.
///
/// Per-track failures carry the offending track identity so callers can
/// surface them next to the progress already recorded.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Fetching track bytes failed at the transport level.
    #[error("Network failure fetching track {track_id}: {source}")]
    Network {
        track_id: i64,
        #[source]
        source: BridgeError,
    },

    /// The download endpoint answered with a non-success status.
    #[error("Download of track {track_id} failed with HTTP {status}")]
    Download { track_id: i64, status: u16 },

    /// Computed digest of the downloaded bytes does not equal the manifest
    /// digest. The bytes were discarded; nothing was stored.
    #[error("Integrity mismatch for track {track_id}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        track_id: i64,
        expected: String,
        actual: String,
    },

    /// Content store operation failed.
    #[error("Content store error: {0}")]
    Store(#[from] LibraryError),
}

impl CacheError {
    /// The track this error is attached to, when per-track.
    pub fn track_id(&self) -> Option<i64> {
        match self {
            CacheError::Network { track_id, .. }
            | CacheError::Download { track_id, .. }
            | CacheError::IntegrityMismatch { track_id, .. } => Some(*track_id),
            CacheError::Store(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
