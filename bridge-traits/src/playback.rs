//! Playback bridge traits and supporting audio types.
//!
//! These abstractions let the playback engine drive a platform audio engine
//! without depending on one. Host applications provide the concrete
//! implementation (a desktop audio stack, a web `<audio>` element wrapper, a
//! test double); the engine only issues transport commands and hands over a
//! resolved [`AudioSource`].

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::error::Result;

/// High-level audio source descriptor handed to a playback adapter.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Remote HTTP(S) stream to be fetched by the host.
    RemoteStream { url: String },
    /// In-memory audio buffer supplied from the offline cache. Dropping the
    /// source releases the buffer.
    MemoryBuffer { data: Bytes, mime: String },
}

impl AudioSource {
    /// Determine whether the source represents remote content.
    pub fn is_remote(&self) -> bool {
        matches!(self, AudioSource::RemoteStream { .. })
    }
}

/// Host playback primitive.
///
/// One source is loaded at a time; `load` replaces whatever was loaded before.
/// Transport calls are fire-and-forget commands; the adapter reports failures
/// through its `Result`, not through a callback channel.
#[async_trait]
pub trait PlaybackAdapter: Send + Sync {
    /// Load a source, replacing the current one.
    async fn load(&self, source: AudioSource) -> Result<()>;

    /// Begin or resume playback of the loaded source.
    async fn play(&self) -> Result<()>;

    /// Pause playback, keeping the loaded source and position.
    async fn pause(&self) -> Result<()>;

    /// Stop playback and unload the current source.
    async fn stop(&self) -> Result<()>;

    /// Seek to an absolute position within the loaded source.
    async fn seek(&self, position: Duration) -> Result<()>;
}
