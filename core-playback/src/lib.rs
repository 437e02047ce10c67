//! # Playback Engine
//!
//! The state machine that consumes the offline cache: it owns the current
//! track, the ordered queue, shuffle/repeat modes, and the playback position,
//! and persists all of it continuously so a session survives restarts.
//!
//! Source resolution always prefers a cached blob over the remote stream URL;
//! the network is the fallback, not the default. Actual audio output is
//! delegated to the host's [`PlaybackAdapter`](bridge_traits::PlaybackAdapter):
//! the engine issues transport commands and tracks the resulting state, it
//! never touches an audio device itself.

pub mod engine;
pub mod error;

pub use engine::{PlayerEngine, PlayerState};
pub use error::{PlaybackError, Result};
