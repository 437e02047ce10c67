//! # Content Store
//!
//! Durable local storage for the offline playback core: three independent
//! collections (cached track blobs, playlist snapshots, singleton playback
//! state) backed by SQLite, surviving process restarts.
//!
//! Every operation is a single atomic statement (it either fully applies or
//! has no visible effect), and concurrent operations on different keys do not
//! corrupt each other. The store carries no business logic: verification
//! belongs to `core-cache`, recovery to `core-sync`.
//!
//! The host environment may silently evict storage (low disk, privacy sweep).
//! The store deliberately cannot tell an evicted key from one that never
//! existed; both read as absent, and the repair coordinator heals the
//! difference.

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use error::{LibraryError, Result};
