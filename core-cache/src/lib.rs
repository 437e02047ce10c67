//! # Offline Cache Module
//!
//! Downloads playlist content into the content store and keeps it honest.
//!
//! ## Overview
//!
//! The cache manager orchestrates fetch → verify → store for every track in a
//! playlist manifest. Writes are fail-closed: bytes are only ever stored under
//! a digest they actually hash to, so a corrupt or tampered download can never
//! masquerade as valid offline content. Partial completion is a legitimate,
//! inspectable state: a failed pass leaves earlier verified tracks cached and
//! is healed by simply re-running the same operation.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │     CacheManager                       │
//! │  - download_playlist()                 │
//! │  - is_track_downloaded()               │
//! │  - remove_track()                      │
//! └────────┬───────────────────────────────┘
//!          │
//!          ├──> TrackStore / PlaylistStore (content store)
//!          ├──> HttpClient (track bytes)
//!          └──> EventBus (progress stream)
//! ```

pub mod digest;
pub mod error;
pub mod manager;
pub mod stats;

pub use digest::{digests_match, sha256_hex};
pub use error::{CacheError, Result};
pub use manager::CacheManager;
pub use stats::DownloadReport;
