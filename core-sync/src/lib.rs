//! # Repair Module
//!
//! Self-healing for the offline cache.
//!
//! ## Overview
//!
//! The host environment may silently evict cached content, and stored blobs
//! can rot. The repair coordinator walks all known playlists, re-validates
//! every cached track against the latest authoritative manifest, and hands any
//! faulted playlist back to the cache manager for a fresh download pass. It is
//! the counterpart to the cache manager's fail-closed writes: writes never
//! admit bad content, repair recovers from content that went bad (or missing)
//! afterwards.
//!
//! ## Components
//!
//! - **Repair Coordinator** (`coordinator`): orchestrates the validation sweep
//!   and per-playlist remediation

pub mod coordinator;
pub mod error;

pub use coordinator::{RepairCoordinator, RepairReport};
pub use error::{RepairError, Result};
