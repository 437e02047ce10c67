use bridge_traits::error::BridgeError;
use core_cache::CacheError;
use core_library::LibraryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepairError {
    /// Fetching the authoritative manifest failed.
    #[error("Failed to fetch manifest: {0}")]
    Catalog(#[from] BridgeError),

    /// The remediation download pass failed.
    #[error("Repair download failed: {0}")]
    Download(#[from] CacheError),

    /// Reading cached content for validation failed.
    #[error("Content store error: {0}")]
    Store(#[from] LibraryError),
}

pub type Result<T> = std::result::Result<T, RepairError>;
