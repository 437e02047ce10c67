//! Download reporting types.

use serde::{Deserialize, Serialize};

/// Final outcome of a playlist download pass.
///
/// `done` counts tracks verified during the pass, whether skipped because
/// already valid or freshly stored. On success `done == total`; on failure the
/// report inside the error event shows how far the pass got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReport {
    pub playlist_id: i64,
    pub done: usize,
    pub total: usize,
    /// Tracks whose bytes were actually fetched (not skipped).
    pub fetched: usize,
}

impl DownloadReport {
    pub fn is_complete(&self) -> bool {
        self.done == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness() {
        let report = DownloadReport {
            playlist_id: 1,
            done: 3,
            total: 3,
            fetched: 1,
        };
        assert!(report.is_complete());
    }
}
