//! Tests for the cache manager
//!
//! Exercise the download pipeline against real in-memory stores with a mocked
//! HTTP client, covering the skip/fetch/verify/store decisions, fail-closed
//! writes, and progress reporting.

use async_trait::async_trait;
use bridge_traits::catalog::{CatalogTrack, ManifestEntry, PlaylistManifest};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bytes::Bytes;
use chrono::Utc;
use core_cache::{sha256_hex, CacheError, CacheManager};
use core_library::db::create_test_pool;
use core_library::models::{PlaylistId, StoredTrack, TrackId};
use core_library::repositories::{
    PlaylistStore, SqlitePlaylistStore, SqliteTrackStore, TrackStore,
};
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;

mock! {
    Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn response(status: u16, body: &[u8]) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::copy_from_slice(body),
    }
}

fn entry(id: i64, content: &[u8]) -> ManifestEntry {
    ManifestEntry {
        track: CatalogTrack {
            id,
            title: format!("Track {}", id),
            artist: None,
            album: None,
            duration_ms: Some(60_000),
            mime: "audio/mpeg".to_string(),
            size_bytes: content.len() as i64,
            sha256: sha256_hex(content),
        },
        download_url: format!("https://media.test/dl/{}", id),
    }
}

fn manifest(playlist_id: i64, entries: Vec<ManifestEntry>) -> PlaylistManifest {
    PlaylistManifest {
        playlist_id,
        name: format!("Playlist {}", playlist_id),
        updated_at: Utc::now(),
        tracks: entries,
    }
}

struct Fixture {
    tracks: Arc<SqliteTrackStore>,
    playlists: Arc<SqlitePlaylistStore>,
}

impl Fixture {
    async fn new() -> Self {
        let pool = create_test_pool().await.unwrap();
        Self {
            tracks: Arc::new(SqliteTrackStore::new(pool.clone())),
            playlists: Arc::new(SqlitePlaylistStore::new(pool)),
        }
    }

    fn manager(&self, http: MockHttp) -> CacheManager {
        CacheManager::new(self.tracks.clone(), self.playlists.clone(), Arc::new(http))
    }
}

/// Serve the given tracks by download URL.
fn serving(contents: Vec<(i64, Vec<u8>)>) -> MockHttp {
    let mut http = MockHttp::new();
    http.expect_execute().returning(move |request| {
        for (id, content) in &contents {
            if request.url == format!("https://media.test/dl/{}", id) {
                return Ok(response(200, content));
            }
        }
        Ok(response(404, b""))
    });
    http
}

#[tokio::test]
async fn fresh_download_fetches_and_stores_every_track() {
    let fixture = Fixture::new().await;
    let manifest = manifest(
        1,
        vec![entry(1, b"one"), entry(2, b"two"), entry(3, b"three")],
    );
    let manager = fixture.manager(serving(vec![
        (1, b"one".to_vec()),
        (2, b"two".to_vec()),
        (3, b"three".to_vec()),
    ]));

    let report = manager.download_playlist(&manifest).await.unwrap();

    assert_eq!((report.done, report.total, report.fetched), (3, 3, 3));
    for entry in &manifest.tracks {
        let stored = fixture
            .tracks
            .get(TrackId(entry.track.id))
            .await
            .unwrap()
            .expect("track must be cached");
        assert_eq!(stored.sha256, entry.track.sha256);
    }
}

#[tokio::test]
async fn mixed_cache_state_skips_valid_and_overwrites_stale() {
    // Manifest has 3 tracks; cache has track 2 missing and track 3 stale.
    let fixture = Fixture::new().await;
    let manifest = manifest(
        1,
        vec![entry(1, b"one"), entry(2, b"two"), entry(3, b"three")],
    );

    fixture
        .tracks
        .put(&StoredTrack {
            id: TrackId(1),
            blob: b"one".to_vec(),
            mime: "audio/mpeg".to_string(),
            sha256: sha256_hex(b"one"),
            size: 3,
        })
        .await
        .unwrap();
    fixture
        .tracks
        .put(&StoredTrack {
            id: TrackId(3),
            blob: b"old three".to_vec(),
            mime: "audio/mpeg".to_string(),
            sha256: sha256_hex(b"old three"),
            size: 9,
        })
        .await
        .unwrap();

    let manager = fixture.manager(serving(vec![
        (2, b"two".to_vec()),
        (3, b"three".to_vec()),
    ]));
    let report = manager.download_playlist(&manifest).await.unwrap();

    assert_eq!((report.done, report.total), (3, 3));
    assert_eq!(report.fetched, 2, "valid track 1 must be skipped");

    let restored = fixture.tracks.get(TrackId(3)).await.unwrap().unwrap();
    assert_eq!(restored.blob, b"three", "stale entry must be overwritten");
    assert_eq!(restored.sha256, sha256_hex(b"three"));
}

#[tokio::test]
async fn second_pass_on_unchanged_manifest_performs_zero_fetches() {
    let fixture = Fixture::new().await;
    let manifest = manifest(1, vec![entry(1, b"one"), entry(2, b"two")]);

    let first = fixture.manager(serving(vec![(1, b"one".to_vec()), (2, b"two".to_vec())]));
    first.download_playlist(&manifest).await.unwrap();

    let mut silent = MockHttp::new();
    silent.expect_execute().times(0);
    let second = fixture.manager(silent);

    let report = second.download_playlist(&manifest).await.unwrap();
    assert_eq!((report.done, report.total, report.fetched), (2, 2, 0));
}

#[tokio::test]
async fn integrity_mismatch_fails_closed_and_keeps_prior_successes() {
    let fixture = Fixture::new().await;
    let manifest = manifest(1, vec![entry(1, b"one"), entry(2, b"two")]);

    // The server returns corrupted bytes for track 2.
    let manager = fixture.manager(serving(vec![
        (1, b"one".to_vec()),
        (2, b"corrupted".to_vec()),
    ]));

    let err = manager.download_playlist(&manifest).await.unwrap_err();
    match err {
        CacheError::IntegrityMismatch {
            track_id,
            expected,
            actual,
        } => {
            assert_eq!(track_id, 2);
            assert_eq!(expected, sha256_hex(b"two"));
            assert_eq!(actual, sha256_hex(b"corrupted"));
        }
        other => panic!("expected IntegrityMismatch, got {:?}", other),
    }

    // Fail closed: nothing stored under track 2.
    assert!(fixture.tracks.get(TrackId(2)).await.unwrap().is_none());
    // No rollback: track 1 remains cached.
    assert!(fixture.tracks.contains(TrackId(1)).await.unwrap());
}

#[tokio::test]
async fn network_failure_halts_with_partial_progress_recorded() {
    let fixture = Fixture::new().await;
    let manifest = manifest(
        7,
        vec![entry(1, b"one"), entry(2, b"two"), entry(3, b"three")],
    );

    let mut http = MockHttp::new();
    http.expect_execute().returning(|request| {
        if request.url.ends_with("/1") {
            Ok(response(200, b"one"))
        } else {
            Err(BridgeError::Network("connection reset".to_string()))
        }
    });

    let bus = Arc::new(EventBus::new(32));
    let mut events = bus.subscribe();
    let manager = fixture.manager(http).with_event_bus(bus.clone());

    let err = manager.download_playlist(&manifest).await.unwrap_err();
    assert!(matches!(err, CacheError::Network { track_id: 2, .. }));
    assert_eq!(err.track_id(), Some(2));

    // Track 1 was verified before the failure and stays cached.
    assert!(fixture.tracks.contains(TrackId(1)).await.unwrap());

    let mut failed = None;
    while let Ok(event) = events.try_recv() {
        if let CoreEvent::Cache(CacheEvent::DownloadFailed { done, total, .. }) = event {
            failed = Some((done, total));
        }
    }
    assert_eq!(failed, Some((1, 3)), "failure event carries partial progress");
}

#[tokio::test]
async fn snapshot_is_persisted_before_any_track_body() {
    let fixture = Fixture::new().await;
    let manifest = manifest(4, vec![entry(1, b"one"), entry(2, b"two")]);

    // Every fetch fails; the snapshot must exist regardless.
    let mut http = MockHttp::new();
    http.expect_execute()
        .returning(|_| Err(BridgeError::Network("offline".to_string())));
    let manager = fixture.manager(http);

    manager.download_playlist(&manifest).await.unwrap_err();

    let snapshot = fixture
        .playlists
        .get(PlaylistId(4))
        .await
        .unwrap()
        .expect("snapshot must exist mid-download");
    assert_eq!(snapshot.track_ids, vec![TrackId(1), TrackId(2)]);
    assert_eq!(snapshot.name, "Playlist 4");
}

#[tokio::test]
async fn progress_events_are_monotonic_per_track() {
    let fixture = Fixture::new().await;
    let manifest = manifest(
        1,
        vec![entry(1, b"one"), entry(2, b"two"), entry(3, b"three")],
    );

    let bus = Arc::new(EventBus::new(32));
    let mut events = bus.subscribe();
    let manager = fixture
        .manager(serving(vec![
            (1, b"one".to_vec()),
            (2, b"two".to_vec()),
            (3, b"three".to_vec()),
        ]))
        .with_event_bus(bus.clone());

    manager.download_playlist(&manifest).await.unwrap();

    let mut progress = Vec::new();
    let mut completed = false;
    while let Ok(event) = events.try_recv() {
        match event {
            CoreEvent::Cache(CacheEvent::DownloadProgress { done, total, .. }) => {
                progress.push((done, total));
            }
            CoreEvent::Cache(CacheEvent::DownloadCompleted { total, .. }) => {
                completed = total == 3;
            }
            _ => {}
        }
    }

    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
    assert!(completed);
}

#[tokio::test]
async fn http_error_status_aborts_that_track() {
    let fixture = Fixture::new().await;
    let manifest = manifest(1, vec![entry(9, b"nine")]);

    // No content registered: the stub answers 404.
    let manager = fixture.manager(serving(vec![]));

    let err = manager.download_playlist(&manifest).await.unwrap_err();
    assert!(matches!(
        err,
        CacheError::Download {
            track_id: 9,
            status: 404
        }
    ));
    assert!(fixture.tracks.get(TrackId(9)).await.unwrap().is_none());
}

#[tokio::test]
async fn download_state_accessors() {
    let fixture = Fixture::new().await;
    let manifest = manifest(1, vec![entry(1, b"one")]);
    let manager = fixture.manager(serving(vec![(1, b"one".to_vec())]));

    assert!(!manager.is_track_downloaded(TrackId(1)).await.unwrap());
    manager.download_playlist(&manifest).await.unwrap();
    assert!(manager.is_track_downloaded(TrackId(1)).await.unwrap());

    assert!(manager.remove_track(TrackId(1)).await.unwrap());
    assert!(!manager.is_track_downloaded(TrackId(1)).await.unwrap());
}
