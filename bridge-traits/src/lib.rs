//! Collaborator contracts for the offline playback core.
//!
//! The core never talks to the network, the remote catalog, or the host audio
//! engine directly; it goes through the traits defined here. Host applications
//! (or `bridge-desktop` for native targets) provide the concrete
//! implementations, which keeps the domain crates testable with mocks and free
//! of platform dependencies.

pub mod catalog;
pub mod error;
pub mod http;
pub mod playback;

pub use catalog::{CatalogService, CatalogTrack, ManifestEntry, PlaylistManifest, PlaylistSummary};
pub use error::{BridgeError, Result};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use playback::{AudioSource, PlaybackAdapter};
