//! Native bridge implementations.
//!
//! Provides the desktop-side implementations of the `bridge-traits`
//! contracts: a reqwest-backed [`HttpClient`](bridge_traits::HttpClient) and
//! an HTTP client for the remote catalog service. The playback adapter is
//! intentionally absent here; the host shell owns the audio device and
//! supplies its own [`PlaybackAdapter`](bridge_traits::PlaybackAdapter).

pub mod catalog;
pub mod http;

pub use catalog::HttpCatalogClient;
pub use http::ReqwestHttpClient;
