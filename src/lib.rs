//! Workspace facade crate.
//!
//! This crate exists so host applications can depend on `tempo-core` and reach
//! every workspace crate through a single dependency instead of wiring each
//! crate individually. The members are re-exported under their crate names.

pub use bridge_desktop;
pub use bridge_traits;
pub use core_cache;
pub use core_library;
pub use core_playback;
pub use core_runtime;
pub use core_sync;
