//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the offline playback core:
//! - Logging and tracing infrastructure
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other modules depend on. It
//! establishes the logging conventions and the event broadcasting mechanism
//! used to surface download progress, repair outcomes, and playback
//! transitions to the host shell.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
