//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the audio host core:
//! - Logging and tracing infrastructure
//! - Configuration management (bridge wiring)
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the playback and service
//! crates depend on. It establishes the logging conventions, the fail-fast
//! capability checks and the in-process event broadcasting used throughout the
//! system.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
