//! # Playback Control Module
//!
//! Drives a single platform media handle on behalf of a web front-end.
//!
//! ## Overview
//!
//! This module handles:
//! - The playback state machine (`Idle` → `Preparing` → `Playing` ⇄ `Paused` → `Ended`)
//! - Ownership of the one active [`MediaResource`]
//! - Periodic progress sampling while playing
//! - Relaying playback and permission events to the front-end
//!
//! Decoding and audio output belong to the host's
//! [`MediaEngine`](bridge_traits::MediaEngine); this crate only orchestrates it.

pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod resource;
pub mod scheduler;
pub mod state;

pub use bridge::EventBridge;
pub use config::PlayerConfig;
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use resource::{MediaResource, ResourceId};
pub use scheduler::ProgressScheduler;
pub use state::{PlaybackState, PlayerSnapshot, ProgressSample};
