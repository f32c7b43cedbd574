//! Data models for resolved playlists.
//!
//! This module contains the canonical playlist structure produced from
//! either upstream response shape, and the tagged outcome returned to
//! callers.

pub mod outcome;
pub mod playlist;

// Re-exports for convenience
pub use outcome::{OutcomeCase, PipelineOutcome};
pub use playlist::{Playlist, PlaylistTrack};
