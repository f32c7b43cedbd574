//! Tagged pipeline outcome.
//!
//! Every call to [`crate::PlaylistResolver::resolve`] ends in exactly one
//! of these variants. Serialized form:
//!
//! ```json
//! {"case": "Success", "playlist": {"title": "...", "kind": "...", "owner": {}, "tracks": []}}
//! {"case": "InvalidLink", "message": "..."}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::playlist::Playlist;

const NOT_FOUND_MESSAGE: &str = "Playlist was not found. Please make sure link is right";
const EMPTY_PLAYLIST_MESSAGE: &str = "Playlist has no tracks in it";
const UPSTREAM_FAILURE_MESSAGE: &str =
    "Request to the music service API was unsuccessful. Please try again later";
const NORMALIZATION_ERROR_MESSAGE: &str =
    "Playlist parsing was unsuccessful. Probably the API response structure changed";

/// Discriminant of a [`PipelineOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeCase {
    Success,
    InvalidLink,
    PlaylistNotFound,
    EmptyPlaylist,
    UpstreamFailure,
    NormalizationError,
}

impl OutcomeCase {
    /// Case name as it appears in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeCase::Success => "Success",
            OutcomeCase::InvalidLink => "InvalidLink",
            OutcomeCase::PlaylistNotFound => "PlaylistNotFound",
            OutcomeCase::EmptyPlaylist => "EmptyPlaylist",
            OutcomeCase::UpstreamFailure => "UpstreamFailure",
            OutcomeCase::NormalizationError => "NormalizationError",
        }
    }

    /// Whether retrying the same link later may succeed.
    ///
    /// `NormalizationError` is permanent until the normalizer is updated,
    /// so it is not transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, OutcomeCase::UpstreamFailure)
    }
}

impl fmt::Display for OutcomeCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of resolving one playlist link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "case")]
pub enum PipelineOutcome {
    /// Playlist resolved with at least one track.
    Success { playlist: Playlist },
    /// Link matched neither supported format.
    InvalidLink { message: String },
    /// Upstream confirmed the playlist does not exist.
    PlaylistNotFound { message: String },
    /// Playlist resolved but has no tracks.
    EmptyPlaylist { message: String },
    /// Fetch failed (status, decode, timeout or transport).
    UpstreamFailure { message: String },
    /// Upstream response did not match the expected structure.
    NormalizationError { message: String },
}

impl PipelineOutcome {
    pub fn success(playlist: Playlist) -> Self {
        PipelineOutcome::Success { playlist }
    }

    pub fn invalid_link(link: &str) -> Self {
        PipelineOutcome::InvalidLink {
            message: format!(
                "The link '{}' doesn't match any pattern. Please send valid link",
                link
            ),
        }
    }

    pub fn not_found() -> Self {
        PipelineOutcome::PlaylistNotFound {
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    pub fn empty_playlist() -> Self {
        PipelineOutcome::EmptyPlaylist {
            message: EMPTY_PLAYLIST_MESSAGE.to_string(),
        }
    }

    pub fn upstream_failure() -> Self {
        PipelineOutcome::UpstreamFailure {
            message: UPSTREAM_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn normalization_error() -> Self {
        PipelineOutcome::NormalizationError {
            message: NORMALIZATION_ERROR_MESSAGE.to_string(),
        }
    }

    /// Discriminant of this outcome.
    pub fn case(&self) -> OutcomeCase {
        match self {
            PipelineOutcome::Success { .. } => OutcomeCase::Success,
            PipelineOutcome::InvalidLink { .. } => OutcomeCase::InvalidLink,
            PipelineOutcome::PlaylistNotFound { .. } => OutcomeCase::PlaylistNotFound,
            PipelineOutcome::EmptyPlaylist { .. } => OutcomeCase::EmptyPlaylist,
            PipelineOutcome::UpstreamFailure { .. } => OutcomeCase::UpstreamFailure,
            PipelineOutcome::NormalizationError { .. } => OutcomeCase::NormalizationError,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }

    /// Caller-facing message; `None` for `Success`.
    pub fn message(&self) -> Option<&str> {
        match self {
            PipelineOutcome::Success { .. } => None,
            PipelineOutcome::InvalidLink { message }
            | PipelineOutcome::PlaylistNotFound { message }
            | PipelineOutcome::EmptyPlaylist { message }
            | PipelineOutcome::UpstreamFailure { message }
            | PipelineOutcome::NormalizationError { message } => Some(message),
        }
    }

    /// Resolved playlist; `None` for every failure case.
    pub fn playlist(&self) -> Option<&Playlist> {
        match self {
            PipelineOutcome::Success { playlist } => Some(playlist),
            _ => None,
        }
    }

    /// Consume the outcome, keeping only the playlist.
    pub fn into_playlist(self) -> Option<Playlist> {
        match self {
            PipelineOutcome::Success { playlist } => Some(playlist),
            _ => None,
        }
    }
}
