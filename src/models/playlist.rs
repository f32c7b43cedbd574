//! Canonical playlist models.
//!
//! Both upstream response shapes are normalized into these structures.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A track in canonical form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaylistTrack {
    /// Track title.
    pub title: String,

    /// Cover URI template as returned upstream.
    pub cover_uri: String,

    /// Embeddable player fragment, empty when it could not be derived.
    pub iframe: String,

    /// Artist names in upstream order.
    pub artists: Vec<String>,
}

impl PlaylistTrack {
    /// Whether an embeddable player fragment is available.
    pub fn has_iframe(&self) -> bool {
        !self.iframe.is_empty()
    }

    /// Get all artist names joined by a separator.
    pub fn artists_string(&self, separator: &str) -> String {
        self.artists.join(separator)
    }
}

/// A playlist in canonical form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    /// Playlist title.
    pub title: String,

    /// Playlist kind (numeric kinds are stringified).
    pub kind: String,

    /// Owner object, copied verbatim from upstream.
    pub owner: Map<String, Value>,

    /// Tracks in playlist order.
    pub tracks: Vec<PlaylistTrack>,
}

impl Playlist {
    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Owner login, if the upstream owner object carries one.
    pub fn owner_login(&self) -> Option<&str> {
        self.owner.get("login").and_then(|v| v.as_str())
    }
}
