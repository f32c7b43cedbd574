//! Playlist link classification.
//!
//! Two link formats are recognized:
//! - `https://<host>/users/{owner}/playlists/{kinds}` (legacy user playlists)
//! - `https://<host>/playlists/{id}` (shareable playlist ids)
//!
//! Matching is anchored at the start of the link only; anything after the
//! captured segments is ignored.

use std::fmt;

use regex::Regex;

use crate::config::DEFAULT_SERVICE_HOST;
use crate::error::{ResolverError, Result};

/// Which upstream API shape a link maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// Legacy handler endpoint, addressed by owner login and playlist kind.
    Old { owner: String, kinds: String },
    /// Modern API endpoint, addressed by playlist id.
    New { id: String },
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Old { owner, kinds } => write!(f, "old(owner={}, kinds={})", owner, kinds),
            LinkKind::New { id } => write!(f, "new(id={})", id),
        }
    }
}

/// Compiled link patterns for one service host.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    old_format: Regex,
    new_format: Regex,
}

impl Default for LinkClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_HOST).expect("default link patterns are valid")
    }
}

impl LinkClassifier {
    /// Compile the link patterns for `host`.
    pub fn new(host: &str) -> Result<Self> {
        let host = regex::escape(host);
        let old_format = Regex::new(&format!(
            r"^https://{}/users/([^/?]+)/playlists/([^/?]+)",
            host
        ))
        .map_err(|e| ResolverError::Config(format!("invalid link pattern: {}", e)))?;
        let new_format = Regex::new(&format!(r"^https://{}/playlists/([^/?]+)", host))
            .map_err(|e| ResolverError::Config(format!("invalid link pattern: {}", e)))?;

        Ok(Self {
            old_format,
            new_format,
        })
    }

    /// Classify a link. First match wins; `None` means unrecognized.
    pub fn classify(&self, link: &str) -> Option<LinkKind> {
        if let Some(caps) = self.old_format.captures(link) {
            return Some(LinkKind::Old {
                owner: caps[1].to_string(),
                kinds: caps[2].to_string(),
            });
        }

        self.new_format.captures(link).map(|caps| LinkKind::New {
            id: caps[1].to_string(),
        })
    }
}
