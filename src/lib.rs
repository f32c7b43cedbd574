//! # ym-playlist
//!
//! Resolves public Yandex Music playlist links into a normalized JSON
//! document suitable for embedding in another application's UI.
//!
//! ## Quick Start
//!
//! The easiest way to use this library is through the [`PlaylistResolver`] struct:
//!
//! ```rust,no_run
//! use ym_playlist::{Config, PipelineOutcome, PlaylistResolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let resolver = PlaylistResolver::new(Config::new("Session_id=..."))?;
//!
//!     match resolver.resolve("https://music.yandex.ru/playlists/lk.abc").await {
//!         PipelineOutcome::Success { playlist } => {
//!             println!("{} ({} tracks)", playlist.title, playlist.len());
//!         }
//!         other => println!("{}: {}", other.case(), other.message().unwrap_or("")),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Supported links
//!
//! - `https://music.yandex.ru/users/{owner}/playlists/{kind}`
//! - `https://music.yandex.ru/playlists/{id}`
//!
//! ## Low-Level APIs
//!
//! - [`LinkClassifier`] - link pattern matching
//! - [`PlaylistFetcher`] - upstream requests with bounded retries
//! - [`converters`] - payload normalization and iframe derivation

pub mod api;
pub mod config;
pub mod converters;
pub mod error;
pub mod link;
pub mod models;
mod resolver;

// Main interface (recommended)
pub use resolver::PlaylistResolver;

// Low-level APIs
pub use api::{Endpoints, FetchOutcome, PlaylistFetcher};
pub use config::{Config, RequesterConfig};
pub use error::ResolverError;
pub use link::{LinkClassifier, LinkKind};
pub use models::{OutcomeCase, PipelineOutcome, Playlist, PlaylistTrack};
