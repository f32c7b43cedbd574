//! Unified playlist resolver.
//!
//! Classifies a link, fetches the matching upstream payload and normalizes
//! it. Every path ends in a [`PipelineOutcome`]; failure details are
//! logged rather than returned.

use tracing::{debug, error, info};

use crate::api::{Endpoints, FetchOutcome, PlaylistFetcher};
use crate::config::Config;
use crate::converters;
use crate::error::Result;
use crate::link::LinkClassifier;
use crate::models::PipelineOutcome;

/// Main resolver interface.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use ym_playlist::{Config, PlaylistResolver};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::from_file("config/config.json")?;
///     let resolver = PlaylistResolver::new(config)?;
///
///     let outcome = resolver
///         .resolve("https://music.yandex.ru/users/alice/playlists/3")
///         .await;
///     println!("{}", serde_json::to_string_pretty(&outcome)?);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PlaylistResolver {
    classifier: LinkClassifier,
    fetcher: PlaylistFetcher,
}

impl PlaylistResolver {
    /// Create a resolver against the production endpoints.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_endpoints(config, Endpoints::default())
    }

    /// Create a resolver against custom base URLs.
    pub fn with_endpoints(config: Config, endpoints: Endpoints) -> Result<Self> {
        config.validate()?;
        let classifier = LinkClassifier::new(&config.service_host)?;
        let fetcher = PlaylistFetcher::with_endpoints(config.requester, endpoints)?;

        Ok(Self::from_parts(classifier, fetcher))
    }

    /// Assemble a resolver from prebuilt components.
    pub fn from_parts(classifier: LinkClassifier, fetcher: PlaylistFetcher) -> Self {
        Self {
            classifier,
            fetcher,
        }
    }

    /// Resolve a playlist link into its outcome.
    pub async fn resolve(&self, link: &str) -> PipelineOutcome {
        debug!("Started parsing link {}", link);

        let Some(kind) = self.classifier.classify(link) else {
            debug!("Link {} is invalid", link);
            return PipelineOutcome::invalid_link(link);
        };
        debug!("Link {} classified as {}", link, kind);

        let payload = match self.fetcher.fetch(&kind).await {
            FetchOutcome::Success {
                payload,
                attempts_used,
            } => {
                debug!("Fetched {} after {} attempt(s)", kind, attempts_used);
                payload
            }
            FetchOutcome::NotFound => {
                info!("Playlist {} was not found upstream", kind);
                return PipelineOutcome::not_found();
            }
            failure => {
                error!("Fetching {} failed: {:?}", kind, failure);
                return PipelineOutcome::upstream_failure();
            }
        };

        let playlist = match converters::normalize_playlist(&payload, &kind) {
            Ok(playlist) => playlist,
            Err(e) => {
                error!(
                    "Unexpected error occurred while normalizing playlist at '{}': {}",
                    link, e
                );
                return PipelineOutcome::normalization_error();
            }
        };

        if playlist.is_empty() {
            info!("Playlist at '{}' has no tracks", link);
            return PipelineOutcome::empty_playlist();
        }

        info!(
            "Resolved playlist '{}' with {} tracks",
            playlist.title,
            playlist.len()
        );
        PipelineOutcome::success(playlist)
    }
}
