//! Playlist fetcher for the Yandex Music APIs.
//!
//! Two upstream surfaces are used, each with its own auth requirements:
//! - Legacy handler (`music.yandex.ru/handlers/playlist.jsx`): needs the
//!   session cookie and browser-like headers.
//! - Modern API (`api.music.yandex.by/playlist/{id}`): called with client
//!   defaults only.
//!
//! Only a 200 response with an undecodable body is retried. Non-200
//! statuses, timeouts and transport faults end the fetch immediately.

use reqwest::header::{ACCEPT, COOKIE, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::RequesterConfig;
use crate::error::Result;
use crate::link::LinkKind;

/// Base URL of the legacy handler endpoint.
pub const OLD_API_BASE_URL: &str = "https://music.yandex.ru";

/// Base URL of the modern API endpoint.
pub const NEW_API_BASE_URL: &str = "https://api.music.yandex.by";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36 OPR/126.0.0.0";

/// Characters of an undecodable body kept for diagnostics.
const SNIPPET_CHARS: usize = 500;

/// Upstream base URLs. Paths and queries are fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub old_base: String,
    pub new_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            old_base: OLD_API_BASE_URL.to_string(),
            new_base: NEW_API_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point both surfaces at the same base, e.g. a local mock server.
    pub fn single<S: Into<String>>(base: S) -> Self {
        let base = base.into();
        Self {
            old_base: base.clone(),
            new_base: base,
        }
    }

    /// Full request URL for a link kind.
    pub fn url_for(&self, kind: &LinkKind) -> String {
        match kind {
            LinkKind::Old { owner, kinds } => format!(
                "{}/handlers/playlist.jsx?owner={}&kinds={}",
                self.old_base, owner, kinds
            ),
            LinkKind::New { id } => format!(
                "{}/playlist/{}?resumestream=false&richtracks=true",
                self.new_base, id
            ),
        }
    }
}

/// Result of one complete, possibly multi-attempt, fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 200 with a JSON body.
    Success { payload: Value, attempts_used: u32 },
    /// Upstream reported the playlist as not found.
    NotFound,
    /// Non-200 status other than not-found.
    UpstreamError {
        status_code: u16,
        raw_body: String,
        attempts_used: u32,
    },
    /// 200 responses kept arriving with undecodable bodies.
    DecodeError {
        raw_body_snippet: String,
        attempts_used: u32,
    },
    /// A single attempt exceeded the request timeout.
    Timeout { attempts_used: u32 },
    /// Connection, TLS, redirect or body read failure.
    TransportError { detail: String, attempts_used: u32 },
}

impl FetchOutcome {
    /// Attempts consumed; `None` for `NotFound`.
    pub fn attempts_used(&self) -> Option<u32> {
        match self {
            FetchOutcome::NotFound => None,
            FetchOutcome::Success { attempts_used, .. }
            | FetchOutcome::UpstreamError { attempts_used, .. }
            | FetchOutcome::DecodeError { attempts_used, .. }
            | FetchOutcome::Timeout { attempts_used }
            | FetchOutcome::TransportError { attempts_used, .. } => Some(*attempts_used),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// Truncate a body to the diagnostic snippet length on a char boundary.
fn snippet(body: &str) -> String {
    body.chars().take(SNIPPET_CHARS).collect()
}

/// Playlist fetcher with bounded retries.
#[derive(Debug, Clone)]
pub struct PlaylistFetcher {
    client: Client,
    config: RequesterConfig,
    endpoints: Endpoints,
}

impl PlaylistFetcher {
    /// Create a fetcher against the production endpoints.
    pub fn new(config: RequesterConfig) -> Result<Self> {
        Self::with_endpoints(config, Endpoints::default())
    }

    /// Create a fetcher against custom base URLs.
    pub fn with_endpoints(config: RequesterConfig, endpoints: Endpoints) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;

        Ok(Self {
            client,
            config,
            endpoints,
        })
    }

    /// Settings this fetcher was built with.
    pub fn config(&self) -> &RequesterConfig {
        &self.config
    }

    /// Base URLs this fetcher requests.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Build the GET request for a link kind.
    ///
    /// Only the legacy endpoint gets the session cookie and browser headers.
    fn request(&self, kind: &LinkKind, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match kind {
            LinkKind::Old { .. } => request
                .header(ACCEPT, BROWSER_ACCEPT)
                .header(USER_AGENT, BROWSER_USER_AGENT)
                .header(COOKIE, self.config.session_id.as_str()),
            LinkKind::New { .. } => request,
        }
    }

    /// Fetch the raw playlist payload for a link kind.
    ///
    /// Performs at most `max_retries + 1` attempts, sleeping
    /// `between_attempt_sleep_time` before every attempt after the first.
    pub async fn fetch(&self, kind: &LinkKind) -> FetchOutcome {
        let url = self.endpoints.url_for(kind);
        let total_attempts = self.config.total_attempts();
        debug!(
            "Started data requesting with {} retries from '{}'",
            self.config.max_retries, url
        );

        let mut attempt: u32 = 1;
        loop {
            debug!("Attempt #{} started", attempt);
            if attempt > 1 {
                tokio::time::sleep(self.config.sleep_duration()).await;
                debug!("Retrying");
            }

            let response = match self.request(kind, &url).send().await {
                Ok(response) => response,
                Err(e) => return transport_failure(e, &url, attempt),
            };

            let status = response.status();
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => return transport_failure(e, &url, attempt),
            };

            if status != StatusCode::OK {
                return error_status(status, &body, &url, attempt);
            }

            match serde_json::from_slice::<Value>(&body) {
                Ok(payload) => {
                    debug!("Received valid JSON on attempt #{}", attempt);
                    return FetchOutcome::Success {
                        payload,
                        attempts_used: attempt,
                    };
                }
                Err(e) => {
                    warn!("Undecodable 200 response from '{}': {}", url, e);
                    if attempt < total_attempts {
                        attempt += 1;
                        continue;
                    }

                    let raw_body_snippet = snippet(&String::from_utf8_lossy(&body));
                    error!(
                        "Request to '{}' failed after {} attempts due to undecodable JSON",
                        url, attempt
                    );
                    return FetchOutcome::DecodeError {
                        raw_body_snippet,
                        attempts_used: attempt,
                    };
                }
            }
        }
    }
}

/// Map a request-level failure to its outcome.
fn transport_failure(e: reqwest::Error, url: &str, attempt: u32) -> FetchOutcome {
    if e.is_timeout() {
        error!("Timeout while requesting '{}': {}", url, e);
        FetchOutcome::Timeout {
            attempts_used: attempt,
        }
    } else {
        error!("HTTP error while requesting '{}': {}", url, e);
        FetchOutcome::TransportError {
            detail: e.to_string(),
            attempts_used: attempt,
        }
    }
}

/// Map a non-200 response to its outcome.
///
/// A JSON body whose `message` is `"Not Found"` is a definitive miss;
/// anything else, including a non-JSON body, is an upstream error.
fn error_status(status: StatusCode, body: &[u8], url: &str, attempt: u32) -> FetchOutcome {
    let raw_body = String::from_utf8_lossy(body).into_owned();
    warn!(
        "Unsuccessful request to '{}' ({}). Response: {}",
        url, status, raw_body
    );

    let not_found = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(|m| m == "Not Found"))
        .unwrap_or(false);

    if not_found {
        debug!("'{}' reported not found on attempt #{}", url, attempt);
        return FetchOutcome::NotFound;
    }

    FetchOutcome::UpstreamError {
        status_code: status.as_u16(),
        raw_body,
        attempts_used: attempt,
    }
}
