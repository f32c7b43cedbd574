//! API client for the Yandex Music playlist endpoints.
//!
//! [`PlaylistFetcher`] talks to both upstream surfaces (legacy handler and
//! modern API) and reports a tagged [`FetchOutcome`].

pub mod fetcher;

pub use fetcher::{Endpoints, FetchOutcome, PlaylistFetcher};
