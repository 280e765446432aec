//! Turns a `!play` query into something the voice driver can stream.
//!
//! The query is either passed straight through (links) or turned into a
//! YouTube search, handed to an [`Extractor`], and the first usable entry of
//! the result is reduced to a [`ResolvedTrack`].

/// Submodule defining the extractor's output and the resolved track.
pub mod track_metadata;
/// Submodule implementing the `Extractor` trait on top of `yt-dlp`.
pub mod youtube;

use regex::Regex;
use serenity::async_trait;
use std::borrow::Cow;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

pub use track_metadata::{ExtractedInfo, ResolvedTrack};
pub use youtube::YtDlp;

/// Prefix that makes the extractor run a site search instead of a lookup.
pub const SEARCH_PREFIX: &str = "ytsearch:";

/// Anything that starts with a web scheme is treated as a direct link.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// Errors raised while resolving a query.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The extractor itself reported a failure (unsupported link, video unavailable, ...).
    #[error("extractor failed: {0}")]
    Extraction(String),

    #[error("no information returned for the query")]
    NoInformation,

    #[error("the selected entry has no stream URL")]
    MissingStreamUrl,

    #[error("failed to run the extractor: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse extractor output: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ResolveError {
    /// Whether this is a failure reported by the extractor, as opposed to everything else.
    pub fn is_extraction(&self) -> bool {
        matches!(self, ResolveError::Extraction(_))
    }
}

/// Metadata lookup for a search term or link.
///
/// `Ok(None)` means the extractor ran but had nothing to say about the term.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract_info(&self, search_term: &str) -> Result<Option<ExtractedInfo>, ResolveError>;
}

/// Returns true when the query should be handed to the extractor unchanged.
pub fn is_url(query: &str) -> bool {
    URL_REGEX.is_match(query)
}

/// The term handed to the extractor: links as-is, everything else as a search.
pub fn search_term(query: &str) -> Cow<'_, str> {
    if is_url(query) {
        Cow::Borrowed(query)
    } else {
        Cow::Owned(format!("{SEARCH_PREFIX}{query}"))
    }
}

/// Picks the entry to play. Playlists and search results collapse to their first entry.
pub fn first_entry(info: Option<ExtractedInfo>) -> Result<ExtractedInfo, ResolveError> {
    let info = info.ok_or(ResolveError::NoInformation)?;
    match info.entries {
        Some(entries) => entries.into_iter().next().ok_or(ResolveError::NoInformation),
        None => Ok(info),
    }
}

/// Resolves queries through an [`Extractor`].
pub struct AudioResolver<E> {
    extractor: E,
}

impl<E: Extractor> AudioResolver<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Look up `query` and reduce the result to a single playable track.
    ///
    /// The title falls back to the query text when the extractor has none.
    pub async fn resolve(&self, query: &str) -> Result<ResolvedTrack, ResolveError> {
        let term = search_term(query);
        info!("Resolving audio for: {}", term);

        let info = self.extractor.extract_info(&term).await?;
        let entry = first_entry(info)?;
        let track = ResolvedTrack::from_entry(entry, query)?;

        debug!("Resolved '{}' to stream {}", track.title, track.stream_url);
        Ok(track)
    }
}
