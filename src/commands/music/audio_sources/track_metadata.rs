//! The extractor's JSON output and the track it resolves to.

use serde::Deserialize;

use super::ResolveError;

/// The subset of `yt-dlp -J` output we care about.
///
/// Single videos carry `url`/`title` directly; playlists and search results
/// carry them on each element of `entries`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExtractedInfo {
    #[serde(default)]
    pub title: Option<String>,
    /// Direct, time-limited media URL for the selected format.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub entries: Option<Vec<ExtractedInfo>>,
}

impl ExtractedInfo {
    /// Parse raw extractor stdout. Empty output and a JSON `null` both mean "nothing found".
    pub fn parse(stdout: &[u8]) -> Result<Option<ExtractedInfo>, ResolveError> {
        let text = String::from_utf8_lossy(stdout);
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str::<Option<ExtractedInfo>>(text)?)
    }
}

/// A track ready to be handed to the decoder. Lives only for one `!play`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub title: String,
    pub stream_url: String,
}

impl ResolvedTrack {
    pub fn from_entry(entry: ExtractedInfo, query: &str) -> Result<Self, ResolveError> {
        let stream_url = entry
            .url
            .filter(|url| !url.is_empty())
            .ok_or(ResolveError::MissingStreamUrl)?;
        let title = entry
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| query.to_string());

        Ok(Self { title, stream_url })
    }
}
