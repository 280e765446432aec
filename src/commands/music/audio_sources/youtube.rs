//! Implements the `Extractor` trait using the `yt-dlp` command-line tool.

use serenity::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ExtractedInfo, Extractor, ResolveError};

/// Runs `yt-dlp` as a child process and reads its JSON dump.
#[derive(Debug, Clone)]
pub struct YtDlp {
    executable: PathBuf,
}

impl YtDlp {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Arguments for a metadata-only lookup of `search_term`.
    pub fn args(search_term: &str) -> Vec<String> {
        [
            "-J",                // Dump a single JSON document, download nothing
            "--no-playlist",     // A watch URL inside a playlist means the video
            "-f",
            "bestaudio/best",
            "--default-search",
            "ytsearch",
            "--source-address",
            "0.0.0.0",           // Force IPv4, some CDNs misbehave otherwise
            "--no-warnings",
            "--",
            search_term,
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

#[async_trait]
impl Extractor for YtDlp {
    async fn extract_info(&self, search_term: &str) -> Result<Option<ExtractedInfo>, ResolveError> {
        debug!("Running {} for '{}'", self.executable.display(), search_term);

        let output = Command::new(&self.executable)
            .args(Self::args(search_term))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("yt-dlp exited with {}: {}", output.status, stderr);
            return Err(ResolveError::Extraction(stderr));
        }

        ExtractedInfo::parse(&output.stdout)
    }
}
