use songbird::input::{ChildContainer, Input};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Give up reconnecting after this many seconds between attempts.
pub const RECONNECT_DELAY_MAX_SECS: u32 = 5;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to start {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Turns a stream URL into audio the voice gateway can play.
pub trait SourceBuilder: Send + Sync {
    type Source: Send + 'static;

    fn build(&self, stream_url: &str) -> Result<Self::Source, SourceError>;
}

/// Builds playable inputs by piping a stream URL through `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegSource {
    executable: PathBuf,
}

impl FfmpegSource {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Full `ffmpeg` command line for `stream_url`.
    ///
    /// The input side reconnects on its own when the stream drops; the output
    /// side is audio only, written as 48kHz stereo WAV so the driver can detect the format.
    pub fn args(stream_url: &str) -> Vec<String> {
        let reconnect_delay = RECONNECT_DELAY_MAX_SECS.to_string();
        [
            "-reconnect",
            "1",
            "-reconnect_streamed",
            "1",
            "-reconnect_delay_max",
            &reconnect_delay,
            "-i",
            stream_url,
            "-vn",
            "-f",
            "wav",
            "-acodec",
            "pcm_s16le",
            "-ar",
            "48000",
            "-ac",
            "2",
            "-loglevel",
            "error",
            "pipe:1",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

impl SourceBuilder for FfmpegSource {
    type Source = Input;

    /// Spawn the decoder for `stream_url`. Nothing about the stream is checked here.
    fn build(&self, stream_url: &str) -> Result<Input, SourceError> {
        debug!("Starting {} for {}", self.executable.display(), stream_url);

        let child = Command::new(&self.executable)
            .args(Self::args(stream_url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                path: self.executable.display().to_string(),
                source,
            })?;

        Ok(ChildContainer::from(child).into())
    }
}
