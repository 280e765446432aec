//! Startup configuration read from the environment (and `.env`, if present).

use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Environment variable holding the bot token.
pub const DISCORD_TOKEN_ENV: &str = "DISCORD_TOKEN";
/// Environment variable overriding the `ffmpeg` executable.
pub const FFMPEG_PATH_ENV: &str = "FFMPEG_PATH";
/// Environment variable overriding the `yt-dlp` executable.
pub const YTDLP_PATH_ENV: &str = "YTDLP_PATH";

/// Tokens shorter than this are rejected outright.
pub const MIN_TOKEN_LENGTH: usize = 20;

#[cfg(windows)]
pub const DEFAULT_FFMPEG_PATH: &str = r"C:\ffmpeg\bin\ffmpeg.exe";
#[cfg(not(windows))]
pub const DEFAULT_FFMPEG_PATH: &str = "/usr/bin/ffmpeg";

/// Looked up on `PATH` when no override is given.
pub const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DISCORD_TOKEN is not set, check your .env")]
    MissingToken,

    #[error("DISCORD_TOKEN looks invalid ({length} characters, expected at least 20)")]
    InvalidToken { length: usize },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub discord_token: String,
    pub ffmpeg_path: PathBuf,
    pub ytdlp_path: PathBuf,
}

// Keep the token out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"<redacted>")
            .field("ffmpeg_path", &self.ffmpeg_path)
            .field("ytdlp_path", &self.ytdlp_path)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if any) and read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!("Using FFmpeg at: {}", config.ffmpeg_path.display());
        Ok(config)
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let discord_token = read(DISCORD_TOKEN_ENV).ok_or(ConfigError::MissingToken)?;
        let length = discord_token.chars().count();
        if length < MIN_TOKEN_LENGTH {
            return Err(ConfigError::InvalidToken { length });
        }

        let ffmpeg_path = read(FFMPEG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FFMPEG_PATH));
        let ytdlp_path = read(YTDLP_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_YTDLP_PATH));

        Ok(Self {
            discord_token,
            ffmpeg_path,
            ytdlp_path,
        })
    }
}
