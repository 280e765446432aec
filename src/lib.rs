//! A Discord bot that streams audio from YouTube links or searches into voice channels.

pub mod commands;
pub mod config;

use commands::music::audio_sources::YtDlp;
use commands::music::utils::{
    player::Player, track_source::FfmpegSource, voice_gateway::SongbirdGateway,
};
use config::Config;
use songbird::Songbird;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Prefix for text commands, e.g. `!play`.
pub const COMMAND_PREFIX: &str = "!";

/// Shared state handed to every command invocation.
pub struct Data {
    pub player: Player<YtDlp, FfmpegSource, SongbirdGateway>,
}

impl Data {
    pub fn new(config: &Config, voice_manager: Arc<Songbird>) -> Self {
        Self {
            player: Player::new(
                YtDlp::new(&config.ytdlp_path),
                FfmpegSource::new(&config.ffmpeg_path),
                SongbirdGateway::new(voice_manager),
            ),
        }
    }
}
