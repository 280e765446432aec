//! The `!play` pipeline: voice check, join, resolve, build, replace.

use poise::CreateReply;
use poise::serenity_prelude::{ChannelId, GuildId};
use thiserror::Error;
use tracing::{debug, error, info};

use super::embedded_messages;
use super::music_manager::{MusicManager, VoiceError, VoiceGateway};
use super::track_source::{SourceBuilder, SourceError};
use crate::commands::music::audio_sources::{AudioResolver, Extractor, ResolveError, ResolvedTrack};

/// Everything that can go wrong between a voice connection and sound.
#[derive(Error, Debug)]
pub enum PlayError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Voice(#[from] VoiceError),
}

impl PlayError {
    pub fn is_extraction(&self) -> bool {
        matches!(self, PlayError::Resolve(err) if err.is_extraction())
    }
}

/// How a `!play` request ended.
#[derive(Debug)]
pub enum PlayOutcome {
    /// The requester is not in a voice channel; nothing was touched.
    NotInVoice,
    JoinFailed(VoiceError),
    Started(ResolvedTrack),
    Failed(PlayError),
}

impl PlayOutcome {
    pub fn reply(&self) -> CreateReply {
        match self {
            PlayOutcome::NotInVoice => embedded_messages::user_not_in_voice_channel(),
            PlayOutcome::JoinFailed(_) => embedded_messages::failed_to_join_voice_channel(),
            PlayOutcome::Started(track) => embedded_messages::now_playing(&track.title),
            PlayOutcome::Failed(err) if err.is_extraction() => {
                embedded_messages::extraction_failed()
            }
            PlayOutcome::Failed(_) => embedded_messages::playback_failed(),
        }
    }
}

/// Resolver, decoder and voice sessions wired together.
pub struct Player<E, S, G: VoiceGateway> {
    resolver: AudioResolver<E>,
    sources: S,
    music: MusicManager<G>,
}

impl<E, S, G> Player<E, S, G>
where
    E: Extractor,
    S: SourceBuilder<Source = G::Source>,
    G: VoiceGateway,
{
    pub fn new(extractor: E, sources: S, gateway: G) -> Self {
        Self {
            resolver: AudioResolver::new(extractor),
            sources,
            music: MusicManager::new(gateway),
        }
    }

    pub fn music(&self) -> &MusicManager<G> {
        &self.music
    }

    /// Handle a `!play` from a user sitting in `user_channel`.
    pub async fn play(
        &self,
        guild_id: GuildId,
        user_channel: Option<ChannelId>,
        query: &str,
    ) -> PlayOutcome {
        let Some(channel_id) = user_channel else {
            return PlayOutcome::NotInVoice;
        };

        match self.music.ensure_voice(guild_id, channel_id).await {
            Ok(outcome) => debug!("Voice in guild {}: {:?}", guild_id, outcome),
            Err(err) => {
                error!(
                    "Failed to join voice channel {} for guild {}: {}",
                    channel_id, guild_id, err
                );
                return PlayOutcome::JoinFailed(err);
            }
        }

        match self.start_playback(guild_id, query).await {
            Ok(track) => PlayOutcome::Started(track),
            Err(err) if err.is_extraction() => {
                error!("[yt-dlp] extraction failed for '{}': {}", query, err);
                PlayOutcome::Failed(err)
            }
            Err(err) => {
                error!("[play] failed for '{}': {:?}", query, err);
                PlayOutcome::Failed(err)
            }
        }
    }

    /// Resolve `query`, then swap it in for whatever the guild is playing.
    ///
    /// The old track is stopped before the decoder starts.
    pub async fn start_playback(
        &self,
        guild_id: GuildId,
        query: &str,
    ) -> Result<ResolvedTrack, PlayError> {
        let track = self.resolver.resolve(query).await?;
        self.music
            .replace_source_with(guild_id, || {
                self.sources
                    .build(&track.stream_url)
                    .map_err(PlayError::from)
            })
            .await?;

        info!("Now playing '{}' in guild {}", track.title, guild_id);
        Ok(track)
    }
}
