use serenity::async_trait;
use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId, UserId};
use songbird::input::Input;
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{Event, Songbird, TrackEvent};
use std::sync::Arc;
use tracing::{debug, warn};

use super::event_handlers::TrackEndNotifier;
use super::music_manager::{PlaybackState, TrackControl, VoiceError, VoiceGateway, VoiceResult};

/// [`VoiceGateway`] backed by the songbird voice manager registered with the client.
#[derive(Clone)]
pub struct SongbirdGateway {
    manager: Arc<Songbird>,
}

impl SongbirdGateway {
    pub fn new(manager: Arc<Songbird>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl VoiceGateway for SongbirdGateway {
    type Source = Input;
    type Track = TrackHandle;

    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        // The call outlives its connection, so ask the driver where it actually is
        let call = self.manager.get(guild_id)?;
        let handler = call.lock().await;
        handler.current_channel().map(|id| ChannelId::from(id.0))
    }

    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> VoiceResult<()> {
        let call = self
            .manager
            .join(guild_id, channel_id)
            .await
            .map_err(|e| VoiceError::JoinError(e.to_string()))?;

        // We never listen, so don't receive audio at all
        let mut handler = call.lock().await;
        if let Err(e) = handler.deafen(true).await {
            warn!("Failed to self-deafen in guild {}: {}", guild_id, e);
        }
        Ok(())
    }

    async fn move_to(&self, guild_id: GuildId, channel_id: ChannelId) -> VoiceResult<()> {
        // Joining while connected moves the existing call; deafen state is kept
        self.manager
            .join(guild_id, channel_id)
            .await
            .map(|_| ())
            .map_err(|e| VoiceError::JoinError(e.to_string()))
    }

    async fn leave(&self, guild_id: GuildId) -> VoiceResult<()> {
        if self.manager.get(guild_id).is_none() {
            return Err(VoiceError::NotConnected);
        }

        self.manager
            .remove(guild_id)
            .await
            .map_err(|e| VoiceError::LeaveError(e.to_string()))
    }

    async fn play(&self, guild_id: GuildId, source: Input) -> VoiceResult<TrackHandle> {
        let call = self.manager.get(guild_id).ok_or(VoiceError::NotConnected)?;
        let mut handler = call.lock().await;

        let track = handler.play_only_input(source);
        debug!("Started track {} in guild {}", track.uuid(), guild_id);

        for event in [TrackEvent::End, TrackEvent::Error] {
            if let Err(e) = track.add_event(Event::Track(event), TrackEndNotifier { guild_id }) {
                warn!("Failed to watch track in guild {}: {}", guild_id, e);
            }
        }

        Ok(track)
    }
}

#[async_trait]
impl TrackControl for TrackHandle {
    async fn state(&self) -> PlaybackState {
        match self.get_info().await {
            Ok(info) => match info.playing {
                PlayMode::Play => PlaybackState::Playing,
                PlayMode::Pause => PlaybackState::Paused,
                _ => PlaybackState::Idle,
            },
            // The driver drops finished tracks
            Err(_) => PlaybackState::Idle,
        }
    }

    fn pause(&self) -> VoiceResult<()> {
        TrackHandle::pause(self).map_err(|e| VoiceError::TrackError(e.to_string()))
    }

    fn resume(&self) -> VoiceResult<()> {
        TrackHandle::play(self).map_err(|e| VoiceError::TrackError(e.to_string()))
    }

    fn stop(&self) -> VoiceResult<()> {
        TrackHandle::stop(self).map_err(|e| VoiceError::TrackError(e.to_string()))
    }
}

/// The voice channel `user_id` is currently sitting in, read from the cache.
pub fn user_voice_channel(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
) -> Option<ChannelId> {
    let guild = ctx.cache.guild(guild_id)?;
    guild.voice_states.get(&user_id)?.channel_id
}
