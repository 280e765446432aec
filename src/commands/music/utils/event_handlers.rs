use poise::serenity_prelude::GuildId;
use serenity::async_trait;
use songbird::tracks::PlayMode;
use tracing::{error, info};

/// Logs when a track stops producing audio, either at its end or on failure.
pub struct TrackEndNotifier {
    pub guild_id: GuildId,
}

#[async_trait]
impl songbird::EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        if let songbird::EventContext::Track(tracks) = ctx {
            for (state, handle) in tracks.iter() {
                match &state.playing {
                    PlayMode::Errored(err) => error!(
                        "[player] track {} in guild {} failed: {:?}",
                        handle.uuid(),
                        self.guild_id,
                        err
                    ),
                    _ => info!(
                        "[player] track {} in guild {} finished",
                        handle.uuid(),
                        self.guild_id
                    ),
                }
            }
        }
        None
    }
}
