use dashmap::DashMap;
use poise::serenity_prelude::{ChannelId, GuildId};
use serenity::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// Errors that can occur while talking to the voice side of the platform
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Failed to leave voice channel: {0}")]
    LeaveError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Track control failed: {0}")]
    TrackError(String),
}

/// Result type for voice operations
pub type VoiceResult<T> = Result<T, VoiceError>;

/// What a connected guild is doing right now.
///
/// A track that ran to its end (or failed) counts as `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

/// Handle to a track attached to a voice connection.
#[async_trait]
pub trait TrackControl: Send + Sync {
    async fn state(&self) -> PlaybackState;
    fn pause(&self) -> VoiceResult<()>;
    fn resume(&self) -> VoiceResult<()>;
    fn stop(&self) -> VoiceResult<()>;
}

/// The platform's voice connection API, as seen by the session manager.
#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Audio handed to [`play`](Self::play).
    type Source: Send + 'static;
    type Track: TrackControl + 'static;

    /// Channel the live connection sits in, `None` once it has been dropped
    /// (kicked, channel deleted, network loss).
    async fn current_channel(&self, guild_id: GuildId) -> Option<ChannelId>;

    /// Connect to `channel_id`, self-deafened.
    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> VoiceResult<()>;

    /// Move an existing connection to `channel_id`.
    async fn move_to(&self, guild_id: GuildId, channel_id: ChannelId) -> VoiceResult<()>;

    /// Force-disconnect from the guild.
    async fn leave(&self, guild_id: GuildId) -> VoiceResult<()>;

    async fn play(&self, guild_id: GuildId, source: Self::Source) -> VoiceResult<Self::Track>;
}

/// The bot's voice presence in one guild.
#[derive(Debug)]
pub struct GuildSession<T> {
    channel_id: ChannelId,
    track: Option<T>,
}

impl<T: TrackControl> GuildSession<T> {
    fn new(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            track: None,
        }
    }

    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    pub async fn state(&self) -> PlaybackState {
        match &self.track {
            Some(track) => track.state().await,
            None => PlaybackState::Idle,
        }
    }

    /// Detach and stop the current track, if any.
    fn stop_track(&mut self, guild_id: GuildId) {
        if let Some(track) = self.track.take() {
            if let Err(err) = track.stop() {
                // Usually the track already ended on its own
                debug!("Track in guild {} not stopped: {}", guild_id, err);
            }
        }
    }
}

/// A guild's registry entry, held under that guild's lock.
pub struct SessionEntry<T> {
    guard: OwnedMutexGuard<Option<GuildSession<T>>>,
}

impl<T: TrackControl> SessionEntry<T> {
    pub fn lookup(&self) -> Option<ChannelId> {
        self.guard.as_ref().map(GuildSession::channel_id)
    }

    pub fn insert(&mut self, channel_id: ChannelId) {
        *self.guard = Some(GuildSession::new(channel_id));
    }

    pub fn remove(&mut self) -> Option<GuildSession<T>> {
        self.guard.take()
    }

    fn session(&self) -> Option<&GuildSession<T>> {
        self.guard.as_ref()
    }

    fn session_mut(&mut self) -> Option<&mut GuildSession<T>> {
        self.guard.as_mut()
    }
}

type Slot<T> = Arc<Mutex<Option<GuildSession<T>>>>;

/// Guild → session mapping.
///
/// Every guild gets a slot guarded by its own lock; the slot is empty while
/// the bot is not connected there. Holding a [`SessionEntry`] serializes all
/// connection changes for that guild.
pub struct VoiceSessions<T> {
    slots: DashMap<GuildId, Slot<T>>,
}

impl<T> Default for VoiceSessions<T> {
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }
}

impl<T: TrackControl> VoiceSessions<T> {
    /// Channel the bot is connected to in `guild_id`, if any.
    pub async fn lookup(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.existing_entry(guild_id).await?.lookup()
    }

    /// Record a connection to `channel_id`, replacing whatever was recorded before.
    pub async fn insert(&self, guild_id: GuildId, channel_id: ChannelId) {
        self.entry(guild_id).await.insert(channel_id);
    }

    /// Forget the guild's connection, handing back what was recorded.
    pub async fn remove(&self, guild_id: GuildId) -> Option<GuildSession<T>> {
        self.existing_entry(guild_id).await?.remove()
    }

    /// Lock the guild's entry, creating an empty one if needed.
    pub async fn entry(&self, guild_id: GuildId) -> SessionEntry<T> {
        let slot = self
            .slots
            .entry(guild_id)
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();
        SessionEntry {
            guard: slot.lock_owned().await,
        }
    }

    /// Lock the guild's entry if the guild was ever seen.
    pub async fn existing_entry(&self, guild_id: GuildId) -> Option<SessionEntry<T>> {
        let slot = self
            .slots
            .get(&guild_id)
            .map(|slot| Arc::clone(slot.value()))?;
        Some(SessionEntry {
            guard: slot.lock_owned().await,
        })
    }
}

/// How [`MusicManager::ensure_voice`] got the bot into the user's channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceOutcome {
    Joined,
    Moved { from: ChannelId },
    Unchanged,
}

/// Owns the voice sessions and drives the gateway on their behalf.
pub struct MusicManager<G: VoiceGateway> {
    gateway: G,
    sessions: VoiceSessions<G::Track>,
}

impl<G: VoiceGateway> MusicManager<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            sessions: VoiceSessions::default(),
        }
    }

    pub fn sessions(&self) -> &VoiceSessions<G::Track> {
        &self.sessions
    }

    /// Make sure the bot sits in `channel_id`, joining or moving as needed.
    ///
    /// A recorded session is checked against the live connection first; if
    /// the connection is gone the session is dropped and the bot joins again.
    pub async fn ensure_voice(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> VoiceResult<VoiceOutcome> {
        let mut entry = self.sessions.entry(guild_id).await;

        if entry.lookup().is_some() {
            match self.gateway.current_channel(guild_id).await {
                Some(live) if live == channel_id => {
                    if let Some(session) = entry.session_mut() {
                        session.channel_id = live;
                    }
                    return Ok(VoiceOutcome::Unchanged);
                }
                Some(live) => {
                    self.gateway.move_to(guild_id, channel_id).await?;
                    if let Some(session) = entry.session_mut() {
                        session.channel_id = channel_id;
                    }
                    info!(
                        "Moved from channel {} to {} in guild {}",
                        live, channel_id, guild_id
                    );
                    return Ok(VoiceOutcome::Moved { from: live });
                }
                None => {
                    warn!("Voice connection in guild {} was lost, rejoining", guild_id);
                    if let Some(mut stale) = entry.remove() {
                        stale.stop_track(guild_id);
                    }
                }
            }
        }

        self.gateway.join(guild_id, channel_id).await?;
        entry.insert(channel_id);
        info!("Joined channel {} in guild {}", channel_id, guild_id);
        Ok(VoiceOutcome::Joined)
    }

    /// Stop whatever is attached to the guild's connection and start `source` in its place.
    pub async fn replace_source(&self, guild_id: GuildId, source: G::Source) -> VoiceResult<()> {
        self.replace_source_with(guild_id, || Ok(source)).await
    }

    /// Like [`replace_source`](Self::replace_source), building the source only
    /// after the old track has been stopped. A failed build leaves the guild idle.
    pub async fn replace_source_with<F, E>(&self, guild_id: GuildId, build: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<G::Source, E> + Send,
        E: From<VoiceError>,
    {
        let mut entry = self.sessions.entry(guild_id).await;
        let session = entry.session_mut().ok_or(VoiceError::NotConnected)?;

        session.stop_track(guild_id);
        let source = build()?;
        let track = self.gateway.play(guild_id, source).await?;
        session.track = Some(track);
        Ok(())
    }

    /// Current state, or `None` when the bot is not connected in the guild.
    pub async fn state(&self, guild_id: GuildId) -> Option<PlaybackState> {
        let entry = self.sessions.existing_entry(guild_id).await?;
        match entry.session() {
            Some(session) => Some(session.state().await),
            None => None,
        }
    }

    /// Pause the current track. Returns `false` if nothing is playing.
    pub async fn pause(&self, guild_id: GuildId) -> VoiceResult<bool> {
        self.with_track_in(guild_id, PlaybackState::Playing, |track| track.pause())
            .await
    }

    /// Resume a paused track. Returns `false` if nothing is paused.
    pub async fn resume(&self, guild_id: GuildId) -> VoiceResult<bool> {
        self.with_track_in(guild_id, PlaybackState::Paused, |track| track.resume())
            .await
    }

    /// Stop and detach the current track. Returns `false` if nothing is playing.
    pub async fn stop(&self, guild_id: GuildId) -> VoiceResult<bool> {
        let Some(mut entry) = self.sessions.existing_entry(guild_id).await else {
            return Ok(false);
        };
        let Some(session) = entry.session_mut() else {
            return Ok(false);
        };
        if session.state().await != PlaybackState::Playing {
            return Ok(false);
        }

        if let Some(track) = session.track.take() {
            track.stop()?;
        }
        Ok(true)
    }

    /// Disconnect from the guild. Returns `false` if the bot was not connected.
    pub async fn leave(&self, guild_id: GuildId) -> VoiceResult<bool> {
        let Some(mut entry) = self.sessions.existing_entry(guild_id).await else {
            return Ok(false);
        };
        let Some(mut session) = entry.remove() else {
            return Ok(false);
        };

        session.stop_track(guild_id);

        if let Err(err) = self.gateway.leave(guild_id).await {
            warn!("Leaving guild {} did not go cleanly: {}", guild_id, err);
            return Err(err);
        }
        info!("Left voice in guild {}", guild_id);
        Ok(true)
    }

    async fn with_track_in<F>(
        &self,
        guild_id: GuildId,
        required: PlaybackState,
        action: F,
    ) -> VoiceResult<bool>
    where
        F: FnOnce(&G::Track) -> VoiceResult<()> + Send,
    {
        let Some(entry) = self.sessions.existing_entry(guild_id).await else {
            return Ok(false);
        };
        let Some(track) = entry.session().and_then(|session| session.track.as_ref()) else {
            return Ok(false);
        };
        if track.state().await != required {
            return Ok(false);
        }

        action(track)?;
        Ok(true)
    }
}
