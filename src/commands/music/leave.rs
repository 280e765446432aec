use super::*;
use crate::commands::music::utils::embedded_messages;
use tracing::warn;

/// Leave the voice channel
#[poise::command(prefix_command, guild_only, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let reply = match ctx.data().player.music().leave(guild_id).await {
        Ok(true) => embedded_messages::left_voice_channel(),
        Ok(false) => embedded_messages::bot_not_in_voice_channel(),
        Err(err) => {
            // The session is already forgotten, so report it as gone
            warn!("Voice disconnect in guild {} reported: {}", guild_id, err);
            embedded_messages::left_voice_channel()
        }
    };
    ctx.send(reply).await?;

    Ok(())
}
