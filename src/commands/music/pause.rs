use super::*;
use crate::commands::music::utils::embedded_messages;

/// Pause the current audio
#[poise::command(prefix_command, guild_only, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let reply = if ctx.data().player.music().pause(guild_id).await? {
        embedded_messages::paused()
    } else {
        embedded_messages::nothing_playing()
    };
    ctx.send(reply).await?;

    Ok(())
}
