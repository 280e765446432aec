use super::*;
use crate::commands::music::utils::embedded_messages;

/// Stop the current audio
#[poise::command(prefix_command, guild_only, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let reply = if ctx.data().player.music().stop(guild_id).await? {
        embedded_messages::stopped()
    } else {
        embedded_messages::nothing_playing()
    };
    ctx.send(reply).await?;

    Ok(())
}
