use super::*;
use crate::commands::music::utils::embedded_messages;

/// Continue after a pause
#[poise::command(prefix_command, guild_only, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let reply = if ctx.data().player.music().resume(guild_id).await? {
        embedded_messages::resumed()
    } else {
        embedded_messages::nothing_paused()
    };
    ctx.send(reply).await?;

    Ok(())
}
