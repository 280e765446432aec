use super::*;
use crate::commands::music::utils::voice_gateway::user_voice_channel;
use tracing::info;

/// Play audio from a YouTube link or search. Example: !play <url|text>
#[poise::command(prefix_command, guild_only, category = "Music", guild_cooldown = 2)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"]
    #[rest]
    query: String,
) -> CommandResult {
    info!("Received play command with query: {}", query);
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let user_channel = user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id);
    let outcome = ctx
        .data()
        .player
        .play(guild_id, user_channel, &query)
        .await;
    ctx.send(outcome.reply()).await?;

    Ok(())
}
