//! Replies sent back to the channel a music command came from.

use poise::CreateReply;
use std::time::Duration;

fn reply(content: impl Into<String>) -> CreateReply {
    CreateReply::default().content(content)
}

pub fn now_playing(title: &str) -> CreateReply {
    reply(format!("🎶 Pushing: **{}**", title))
}

pub fn paused() -> CreateReply {
    reply("⏸️ Paused.")
}

pub fn resumed() -> CreateReply {
    reply("▶️ Resuming.")
}

pub fn stopped() -> CreateReply {
    reply("⏹️ Stopped.")
}

pub fn left_voice_channel() -> CreateReply {
    reply("👋 Leaving the channel.")
}

pub fn user_not_in_voice_channel() -> CreateReply {
    reply("🎧 Join a voice channel first!")
}

pub fn nothing_playing() -> CreateReply {
    reply("❌ Nothing is playing.")
}

pub fn nothing_paused() -> CreateReply {
    reply("❌ Nothing is paused.")
}

pub fn bot_not_in_voice_channel() -> CreateReply {
    reply("❌ I'm not in a voice channel.")
}

pub fn failed_to_join_voice_channel() -> CreateReply {
    reply("❌ Couldn't join your voice channel.")
}

pub fn extraction_failed() -> CreateReply {
    reply("❌ Couldn't get audio from YouTube. Try another link or search.")
}

pub fn playback_failed() -> CreateReply {
    reply("❌ Playback error (link/FFmpeg/network).")
}

pub fn command_failed() -> CreateReply {
    reply("❌ Something went wrong running that command.")
}

pub fn on_cooldown(remaining: Duration) -> CreateReply {
    reply(format!(
        "⏳ Slow down, try again in {:.1}s.",
        remaining.as_secs_f32()
    ))
}
