use poise::serenity_prelude::{ChannelId, UserId};
use poise::{CooldownConfig, CooldownContext, CooldownTracker};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use std::time::Duration;

use tunebot::commands::music::play::play;

use crate::common::fixtures::{LOUNGE_CHANNEL_ID, OTHER_GUILD_ID, SAMPLE_GUILD_ID};
use crate::common::guild;

#[fixture]
fn play_config() -> CooldownConfig {
    play().cooldown_config.read().unwrap().clone()
}

fn invocation(guild_id: u64, user_id: u64) -> CooldownContext {
    CooldownContext {
        user_id: UserId::new(user_id),
        guild_id: Some(guild(guild_id)),
        channel_id: ChannelId::new(LOUNGE_CHANNEL_ID),
    }
}

/// Runs one invocation the way the framework does: check, then start the window on success.
fn attempt(tracker: &mut CooldownTracker, config: &CooldownConfig, ctx: CooldownContext) -> bool {
    match tracker.remaining_cooldown(ctx.clone(), config) {
        Some(_) => false,
        None => {
            tracker.start_cooldown(ctx);
            true
        }
    }
}

#[rstest]
fn test_play_has_a_two_second_guild_window(play_config: CooldownConfig) {
    assert_eq!(play_config.guild, Some(Duration::from_secs(2)));
    assert_eq!(play_config.user, None);
    assert_eq!(play_config.channel, None);
}

#[rstest]
fn test_burst_lets_only_first_through(play_config: CooldownConfig) {
    let mut tracker = CooldownTracker::new();

    // Different users in one guild share the window
    let results: Vec<bool> = (0..7u64)
        .map(|user| attempt(&mut tracker, &play_config, invocation(SAMPLE_GUILD_ID, 100 + user)))
        .collect();

    assert_eq!(results, vec![true, false, false, false, false, false, false]);
}

#[rstest]
fn test_guilds_have_separate_windows(play_config: CooldownConfig) {
    let mut tracker = CooldownTracker::new();

    assert!(attempt(&mut tracker, &play_config, invocation(SAMPLE_GUILD_ID, 1)));
    assert!(attempt(&mut tracker, &play_config, invocation(OTHER_GUILD_ID, 1)));
    assert!(!attempt(&mut tracker, &play_config, invocation(SAMPLE_GUILD_ID, 2)));
}

#[rstest]
fn test_rejection_reports_remaining_time(play_config: CooldownConfig) {
    let mut tracker = CooldownTracker::new();
    attempt(&mut tracker, &play_config, invocation(SAMPLE_GUILD_ID, 1));

    let remaining = tracker
        .remaining_cooldown(invocation(SAMPLE_GUILD_ID, 2), &play_config)
        .unwrap();
    assert!(remaining > Duration::ZERO && remaining <= Duration::from_secs(2));
}
