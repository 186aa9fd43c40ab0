//! Filler bots for solo games.

use rand::Rng;
use rand::seq::IndexedRandom;
use trivia_protocol::{BotLevel, PlayerId};

use crate::{BotProfile, Player};

/// Names bots are drawn from. A room never seats two bots with the same
/// name.
pub const BOT_NAMES: [&str; 12] = [
    "Ada", "Alan", "Grace", "Linus", "Margaret", "Dennis", "Barbara", "Ken",
    "Frances", "Edsger", "Radia", "Donald",
];

/// The seat id for a bot called `name`.
pub fn bot_id(name: &str) -> PlayerId {
    PlayerId::new(format!("bot-{}", name.to_lowercase()))
}

/// Creates `count` bots at `level` with distinct random names.
///
/// Names whose id `is_taken` are skipped. `count` is capped at the number
/// of names left.
pub fn synthesize<R: Rng + ?Sized>(
    count: usize,
    level: BotLevel,
    is_taken: impl Fn(&PlayerId) -> bool,
    rng: &mut R,
) -> Vec<Player> {
    let free: Vec<&str> = BOT_NAMES
        .iter()
        .copied()
        .filter(|name| !is_taken(&bot_id(name)))
        .collect();
    free.choose_multiple(rng, count)
        .map(|name| Player::bot(bot_id(name), (*name).to_string(), level))
        .collect()
}

/// Points a bot earns this round under `profile`.
pub fn simulate<R: Rng + ?Sized>(profile: &BotProfile, rng: &mut R) -> u32 {
    let rate = profile.success_rate.clamp(0.0, 1.0);
    if !rng.random_bool(rate) {
        return 0;
    }
    let low = profile.min_points.min(profile.max_points);
    let high = profile.min_points.max(profile.max_points);
    rng.random_range(low..=high)
}
