//! Game tunables: phase durations, round count, and the bot table.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use trivia_protocol::{BotLevel, GamePhase};

// ---------------------------------------------------------------------------
// PhaseDurations
// ---------------------------------------------------------------------------

/// Length of each phase, in ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDurations {
    pub game_started: u32,
    pub bot_level_selection: u32,
    pub category_selection: u32,
    pub category_results: u32,
    pub awaiting_answers: u32,
    pub round_ended: u32,
    pub game_ended: u32,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            game_started: 3,
            bot_level_selection: 10,
            category_selection: 10,
            category_results: 3,
            awaiting_answers: 20,
            round_ended: 3,
            game_ended: 5,
        }
    }
}

impl PhaseDurations {
    /// The configured length of `phase`.
    pub fn of(&self, phase: GamePhase) -> u32 {
        match phase {
            GamePhase::GameStarted => self.game_started,
            GamePhase::BotLevelSelection => self.bot_level_selection,
            GamePhase::CategorySelection => self.category_selection,
            GamePhase::CategoryResults => self.category_results,
            GamePhase::AwaitingAnswers => self.awaiting_answers,
            GamePhase::RoundEnded => self.round_ended,
            GamePhase::GameEnded => self.game_ended,
        }
    }
}

// ---------------------------------------------------------------------------
// Bot profiles
// ---------------------------------------------------------------------------

/// How a bot of one level scores.
///
/// Each round the bot succeeds with probability `success_rate`; a success
/// is worth a uniform integer in `min_points..=max_points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotProfile {
    pub success_rate: f64,
    pub min_points: u32,
    pub max_points: u32,
}

/// One [`BotProfile`] per [`BotLevel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotProfiles {
    pub novice: BotProfile,
    pub intermediate: BotProfile,
    pub expert: BotProfile,
}

impl Default for BotProfiles {
    fn default() -> Self {
        Self {
            novice: BotProfile {
                success_rate: 0.35,
                min_points: 3,
                max_points: 8,
            },
            intermediate: BotProfile {
                success_rate: 0.6,
                min_points: 6,
                max_points: 14,
            },
            expert: BotProfile {
                success_rate: 0.85,
                min_points: 10,
                max_points: 20,
            },
        }
    }
}

impl BotProfiles {
    pub fn get(&self, level: BotLevel) -> BotProfile {
        match level {
            BotLevel::Novice => self.novice,
            BotLevel::Intermediate => self.intermediate,
            BotLevel::Expert => self.expert,
        }
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room a [`GameManager`](crate::GameManager)
/// creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub durations: PhaseDurations,
    /// Question rounds per game.
    pub num_questions: u32,
    pub bot_profiles: BotProfiles,
    /// Used when a solo player lets bot-level selection time out.
    pub default_bot_level: BotLevel,
    /// Bots added to a solo game.
    pub bot_count: usize,
    /// Milliseconds per phase tick.
    pub tick_millis: u64,
    /// Seed for every room's random source. Each manager offsets it by
    /// how many rooms it has created, so rooms differ but a given manager
    /// replays the same sequence.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            durations: PhaseDurations::default(),
            num_questions: 10,
            bot_profiles: BotProfiles::default(),
            default_bot_level: BotLevel::Intermediate,
            bot_count: 3,
            tick_millis: 1000,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// The phase tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// The random source for the `ordinal`-th room, counting from zero.
    /// Seeded from the OS when no `rng_seed` is set.
    pub fn room_rng(&self, ordinal: u64) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(ordinal)),
            None => StdRng::from_os_rng(),
        }
    }
}
