//! Lobby tunables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the matchmaking lobby.
///
/// Missing JSON fields fall back to the defaults, so `{}` is a valid
/// config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LobbyConfig {
    /// A full lobby starts a game on the next tick.
    pub max_players: usize,
    /// Countdown length, in ticks.
    pub timeout_seconds: u32,
    /// Milliseconds per countdown tick. Shorten it for demos.
    pub tick_millis: u64,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            max_players: 4,
            timeout_seconds: 5,
            tick_millis: 1000,
        }
    }
}

impl LobbyConfig {
    /// The countdown tick period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}
