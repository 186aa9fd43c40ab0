//! The matchmaking lobby.
//!
//! Players wait here until either the room is full or a short countdown
//! runs out. The lobby never creates games itself: it publishes a
//! `LobbyUpdate` every tick, and whoever consumes the bus reacts to
//! `should_start_game` by asking the game manager for a room and then
//! calling [`Lobby::clear`].
//!
//! ```text
//! add_player ──→ countdown task ──tick──→ LobbyUpdate ──→ bus
//!                     │
//!                     └── stops once should_start_game is true
//! ```

mod config;
mod lobby;

pub use config::LobbyConfig;
pub use lobby::{Lobby, should_start};
