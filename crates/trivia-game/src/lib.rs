//! Game rooms for the trivia core.
//!
//! Each room runs as an isolated Tokio task that owns its state and walks
//! a fixed plan of timed phases:
//!
//! ```text
//! GameStarted → [BotLevelSelection] → CategorySelection → CategoryResults
//!     → (AwaitingAnswers → RoundEnded) × num_questions → GameEnded
//! ```
//!
//! Every phase entry and every tick publishes a full `GameUpdate` snapshot
//! to the event bus.
//!
//! # Key types
//!
//! - [`GameManager`]: creates rooms and routes player actions to them
//! - [`GameHandle`]: sends commands to one running room
//! - [`GameState`]: the room's data and rules, runtime-free
//! - [`PhaseHooks`]: the per-phase dispatch table
//! - [`QuestionSupply`]: adaptive-difficulty question pool
//! - [`QuestionSource`] and [`HintService`]: the external collaborators

mod bot;
mod chat;
mod config;
mod error;
mod game;
mod hint;
mod manager;
mod phase;
mod player;
mod question;
mod state;

pub use bot::{BOT_NAMES, simulate as simulate_bot, synthesize as synthesize_bots};
pub use chat::{FRIEND_ID, private_message, public_message};
pub use config::{BotProfile, BotProfiles, GameConfig, PhaseDurations};
pub use error::{GameError, HintError};
pub use game::{GameHandle, GameInfo};
pub use hint::{HintService, NoHints};
pub use manager::GameManager;
pub use phase::{PhaseHooks, hooks as phase_hooks, plan as phase_plan};
pub use player::{Player, PlayerKind};
pub use question::{InMemoryQuestionSource, Question, QuestionSource, QuestionSupply};
pub use state::{GameState, PowerUpOutcome};
