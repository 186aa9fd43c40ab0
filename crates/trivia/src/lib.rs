//! # Trivia
//!
//! Session core for a multiplayer trivia game.
//!
//! Players wait in a [`Lobby`](trivia_lobby::Lobby) until it fills up or
//! its countdown runs out. The lobby then becomes a game room that walks a
//! fixed plan of timed phases: category vote, rounds of questions scored
//! by answer speed, and a final scoreboard. Every observable change is
//! published on one ordered event bus, which [`TriviaServer::run`] drains
//! into an [`EventSink`].
//!
//! The transport is not part of the core. A transport decodes
//! [`ClientAction`](trivia_protocol::ClientAction)s and hands them to a
//! [`TriviaHandle`], and implements [`EventSink`] for the way out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trivia::prelude::*;
//!
//! # async fn start() -> Result<(), TriviaError> {
//! let server = TriviaServer::builder()
//!     .config(TriviaConfig::default())
//!     .build(NoHints);
//! let handle = server.handle();
//! let (sink, mut events) = ChannelSink::new();
//! tokio::spawn(server.run(sink));
//!
//! handle.dispatch(PlayerId::new("alice"), ClientAction::JoinLobby).await?;
//! while let Some(event) = events.recv().await {
//!     println!("{}", event.name());
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;
mod sink;
mod telemetry;

pub use config::TriviaConfig;
pub use error::TriviaError;
pub use server::{TriviaHandle, TriviaServer, TriviaServerBuilder};
pub use sink::{ChannelSink, EventSink};
pub use telemetry::init_tracing;

/// Re-exports the pieces most applications need.
pub mod prelude {
    pub use crate::{
        ChannelSink, EventSink, TriviaConfig, TriviaError, TriviaHandle,
        TriviaServer, init_tracing,
    };
    pub use trivia_game::{
        GameConfig, GameManager, HintError, HintService,
        InMemoryQuestionSource, NoHints, PhaseDurations, Question,
        QuestionSource,
    };
    pub use trivia_lobby::{Lobby, LobbyConfig};
    pub use trivia_protocol::{
        BotLevel, Category, ChatMessage, ClientAction, Codec, GameId,
        GamePhase, GameUpdate, JsonCodec, LobbyUpdate, NewGame, PlayerId,
        PowerUp, ServerEvent,
    };
}
