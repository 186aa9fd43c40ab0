//! Protocol types for the trivia session core.
//!
//! This crate defines the vocabulary shared by every other layer:
//!
//! - **Types** ([`PlayerId`], [`GameId`], [`Category`], [`GamePhase`],
//!   [`PowerUp`], [`BotLevel`], [`ClientAction`]) used to address players
//!   and describe what they can do.
//! - **Events** ([`ServerEvent`] and its payloads) that the core publishes
//!   for the transport layer to deliver.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) for turning events into
//!   bytes at the transport boundary.
//!
//! ```text
//! Lobby / Game ──publish──→ ServerEvent ──codec──→ transport (external)
//! ```

mod codec;
mod error;
mod events;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use events::{
    ChatMessage, GameUpdate, LobbyUpdate, NewGame, PlayerSnapshot,
    ServerEvent,
};
pub use types::{
    BotLevel, Category, ClientAction, GameId, GamePhase, PlayerId, PowerUp,
    OPTION_COUNT,
};
