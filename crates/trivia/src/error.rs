//! Unified error type for the trivia core.

use trivia_bus::BusError;
use trivia_game::{GameError, HintError};
use trivia_protocol::ProtocolError;

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` attributes let `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum TriviaError {
    /// Encode, decode, or an action that can never be valid.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The event bus is gone.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// Room creation or routing failed.
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Hint(#[from] HintError),

    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// The config file is not valid JSON for [`TriviaConfig`](crate::TriviaConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The outbound sink stopped accepting events.
    #[error("event sink closed")]
    SinkClosed,
}
