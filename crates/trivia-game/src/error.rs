//! Error types for the game layer.

use trivia_protocol::GameId;

/// Errors from creating or talking to game rooms.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A game needs at least one player.
    #[error("cannot create a game without players")]
    NoPlayers,

    /// The room's command channel is closed; the game has ended.
    #[error("game {0} is unavailable")]
    Unavailable(GameId),

    /// The question store could not be read.
    #[error("question source failed: {0}")]
    QuestionSource(String),
}

/// Errors from the external hint service.
///
/// Retries and backoff are the service's own business; by the time this
/// reaches a room it is final.
#[derive(Debug, thiserror::Error)]
pub enum HintError {
    #[error("hint service unavailable: {0}")]
    Unavailable(String),
}
