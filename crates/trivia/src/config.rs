//! Whole-process configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use trivia_game::GameConfig;
use trivia_lobby::LobbyConfig;

use crate::TriviaError;

/// Lobby and room tunables in one document.
///
/// Every field has a default, so `{}` is a valid config and a file only
/// needs the values it changes:
///
/// ```json
/// { "lobby": { "timeout_seconds": 10 }, "game": { "num_questions": 5 } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriviaConfig {
    pub lobby: LobbyConfig,
    pub game: GameConfig,
}

impl TriviaConfig {
    /// Parses a JSON document.
    ///
    /// # Errors
    /// [`TriviaError::ConfigParse`] if the document is malformed.
    pub fn from_json_str(raw: &str) -> Result<Self, TriviaError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a JSON file.
    ///
    /// # Errors
    /// [`TriviaError::ConfigIo`] if the file cannot be read, or
    /// [`TriviaError::ConfigParse`] if it is malformed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TriviaError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }
}
