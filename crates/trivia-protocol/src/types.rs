//! Identity types and the closed vocabularies of the game.
//!
//! Everything here is small, `Copy` where possible, and serializable so the
//! same values can appear in client actions and outbound payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Every question has exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque identifier for a player.
///
/// Human ids come from the transport layer (a socket/session id); bot ids
/// are synthesized by the room that owns the bot. The core never parses
/// them.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a player id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A unique identifier for a game room.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A question category.
///
/// `Random` is the pre-selection sentinel a room carries until voting is
/// tallied; it is never a valid vote. `All` draws from every category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize, Default,
)]
pub enum Category {
    #[default]
    #[serde(rename = "Random")]
    Random,
    #[serde(rename = "All")]
    All,
    #[serde(rename = "Art")]
    Art,
    #[serde(rename = "Entertainment: Board Games")]
    BoardGames,
    #[serde(rename = "Entertainment: Books")]
    Books,
    #[serde(rename = "Entertainment: Cartoon & Animations")]
    CartoonAnimations,
    #[serde(rename = "Entertainment: Comics")]
    Comics,
    #[serde(rename = "Entertainment: Film")]
    Film,
    #[serde(rename = "Entertainment: Japanese Anime & Manga")]
    AnimeManga,
    #[serde(rename = "Entertainment: Music")]
    Music,
    #[serde(rename = "Entertainment: Musicals & Theatres")]
    MusicalsTheatres,
    #[serde(rename = "Entertainment: Television")]
    Television,
    #[serde(rename = "Entertainment: Video Games")]
    VideoGames,
    #[serde(rename = "General Knowledge")]
    GeneralKnowledge,
    #[serde(rename = "Geography")]
    Geography,
    #[serde(rename = "History")]
    History,
    #[serde(rename = "Mythology")]
    Mythology,
    #[serde(rename = "Politics")]
    Politics,
    #[serde(rename = "Science & Nature")]
    ScienceNature,
    #[serde(rename = "Science: Computers")]
    Computers,
    #[serde(rename = "Science: Gadgets")]
    Gadgets,
    #[serde(rename = "Science: Mathematics")]
    Mathematics,
    #[serde(rename = "Sports")]
    Sports,
}

impl Category {
    /// Categories a random fallback may land on: everything except the
    /// `Random` sentinel.
    pub const SELECTABLE: [Category; 22] = [
        Category::All,
        Category::Art,
        Category::BoardGames,
        Category::Books,
        Category::CartoonAnimations,
        Category::Comics,
        Category::Film,
        Category::AnimeManga,
        Category::Music,
        Category::MusicalsTheatres,
        Category::Television,
        Category::VideoGames,
        Category::GeneralKnowledge,
        Category::Geography,
        Category::History,
        Category::Mythology,
        Category::Politics,
        Category::ScienceNature,
        Category::Computers,
        Category::Gadgets,
        Category::Mathematics,
        Category::Sports,
    ];

    /// Whether a player may vote for this category.
    pub fn is_votable(self) -> bool {
        self != Category::Random
    }
}

// ---------------------------------------------------------------------------
// GamePhase
// ---------------------------------------------------------------------------

/// The named, timed stages a room moves through.
///
/// The order a room visits them in is fixed when the room is created:
///
/// ```text
/// GameStarted → [BotLevelSelection] → CategorySelection → CategoryResults
///     → (AwaitingAnswers → RoundEnded) × N → GameEnded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    GameStarted,
    BotLevelSelection,
    CategorySelection,
    CategoryResults,
    AwaitingAnswers,
    RoundEnded,
    GameEnded,
}

impl GamePhase {
    /// Whether the current question is visible to clients in this phase.
    pub fn shows_question(self) -> bool {
        matches!(self, Self::AwaitingAnswers | Self::RoundEnded)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GameStarted => "game_started",
            Self::BotLevelSelection => "bot_level_selection",
            Self::CategorySelection => "category_selection",
            Self::CategoryResults => "category_results",
            Self::AwaitingAnswers => "awaiting_answers",
            Self::RoundEnded => "round_ended",
            Self::GameEnded => "game_ended",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Power-ups and bot levels
// ---------------------------------------------------------------------------

/// A single-use-per-game action a human may take while answering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PowerUp {
    /// Hide two of the three wrong options.
    FiftyFifty,
    /// Double this round's points.
    DoublePoints,
    /// Ask the hint service for help.
    CallFriend,
}

/// How strong the filler bots in a solo game are.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BotLevel {
    Novice,
    Intermediate,
    Expert,
}

impl fmt::Display for BotLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Novice => f.write_str("novice"),
            Self::Intermediate => f.write_str("intermediate"),
            Self::Expert => f.write_str("expert"),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientAction
// ---------------------------------------------------------------------------

/// Everything a client can ask the core to do.
///
/// Adjacently tagged on the wire:
/// `{"action": "submit_answer", "data": {"answer": 2}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ClientAction {
    /// Enter the matchmaking pool.
    JoinLobby,
    /// Leave the matchmaking pool.
    LeaveLobby,
    /// Pick the filler-bot strength (solo games only).
    SetBotLevel { level: BotLevel },
    /// Vote for a category.
    SelectCategory { category: Category },
    /// Answer the current question with an option index.
    SubmitAnswer { answer: usize },
    /// Spend a power-up.
    UsePowerUp { power_up: PowerUp },
    /// Say something in chat.
    SendMessage { display_name: String, text: String },
    /// The connection is gone.
    Disconnect,
}

impl ClientAction {
    /// Rejects actions that decode fine but can never be meaningful.
    ///
    /// Phase- and ownership-dependent checks (is it your turn to vote, was
    /// the power-up already spent) belong to the room, not here.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        match self {
            Self::SubmitAnswer { answer } if *answer >= OPTION_COUNT => {
                Err(ProtocolError::InvalidMessage(format!(
                    "answer {answer} out of range 0..{OPTION_COUNT}"
                )))
            }
            Self::SelectCategory { category } if !category.is_votable() => {
                Err(ProtocolError::InvalidMessage(format!(
                    "cannot vote for {category:?}"
                )))
            }
            Self::SendMessage { text, .. } if text.trim().is_empty() => Err(
                ProtocolError::InvalidMessage("empty chat message".into()),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_with_display_names() {
        let json = serde_json::to_string(&Category::ScienceNature).unwrap();
        assert_eq!(json, "\"Science & Nature\"");
        let back: Category = serde_json::from_str("\"Entertainment: Film\"").unwrap();
        assert_eq!(back, Category::Film);
    }

    #[test]
    fn test_selectable_excludes_random_sentinel() {
        assert!(!Category::SELECTABLE.contains(&Category::Random));
        assert!(Category::SELECTABLE.iter().all(|c| c.is_votable()));
    }

    #[test]
    fn test_phase_display_matches_wire_name() {
        for phase in [GamePhase::AwaitingAnswers, GamePhase::BotLevelSelection] {
            let wire = serde_json::to_string(&phase).unwrap();
            assert_eq!(wire, format!("\"{phase}\""));
        }
    }

    #[test]
    fn test_shows_question_only_in_answer_and_reveal() {
        assert!(GamePhase::AwaitingAnswers.shows_question());
        assert!(GamePhase::RoundEnded.shows_question());
        assert!(!GamePhase::CategoryResults.shows_question());
        assert!(!GamePhase::GameEnded.shows_question());
    }

    #[test]
    fn test_validate_rejects_out_of_range_answer() {
        assert!(ClientAction::SubmitAnswer { answer: 3 }.validate().is_ok());
        assert!(matches!(
            ClientAction::SubmitAnswer { answer: 4 }.validate(),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_validate_rejects_random_vote_and_blank_chat() {
        let vote = ClientAction::SelectCategory {
            category: Category::Random,
        };
        assert!(vote.validate().is_err());

        let chat = ClientAction::SendMessage {
            display_name: "Ann".into(),
            text: "   ".into(),
        };
        assert!(chat.validate().is_err());
    }

    #[test]
    fn test_unit_action_wire_shape() {
        let json = serde_json::to_string(&ClientAction::JoinLobby).unwrap();
        assert_eq!(json, r#"{"action":"join_lobby"}"#);
    }

    #[test]
    fn test_player_id_is_transparent() {
        let json = serde_json::to_string(&PlayerId::new("sid-1")).unwrap();
        assert_eq!(json, "\"sid-1\"");
        assert_eq!(GameId(3).to_string(), "G-3");
    }
}
