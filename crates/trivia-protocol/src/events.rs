//! Outbound event payloads.
//!
//! These are the only values that leave the core. The transport adapter
//! drains them from the bus in publish order and decides who receives each
//! one (lobby members, a game's room, or a single player for private
//! messages).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Category, GameId, GamePhase, PlayerId, PowerUp, OPTION_COUNT};

/// An event published by the lobby or a game room.
///
/// Adjacently tagged: `{"event": "game_update", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    LobbyUpdate(LobbyUpdate),
    NewGame(NewGame),
    GameUpdate(GameUpdate),
    #[serde(rename = "server_message")]
    Message(ChatMessage),
}

impl ServerEvent {
    /// The wire name of this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LobbyUpdate(_) => "lobby_update",
            Self::NewGame(_) => "new_game",
            Self::GameUpdate(_) => "game_update",
            Self::Message(_) => "server_message",
        }
    }

    /// The game this event belongs to, if any.
    pub fn game_id(&self) -> Option<GameId> {
        match self {
            Self::NewGame(data) => Some(data.game_id),
            Self::GameUpdate(data) => Some(data.game_id),
            Self::LobbyUpdate(_) | Self::Message(_) => None,
        }
    }
}

/// One lobby countdown tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyUpdate {
    /// Waiting players, in the order they joined.
    pub players: Vec<PlayerId>,
    pub seconds_remaining: u32,
    pub should_start_game: bool,
}

/// A room was created for these players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub game_id: GameId,
    pub players: Vec<PlayerId>,
}

/// Per-player view inside a [`GameUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub name: String,
    pub is_bot: bool,
    pub score: u32,
    pub answered: bool,
    /// The submitted option, revealed only once the round is over.
    pub answer: Option<usize>,
    pub visible_options: [bool; OPTION_COUNT],
    pub double_points: bool,
    pub used_power_ups: Vec<PowerUp>,
}

/// A full snapshot of one room, published on every phase entry and tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameUpdate {
    pub game_id: GameId,
    pub category: Category,
    pub phase: GamePhase,
    pub players: BTreeMap<PlayerId, PlayerSnapshot>,
    pub question_text: String,
    pub question_options: Vec<String>,
    /// `-1` except during `RoundEnded`.
    pub correct_answer_index: i32,
    pub seconds_remaining: u32,
}

impl GameUpdate {
    /// Score lookup for tests and adapters.
    pub fn score_of(&self, player: &PlayerId) -> Option<u32> {
        self.players.get(player).map(|p| p.score)
    }
}

/// A chat line or a private call-a-friend reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub sender_id: PlayerId,
    pub display_name: String,
    pub text: String,
    /// Unix time in milliseconds.
    pub timestamp: u64,
    /// Set only for private messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_player_id: Option<PlayerId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby_event() -> ServerEvent {
        ServerEvent::LobbyUpdate(LobbyUpdate {
            players: vec![PlayerId::new("a"), PlayerId::new("b")],
            seconds_remaining: 3,
            should_start_game: false,
        })
    }

    #[test]
    fn test_event_wire_shape_uses_camel_case_fields() {
        let json = serde_json::to_value(lobby_event()).unwrap();
        assert_eq!(json["event"], "lobby_update");
        assert_eq!(json["data"]["secondsRemaining"], 3);
        assert_eq!(json["data"]["shouldStartGame"], false);
        assert_eq!(json["data"]["players"][1], "b");
    }

    #[test]
    fn test_message_event_name_and_optional_destination() {
        let msg = ServerEvent::Message(ChatMessage {
            id: 1,
            sender_id: PlayerId::new("a"),
            display_name: "Ann".into(),
            text: "hi".into(),
            timestamp: 0,
            destination_player_id: None,
        });
        assert_eq!(msg.name(), "server_message");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "server_message");
        assert!(json["data"].get("destinationPlayerId").is_none());
    }

    #[test]
    fn test_game_id_only_for_game_events() {
        assert_eq!(lobby_event().game_id(), None);
        let new_game = ServerEvent::NewGame(NewGame {
            game_id: GameId(9),
            players: vec![],
        });
        assert_eq!(new_game.game_id(), Some(GameId(9)));
    }
}
