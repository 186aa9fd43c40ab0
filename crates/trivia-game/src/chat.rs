//! Building outbound chat messages.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use trivia_protocol::{ChatMessage, PlayerId};

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Sender id used for call-a-friend replies.
pub const FRIEND_ID: &str = "friend";

/// A message to everyone who can see the sender.
pub fn public_message(
    sender_id: PlayerId,
    display_name: impl Into<String>,
    text: impl Into<String>,
) -> ChatMessage {
    ChatMessage {
        id: NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed),
        sender_id,
        display_name: display_name.into(),
        text: text.into(),
        timestamp: now_millis(),
        destination_player_id: None,
    }
}

/// A message only `destination` should receive.
pub fn private_message(
    sender_id: PlayerId,
    display_name: impl Into<String>,
    text: impl Into<String>,
    destination: PlayerId,
) -> ChatMessage {
    ChatMessage {
        destination_player_id: Some(destination),
        ..public_message(sender_id, display_name, text)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
