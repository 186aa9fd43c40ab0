//! Codec trait and the JSON implementation.
//!
//! The core never touches bytes itself. A transport adapter picks a codec,
//! encodes each [`ServerEvent`](crate::ServerEvent) it drains from the bus,
//! and decodes incoming [`ClientAction`](crate::ClientAction)s.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use trivia_protocol::{Codec, JsonCodec, NewGame, GameId, ServerEvent};
///
/// let codec = JsonCodec;
/// let event = ServerEvent::NewGame(NewGame {
///     game_id: GameId(7),
///     players: vec![],
/// });
///
/// let bytes = codec.encode(&event).unwrap();
/// let decoded: ServerEvent = codec.decode(&bytes).unwrap();
/// assert_eq!(event, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientAction, PowerUp};

    #[test]
    fn test_decode_client_action_from_wire_shape() {
        let codec = JsonCodec;
        let raw = br#"{"action":"use_power_up","data":{"powerUp":"fifty_fifty"}}"#;
        let action: ClientAction = codec.decode(raw).unwrap();
        assert_eq!(
            action,
            ClientAction::UsePowerUp {
                power_up: PowerUp::FiftyFifty
            }
        );
    }

    #[test]
    fn test_decode_garbage_is_decode_error() {
        let codec = JsonCodec;
        let result: Result<ClientAction, _> = codec.decode(b"not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_unknown_action_is_decode_error() {
        let codec = JsonCodec;
        let raw = br#"{"action":"fly","data":{}}"#;
        let result: Result<ClientAction, _> = codec.decode(raw);
        assert!(result.is_err());
    }
}
