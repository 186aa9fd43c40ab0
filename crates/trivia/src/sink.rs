//! The outbound edge: where consumed events go.

use std::future::Future;

use tokio::sync::mpsc;
use trivia_protocol::ServerEvent;

use crate::TriviaError;

/// Delivers events to connected clients.
///
/// The transport is not part of the core. A WebSocket or SSE layer
/// implements this, decides which sockets each event reaches (events for
/// a game go to its players, a private `Message` only to its
/// destination), and encodes with a [`Codec`](trivia_protocol::Codec).
///
/// Uses native `async fn` in traits (RPITIT, stable since Rust 1.75):
///
/// ```rust,ignore
/// struct Printer;
///
/// impl EventSink for Printer {
///     async fn deliver(&self, event: &ServerEvent) -> Result<(), TriviaError> {
///         println!("{}", event.name());
///         Ok(())
///     }
/// }
/// ```
pub trait EventSink: Send + Sync + 'static {
    /// Delivers one event. Called in bus order, one event at a time.
    ///
    /// # Errors
    /// An error stops the consumer loop.
    fn deliver(
        &self,
        event: &ServerEvent,
    ) -> impl Future<Output = Result<(), TriviaError>> + Send;
}

/// Forwards every event into an unbounded channel.
///
/// Useful for tests and for transports that fan out from their own task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<ServerEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    async fn deliver(&self, event: &ServerEvent) -> Result<(), TriviaError> {
        self.sender
            .send(event.clone())
            .map_err(|_| TriviaError::SinkClosed)
    }
}
