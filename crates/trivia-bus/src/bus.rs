//! Publisher and consumer halves of the bus.

use tokio::sync::mpsc;
use trivia_protocol::ServerEvent;

use crate::BusError;

/// Constructor namespace for the bus.
pub struct EventBus;

impl EventBus {
    /// Creates a bus and returns its two halves.
    ///
    /// Clone the publisher freely; the consumer is deliberately not
    /// `Clone`, so there can only ever be one.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (EventPublisher, EventConsumer) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventPublisher { tx }, EventConsumer { rx })
    }
}

/// Producer handle. Cheap to clone; every clone feeds the same queue.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::UnboundedSender<ServerEvent>,
}

impl EventPublisher {
    /// Enqueues an event. Never waits.
    ///
    /// # Errors
    /// Returns [`BusError::Closed`] if the consumer has been dropped.
    pub fn publish(&self, event: ServerEvent) -> Result<(), BusError> {
        tracing::trace!(event = event.name(), "event published");
        self.tx.send(event).map_err(|_| BusError::Closed)
    }

    /// Whether the consumer is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The single consumer of the bus.
#[derive(Debug)]
pub struct EventConsumer {
    rx: mpsc::UnboundedReceiver<ServerEvent>,
}

impl EventConsumer {
    /// Waits for the next event.
    ///
    /// Returns `None` once every publisher has been dropped and the queue
    /// is drained.
    pub async fn consume(&mut self) -> Option<ServerEvent> {
        self.rx.recv().await
    }

    /// Takes the next event if one is already queued.
    pub fn try_consume(&mut self) -> Option<ServerEvent> {
        self.rx.try_recv().ok()
    }

    /// Number of events waiting.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
