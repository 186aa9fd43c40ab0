//! Error types for the event bus.

/// Errors returned by [`EventPublisher::publish`](crate::EventPublisher::publish).
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// The consumer was dropped. Nothing published from now on will be
    /// delivered; this is fatal for delivery and should reach whoever
    /// supervises the process.
    #[error("event bus closed: consumer is gone")]
    Closed,
}
