//! Outbound event bus for the trivia core.
//!
//! The lobby and every game room publish [`ServerEvent`]s; exactly one
//! long-lived task drains them and hands them to the transport. All
//! producers share one unbounded channel, so the consumer sees events in
//! the exact order `publish` was called across the whole process, not just
//! per room.
//!
//! ```text
//! Lobby ─┐
//! Game 1 ─┼─ EventPublisher (Clone) ──→ [ mpsc ] ──→ EventConsumer (one)
//! Game N ─┘
//! ```
//!
//! The bus is an explicit value built once at startup and handed to each
//! producer; there is no global queue.

mod bus;
mod error;

pub use bus::{EventBus, EventConsumer, EventPublisher};
pub use error::BusError;
