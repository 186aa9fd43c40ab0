//! Fixed-period tick scheduler for the trivia core.
//!
//! Every countdown in the system (the lobby timer, each game phase) is a
//! loop that waits one tick, decrements a counter, and publishes a
//! snapshot. [`TickScheduler`] is that wait. The period is one second in
//! production and can be shortened for demos.
//!
//! # Integration
//!
//! A game room multiplexes the tick with its command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = commands.recv() => { /* handle the player action */ }
//!         _ = ticker.wait_for_tick() => { /* remaining -= 1; publish */ }
//!     }
//! }
//! ```
//!
//! `wait_for_tick` is cancel-safe: if the command branch wins, the next
//! call still fires at the originally scheduled instant.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when a tick fires late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Schedule the next tick a full period from now. Missed ticks are
    /// counted but never replayed.
    #[default]
    Skip,
    /// Keep the original cadence; the next tick fires one period after the
    /// missed deadline, so a countdown catches up with wall-clock time.
    Drop,
}

/// Configuration for a [`TickScheduler`].
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Time between ticks. Zero is clamped to [`Self::MIN_PERIOD`].
    pub period: Duration,
    /// Overrun handling policy.
    pub policy: TickPolicy,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            policy: TickPolicy::default(),
        }
    }
}

impl TickConfig {
    /// Shortest accepted period.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// A config ticking every `period` with the default policy.
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    pub fn validated(mut self) -> Self {
        if self.period < Self::MIN_PERIOD {
            warn!(
                period_ms = self.period.as_secs_f64() * 1000.0,
                "tick period below minimum, clamping"
            );
            self.period = Self::MIN_PERIOD;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Information about a fired tick.
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Ticks fired since creation or the last [`TickScheduler::reset`],
    /// starting at 1.
    pub tick: u64,
    /// `true` if the tick woke up more than 10% of a period late.
    pub overrun: bool,
    /// Whole periods that went by unfired (0 in normal operation).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-period ticker. One per countdown loop.
#[derive(Debug)]
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    next_tick: Instant,
    total_overruns: u64,
}

impl TickScheduler {
    /// Creates a scheduler whose first tick is one period from now.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        debug!(
            period_ms = config.period.as_secs_f64() * 1000.0,
            policy = ?config.policy,
            "tick scheduler created"
        );
        Self {
            next_tick: Instant::now() + config.period,
            config,
            tick_count: 0,
            total_overruns: 0,
        }
    }

    /// Creates a scheduler ticking every `period` with default settings.
    pub fn every(period: Duration) -> Self {
        Self::new(TickConfig::every(period))
    }

    /// Waits until the next tick is due.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let due = self.next_tick;
        time::sleep_until(due).await;

        let now = Instant::now();
        let period = self.config.period;
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(due);
        let overrun = late_by > period / 10;
        let mut ticks_skipped = 0u64;
        if overrun {
            self.total_overruns += 1;
            ticks_skipped = (late_by.as_nanos() / period.as_nanos()) as u64;
        }

        self.next_tick = match self.config.policy {
            TickPolicy::Skip => {
                if ticks_skipped > 0 {
                    warn!(
                        tick = self.tick_count,
                        skipped = ticks_skipped,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "tick overrun, skipping ahead"
                    );
                }
                now + period
            }
            TickPolicy::Drop => {
                if overrun {
                    warn!(
                        tick = self.tick_count,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "tick overrun, keeping original cadence"
                    );
                }
                due + period
            }
        };

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Restarts the cadence: the next tick is one full period from now and
    /// the tick counter goes back to zero.
    ///
    /// Called on every phase entry so a phase's first tick is never
    /// shortened by time spent in the previous one.
    pub fn reset(&mut self) {
        self.tick_count = 0;
        self.next_tick = Instant::now() + self.config.period;
    }

    /// Ticks fired since creation or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Overruns observed over the scheduler's lifetime.
    pub fn total_overruns(&self) -> u64 {
        self.total_overruns
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.config.period
    }
}
