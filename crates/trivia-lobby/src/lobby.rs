//! The shared waiting pool and its countdown task.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use trivia_bus::EventPublisher;
use trivia_protocol::{LobbyUpdate, PlayerId, ServerEvent};
use trivia_tick::TickScheduler;

use crate::LobbyConfig;

/// Whether a lobby with `waiting` players and `seconds_remaining` left
/// should hand its players to a new game.
///
/// A full lobby starts immediately; otherwise a non-empty lobby starts when
/// the countdown reaches zero. An empty lobby never starts.
pub fn should_start(
    waiting: usize,
    seconds_remaining: u32,
    max_players: usize,
) -> bool {
    waiting >= max_players || (seconds_remaining == 0 && waiting > 0)
}

struct LobbyInner {
    /// Waiting players in join order. Never holds duplicates.
    waiting: Vec<PlayerId>,
    /// The running countdown, if any.
    countdown: Option<JoinHandle<()>>,
}

impl LobbyInner {
    fn cancel_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            handle.abort();
        }
    }

    fn countdown_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(|h| !h.is_finished())
    }
}

/// The process-wide matchmaking pool.
///
/// Cheap to clone; all clones share the same waiting set and countdown.
#[derive(Clone)]
pub struct Lobby {
    inner: Arc<Mutex<LobbyInner>>,
    config: LobbyConfig,
    events: EventPublisher,
}

impl Lobby {
    /// Creates an empty lobby publishing to `events`.
    pub fn new(config: LobbyConfig, events: EventPublisher) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LobbyInner {
                waiting: Vec::new(),
                countdown: None,
            })),
            config,
            events,
        }
    }

    /// Adds a player and starts the countdown if none is running.
    ///
    /// Adding a player who is already waiting changes nothing.
    pub async fn add_player(&self, player_id: PlayerId) {
        let mut inner = self.inner.lock().await;
        if !inner.waiting.contains(&player_id) {
            inner.waiting.push(player_id.clone());
            tracing::debug!(
                %player_id,
                waiting = inner.waiting.len(),
                "player joined lobby"
            );
        }

        if !inner.countdown_running() {
            tracing::info!(
                timeout = self.config.timeout_seconds,
                "lobby countdown started"
            );
            let task = tokio::spawn(run_countdown(
                Arc::clone(&self.inner),
                self.config.clone(),
                self.events.clone(),
            ));
            inner.countdown = Some(task);
        }
    }

    /// Removes a player. Cancels the countdown once nobody is left.
    pub async fn remove_player(&self, player_id: &PlayerId) {
        let mut inner = self.inner.lock().await;
        let before = inner.waiting.len();
        inner.waiting.retain(|p| p != player_id);
        if inner.waiting.len() < before {
            tracing::debug!(
                %player_id,
                waiting = inner.waiting.len(),
                "player left lobby"
            );
        }
        if inner.waiting.is_empty() && inner.countdown.is_some() {
            inner.cancel_countdown();
            tracing::info!("lobby empty, countdown cancelled");
        }
    }

    /// A copy of the waiting players, in join order.
    pub async fn players(&self) -> Vec<PlayerId> {
        self.inner.lock().await.waiting.clone()
    }

    /// Whether `player_id` is waiting.
    pub async fn contains(&self, player_id: &PlayerId) -> bool {
        self.inner.lock().await.waiting.contains(player_id)
    }

    /// Cancels the countdown and empties the lobby.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.cancel_countdown();
        inner.waiting.clear();
    }

    /// Whether a countdown task is currently running.
    pub async fn is_counting_down(&self) -> bool {
        self.inner.lock().await.countdown_running()
    }

    pub fn config(&self) -> &LobbyConfig {
        &self.config
    }
}

/// The countdown loop. Publishes one `LobbyUpdate` right away and one per
/// tick after that, until a game should start.
async fn run_countdown(
    inner: Arc<Mutex<LobbyInner>>,
    config: LobbyConfig,
    events: EventPublisher,
) {
    let mut ticker = TickScheduler::every(config.tick_interval());
    let mut remaining = config.timeout_seconds;

    loop {
        let players = inner.lock().await.waiting.clone();
        let start =
            should_start(players.len(), remaining, config.max_players);

        let update = ServerEvent::LobbyUpdate(LobbyUpdate {
            players,
            seconds_remaining: remaining,
            should_start_game: start,
        });
        if let Err(e) = events.publish(update) {
            tracing::warn!(error = %e, "failed to publish lobby update");
        }

        if start {
            tracing::info!(remaining, "lobby countdown finished");
            break;
        }

        ticker.wait_for_tick().await;
        remaining = remaining.saturating_sub(1);
    }
}
