//! Game manager: creates rooms, tracks who plays where, and routes
//! player actions to the right room.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use trivia_bus::EventPublisher;
use trivia_protocol::{
    BotLevel, Category, GameId, NewGame, PlayerId, PowerUp, ServerEvent,
};

use crate::game::create_game;
use crate::{
    GameConfig, GameError, GameHandle, GameInfo, GameState, HintService,
    QuestionSource,
};

/// Counter for generating unique game IDs.
static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

/// Command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// The two indexes the manager keeps in sync.
#[derive(Default)]
struct Registry {
    games: HashMap<GameId, GameHandle>,
    /// A player is in at most one game at a time.
    player_games: HashMap<PlayerId, GameId>,
}

impl Registry {
    fn handle_for(&self, player_id: &PlayerId) -> Option<GameHandle> {
        let game_id = self.player_games.get(player_id)?;
        self.games.get(game_id).cloned()
    }

    fn unregister(&mut self, game_id: GameId) -> bool {
        self.player_games.retain(|_, g| *g != game_id);
        self.games.remove(&game_id).is_some()
    }
}

/// Owns every running room.
///
/// Cheap to clone; clones share the same registry. The registry lock is
/// never held across a send to a room.
pub struct GameManager<H: HintService> {
    registry: Arc<Mutex<Registry>>,
    /// Rooms this manager has created; offsets each room's seed.
    created: Arc<AtomicU64>,
    config: Arc<GameConfig>,
    questions: Arc<dyn QuestionSource>,
    hints: Arc<H>,
    events: EventPublisher,
}

impl<H: HintService> Clone for GameManager<H> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            created: Arc::clone(&self.created),
            config: Arc::clone(&self.config),
            questions: Arc::clone(&self.questions),
            hints: Arc::clone(&self.hints),
            events: self.events.clone(),
        }
    }
}

impl<H: HintService> GameManager<H> {
    pub fn new(
        config: GameConfig,
        questions: Arc<dyn QuestionSource>,
        hints: H,
        events: EventPublisher,
    ) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            created: Arc::new(AtomicU64::new(0)),
            config: Arc::new(config),
            questions,
            hints: Arc::new(hints),
            events,
        }
    }

    /// Creates a room for `players` and starts it in the background.
    ///
    /// Publishes `NewGame` before the room's first snapshot. The room
    /// unregisters itself when it finishes.
    ///
    /// # Errors
    /// Returns [`GameError::NoPlayers`] if `players` is empty.
    pub async fn new_game(
        &self,
        players: Vec<PlayerId>,
    ) -> Result<GameId, GameError> {
        if players.is_empty() {
            return Err(GameError::NoPlayers);
        }

        let game_id = GameId(NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed));
        let ordinal = self.created.fetch_add(1, Ordering::Relaxed);
        let state = GameState::new(
            game_id,
            &players,
            Arc::clone(&self.config),
            Arc::clone(&self.questions),
            self.config.room_rng(ordinal),
        );
        let (handle, game) = create_game(
            state,
            self.events.clone(),
            Arc::clone(&self.hints),
            DEFAULT_CHANNEL_SIZE,
        );

        {
            let mut registry = self.registry.lock().await;
            registry.games.insert(game_id, handle);
            for player_id in &players {
                registry.player_games.insert(player_id.clone(), game_id);
            }
        }
        tracing::info!(%game_id, players = players.len(), "game created");

        let event = ServerEvent::NewGame(NewGame { game_id, players });
        if let Err(e) = self.events.publish(event) {
            tracing::warn!(%game_id, error = %e, "failed to publish new game");
        }

        let registry = Arc::clone(&self.registry);
        tokio::spawn(async move {
            game.run().await;
            if registry.lock().await.unregister(game_id) {
                tracing::info!(%game_id, "game unregistered");
            }
        });

        Ok(game_id)
    }

    /// Looks up the room `player_id` is in. A miss is logged and
    /// otherwise ignored.
    async fn lookup(&self, player_id: &PlayerId, action: &str) -> Option<GameHandle> {
        let handle = self.registry.lock().await.handle_for(player_id);
        if handle.is_none() {
            tracing::debug!(%player_id, action, "player not in any game, ignoring");
        }
        handle
    }

    pub async fn route_answer(&self, player_id: PlayerId, answer: usize) {
        if let Some(handle) = self.lookup(&player_id, "answer").await {
            if let Err(e) = handle.submit_answer(player_id, answer).await {
                tracing::debug!(error = %e, "answer not delivered");
            }
        }
    }

    pub async fn route_category_vote(
        &self,
        player_id: PlayerId,
        category: Category,
    ) {
        if let Some(handle) = self.lookup(&player_id, "category vote").await {
            if let Err(e) = handle.vote_category(player_id, category).await {
                tracing::debug!(error = %e, "category vote not delivered");
            }
        }
    }

    pub async fn route_power_up(&self, player_id: PlayerId, power_up: PowerUp) {
        if let Some(handle) = self.lookup(&player_id, "power-up").await {
            if let Err(e) = handle.use_power_up(player_id, power_up).await {
                tracing::debug!(error = %e, "power-up not delivered");
            }
        }
    }

    pub async fn route_bot_level(&self, player_id: PlayerId, level: BotLevel) {
        if let Some(handle) = self.lookup(&player_id, "bot level").await {
            if let Err(e) = handle.set_bot_level(player_id, level).await {
                tracing::debug!(error = %e, "bot level not delivered");
            }
        }
    }

    /// Takes a player out of their game.
    ///
    /// If no humans remain the room is unregistered; dropping its handle
    /// closes the room's command channel and the room stops. Returns
    /// `true` if this removal closed the room, whichever side got to
    /// unregister it.
    pub async fn remove_player(&self, player_id: &PlayerId) -> bool {
        let (game_id, handle) = {
            let mut registry = self.registry.lock().await;
            let Some(game_id) = registry.player_games.remove(player_id) else {
                tracing::debug!(%player_id, "player not in any game, ignoring removal");
                return false;
            };
            (game_id, registry.games.get(&game_id).cloned())
        };
        let Some(handle) = handle else {
            return false;
        };

        let closable = match handle.remove_player(player_id.clone()).await {
            Ok(closable) => closable,
            // The room already finished on its own.
            Err(_) => true,
        };
        drop(handle);

        if closable {
            // The room task may have unregistered itself first.
            self.registry.lock().await.unregister(game_id);
            tracing::info!(%game_id, "last human left, game closed");
        }
        closable
    }

    /// Number of registered rooms.
    pub async fn game_count(&self) -> usize {
        self.registry.lock().await.games.len()
    }

    pub async fn game_ids(&self) -> Vec<GameId> {
        self.registry.lock().await.games.keys().copied().collect()
    }

    /// The room `player_id` is in, if any.
    pub async fn player_game(&self, player_id: &PlayerId) -> Option<GameId> {
        self.registry.lock().await.player_games.get(player_id).copied()
    }

    /// Asks a room for its summary. `None` if the room is gone.
    pub async fn game_info(&self, game_id: GameId) -> Option<GameInfo> {
        let handle = self.registry.lock().await.games.get(&game_id).cloned()?;
        handle.info().await.ok()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
