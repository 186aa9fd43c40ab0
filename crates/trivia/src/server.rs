//! `TriviaServer` builder and the consumer loop.
//!
//! This is the entry point for running the trivia core. It ties together
//! the layers: lobby → bus ← game rooms, and the single consumer that
//! drains the bus into an [`EventSink`].

use std::sync::Arc;

use trivia_bus::{EventBus, EventConsumer, EventPublisher};
use trivia_game::{
    GameManager, HintService, InMemoryQuestionSource, NoHints, QuestionSource,
    public_message,
};
use trivia_lobby::Lobby;
use trivia_protocol::{PlayerId, ServerEvent};

use crate::{EventSink, TriviaConfig, TriviaError};

/// Builder for a [`TriviaServer`].
///
/// # Example
///
/// ```rust,ignore
/// use trivia::prelude::*;
///
/// let server = TriviaServer::builder()
///     .config(TriviaConfig::from_json_file("trivia.json")?)
///     .questions(Arc::new(bank))
///     .build(NoHints);
/// let handle = server.handle();
/// tokio::spawn(server.run(sink));
/// handle.dispatch(player, ClientAction::JoinLobby).await?;
/// ```
pub struct TriviaServerBuilder {
    config: TriviaConfig,
    questions: Option<Arc<dyn QuestionSource>>,
}

impl TriviaServerBuilder {
    /// Creates a builder with default settings and no questions.
    pub fn new() -> Self {
        Self {
            config: TriviaConfig::default(),
            questions: None,
        }
    }

    pub fn config(mut self, config: TriviaConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the question store. Without one, every round is question-less.
    pub fn questions(mut self, questions: Arc<dyn QuestionSource>) -> Self {
        self.questions = Some(questions);
        self
    }

    /// Wires the bus, lobby, and game manager together.
    pub fn build<H: HintService>(self, hints: H) -> TriviaServer<H> {
        let (events, consumer) = EventBus::new();
        let questions = self
            .questions
            .unwrap_or_else(|| Arc::new(InMemoryQuestionSource::new()));

        let lobby = Lobby::new(self.config.lobby, events.clone());
        let games =
            GameManager::new(self.config.game, questions, hints, events.clone());

        TriviaServer {
            handle: TriviaHandle {
                lobby,
                games,
                events,
            },
            consumer,
        }
    }
}

impl Default for TriviaServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The client-facing half of a server. Cheap to clone.
///
/// Transports hold one of these per connection and feed it decoded
/// actions through [`dispatch`](Self::dispatch).
pub struct TriviaHandle<H: HintService> {
    pub(crate) lobby: Lobby,
    pub(crate) games: GameManager<H>,
    pub(crate) events: EventPublisher,
}

impl<H: HintService> Clone for TriviaHandle<H> {
    fn clone(&self) -> Self {
        Self {
            lobby: self.lobby.clone(),
            games: self.games.clone(),
            events: self.events.clone(),
        }
    }
}

impl<H: HintService> TriviaHandle<H> {
    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn games(&self) -> &GameManager<H> {
        &self.games
    }

    /// Relays a public chat line to everyone.
    ///
    /// # Errors
    /// [`TriviaError::Bus`] if the consumer is gone.
    pub fn send_chat(
        &self,
        sender: PlayerId,
        display_name: &str,
        text: &str,
    ) -> Result<(), TriviaError> {
        let message = public_message(sender, display_name, text);
        self.events.publish(ServerEvent::Message(message))?;
        Ok(())
    }

    /// Forgets a player everywhere: the lobby and their game, if any.
    pub async fn disconnect(&self, player_id: &PlayerId) {
        self.lobby.remove_player(player_id).await;
        let closed = self.games.remove_player(player_id).await;
        tracing::info!(%player_id, closed_game = closed, "player disconnected");
    }

    /// Turns the current lobby into a game and empties the lobby.
    async fn start_game(&self) {
        let players = self.lobby.players().await;
        if !players.is_empty() {
            match self.games.new_game(players).await {
                Ok(game_id) => {
                    tracing::info!(%game_id, "lobby promoted to game");
                }
                Err(e) => tracing::warn!(error = %e, "failed to start game"),
            }
        }
        self.lobby.clear().await;
    }
}

/// A trivia server: the handle plus the single bus consumer.
///
/// Call [`run()`](Self::run) to start delivering events.
pub struct TriviaServer<H: HintService> {
    handle: TriviaHandle<H>,
    consumer: EventConsumer,
}

impl TriviaServer<NoHints> {
    /// Creates a new builder. The hint service is chosen at
    /// [`build`](TriviaServerBuilder::build).
    pub fn builder() -> TriviaServerBuilder {
        TriviaServerBuilder::new()
    }
}

impl<H: HintService> TriviaServer<H> {
    /// A handle for feeding client actions in while [`run`](Self::run)
    /// is going.
    pub fn handle(&self) -> TriviaHandle<H> {
        self.handle.clone()
    }

    /// Runs the consumer loop.
    ///
    /// Delivers every event to `sink` in bus order. After a `LobbyUpdate`
    /// that says a game should start is delivered, the waiting players
    /// become a new game and the lobby is cleared. Runs until the sink
    /// fails.
    ///
    /// # Errors
    /// Whatever the sink returns.
    pub async fn run(mut self, sink: impl EventSink) -> Result<(), TriviaError> {
        tracing::info!("trivia server running");

        while let Some(event) = self.consumer.consume().await {
            let start = matches!(
                &event,
                ServerEvent::LobbyUpdate(update) if update.should_start_game
            );
            tracing::trace!(event = event.name(), "delivering");
            sink.deliver(&event).await?;

            if start {
                self.handle.start_game().await;
            }
        }

        tracing::info!("event bus closed, trivia server stopping");
        Ok(())
    }
}
