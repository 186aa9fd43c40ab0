//! Room actor: one Tokio task per game.
//!
//! The task owns its [`GameState`] outright. Player actions arrive as
//! [`GameCommand`]s over a bounded channel and are multiplexed with the
//! phase tick in a single `select!`, so state is only ever touched by
//! this one task.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use trivia_bus::EventPublisher;
use trivia_protocol::{
    BotLevel, Category, GameId, GamePhase, PlayerId, PowerUp, ServerEvent,
};
use trivia_tick::TickScheduler;

use crate::chat::{self, FRIEND_ID};
use crate::phase;
use crate::{GameError, GameState, HintService, PowerUpOutcome};

/// Shown while the hint service is working.
const THINKING_TEXT: &str = "Hmm, let me think about that…";
/// Shown if the hint service fails.
const NO_ANSWER_TEXT: &str = "Sorry, I couldn't reach a decision in time.";

/// Commands sent to a room through its channel.
pub(crate) enum GameCommand {
    SubmitAnswer {
        player_id: PlayerId,
        answer: usize,
    },
    VoteCategory {
        player_id: PlayerId,
        category: Category,
    },
    UsePowerUp {
        player_id: PlayerId,
        power_up: PowerUp,
    },
    SetBotLevel {
        player_id: PlayerId,
        level: BotLevel,
    },
    /// Replies `true` when no humans remain.
    RemovePlayer {
        player_id: PlayerId,
        reply: oneshot::Sender<bool>,
    },
    GetInfo {
        reply: oneshot::Sender<GameInfo>,
    },
}

/// A summary of one running room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInfo {
    pub game_id: GameId,
    pub phase: GamePhase,
    pub seconds_remaining: u32,
    pub category: Category,
    pub player_count: usize,
    pub human_count: usize,
    /// Current difficulty bucket; `None` before the category is chosen or
    /// once questions run out.
    pub difficulty: Option<usize>,
}

/// Handle to a running room. Cheap to clone.
///
/// When the last handle is dropped the room's command channel closes and
/// the room stops at its next suspension point.
#[derive(Clone)]
pub struct GameHandle {
    game_id: GameId,
    sender: mpsc::Sender<GameCommand>,
}

impl GameHandle {
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    async fn send(&self, cmd: GameCommand) -> Result<(), GameError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| GameError::Unavailable(self.game_id))
    }

    pub async fn submit_answer(
        &self,
        player_id: PlayerId,
        answer: usize,
    ) -> Result<(), GameError> {
        self.send(GameCommand::SubmitAnswer { player_id, answer })
            .await
    }

    pub async fn vote_category(
        &self,
        player_id: PlayerId,
        category: Category,
    ) -> Result<(), GameError> {
        self.send(GameCommand::VoteCategory {
            player_id,
            category,
        })
        .await
    }

    pub async fn use_power_up(
        &self,
        player_id: PlayerId,
        power_up: PowerUp,
    ) -> Result<(), GameError> {
        self.send(GameCommand::UsePowerUp {
            player_id,
            power_up,
        })
        .await
    }

    pub async fn set_bot_level(
        &self,
        player_id: PlayerId,
        level: BotLevel,
    ) -> Result<(), GameError> {
        self.send(GameCommand::SetBotLevel { player_id, level })
            .await
    }

    /// Removes a player and reports whether the room can now close.
    pub async fn remove_player(
        &self,
        player_id: PlayerId,
    ) -> Result<bool, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(GameCommand::RemovePlayer {
            player_id,
            reply: reply_tx,
        })
        .await?;
        reply_rx
            .await
            .map_err(|_| GameError::Unavailable(self.game_id))
    }

    /// Requests a summary of the room.
    pub async fn info(&self) -> Result<GameInfo, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(GameCommand::GetInfo { reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| GameError::Unavailable(self.game_id))
    }
}

/// What woke the phase loop.
enum Wake {
    Command(Option<GameCommand>),
    Tick,
}

/// The room actor.
pub(crate) struct Game<H: HintService> {
    state: GameState,
    commands: mpsc::Receiver<GameCommand>,
    events: EventPublisher,
    hints: Arc<H>,
    ticker: TickScheduler,
}

/// Builds a room and its handle. The caller spawns [`Game::run`].
pub(crate) fn create_game<H: HintService>(
    state: GameState,
    events: EventPublisher,
    hints: Arc<H>,
    channel_size: usize,
) -> (GameHandle, Game<H>) {
    let (sender, commands) = mpsc::channel(channel_size);
    let handle = GameHandle {
        game_id: state.id(),
        sender,
    };
    let ticker = TickScheduler::every(state.config().tick_interval());
    let game = Game {
        state,
        commands,
        events,
        hints,
        ticker,
    };
    (handle, game)
}

impl<H: HintService> Game<H> {
    /// Walks the phase plan to the end, or until the room empties or every
    /// handle is gone.
    pub(crate) async fn run(mut self) {
        let game_id = self.state.id();
        let plan = phase::plan(
            self.state.human_count(),
            self.state.config().num_questions,
        );
        tracing::info!(
            %game_id,
            players = self.state.player_count(),
            phases = plan.len(),
            "game started"
        );

        for kind in plan {
            if self.state.human_count() == 0 {
                tracing::info!(%game_id, "no humans left, stopping game");
                break;
            }
            if !self.run_phase(kind).await {
                tracing::info!(%game_id, "game abandoned");
                break;
            }
        }

        tracing::info!(%game_id, "game finished");
    }

    /// Runs one phase. Returns `false` if the command channel closed.
    async fn run_phase(&mut self, kind: GamePhase) -> bool {
        let hooks = phase::hooks(kind);
        self.state.enter_phase(kind);
        debug_assert!(
            self.state.remaining() > 0 || hooks.stop_when.is_some(),
            "phase {kind} has no duration and no stop condition"
        );
        tracing::debug!(
            game_id = %self.state.id(),
            phase = %kind,
            seconds = self.state.remaining(),
            "phase entered"
        );

        (hooks.on_enter)(&mut self.state);
        self.publish_snapshot();
        self.ticker.reset();

        while self.state.remaining() > 0 && !hooks.should_stop(&self.state) {
            let wake = tokio::select! {
                cmd = self.commands.recv() => Wake::Command(cmd),
                _ = self.ticker.wait_for_tick() => Wake::Tick,
            };
            match wake {
                Wake::Command(Some(cmd)) => self.handle(cmd),
                Wake::Command(None) => return false,
                Wake::Tick => {
                    self.state.tick();
                    self.publish_snapshot();
                }
            }
        }

        (hooks.on_exit)(&mut self.state);
        true
    }

    fn handle(&mut self, cmd: GameCommand) {
        match cmd {
            GameCommand::SubmitAnswer { player_id, answer } => {
                if self.state.submit_answer(&player_id, answer) {
                    self.publish_snapshot();
                } else {
                    self.ignored(&player_id, "answer");
                }
            }
            GameCommand::VoteCategory {
                player_id,
                category,
            } => {
                if self.state.vote_category(&player_id, category) {
                    self.publish_snapshot();
                } else {
                    self.ignored(&player_id, "category vote");
                }
            }
            GameCommand::SetBotLevel { player_id, level } => {
                if !self.state.set_bot_level(&player_id, level) {
                    self.ignored(&player_id, "bot level");
                }
            }
            GameCommand::UsePowerUp {
                player_id,
                power_up,
            } => match self.state.use_power_up(&player_id, power_up) {
                PowerUpOutcome::Applied => self.publish_snapshot(),
                PowerUpOutcome::CallFriend { question, options } => {
                    self.publish_snapshot();
                    self.call_friend(player_id, question, options);
                }
                PowerUpOutcome::Ignored => {
                    self.ignored(&player_id, "power-up");
                }
            },
            GameCommand::RemovePlayer { player_id, reply } => {
                let closable = self.state.remove_player(&player_id);
                tracing::info!(
                    game_id = %self.state.id(),
                    %player_id,
                    humans = self.state.human_count(),
                    "player removed"
                );
                let _ = reply.send(closable);
            }
            GameCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
        }
    }

    /// Publishes a private "thinking" line, then asks the hint service in
    /// the background and relays its answer to the same player.
    fn call_friend(
        &self,
        player_id: PlayerId,
        question: String,
        options: Vec<String>,
    ) {
        let friend = PlayerId::new(FRIEND_ID);
        self.publish(ServerEvent::Message(chat::private_message(
            friend.clone(),
            "Friend",
            THINKING_TEXT,
            player_id.clone(),
        )));

        let hints = Arc::clone(&self.hints);
        let events = self.events.clone();
        let game_id = self.state.id();
        tokio::spawn(async move {
            let text = match hints.call_friend(&question, &options).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(%game_id, error = %e, "hint service failed");
                    NO_ANSWER_TEXT.to_string()
                }
            };
            let reply = chat::private_message(friend, "Friend", text, player_id);
            if let Err(e) = events.publish(ServerEvent::Message(reply)) {
                tracing::warn!(%game_id, error = %e, "failed to publish hint");
            }
        });
    }

    fn ignored(&self, player_id: &PlayerId, what: &str) {
        tracing::debug!(
            game_id = %self.state.id(),
            %player_id,
            phase = %self.state.phase(),
            what,
            "action ignored"
        );
    }

    fn publish_snapshot(&self) {
        self.publish(ServerEvent::GameUpdate(self.state.snapshot()));
    }

    fn publish(&self, event: ServerEvent) {
        if let Err(e) = self.events.publish(event) {
            tracing::warn!(
                game_id = %self.state.id(),
                error = %e,
                "failed to publish game event"
            );
        }
    }

    fn info(&self) -> GameInfo {
        GameInfo {
            game_id: self.state.id(),
            phase: self.state.phase(),
            seconds_remaining: self.state.remaining(),
            category: self.state.category(),
            player_count: self.state.player_count(),
            human_count: self.state.human_count(),
            difficulty: self.state.difficulty(),
        }
    }
}
