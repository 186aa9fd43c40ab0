//! Client action dispatch.
//!
//! Decoded [`ClientAction`]s come in from the transport; this routes each
//! one to the lobby, the player's game, or the chat relay.

use trivia_game::HintService;
use trivia_protocol::{ClientAction, PlayerId};

use crate::{TriviaError, TriviaHandle};

impl<H: HintService> TriviaHandle<H> {
    /// Routes one action from `player_id`.
    ///
    /// Actions that make sense on the wire but not right now (answering
    /// outside a round, voting twice, acting while not in a game) are
    /// ignored by the room they reach.
    ///
    /// # Errors
    /// [`TriviaError::Protocol`] if the action can never be valid, or
    /// [`TriviaError::Bus`] if a chat line cannot be published.
    pub async fn dispatch(
        &self,
        player_id: PlayerId,
        action: ClientAction,
    ) -> Result<(), TriviaError> {
        if let Err(e) = action.validate() {
            tracing::debug!(%player_id, error = %e, "rejected client action");
            return Err(e.into());
        }

        match action {
            ClientAction::JoinLobby => {
                if let Some(game_id) = self.games.player_game(&player_id).await {
                    tracing::debug!(
                        %player_id, %game_id, "already in a game, not joining lobby"
                    );
                } else {
                    self.lobby.add_player(player_id).await;
                }
            }
            ClientAction::LeaveLobby => {
                self.lobby.remove_player(&player_id).await;
            }
            ClientAction::SetBotLevel { level } => {
                self.games.route_bot_level(player_id, level).await;
            }
            ClientAction::SelectCategory { category } => {
                self.games.route_category_vote(player_id, category).await;
            }
            ClientAction::SubmitAnswer { answer } => {
                self.games.route_answer(player_id, answer).await;
            }
            ClientAction::UsePowerUp { power_up } => {
                self.games.route_power_up(player_id, power_up).await;
            }
            ClientAction::SendMessage { display_name, text } => {
                self.send_chat(player_id, &display_name, &text)?;
            }
            ClientAction::Disconnect => {
                self.disconnect(&player_id).await;
            }
        }

        Ok(())
    }
}
