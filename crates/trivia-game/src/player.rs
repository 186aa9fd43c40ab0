//! Per-player game state.

use trivia_protocol::{
    BotLevel, Category, OPTION_COUNT, PlayerId, PlayerSnapshot, PowerUp,
};

/// Whether a seat is held by a person or filled by the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Human,
    Bot(BotLevel),
}

/// One seat in a game. Owned by the room's [`GameState`](crate::GameState).
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub kind: PlayerKind,
    pub score: u32,
    /// This player's category vote. Set at most once per game.
    pub selected_category: Option<Category>,
    /// The option chosen this round.
    pub answer: Option<usize>,
    /// Seconds remaining when `answer` was submitted.
    pub answered_at: u32,
    /// Which options this player can see. FiftyFifty clears two.
    pub visible_options: [bool; OPTION_COUNT],
    /// Power-ups spent this game, in the order they were used.
    pub used_power_ups: Vec<PowerUp>,
    pub double_points: bool,
}

impl Player {
    pub fn human(id: PlayerId) -> Self {
        let name = id.as_str().to_string();
        Self::with_kind(id, name, PlayerKind::Human)
    }

    pub fn bot(id: PlayerId, name: String, level: BotLevel) -> Self {
        Self::with_kind(id, name, PlayerKind::Bot(level))
    }

    fn with_kind(id: PlayerId, name: String, kind: PlayerKind) -> Self {
        Self {
            id,
            name,
            kind,
            score: 0,
            selected_category: None,
            answer: None,
            answered_at: 0,
            visible_options: [true; OPTION_COUNT],
            used_power_ups: Vec::new(),
            double_points: false,
        }
    }

    pub fn is_human(&self) -> bool {
        self.kind == PlayerKind::Human
    }

    pub fn is_bot(&self) -> bool {
        !self.is_human()
    }

    pub fn has_answered(&self) -> bool {
        self.answer.is_some()
    }

    pub fn has_used(&self, power_up: PowerUp) -> bool {
        self.used_power_ups.contains(&power_up)
    }

    /// Clears everything that lives for one question.
    pub fn reset_round(&mut self) {
        self.answer = None;
        self.answered_at = 0;
        self.visible_options = [true; OPTION_COUNT];
        self.double_points = false;
    }

    /// Clears everything that lives for one game.
    pub fn reset_game(&mut self) {
        self.reset_round();
        self.score = 0;
        self.selected_category = None;
        self.used_power_ups.clear();
    }

    /// The client view of this player. The answer is included only when
    /// `reveal_answer` is set.
    pub fn snapshot(&self, reveal_answer: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            name: self.name.clone(),
            is_bot: self.is_bot(),
            score: self.score,
            answered: self.has_answered(),
            answer: if reveal_answer { self.answer } else { None },
            visible_options: self.visible_options,
            double_points: self.double_points,
            used_power_ups: self.used_power_ups.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn used_everything() -> Player {
        let mut p = Player::human(PlayerId::new("p1"));
        p.score = 40;
        p.selected_category = Some(Category::History);
        p.answer = Some(2);
        p.answered_at = 11;
        p.visible_options = [true, false, true, false];
        p.used_power_ups = vec![PowerUp::FiftyFifty];
        p.double_points = true;
        p
    }

    #[test]
    fn test_reset_round_keeps_game_state() {
        let mut p = used_everything();
        p.reset_round();
        assert_eq!(p.answer, None);
        assert_eq!(p.visible_options, [true; OPTION_COUNT]);
        assert!(!p.double_points);
        assert_eq!(p.score, 40);
        assert_eq!(p.used_power_ups, vec![PowerUp::FiftyFifty]);
        assert_eq!(p.selected_category, Some(Category::History));
    }

    #[test]
    fn test_reset_game_clears_everything() {
        let mut p = used_everything();
        p.reset_game();
        assert_eq!(p.score, 0);
        assert!(p.used_power_ups.is_empty());
        assert_eq!(p.selected_category, None);
        assert_eq!(p.answered_at, 0);
    }

    #[test]
    fn test_snapshot_hides_answer_until_revealed() {
        let p = used_everything();
        let hidden = p.snapshot(false);
        assert!(hidden.answered);
        assert_eq!(hidden.answer, None);
        assert_eq!(p.snapshot(true).answer, Some(2));
    }

    #[test]
    fn test_bot_kind() {
        let bot = Player::bot(
            PlayerId::new("bot-ada"),
            "Ada".into(),
            BotLevel::Expert,
        );
        assert!(bot.is_bot());
        assert_eq!(bot.kind, PlayerKind::Bot(BotLevel::Expert));
        assert!(bot.snapshot(false).is_bot);
    }
}
