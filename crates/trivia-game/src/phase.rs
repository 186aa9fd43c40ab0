//! The phase table and the per-game phase plan.
//!
//! Each [`GamePhase`] maps to a fixed set of plain function hooks over
//! [`GameState`]. The room driver looks them up; nothing here captures
//! state, so every transition can be exercised on its own.

use trivia_protocol::GamePhase;

use crate::GameState;

/// Behaviour attached to one phase kind.
#[derive(Clone, Copy)]
pub struct PhaseHooks {
    /// Runs once, before the entry snapshot is published.
    pub on_enter: fn(&mut GameState),
    /// Runs once, after the countdown ends or the stop condition holds.
    pub on_exit: fn(&mut GameState),
    /// Ends the phase early when it returns `true`. Checked on entry and
    /// after every command and tick.
    pub stop_when: Option<fn(&GameState) -> bool>,
}

fn nothing(_: &mut GameState) {}

fn bot_level_chosen(s: &GameState) -> bool {
    s.bot_level().is_some()
}

fn everyone_voted(s: &GameState) -> bool {
    s.all_humans(|p| p.selected_category.is_some())
}

/// A round ends early once every human has answered, or at once when the
/// round has no question to answer.
fn round_over(s: &GameState) -> bool {
    s.current_question().is_none() || s.all_humans(|p| p.has_answered())
}

impl PhaseHooks {
    const IDLE: Self = Self {
        on_enter: nothing,
        on_exit: nothing,
        stop_when: None,
    };

    /// Whether the stop condition currently holds.
    pub fn should_stop(&self, state: &GameState) -> bool {
        self.stop_when.is_some_and(|stop| stop(state))
    }
}

/// The dispatch table.
pub fn hooks(phase: GamePhase) -> PhaseHooks {
    match phase {
        GamePhase::GameStarted => PhaseHooks {
            on_enter: GameState::reset_game,
            ..PhaseHooks::IDLE
        },
        GamePhase::BotLevelSelection => PhaseHooks {
            on_exit: GameState::add_bots,
            stop_when: Some(bot_level_chosen),
            ..PhaseHooks::IDLE
        },
        GamePhase::CategorySelection => PhaseHooks {
            on_exit: GameState::choose_category,
            stop_when: Some(everyone_voted),
            ..PhaseHooks::IDLE
        },
        GamePhase::CategoryResults | GamePhase::GameEnded => PhaseHooks::IDLE,
        GamePhase::AwaitingAnswers => PhaseHooks {
            on_enter: GameState::begin_round,
            on_exit: GameState::score_round,
            stop_when: Some(round_over),
        },
        GamePhase::RoundEnded => PhaseHooks {
            on_enter: GameState::draw_next_question,
            ..PhaseHooks::IDLE
        },
    }
}

/// The phases a room walks through, fixed when the room is created.
///
/// Bot-level selection is only offered to a single human.
pub fn plan(humans: usize, num_questions: u32) -> Vec<GamePhase> {
    let mut phases = vec![GamePhase::GameStarted];
    if humans == 1 {
        phases.push(GamePhase::BotLevelSelection);
    }
    phases.push(GamePhase::CategorySelection);
    phases.push(GamePhase::CategoryResults);
    for _ in 0..num_questions {
        phases.push(GamePhase::AwaitingAnswers);
        phases.push(GamePhase::RoundEnded);
    }
    phases.push(GamePhase::GameEnded);
    phases
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use trivia_protocol::{BotLevel, Category, GameId, PlayerId};

    use super::*;
    use crate::{GameConfig, InMemoryQuestionSource, Question};

    fn state(humans: &[&str]) -> GameState {
        let ids: Vec<PlayerId> =
            humans.iter().map(|&h| PlayerId::new(h)).collect();
        let source = InMemoryQuestionSource::new().with(
            Category::Art,
            Question {
                text: "?".into(),
                options: ["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: 0,
                difficulty: 1,
            },
        );
        let config = GameConfig {
            rng_seed: Some(5),
            ..Default::default()
        };
        let rng = config.room_rng(0);
        GameState::new(GameId(3), &ids, Arc::new(config), Arc::new(source), rng)
    }

    #[test]
    fn test_plan_for_group() {
        let phases = plan(2, 2);
        assert_eq!(
            phases,
            vec![
                GamePhase::GameStarted,
                GamePhase::CategorySelection,
                GamePhase::CategoryResults,
                GamePhase::AwaitingAnswers,
                GamePhase::RoundEnded,
                GamePhase::AwaitingAnswers,
                GamePhase::RoundEnded,
                GamePhase::GameEnded,
            ]
        );
    }

    #[test]
    fn test_plan_for_solo_includes_bot_level() {
        let phases = plan(1, 10);
        assert_eq!(phases[1], GamePhase::BotLevelSelection);
        assert_eq!(phases.len(), 1 + 1 + 2 + 20 + 1);
    }

    #[test]
    fn test_only_timed_phases_lack_stop_condition() {
        let config = GameConfig::default();
        for phase in plan(1, 1) {
            let h = hooks(phase);
            assert!(
                h.stop_when.is_some() || config.durations.of(phase) > 0,
                "{phase} could never end"
            );
        }
    }

    #[test]
    fn test_bot_level_phase_stops_once_chosen() {
        let mut s = state(&["solo"]);
        s.enter_phase(GamePhase::BotLevelSelection);
        let h = hooks(GamePhase::BotLevelSelection);
        assert!(!h.should_stop(&s));

        s.set_bot_level(&PlayerId::new("solo"), BotLevel::Novice);
        assert!(h.should_stop(&s));
        (h.on_exit)(&mut s);
        assert_eq!(s.player_count(), 4);
    }

    #[test]
    fn test_category_phase_waits_for_every_human() {
        let mut s = state(&["a", "b"]);
        s.enter_phase(GamePhase::CategorySelection);
        let h = hooks(GamePhase::CategorySelection);

        s.vote_category(&PlayerId::new("a"), Category::Art);
        assert!(!h.should_stop(&s));
        s.vote_category(&PlayerId::new("b"), Category::Art);
        assert!(h.should_stop(&s));
    }

    #[test]
    fn test_answer_phase_stops_exactly_when_all_humans_answered() {
        let mut s = state(&["a", "b"]);
        s.enter_phase(GamePhase::CategorySelection);
        s.vote_category(&PlayerId::new("a"), Category::Art);
        (hooks(GamePhase::CategorySelection).on_exit)(&mut s);
        s.add_bots();

        let h = hooks(GamePhase::AwaitingAnswers);
        s.enter_phase(GamePhase::AwaitingAnswers);
        (h.on_enter)(&mut s);
        assert!(s.current_question().is_some());
        assert!(!h.should_stop(&s));

        s.submit_answer(&PlayerId::new("a"), 0);
        assert!(!h.should_stop(&s));
        // Bots never answer; only humans count.
        s.submit_answer(&PlayerId::new("b"), 3);
        assert!(h.should_stop(&s));
    }

    #[test]
    fn test_answer_phase_without_question_stops_immediately() {
        let mut s = state(&["a"]);
        let h = hooks(GamePhase::AwaitingAnswers);
        s.enter_phase(GamePhase::AwaitingAnswers);
        (h.on_enter)(&mut s);
        assert!(h.should_stop(&s));
    }
}
