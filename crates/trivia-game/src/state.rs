//! Room state and the rules that mutate it.
//!
//! [`GameState`] is plain data plus synchronous methods. It knows nothing
//! about tasks, channels, or time; the room actor in `game.rs` owns one
//! and drives it through the phase table in `phase.rs`. That split keeps
//! every rule testable without a runtime.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use trivia_protocol::{
    BotLevel, Category, GameId, GamePhase, GameUpdate, OPTION_COUNT, PlayerId,
    PowerUp,
};

use crate::{
    GameConfig, Player, PlayerKind, Question, QuestionSource, QuestionSupply,
    bot,
};

/// What a power-up request turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerUpOutcome {
    /// The effect is already applied to the player.
    Applied,
    /// The caller must ask the hint service about this question.
    CallFriend {
        question: String,
        options: Vec<String>,
    },
    /// Not allowed right now, or already spent. Nothing changed.
    Ignored,
}

/// Everything one room knows.
pub struct GameState {
    id: GameId,
    pub(crate) players: BTreeMap<PlayerId, Player>,
    pub(crate) category: Category,
    pub(crate) bot_level: Option<BotLevel>,
    pub(crate) phase: GamePhase,
    pub(crate) remaining: u32,
    pub(crate) current_question: Option<Question>,
    pub(crate) upcoming_question: Option<Question>,
    pub(crate) supply: QuestionSupply,
    pub(crate) rng: StdRng,
    config: Arc<GameConfig>,
    questions: Arc<dyn QuestionSource>,
}

impl GameState {
    /// A fresh room for `humans`, sitting in `GameStarted`.
    ///
    /// `rng` drives every random choice the room makes: bot names and
    /// scores, tie-breaks, question order, and FiftyFifty.
    pub fn new(
        id: GameId,
        humans: &[PlayerId],
        config: Arc<GameConfig>,
        questions: Arc<dyn QuestionSource>,
        rng: StdRng,
    ) -> Self {
        let players = humans
            .iter()
            .map(|id| (id.clone(), Player::human(id.clone())))
            .collect();
        Self {
            id,
            players,
            category: Category::Random,
            bot_level: None,
            phase: GamePhase::GameStarted,
            remaining: config.durations.of(GamePhase::GameStarted),
            current_question: None,
            upcoming_question: None,
            supply: QuestionSupply::default(),
            rng,
            config,
            questions,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn bot_level(&self) -> Option<BotLevel> {
        self.bot_level
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn human_count(&self) -> usize {
        self.humans().count()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    /// Current difficulty bucket, or `None` once questions run out.
    pub fn difficulty(&self) -> Option<usize> {
        self.supply.difficulty()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn humans(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.is_human())
    }

    /// True when every human satisfies `done`. Vacuously true without
    /// humans.
    pub(crate) fn all_humans(&self, done: impl Fn(&Player) -> bool) -> bool {
        self.humans().all(done)
    }

    /// Mutable access to a human seat, if `id` is one.
    fn human_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id).filter(|p| p.is_human())
    }

    // -----------------------------------------------------------------------
    // Player actions
    // -----------------------------------------------------------------------

    /// Records a human's answer. Only the first answer of a round counts.
    ///
    /// Returns `true` if the answer was accepted.
    pub fn submit_answer(&mut self, id: &PlayerId, answer: usize) -> bool {
        if self.phase != GamePhase::AwaitingAnswers
            || self.current_question.is_none()
            || answer >= OPTION_COUNT
        {
            return false;
        }
        let remaining = self.remaining;
        match self.human_mut(id) {
            Some(p) if !p.has_answered() => {
                p.answer = Some(answer);
                p.answered_at = remaining;
                true
            }
            _ => false,
        }
    }

    /// Records a human's category vote. Only the first vote counts.
    pub fn vote_category(
        &mut self,
        id: &PlayerId,
        category: Category,
    ) -> bool {
        if self.phase != GamePhase::CategorySelection
            || !category.is_votable()
        {
            return false;
        }
        match self.human_mut(id) {
            Some(p) if p.selected_category.is_none() => {
                p.selected_category = Some(category);
                true
            }
            _ => false,
        }
    }

    /// Sets the bot level for a solo game. The first human choice wins.
    pub fn set_bot_level(&mut self, id: &PlayerId, level: BotLevel) -> bool {
        if self.phase != GamePhase::BotLevelSelection
            || self.bot_level.is_some()
            || self.human_mut(id).is_none()
        {
            return false;
        }
        self.bot_level = Some(level);
        true
    }

    /// Spends a power-up. Each power-up works once per game, for humans,
    /// while a question is being answered.
    pub fn use_power_up(
        &mut self,
        id: &PlayerId,
        power_up: PowerUp,
    ) -> PowerUpOutcome {
        if self.phase != GamePhase::AwaitingAnswers {
            return PowerUpOutcome::Ignored;
        }
        let Some(question) = self.current_question.as_ref() else {
            return PowerUpOutcome::Ignored;
        };
        let Some(player) = self.players.get_mut(id).filter(|p| p.is_human())
        else {
            return PowerUpOutcome::Ignored;
        };
        if player.has_used(power_up) {
            return PowerUpOutcome::Ignored;
        }
        player.used_power_ups.push(power_up);

        match power_up {
            PowerUp::FiftyFifty => {
                let wrong: Vec<usize> = (0..OPTION_COUNT)
                    .filter(|&i| i != question.correct_index)
                    .filter(|&i| player.visible_options[i])
                    .collect();
                for &i in wrong.choose_multiple(&mut self.rng, 2) {
                    player.visible_options[i] = false;
                }
                PowerUpOutcome::Applied
            }
            PowerUp::DoublePoints => {
                player.double_points = true;
                PowerUpOutcome::Applied
            }
            PowerUp::CallFriend => PowerUpOutcome::CallFriend {
                question: question.text.clone(),
                options: question.options.to_vec(),
            },
        }
    }

    /// Drops a player from the room.
    ///
    /// Returns `true` when no humans remain, meaning the room can close.
    pub fn remove_player(&mut self, id: &PlayerId) -> bool {
        self.players.remove(id);
        self.human_count() == 0
    }

    // -----------------------------------------------------------------------
    // Phase effects
    // -----------------------------------------------------------------------

    /// Moves to `phase` with its full configured duration.
    pub(crate) fn enter_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.remaining = self.config.durations.of(phase);
    }

    pub(crate) fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub(crate) fn reset_game(&mut self) {
        for p in self.players.values_mut() {
            p.reset_game();
        }
    }

    /// Seats the filler bots at the chosen level, or the default one.
    pub(crate) fn add_bots(&mut self) {
        let level = self.bot_level.unwrap_or(self.config.default_bot_level);
        self.bot_level = Some(level);
        let bots = bot::synthesize(
            self.config.bot_count,
            level,
            |id| self.players.contains_key(id),
            &mut self.rng,
        );
        for bot in bots {
            self.players.insert(bot.id.clone(), bot);
        }
        tracing::debug!(
            game_id = %self.id,
            %level,
            players = self.players.len(),
            "bots added"
        );
    }

    /// Settles the category, loads the question supply, and draws the
    /// first question.
    pub(crate) fn choose_category(&mut self) {
        let mut votes: BTreeMap<Category, usize> = BTreeMap::new();
        let cast = self.players.values().filter_map(|p| p.selected_category);
        for category in cast {
            *votes.entry(category).or_default() += 1;
        }

        let category = match votes.values().max().copied() {
            Some(top) => {
                let leaders: Vec<Category> = votes
                    .iter()
                    .filter(|&(_, &n)| n == top)
                    .map(|(&c, _)| c)
                    .collect();
                leaders.choose(&mut self.rng).copied()
            }
            None => Category::SELECTABLE.choose(&mut self.rng).copied(),
        };
        self.category = category.unwrap_or(Category::All);

        let questions = match self.questions.questions(self.category) {
            Ok(questions) => questions,
            Err(e) => {
                tracing::warn!(
                    game_id = %self.id,
                    category = ?self.category,
                    error = %e,
                    "question source failed, continuing without questions"
                );
                Vec::new()
            }
        };
        self.supply = QuestionSupply::new(questions, &mut self.rng);
        self.upcoming_question = self.supply.next_question();
        tracing::debug!(
            game_id = %self.id,
            category = ?self.category,
            buckets = self.supply.bucket_count(),
            "category chosen"
        );
    }

    /// Shows the drawn question and clears last round's per-player state.
    pub(crate) fn begin_round(&mut self) {
        self.current_question = self.upcoming_question.take();
        for p in self.players.values_mut() {
            p.reset_round();
        }
    }

    pub(crate) fn draw_next_question(&mut self) {
        self.upcoming_question = self.supply.next_question();
    }

    /// Awards points for the round that just closed and adapts difficulty.
    ///
    /// A correct human earns the seconds that were left when they
    /// answered, doubled under DoublePoints. Bots roll against their
    /// level's profile.
    pub(crate) fn score_round(&mut self) {
        let Some(question) = self.current_question.as_ref() else {
            return;
        };
        let profiles = &self.config.bot_profiles;
        let rng = &mut self.rng;

        let mut humans = 0usize;
        let mut correct = 0usize;
        for p in self.players.values_mut() {
            match p.kind {
                PlayerKind::Human => {
                    humans += 1;
                    if p.answer.is_some_and(|a| question.is_correct(a)) {
                        correct += 1;
                        let multiplier = if p.double_points { 2 } else { 1 };
                        p.score += p.answered_at * multiplier;
                    }
                }
                PlayerKind::Bot(level) => {
                    p.score += bot::simulate(&profiles.get(level), rng);
                }
            }
        }

        if humans == 0 {
            return;
        }
        if correct == humans {
            self.supply.increase_difficulty();
        } else if correct == 0 {
            self.supply.decrease_difficulty();
        }
        tracing::debug!(
            game_id = %self.id,
            humans,
            correct,
            difficulty = ?self.supply.difficulty(),
            "round scored"
        );
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// The client view of the room right now.
    pub fn snapshot(&self) -> GameUpdate {
        let reveal_answers =
            matches!(self.phase, GamePhase::RoundEnded | GamePhase::GameEnded);
        let shown = self
            .current_question
            .as_ref()
            .filter(|_| self.phase.shows_question());

        GameUpdate {
            game_id: self.id,
            category: self.category,
            phase: self.phase,
            players: self
                .players
                .iter()
                .map(|(id, p)| (id.clone(), p.snapshot(reveal_answers)))
                .collect(),
            question_text: shown.map(|q| q.text.clone()).unwrap_or_default(),
            question_options: shown
                .map(|q| q.options.to_vec())
                .unwrap_or_default(),
            correct_answer_index: match shown {
                Some(q) if self.phase == GamePhase::RoundEnded => {
                    q.correct_index as i32
                }
                _ => -1,
            },
            seconds_remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::InMemoryQuestionSource;

    use super::*;

    fn question(difficulty: u8) -> Question {
        Question {
            text: format!("question {difficulty}"),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 1,
            difficulty,
        }
    }

    fn bank() -> Arc<dyn QuestionSource> {
        let mut source = InMemoryQuestionSource::new();
        for d in [1, 1, 2, 2, 3, 3] {
            source = source.with(Category::History, question(d));
        }
        Arc::new(source)
    }

    fn state_with(
        humans: &[&str],
        questions: Arc<dyn QuestionSource>,
        seed: u64,
    ) -> GameState {
        let ids: Vec<PlayerId> =
            humans.iter().map(|&h| PlayerId::new(h)).collect();
        let config = GameConfig {
            rng_seed: Some(seed),
            ..Default::default()
        };
        let rng = config.room_rng(0);
        GameState::new(GameId(1), &ids, Arc::new(config), questions, rng)
    }

    fn state(humans: &[&str]) -> GameState {
        state_with(humans, bank(), 42)
    }

    /// A room in its first AwaitingAnswers phase, category History.
    fn answering(humans: &[&str]) -> GameState {
        answering_from(state(humans), humans)
    }

    fn answering_from(mut s: GameState, humans: &[&str]) -> GameState {
        s.enter_phase(GamePhase::CategorySelection);
        for h in humans {
            s.vote_category(&PlayerId::new(*h), Category::History);
        }
        s.choose_category();
        s.enter_phase(GamePhase::AwaitingAnswers);
        s.begin_round();
        s
    }

    fn pid(id: &str) -> PlayerId {
        PlayerId::new(id)
    }

    // -- answers ------------------------------------------------------------

    #[test]
    fn test_first_answer_wins_and_records_time() {
        let mut s = answering(&["p1"]);
        s.remaining = 12;
        assert!(s.submit_answer(&pid("p1"), 1));
        s.remaining = 5;
        assert!(!s.submit_answer(&pid("p1"), 2));

        let p = s.player(&pid("p1")).unwrap();
        assert_eq!(p.answer, Some(1));
        assert_eq!(p.answered_at, 12);
    }

    #[test]
    fn test_answers_rejected_outside_answer_phase_or_range() {
        let mut s = answering(&["p1"]);
        assert!(!s.submit_answer(&pid("p1"), 4));
        assert!(!s.submit_answer(&pid("ghost"), 0));
        s.enter_phase(GamePhase::RoundEnded);
        assert!(!s.submit_answer(&pid("p1"), 0));
    }

    #[test]
    fn test_correct_answer_scores_remaining_seconds() {
        let mut s = answering(&["p1", "p2"]);
        s.remaining = 12;
        s.submit_answer(&pid("p1"), 1);
        s.remaining = 5;
        s.submit_answer(&pid("p2"), 1);
        s.score_round();

        assert_eq!(s.player(&pid("p1")).unwrap().score, 12);
        assert_eq!(s.player(&pid("p2")).unwrap().score, 5);
    }

    #[test]
    fn test_double_points_doubles_and_wrong_scores_nothing() {
        let mut s = answering(&["p1", "p2"]);
        s.remaining = 9;
        assert_eq!(
            s.use_power_up(&pid("p1"), PowerUp::DoublePoints),
            PowerUpOutcome::Applied
        );
        s.submit_answer(&pid("p1"), 1);
        s.submit_answer(&pid("p2"), 3);
        s.score_round();

        assert_eq!(s.player(&pid("p1")).unwrap().score, 18);
        assert_eq!(s.player(&pid("p2")).unwrap().score, 0);
    }

    // -- difficulty ---------------------------------------------------------

    #[test]
    fn test_all_correct_raises_difficulty() {
        let mut s = answering(&["p1", "p2"]);
        assert_eq!(s.difficulty(), Some(1));
        s.submit_answer(&pid("p1"), 1);
        s.submit_answer(&pid("p2"), 1);
        s.score_round();
        assert_eq!(s.difficulty(), Some(2));
    }

    #[test]
    fn test_none_correct_lowers_difficulty() {
        let mut s = answering(&["p1", "p2"]);
        s.submit_answer(&pid("p1"), 0);
        s.score_round();
        assert_eq!(s.difficulty(), Some(0));
    }

    #[test]
    fn test_mixed_results_keep_difficulty() {
        let mut s = answering(&["p1", "p2"]);
        s.submit_answer(&pid("p1"), 1);
        s.submit_answer(&pid("p2"), 0);
        s.score_round();
        assert_eq!(s.difficulty(), Some(1));
    }

    // -- power-ups ----------------------------------------------------------

    #[test]
    fn test_fifty_fifty_hides_two_wrong_options() {
        for correct in 0..OPTION_COUNT {
            for seed in 0..8 {
                let source = InMemoryQuestionSource::new().with(
                    Category::History,
                    Question {
                        correct_index: correct,
                        ..question(1)
                    },
                );
                let s = state_with(&["p1"], Arc::new(source), seed);
                let mut s = answering_from(s, &["p1"]);
                assert_eq!(
                    s.use_power_up(&pid("p1"), PowerUp::FiftyFifty),
                    PowerUpOutcome::Applied
                );

                let mask = s.player(&pid("p1")).unwrap().visible_options;
                assert_eq!(
                    mask.iter().filter(|v| !**v).count(),
                    2,
                    "correct {correct}, seed {seed}"
                );
                assert!(mask[correct], "correct {correct}, seed {seed}");
            }
        }
    }

    #[test]
    fn test_power_up_twice_is_a_no_op() {
        let mut s = answering(&["p1"]);
        s.use_power_up(&pid("p1"), PowerUp::FiftyFifty);
        let mask = s.player(&pid("p1")).unwrap().visible_options;

        assert_eq!(
            s.use_power_up(&pid("p1"), PowerUp::FiftyFifty),
            PowerUpOutcome::Ignored
        );
        let p = s.player(&pid("p1")).unwrap();
        assert_eq!(p.visible_options, mask);
        assert_eq!(p.used_power_ups, vec![PowerUp::FiftyFifty]);
    }

    #[test]
    fn test_power_up_outside_answer_phase_is_not_consumed() {
        let mut s = state(&["p1"]);
        assert_eq!(
            s.use_power_up(&pid("p1"), PowerUp::DoublePoints),
            PowerUpOutcome::Ignored
        );
        assert!(s.player(&pid("p1")).unwrap().used_power_ups.is_empty());
    }

    #[test]
    fn test_call_friend_hands_back_the_question() {
        let mut s = answering(&["p1"]);
        match s.use_power_up(&pid("p1"), PowerUp::CallFriend) {
            PowerUpOutcome::CallFriend { question, options } => {
                assert!(question.starts_with("question"));
                assert_eq!(options.len(), OPTION_COUNT);
            }
            other => panic!("expected CallFriend, got {other:?}"),
        }
    }

    // -- category & bots ----------------------------------------------------

    #[test]
    fn test_vote_once_and_never_for_random() {
        let mut s = state(&["p1"]);
        s.enter_phase(GamePhase::CategorySelection);
        assert!(!s.vote_category(&pid("p1"), Category::Random));
        assert!(s.vote_category(&pid("p1"), Category::Art));
        assert!(!s.vote_category(&pid("p1"), Category::History));
        assert_eq!(
            s.player(&pid("p1")).unwrap().selected_category,
            Some(Category::Art)
        );
    }

    #[test]
    fn test_majority_vote_wins() {
        let mut s = state(&["p1", "p2", "p3"]);
        s.enter_phase(GamePhase::CategorySelection);
        s.vote_category(&pid("p1"), Category::Art);
        s.vote_category(&pid("p2"), Category::History);
        s.vote_category(&pid("p3"), Category::History);
        s.choose_category();
        assert_eq!(s.category(), Category::History);
        assert!(s.upcoming_question.is_some());
    }

    #[test]
    fn test_tie_breaks_among_leaders_only() {
        let mut s = state(&["p1", "p2"]);
        s.enter_phase(GamePhase::CategorySelection);
        s.vote_category(&pid("p1"), Category::Art);
        s.vote_category(&pid("p2"), Category::Sports);
        s.choose_category();
        assert!(matches!(s.category(), Category::Art | Category::Sports));
    }

    #[test]
    fn test_no_votes_picks_a_concrete_category() {
        let mut s = state(&["p1"]);
        s.choose_category();
        assert_ne!(s.category(), Category::Random);
    }

    #[test]
    fn test_bot_level_set_once() {
        let mut s = state(&["p1"]);
        s.enter_phase(GamePhase::BotLevelSelection);
        assert!(s.set_bot_level(&pid("p1"), BotLevel::Expert));
        assert!(!s.set_bot_level(&pid("p1"), BotLevel::Novice));
        s.add_bots();

        assert_eq!(s.player_count(), 4);
        assert_eq!(s.human_count(), 1);
        assert!(
            s.players()
                .filter(|p| p.is_bot())
                .all(|p| p.kind == PlayerKind::Bot(BotLevel::Expert))
        );
    }

    #[test]
    fn test_bots_never_take_a_human_seat() {
        // Humans hold every bot id but three.
        let squatted = crate::BOT_NAMES.len() - 3;
        let humans: Vec<String> = crate::BOT_NAMES[..squatted]
            .iter()
            .map(|name| format!("bot-{}", name.to_lowercase()))
            .collect();
        let ids: Vec<&str> = humans.iter().map(String::as_str).collect();
        let mut s = state(&ids);
        s.add_bots();

        assert_eq!(s.human_count(), ids.len());
        assert_eq!(s.player_count(), ids.len() + 3);
    }

    #[test]
    fn test_bots_fall_back_to_default_level() {
        let mut s = state(&["p1"]);
        s.add_bots();
        assert_eq!(s.bot_level(), Some(BotLevel::Intermediate));
    }

    // -- removal & snapshot -------------------------------------------------

    #[test]
    fn test_remove_last_human_reports_closable() {
        let mut s = state(&["p1", "p2"]);
        s.add_bots();
        assert!(!s.remove_player(&pid("p1")));
        assert!(s.remove_player(&pid("p2")));
    }

    #[test]
    fn test_snapshot_hides_question_until_answer_phase() {
        let mut s = answering(&["p1"]);
        s.submit_answer(&pid("p1"), 2);
        let during = s.snapshot();
        assert!(!during.question_text.is_empty());
        assert_eq!(during.question_options.len(), OPTION_COUNT);
        assert_eq!(during.correct_answer_index, -1);
        assert_eq!(during.players[&pid("p1")].answer, None);

        s.enter_phase(GamePhase::RoundEnded);
        let reveal = s.snapshot();
        assert_eq!(reveal.correct_answer_index, 1);
        assert_eq!(reveal.players[&pid("p1")].answer, Some(2));

        s.enter_phase(GamePhase::GameEnded);
        let end = s.snapshot();
        assert!(end.question_text.is_empty());
        assert_eq!(end.correct_answer_index, -1);
    }
}
