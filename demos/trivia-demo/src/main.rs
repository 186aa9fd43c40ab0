//! Plays one trivia game between two scripted players and prints every
//! outbound event as a JSON line.
//!
//! ```text
//! cargo run -p trivia-demo                # built-in fast config
//! cargo run -p trivia-demo -- trivia.json # config from a file
//! RUST_LOG=debug cargo run -p trivia-demo # watch phases and routing
//! ```

use std::sync::Arc;

use trivia::prelude::*;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const BANK: &str = r#"[
  {"category": "Science & Nature", "text": "What gas do plants absorb from the air?",
   "options": ["Carbon dioxide", "Oxygen", "Nitrogen", "Helium"], "correctIndex": 0, "difficulty": 1},
  {"category": "Science & Nature", "text": "How many bones are in the adult human body?",
   "options": ["186", "206", "226", "246"], "correctIndex": 1, "difficulty": 2},
  {"category": "Science & Nature", "text": "What is the chemical symbol for tungsten?",
   "options": ["Tu", "Tg", "W", "Wo"], "correctIndex": 2, "difficulty": 3},
  {"category": "Science & Nature", "text": "Which planet has the shortest day?",
   "options": ["Earth", "Mars", "Saturn", "Jupiter"], "correctIndex": 3, "difficulty": 3},
  {"category": "History", "text": "In which year did the Berlin Wall fall?",
   "options": ["1987", "1989", "1991", "1993"], "correctIndex": 1, "difficulty": 1},
  {"category": "History", "text": "Who was the first emperor of Rome?",
   "options": ["Augustus", "Nero", "Caligula", "Trajan"], "correctIndex": 0, "difficulty": 2},
  {"category": "History", "text": "Which dynasty built most of the Great Wall we see today?",
   "options": ["Han", "Tang", "Song", "Ming"], "correctIndex": 3, "difficulty": 3}
]"#;

/// The built-in config: short phases and a fast tick.
fn demo_config() -> TriviaConfig {
    let mut config = TriviaConfig::default();
    config.lobby.tick_millis = 200;
    config.game.tick_millis = 200;
    config.game.num_questions = 3;
    config
}

/// A friend who always trusts the longest option.
struct LongestAnswerFriend;

impl HintService for LongestAnswerFriend {
    async fn call_friend(
        &self,
        _question: &str,
        options: &[String],
    ) -> Result<String, HintError> {
        let pick = options
            .iter()
            .max_by_key(|o| o.len())
            .ok_or_else(|| HintError::Unavailable("no options".into()))?;
        Ok(format!("Longest answer is usually right: {pick}"))
    }
}

// ---------------------------------------------------------------------------
// Scripted players
// ---------------------------------------------------------------------------

/// Reacts to snapshots on behalf of both players.
struct Script {
    alice: PlayerId,
    bob: PlayerId,
    last_phase: Option<GamePhase>,
    round: u32,
    bob_answered: bool,
}

impl Script {
    fn new() -> Self {
        Self {
            alice: PlayerId::new("alice"),
            bob: PlayerId::new("bob"),
            last_phase: None,
            round: 0,
            bob_answered: false,
        }
    }

    /// The actions to send in response to one snapshot.
    fn react(&mut self, update: &GameUpdate) -> Vec<(PlayerId, ClientAction)> {
        let entered = self.last_phase != Some(update.phase);
        self.last_phase = Some(update.phase);
        let mut actions = Vec::new();

        match update.phase {
            GamePhase::CategorySelection if entered => {
                let vote = |category| ClientAction::SelectCategory { category };
                actions.push((self.alice.clone(), vote(Category::ScienceNature)));
                actions.push((self.bob.clone(), vote(Category::ScienceNature)));
            }
            GamePhase::AwaitingAnswers if entered => {
                self.round += 1;
                self.bob_answered = false;
                if self.round == 1 {
                    let call = ClientAction::UsePowerUp {
                        power_up: PowerUp::CallFriend,
                    };
                    actions.push((self.bob.clone(), call));
                }
                if self.round == 2 {
                    let double = ClientAction::UsePowerUp {
                        power_up: PowerUp::DoublePoints,
                    };
                    actions.push((self.alice.clone(), double));
                }
                // Alice is quick and always goes with the first option.
                let answer = ClientAction::SubmitAnswer { answer: 0 };
                actions.push((self.alice.clone(), answer));
            }
            GamePhase::AwaitingAnswers
                if !self.bob_answered && update.seconds_remaining <= 12 =>
            {
                self.bob_answered = true;
                let answer = (self.round as usize) % 4;
                actions.push((self.bob.clone(), ClientAction::SubmitAnswer { answer }));
            }
            _ => {}
        }
        actions
    }
}

fn print_scores(update: &GameUpdate) {
    let mut board: Vec<_> = update
        .players
        .iter()
        .map(|(id, p)| (p.score, id.0.as_str()))
        .collect();
    board.sort_by(|a, b| b.cmp(a));
    for (score, id) in board {
        eprintln!("  {id:<8} {score:>4}");
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), TriviaError> {
    init_tracing("info");

    let config = match std::env::args().nth(1) {
        Some(path) => TriviaConfig::from_json_file(path)?,
        None => demo_config(),
    };
    let bank = InMemoryQuestionSource::from_json(BANK)?;
    tracing::info!(questions = bank.len(), "question bank loaded");

    let server = TriviaServer::builder()
        .config(config)
        .questions(Arc::new(bank))
        .build(LongestAnswerFriend);
    let handle = server.handle();
    let (sink, mut events) = ChannelSink::new();
    let consumer = tokio::spawn(server.run(sink));

    let mut script = Script::new();
    for player in [script.alice.clone(), script.bob.clone()] {
        handle.dispatch(player, ClientAction::JoinLobby).await?;
    }
    handle.send_chat(script.alice.clone(), "Alice", "good luck!")?;

    while let Some(event) = events.recv().await {
        let line = JsonCodec.encode(&event)?;
        println!("{}", String::from_utf8_lossy(&line));

        let ServerEvent::GameUpdate(update) = event else {
            continue;
        };
        for (player, action) in script.react(&update) {
            handle.dispatch(player, action).await?;
        }
        if update.phase == GamePhase::GameEnded {
            eprintln!("final scores ({:?}):", update.category);
            print_scores(&update);
            break;
        }
    }

    consumer.abort();
    Ok(())
}
