//! Questions, where they come from, and how a room draws them.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use trivia_protocol::{Category, OPTION_COUNT};

use crate::GameError;

// ---------------------------------------------------------------------------
// Question
// ---------------------------------------------------------------------------

/// A multiple-choice question.
///
/// `correct_index` and `difficulty` stay on the server; clients only see
/// the correct index during the round-end reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
    /// Bucket this question belongs to, starting at 1.
    pub difficulty: u8,
}

impl Question {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_index
    }
}

// ---------------------------------------------------------------------------
// QuestionSource
// ---------------------------------------------------------------------------

/// Persistent question storage.
///
/// Called once per game, when the category vote is tallied. Kept
/// synchronous so an in-memory bank needs no runtime.
pub trait QuestionSource: Send + Sync + 'static {
    /// Every question in `category`. `Category::All` means every question.
    ///
    /// # Errors
    /// Returns [`GameError::QuestionSource`] if the store can't be read.
    fn questions(&self, category: Category) -> Result<Vec<Question>, GameError>;
}

/// A question bank held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionSource {
    entries: Vec<(Category, Question)>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankEntry {
    category: Category,
    #[serde(flatten)]
    question: Question,
}

impl InMemoryQuestionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a question under `category`.
    pub fn with(mut self, category: Category, question: Question) -> Self {
        self.entries.push((category, question));
        self
    }

    /// Parses a JSON array of questions, each carrying its category:
    ///
    /// ```json
    /// [{"category": "History", "text": "...", "options": ["a","b","c","d"],
    ///   "correctIndex": 0, "difficulty": 3}]
    /// ```
    ///
    /// # Errors
    /// Returns [`GameError::QuestionSource`] on malformed input or an
    /// out-of-range `correctIndex`.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let entries: Vec<BankEntry> = serde_json::from_str(json)
            .map_err(|e| GameError::QuestionSource(e.to_string()))?;
        if let Some(bad) =
            entries.iter().find(|e| e.question.correct_index >= OPTION_COUNT)
        {
            return Err(GameError::QuestionSource(format!(
                "correct index out of range in {:?}",
                bad.question.text
            )));
        }
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|e| (e.category, e.question))
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl QuestionSource for InMemoryQuestionSource {
    fn questions(&self, category: Category) -> Result<Vec<Question>, GameError> {
        let all = matches!(category, Category::All | Category::Random);
        Ok(self
            .entries
            .iter()
            .filter(|(c, _)| all || *c == category)
            .map(|(_, q)| q.clone())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// QuestionSupply
// ---------------------------------------------------------------------------

/// Adaptive-difficulty question pool for one room.
///
/// Questions are grouped into buckets of equal difficulty, ordered from
/// easiest to hardest. Only non-empty buckets are kept, so the cursor
/// always points at a bucket with a question in it, or the supply is
/// exhausted.
#[derive(Debug, Clone, Default)]
pub struct QuestionSupply {
    buckets: Vec<Vec<Question>>,
    difficulty: usize,
}

impl QuestionSupply {
    /// Buckets `questions` by difficulty and shuffles each bucket. The
    /// cursor starts in the middle.
    pub fn new<R: Rng + ?Sized>(questions: Vec<Question>, rng: &mut R) -> Self {
        let mut by_difficulty: BTreeMap<u8, Vec<Question>> = BTreeMap::new();
        for q in questions {
            by_difficulty.entry(q.difficulty).or_default().push(q);
        }
        let mut buckets: Vec<Vec<Question>> = by_difficulty.into_values().collect();
        for bucket in &mut buckets {
            bucket.shuffle(rng);
        }
        let difficulty = buckets.len() / 2;
        Self { buckets, difficulty }
    }

    /// Draws a question from the current bucket, or `None` once every
    /// bucket is spent.
    pub fn next_question(&mut self) -> Option<Question> {
        let bucket = self.buckets.get_mut(self.difficulty)?;
        let question = bucket.pop();
        if bucket.is_empty() {
            self.buckets.remove(self.difficulty);
            self.difficulty =
                self.difficulty.min(self.buckets.len().saturating_sub(1));
        }
        question
    }

    /// Moves one bucket harder, stopping at the hardest.
    pub fn increase_difficulty(&mut self) {
        self.difficulty =
            (self.difficulty + 1).min(self.buckets.len().saturating_sub(1));
    }

    /// Moves one bucket easier, stopping at the easiest.
    pub fn decrease_difficulty(&mut self) {
        self.difficulty = self.difficulty.saturating_sub(1);
    }

    /// Index of the current bucket, or `None` if exhausted.
    pub fn difficulty(&self) -> Option<usize> {
        (!self.buckets.is_empty()).then_some(self.difficulty)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn remaining(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.buckets.is_empty()
    }
}
