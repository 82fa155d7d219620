use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bounded passage of the source document, used as a retrieval unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// 0-based position in document order.
    pub index: usize,
    /// Byte offset of `text` in the source document.
    pub start_offset: usize,
    /// Exclusive byte offset of the end of `text`.
    pub end_offset: usize,
}

/// The letter designating one of the four options of a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }
}

/// A multiple-choice comprehension question. This is the quiz wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    pub answer: AnswerLetter,
    pub explanation: String,
}

/// Where a quiz came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizSource {
    Generated,
    Fallback,
}

/// Result of checking one selected option against a quiz question. Not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct QuizAttempt {
    pub selected: Option<AnswerLetter>,
    pub correct: bool,
    pub correct_answer: AnswerLetter,
    pub explanation: String,
}

/// A single conversation turn (user or assistant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub words: usize,
    pub characters: usize,
}

/// What a client sees of an uploaded document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentOverview {
    pub id: Uuid,
    pub file_name: String,
    pub stats: DocumentStats,
    pub preview: String,
    pub summary: Option<String>,
    pub summary_error: Option<String>,
    pub chunk_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Ask request
#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Ask the model to restate supporting quotes after the answer
    #[serde(default)]
    pub include_quotes: bool,
    /// Prefix the prompt with recent turns and record this exchange
    #[serde(default = "default_true")]
    pub use_history: bool,
}

fn default_true() -> bool {
    true
}

/// A retrieved passage shown alongside an answer
#[derive(Debug, Clone, Serialize)]
pub struct SourceSnippet {
    pub chunk_index: usize,
    pub snippet: String,
    /// Cosine similarity to the question
    pub score: f32,
    /// Number of supporting quotes found verbatim in the passage
    pub quote_matches: usize,
}

/// Ask response
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub quotes: Vec<String>,
    pub sources: Vec<SourceSnippet>,
}

/// Quiz response
#[derive(Debug, Clone, Serialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
    pub source: QuizSource,
    pub attempts: usize,
    /// How many quizzes have been generated for this document since the last clear
    pub generation: usize,
}

/// Answer-check request: either a bare letter ("b") or the full option text ("B) y")
#[derive(Debug, Clone, Deserialize)]
pub struct CheckAnswerRequest {
    pub selected: String,
}

/// Free-form evaluation request
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub question: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluateResponse {
    pub evaluation: String,
}
