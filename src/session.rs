//! Per-document session: the extracted text, its retrieval index, the
//! conversation log and the current quiz.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::answer::answer_question;
use crate::chunking::chunk_document;
use crate::config::RetrievalConfig;
use crate::document;
use crate::llm::prompts::sanitize_for_prompt;
use crate::llm::LanguageModel;
use crate::models::{
    AskRequest, AskResponse, ChatMessage, DocumentOverview, DocumentStats, QuizAttempt,
    QuizResponse,
};
use crate::quiz::{self, answers, Quiz};
use crate::search::vector::VectorIndex;
use crate::summary::summarize;

/// Most recent messages (user and assistant) kept for the prompt prefix.
pub const MAX_HISTORY_MESSAGES: usize = 10;

/// Bounded log of previous question/answer turns.
#[derive(Debug, Default, Clone)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn record(&mut self, question: &str, answer: &str) {
        self.messages.push(ChatMessage::user(sanitize_for_prompt(question)));
        self.messages.push(ChatMessage::assistant(sanitize_for_prompt(answer)));

        let excess = self.messages.len().saturating_sub(MAX_HISTORY_MESSAGES);
        self.messages.drain(..excess);
    }

    pub fn recent(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

pub struct DocumentSession {
    pub id: Uuid,
    pub file_name: String,
    text: String,
    stats: DocumentStats,
    summary: Option<String>,
    summary_error: Option<String>,
    index: VectorIndex,
    retrieval: RetrievalConfig,
    history: ConversationLog,
    quiz: Option<Quiz>,
    quiz_generations: usize,
    created_at: DateTime<Utc>,
}

impl DocumentSession {
    /// Summarize, chunk and index an extracted document.
    ///
    /// A failed summary is recorded on the session and does not abort the
    /// upload. Embedding failures do.
    pub async fn open<M: LanguageModel>(
        model: &M,
        retrieval: &RetrievalConfig,
        file_name: &str,
        text: String,
    ) -> Result<Self> {
        let stats = document::stats(&text);
        tracing::info!(
            "Opening {file_name}: {} words, {} characters",
            stats.words,
            stats.characters
        );

        let (summary, summary_error) = match summarize(model, &text).await {
            Ok(summary) => (Some(summary), None),
            Err(e) => {
                tracing::warn!("Summary failed for {file_name}: {e:#}");
                (None, Some(format!("{e:#}")))
            }
        };

        let chunks = chunk_document(&text, retrieval);
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = model
            .embed(&texts)
            .await
            .context("Failed to embed document chunks")?;
        let index = VectorIndex::build(chunks, embeddings)?;
        tracing::info!("Indexed {} chunks for {file_name}", index.chunk_count());

        Ok(Self {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            text,
            stats,
            summary,
            summary_error,
            index,
            retrieval: retrieval.clone(),
            history: ConversationLog::default(),
            quiz: None,
            quiz_generations: 0,
            created_at: Utc::now(),
        })
    }

    pub fn overview(&self) -> DocumentOverview {
        DocumentOverview {
            id: self.id,
            file_name: self.file_name.clone(),
            stats: self.stats,
            preview: document::preview(&self.text),
            summary: self.summary.clone(),
            summary_error: self.summary_error.clone(),
            chunk_count: self.index.chunk_count(),
            created_at: self.created_at,
        }
    }

    pub fn history(&self) -> &ConversationLog {
        &self.history
    }

    pub async fn ask<M: LanguageModel>(&mut self, model: &M, req: &AskRequest) -> Result<AskResponse> {
        let history: &[ChatMessage] = if req.use_history {
            self.history.recent()
        } else {
            &[]
        };

        let response = answer_question(
            model,
            &self.index,
            history,
            &req.question,
            req.include_quotes,
            self.retrieval.top_k,
        )
        .await?;

        if req.use_history {
            self.history.record(&req.question, &response.answer);
        }

        Ok(response)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Generate a fresh quiz, replacing the previous one.
    pub async fn generate_quiz<M: LanguageModel>(&mut self, model: &M) -> QuizResponse {
        let quiz = quiz::generate_quiz(model, &self.text).await;
        self.quiz_generations += 1;
        let response = to_response(&quiz, self.quiz_generations);
        self.quiz = Some(quiz);
        response
    }

    pub fn quiz_response(&self) -> Option<QuizResponse> {
        self.quiz
            .as_ref()
            .map(|quiz| to_response(quiz, self.quiz_generations))
    }

    /// Drop the current quiz and reset the generation counter.
    pub fn clear_quiz(&mut self) {
        self.quiz = None;
        self.quiz_generations = 0;
    }

    /// Check a selection against question `index` of the current quiz.
    /// `None` when there is no quiz or no such question.
    pub fn check_answer(&self, index: usize, selected: &str) -> Option<QuizAttempt> {
        let question = self.quiz.as_ref()?.questions.get(index)?;
        Some(answers::check_answer(question, selected))
    }

    pub async fn evaluate<M: LanguageModel>(
        &self,
        model: &M,
        question: &str,
        response: &str,
    ) -> Result<String> {
        answers::evaluate_response(model, &self.text, question, response).await
    }
}

fn to_response(quiz: &Quiz, generation: usize) -> QuizResponse {
    QuizResponse {
        questions: quiz.questions.clone(),
        source: quiz.source,
        attempts: quiz.attempts,
        generation,
    }
}
