//! # research-assistant
//!
//! An HTTP service that answers questions about an uploaded document and
//! quizzes the reader on it.
//!
//! ## Pipeline
//!
//! ```text
//!   upload (PDF / TXT)
//!          │
//!          ▼
//!   text extraction ──► summary (first 4000 chars)
//!          │
//!          ▼
//!   recursive chunking (500 chars, 50 overlap)
//!          │
//!          ▼
//!   embeddings ──► in-memory vector index
//!          │
//!          ├──► ask: embed question → top-k passages → answer (+ quotes)
//!          │
//!          └──► quiz: prompt → extract array → repair → validate
//!                     (3 attempts, then fallback questions)
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server, retrieval and LLM settings
//! - [`models`] - Shared data types: `Chunk`, `QuizQuestion`, request/response types
//! - [`document`] - PDF/TXT text extraction, stats and preview
//! - [`chunking`] - Recursive separator-based splitting with overlap
//! - [`search::vector`] - Per-document in-memory vector index with cosine similarity
//! - [`llm`] - Text generation and embedding clients for Ollama or OpenAI-compatible APIs
//! - [`summary`] - Upload-time document summary
//! - [`answer`] - Retrieval-augmented answering and quote-based source ranking
//! - [`quiz`] - Quiz generation with JSON repair, validation, retries and fallback
//! - [`session`] - Per-document state: index, conversation log, current quiz
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state and the bounded session store

pub mod answer;
pub mod api;
pub mod chunking;
pub mod config;
pub mod document;
pub mod llm;
pub mod models;
pub mod quiz;
pub mod search;
pub mod session;
pub mod state;
pub mod summary;

#[cfg(test)]
mod testing;
