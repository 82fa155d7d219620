//! Retrieval-augmented answering.
//!
//! The question is embedded, the closest passages are retrieved and spliced
//! into the prompt, and the reply is split into the answer and the quotes the
//! model restated after [`QUOTES_MARKER`]. Passages are then ranked by how
//! many of those quotes they contain.

use anyhow::{Context, Result};

use crate::document::prefix_chars;
use crate::llm::prompts::{answer_prompt, QUOTES_MARKER};
use crate::llm::LanguageModel;
use crate::models::{AskResponse, ChatMessage, SourceSnippet};
use crate::search::vector::{VectorHit, VectorIndex};

/// Characters of each retrieved passage shown as a supporting snippet.
pub const SNIPPET_CHARS: usize = 200;

const QUOTE_CHARS: [char; 6] = ['"', '“', '”', '\'', '‘', '’'];

/// A model reply split at the quotes marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnswer {
    pub answer: String,
    pub quotes: Vec<String>,
}

pub async fn answer_question<M: LanguageModel>(
    model: &M,
    index: &VectorIndex,
    history: &[ChatMessage],
    question: &str,
    include_quotes: bool,
    top_k: usize,
) -> Result<AskResponse> {
    let query_embedding = model
        .embed(&[question.to_string()])
        .await
        .context("Failed to embed question")?
        .into_iter()
        .next()
        .context("No embedding returned for question")?;

    let hits = index.search(&query_embedding, top_k);
    tracing::debug!("Retrieved {} passages", hits.len());

    let passages: Vec<&str> = hits.iter().map(|h| h.chunk.text.as_str()).collect();
    let prompt = answer_prompt(&passages, history, question, include_quotes);

    let reply = model
        .generate(&prompt, 0.0)
        .await
        .context("Failed to generate answer")?;

    let parsed = parse_answer(&reply);
    let sources = rank_sources(&hits, &parsed.quotes);

    Ok(AskResponse {
        answer: parsed.answer,
        quotes: parsed.quotes,
        sources,
    })
}

/// Split a reply on the first (ASCII case-insensitive) quotes marker. Lines
/// after the marker count as quotes only if they contain a quotation mark.
pub fn parse_answer(reply: &str) -> ParsedAnswer {
    // ASCII uppercasing preserves byte offsets
    let Some(pos) = reply.to_ascii_uppercase().find(QUOTES_MARKER) else {
        return ParsedAnswer {
            answer: reply.trim().to_string(),
            quotes: Vec::new(),
        };
    };

    let answer = reply[..pos].trim().to_string();
    let quotes = reply[pos + QUOTES_MARKER.len()..]
        .lines()
        .filter(|line| line.contains(QUOTE_CHARS))
        .map(clean_quote)
        .filter(|quote| !quote.is_empty())
        .collect();

    ParsedAnswer { answer, quotes }
}

/// Strip list bullets, numbering and surrounding quotation marks.
fn clean_quote(line: &str) -> String {
    line.trim()
        .trim_start_matches(|c: char| c == '-' || c == '*' || c == '•' || c.is_ascii_digit())
        .trim_start_matches(['.', ')'])
        .trim()
        .trim_matches(QUOTE_CHARS)
        .trim()
        .to_string()
}

/// Order passages by the number of quotes found in them (case-insensitive
/// substring), keeping similarity order among equals.
pub fn rank_sources(hits: &[VectorHit], quotes: &[String]) -> Vec<SourceSnippet> {
    let lowered_quotes: Vec<String> = quotes.iter().map(|q| q.to_lowercase()).collect();

    let mut sources: Vec<SourceSnippet> = hits
        .iter()
        .map(|hit| {
            let passage = hit.chunk.text.to_lowercase();
            SourceSnippet {
                chunk_index: hit.chunk.index,
                snippet: prefix_chars(&hit.chunk.text, SNIPPET_CHARS).to_string(),
                score: hit.score,
                quote_matches: lowered_quotes
                    .iter()
                    .filter(|q| passage.contains(q.as_str()))
                    .count(),
            }
        })
        .collect();

    sources.sort_by(|a, b| b.quote_matches.cmp(&a.quote_matches));
    sources
}
