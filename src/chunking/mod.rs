//! Document chunking: overlapping character windows over the extracted text.

pub mod recursive;

use crate::config::RetrievalConfig;
use crate::models::Chunk;
use recursive::RecursiveSplitter;

/// Split a document into overlapping chunks in document order.
pub fn chunk_document(text: &str, config: &RetrievalConfig) -> Vec<Chunk> {
    RecursiveSplitter::new(config.chunk_size, config.chunk_overlap)
        .split_spans(text)
        .into_iter()
        .enumerate()
        .map(|(index, span)| Chunk {
            text: text[span.clone()].to_string(),
            index,
            start_offset: span.start,
            end_offset: span.end,
        })
        .collect()
}
