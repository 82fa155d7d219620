//! Recursive separator-priority splitter.
//!
//! Text is split on the highest-priority separator it contains (paragraph,
//! line, sentence, word, character). Pieces that fit the budget are merged
//! greedily into windows with a character overlap; pieces that don't fit are
//! split again with the next separator. Separators stay attached to the
//! start of the following piece, so every window is a contiguous slice of
//! the source and keeps its byte offsets.

use std::collections::VecDeque;
use std::ops::Range;

/// Separator priority: paragraph, line, sentence, word, character.
pub const DEFAULT_SEPARATORS: [&str; 5] = ["\n\n", "\n", ". ", " ", ""];

/// Splits text into overlapping windows measured in characters.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<&'static str>,
}

impl RecursiveSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS.to_vec(),
        }
    }

    /// Byte ranges of the windows, trimmed of surrounding whitespace, in document order.
    pub fn split_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        if text.trim().is_empty() {
            return out;
        }
        self.split_span(text, 0..text.len(), &self.separators, &mut out);
        out
    }

    fn split_span(
        &self,
        text: &str,
        span: Range<usize>,
        separators: &[&'static str],
        out: &mut Vec<Range<usize>>,
    ) {
        let slice = &text[span.clone()];

        // First separator present in this slice; "" always matches
        let position = separators
            .iter()
            .position(|sep| sep.is_empty() || slice.contains(sep))
            .unwrap_or(separators.len().saturating_sub(1));
        let separator = separators.get(position).copied().unwrap_or("");
        let remaining = separators.get(position + 1..).unwrap_or(&[]);

        let mut fitting: Vec<Range<usize>> = Vec::new();
        for piece in split_keep_separator(slice, separator, span.start) {
            if char_len(text, &piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                self.merge(text, &fitting, out);
                fitting.clear();
            }

            if remaining.is_empty() {
                push_trimmed(text, piece, out);
            } else {
                self.split_span(text, piece, remaining, out);
            }
        }

        if !fitting.is_empty() {
            self.merge(text, &fitting, out);
        }
    }

    /// Greedily merge adjacent pieces into windows, carrying up to
    /// `chunk_overlap` characters of trailing pieces into the next window.
    fn merge(&self, text: &str, pieces: &[Range<usize>], out: &mut Vec<Range<usize>>) {
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(text, piece);

            if total + len > self.chunk_size && !window.is_empty() {
                emit_window(text, &window, out);

                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some((_, dropped)) => total -= dropped,
                        None => break,
                    }
                }
            }

            window.push_back((piece.clone(), len));
            total += len;
        }

        if !window.is_empty() {
            emit_window(text, &window, out);
        }
    }
}

fn emit_window(text: &str, window: &VecDeque<(Range<usize>, usize)>, out: &mut Vec<Range<usize>>) {
    if let (Some((first, _)), Some((last, _))) = (window.front(), window.back()) {
        push_trimmed(text, first.start..last.end, out);
    }
}

fn push_trimmed(text: &str, span: Range<usize>, out: &mut Vec<Range<usize>>) {
    let slice = &text[span.clone()];
    let start = span.start + (slice.len() - slice.trim_start().len());
    let end = span.start + slice.trim_end().len();
    if start < end {
        out.push(start..end);
    }
}

/// Split `slice` on `separator`, keeping each separator at the start of the
/// piece that follows it. Offsets are shifted by `base`. Empty pieces are dropped.
fn split_keep_separator(slice: &str, separator: &str, base: usize) -> Vec<Range<usize>> {
    if separator.is_empty() {
        return slice
            .char_indices()
            .map(|(i, c)| base + i..base + i + c.len_utf8())
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0usize;
    for (i, _) in slice.match_indices(separator) {
        if i > start {
            pieces.push(base + start..base + i);
        }
        start = i;
    }
    if start < slice.len() {
        pieces.push(base + start..base + slice.len());
    }
    pieces
}

fn char_len(text: &str, span: &Range<usize>) -> usize {
    text[span.clone()].chars().count()
}
