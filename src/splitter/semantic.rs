//! Separator-driven text splitter with greedy packing and overlap.

use crate::error::ConfigError;
use crate::processing::normalizer::collapse_whitespace;
use crate::types::SummarizerConfig;

use super::base::{char_len, force_split, overlap_fragment, validate_chunk_bounds, TextSplitter};

/// Default separators, most to least preferred.
pub const DEFAULT_SEPARATORS: &[&str] = &[
    "\n\n", // Paragraphs
    "\n",   // Lines
    ". ",   // Sentences
    "! ",   // Exclamations
    "? ",   // Questions
    "; ",   // Semicolons
    ", ",   // Commas
    " ",    // Words
    "",     // Characters (last resort)
];

/// Splits text into chunks of at most `chunk_size` characters.
///
/// The splitter picks the first separator from its list that occurs anywhere
/// in the text and cuts there, keeping the separator on the end of each piece.
/// Pieces are packed greedily into chunks; a piece that cannot fit on its own
/// is force-split at the last space before the size boundary.
///
/// With a non-zero overlap, every chunk after the first starts with the tail
/// of the previous chunk followed by a space. The overlap counts towards
/// `chunk_size`, so no chunk ever exceeds it.
#[derive(Debug, Clone)]
pub struct SemanticSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<&'static str>,
}

impl SemanticSplitter {
    /// Create a splitter with the default separators.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ConfigError> {
        Self::with_separators(chunk_size, chunk_overlap, DEFAULT_SEPARATORS.to_vec())
    }

    /// Create a splitter with custom separators.
    pub fn with_separators(
        chunk_size: usize,
        chunk_overlap: usize,
        separators: Vec<&'static str>,
    ) -> Result<Self, ConfigError> {
        validate_chunk_bounds(chunk_size, chunk_overlap)?;
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators,
        })
    }

    pub fn from_config(config: &SummarizerConfig) -> Result<Self, ConfigError> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn separators(&self) -> &[&'static str] {
        &self.separators
    }

    /// Split `text` into ordered chunks.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        split_with(text, self.chunk_size, self.chunk_overlap, &self.separators)
    }
}

impl TextSplitter for SemanticSplitter {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn description(&self) -> &'static str {
        "Splits on the most structural separator present and packs pieces greedily"
    }

    fn split(&self, text: &str) -> Vec<String> {
        self.split_text(text)
    }
}

/// One-shot split with explicit bounds and separators.
pub fn split_text(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Result<Vec<String>, ConfigError> {
    validate_chunk_bounds(chunk_size, chunk_overlap)?;
    Ok(split_with(text, chunk_size, chunk_overlap, separators))
}

/// Bounds must already be validated.
pub(crate) fn split_with(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }
    if char_len(text) <= chunk_size {
        return vec![text.to_string()];
    }

    let text = collapse_whitespace(text);
    let segments = split_by_separators(&text, separators);
    let chunks = pack(segments, chunk_size, chunk_overlap);
    apply_overlap(chunks, chunk_overlap)
}

/// Cut `text` on the first separator it contains.
///
/// Character-level splitting keeps every character, including whitespace.
/// Otherwise whitespace-only pieces are dropped.
fn split_by_separators<'a>(text: &'a str, separators: &[&str]) -> Vec<&'a str> {
    let separator = separators
        .iter()
        .find(|sep| sep.is_empty() || text.contains(**sep));

    match separator {
        Some(sep) if sep.is_empty() => text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect(),
        Some(sep) => text
            .split_inclusive(*sep)
            .filter(|piece| !piece.trim().is_empty())
            .collect(),
        None => vec![text],
    }
}

/// Room left for new content in chunks that will receive an overlap prefix.
fn body_budget(chunk_size: usize, chunk_overlap: usize) -> usize {
    if chunk_overlap == 0 {
        chunk_size
    } else {
        chunk_size - chunk_overlap - 1
    }
}

fn pack(segments: Vec<&str>, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let body_budget = body_budget(chunk_size, chunk_overlap);
    let budget_for = |chunks: &Vec<String>| {
        if chunks.is_empty() {
            chunk_size
        } else {
            body_budget
        }
    };

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for segment in segments {
        let segment_len = char_len(segment);

        if current_len + segment_len <= budget_for(&chunks) {
            current.push_str(segment);
            current_len += segment_len;
            continue;
        }

        flush(&mut chunks, std::mem::take(&mut current));
        current_len = 0;

        if segment_len <= budget_for(&chunks) {
            current.push_str(segment);
            current_len = segment_len;
            continue;
        }

        let mut pieces = force_split(segment, body_budget);
        if let Some(last) = pieces.pop() {
            for piece in pieces {
                flush(&mut chunks, piece);
            }
            current_len = char_len(&last);
            current = last;
        }
    }

    flush(&mut chunks, current);
    chunks
}

/// Blank chunks are never emitted.
fn flush(chunks: &mut Vec<String>, chunk: String) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn apply_overlap(chunks: Vec<String>, chunk_overlap: usize) -> Vec<String> {
    if chunk_overlap == 0 || chunks.len() < 2 {
        return chunks;
    }

    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            if i == 0 {
                return chunk.clone();
            }
            let fragment = overlap_fragment(&chunks[i - 1], chunk_overlap);
            if fragment.is_empty() {
                chunk.clone()
            } else {
                format!("{} {}", fragment, chunk)
            }
        })
        .collect()
}
