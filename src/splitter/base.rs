//! Base trait for all text splitters.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Splits text into ordered, size-bounded chunks.
pub trait TextSplitter: Send + Sync {
    /// Get the name of this splitter.
    fn name(&self) -> &'static str;

    /// Split `text` into chunks. Empty or whitespace-only input yields no chunks.
    fn split(&self, text: &str) -> Vec<String>;

    /// Get the description of this splitter.
    fn description(&self) -> &'static str {
        "A text splitter"
    }

    /// Summary of how `text` would be split.
    fn chunk_info(&self, text: &str) -> ChunkInfo {
        let chunks = self.split(text);
        ChunkInfo::from_chunks(char_len(text), &chunks)
    }
}

/// Size breakdown of a split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkInfo {
    pub total_length: usize,
    pub num_chunks: usize,
    pub avg_chunk_size: usize,
    pub chunk_sizes: Vec<usize>,
}

impl ChunkInfo {
    pub fn from_chunks(total_length: usize, chunks: &[String]) -> Self {
        let chunk_sizes: Vec<usize> = chunks.iter().map(|c| char_len(c)).collect();
        let avg_chunk_size = if chunk_sizes.is_empty() {
            0
        } else {
            chunk_sizes.iter().sum::<usize>() / chunk_sizes.len()
        };

        Self {
            total_length,
            num_chunks: chunks.len(),
            avg_chunk_size,
            chunk_sizes,
        }
    }
}

/// Length in characters, the unit every size in this crate is measured in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Check chunk bounds shared by the splitter and the summarizer config.
///
/// The overlap prefix and its joining space count towards `chunk_size`, so a
/// non-zero overlap must leave room for at least one new character.
pub(crate) fn validate_chunk_bounds(
    chunk_size: usize,
    chunk_overlap: usize,
) -> Result<(), ConfigError> {
    if chunk_size == 0 {
        return Err(ConfigError::invalid("chunk_size", "must be greater than zero"));
    }
    if chunk_overlap >= chunk_size {
        return Err(ConfigError::invalid(
            "chunk_overlap",
            format!(
                "{} must be smaller than chunk_size {}",
                chunk_overlap, chunk_size
            ),
        ));
    }
    if chunk_overlap > 0 && chunk_overlap + 1 >= chunk_size {
        return Err(ConfigError::invalid(
            "chunk_overlap",
            format!(
                "{} leaves no room for new content in a {}-character chunk",
                chunk_overlap, chunk_size
            ),
        ));
    }
    Ok(())
}

/// Split a segment that is longer than `budget` characters.
///
/// Cuts at the last whitespace inside each window and falls back to a hard
/// character cut when the window has none. Every piece is at most `budget`.
pub(crate) fn force_split(segment: &str, budget: usize) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    if budget == 0 {
        return pieces;
    }

    while start < chars.len() {
        let end = start + budget;
        if end >= chars.len() {
            pieces.push(chars[start..].iter().collect());
            break;
        }

        let window = &chars[start..end];
        match window.iter().rposition(|c| c.is_whitespace()) {
            Some(space) if space > 0 => {
                pieces.push(window[..space].iter().collect());
                start += space + 1;
            }
            _ => {
                pieces.push(window.iter().collect());
                start = end;
            }
        }
    }

    pieces
}

/// Up to `overlap` trailing characters of `previous`, starting at a word boundary
/// when one exists inside the tail.
pub(crate) fn overlap_fragment(previous: &str, overlap: usize) -> String {
    let chars: Vec<char> = previous.chars().collect();
    if chars.len() <= overlap {
        return previous.trim().to_string();
    }

    let start = chars.len() - overlap;
    let tail = &chars[start..];
    let at_boundary = chars[start - 1].is_whitespace() || tail[0].is_whitespace();

    let tail = if at_boundary {
        tail
    } else {
        match tail.iter().position(|c| c.is_whitespace()) {
            Some(space) => &tail[space + 1..],
            None => tail,
        }
    };

    tail.iter().collect::<String>().trim().to_string()
}
