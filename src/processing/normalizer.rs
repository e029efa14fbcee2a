//! Content normalization for scraped job postings.
//!
//! Strips markup remnants and stray symbols, collapses whitespace while keeping
//! paragraph structure, and drops boilerplate lines that repeat more than twice.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref DISALLOWED_RE: Regex =
        Regex::new(r"[^\w\s가-힣.,!?()\[\]{}:;/#*%+&'~\-]").unwrap();
    static ref HORIZONTAL_WS_RE: Regex = Regex::new(r"[^\S\n]+").unwrap();
}

/// A line may appear at most this many times in normalized output.
const MAX_LINE_REPEATS: usize = 2;

/// Lines shorter than this are only kept by [`extract_key_sections`] if they
/// contain a hiring keyword.
const MIN_KEY_LINE_CHARS: usize = 20;

/// Words that mark the informative parts of a posting.
const KEY_SECTION_KEYWORDS: &[&str] = &[
    // Korean
    "채용", "모집", "지원", "자격", "요건", "우대", "업무", "담당", "복지", "혜택", "급여",
    "연봉", "마감", "접수", "회사", "소개", "비전", "미션", "사업", "서비스", "기술", "개발",
    "경력", "신입",
    // English
    "requirements", "qualifications", "responsibilities", "benefits", "salary", "experience",
    "skills", "company", "about", "mission", "vision", "role", "position", "job", "career",
    "apply", "deadline",
];

/// Normalize raw scraped text.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
/// Returns an empty string when nothing survives cleaning.
pub fn normalize(raw: &str) -> String {
    let lines = clean_lines(raw);
    let lines = drop_repeated_lines(lines);
    collapse_blank_lines(lines)
}

/// Strip tags and symbols and collapse whitespace, without deduplicating lines.
pub(crate) fn clean_structure(raw: &str) -> String {
    collapse_blank_lines(clean_lines(raw))
}

/// Collapse runs of spaces inside lines and runs of blank lines, keeping the text.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    collapse_blank_lines(whitespace_lines(text))
}

fn clean_lines(raw: &str) -> Vec<String> {
    let text = TAG_RE.replace_all(raw, " ");
    let text = DISALLOWED_RE.replace_all(&text, " ");
    whitespace_lines(&text)
}

fn whitespace_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| HORIZONTAL_WS_RE.replace_all(line, " ").trim().to_string())
        .collect()
}

fn drop_repeated_lines(lines: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    lines
        .into_iter()
        .filter(|line| {
            if line.is_empty() {
                return true;
            }
            let count = seen.entry(line.clone()).or_insert(0);
            *count += 1;
            *count <= MAX_LINE_REPEATS
        })
        .collect()
}

fn collapse_blank_lines(lines: Vec<String>) -> String {
    let mut kept: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        let previous_blank = kept.last().map_or(true, |l| l.is_empty());
        if line.is_empty() && previous_blank {
            continue;
        }
        kept.push(line);
    }

    while kept.last().map_or(false, |l| l.is_empty()) {
        kept.pop();
    }

    kept.join("\n")
}

/// Keep only lines that look informative: hiring keywords or longer prose.
pub fn extract_key_sections(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let lower = line.to_lowercase();
            KEY_SECTION_KEYWORDS.iter().any(|k| lower.contains(k))
                || line.chars().count() > MIN_KEY_LINE_CHARS
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Shrink content towards `target_chars` in increasingly lossy steps.
///
/// Normalizes first, then keeps only key sections, and finally truncates at a
/// word boundary with a trailing `...`.
pub fn optimize_for_processing(content: &str, target_chars: usize) -> String {
    if content.chars().count() <= target_chars {
        return content.to_string();
    }

    let normalized = normalize(content);
    if normalized.chars().count() <= target_chars {
        return normalized;
    }

    let key_sections = extract_key_sections(&normalized);
    if key_sections.chars().count() <= target_chars {
        return key_sections;
    }

    let cut = key_sections
        .char_indices()
        .nth(target_chars)
        .map(|(i, _)| i)
        .unwrap_or(key_sections.len());
    let mut truncated = &key_sections[..cut];

    if let Some(space) = truncated.rfind(' ') {
        let space_chars = truncated[..space].chars().count();
        if space_chars as f64 > target_chars as f64 * 0.9 {
            truncated = &truncated[..space];
        }
    }

    format!("{}...", truncated)
}
