//! Statistical token estimation.
//!
//! Averages a character-based and a word-based estimate and scales the result
//! up for Hangul-heavy text, which costs more tokens per character. This is an
//! approximation that works without a model-specific tokenizer.

use crate::types::{ContentStats, RecommendedAction, SizeValidation, SummarizerConfig};
use crate::{DEFAULT_CHARS_PER_TOKEN, DEFAULT_MAX_TOKENS};

/// Average tokens per whitespace-separated word.
const TOKENS_PER_WORD: f64 = 1.3;

/// Extra cost applied at a Hangul ratio of 1.0.
const HANGUL_PENALTY: f64 = 0.5;

/// Share of the budget usable in strict mode.
const STRICT_LIMIT_FACTOR: f64 = 0.8;

/// Estimates token cost and classifies text against a token budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenEstimator {
    chars_per_token: f64,
    max_tokens: usize,
}

impl TokenEstimator {
    /// Create an estimator. Values are expected to be validated already.
    pub fn new(chars_per_token: f64, max_tokens: usize) -> Self {
        Self {
            chars_per_token,
            max_tokens,
        }
    }

    /// Create an estimator from the summarizer configuration.
    pub fn from_config(config: &SummarizerConfig) -> Self {
        Self::new(config.chars_per_token, config.max_tokens)
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Estimated token count of `text`. Zero for empty text.
    pub fn count_tokens(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let char_count = text.chars().count();
        let word_count = text.split_whitespace().count();

        let basic_estimate = char_count as f64 / self.chars_per_token;
        let word_estimate = word_count as f64 * TOKENS_PER_WORD;
        let multiplier = 1.0 + hangul_ratio(text) * HANGUL_PENALTY;

        (((basic_estimate + word_estimate) / 2.0) * multiplier).floor() as usize
    }

    /// Size statistics against the configured budget.
    pub fn estimate(&self, text: &str) -> ContentStats {
        let estimated_tokens = self.count_tokens(text);
        let limit = self.max_tokens as f64;

        ContentStats {
            char_count: text.chars().count(),
            estimated_tokens,
            word_count: text.split_whitespace().count(),
            is_over_limit: estimated_tokens > self.max_tokens,
            recommended_action: RecommendedAction::classify(estimated_tokens, limit),
        }
    }

    /// Check whether `text` can be processed in a single call.
    ///
    /// Strict mode only allows 80% of the budget.
    pub fn validate(&self, text: &str, strict: bool) -> SizeValidation {
        let stats = self.estimate(text);
        let limit = if strict {
            self.max_tokens as f64 * STRICT_LIMIT_FACTOR
        } else {
            self.max_tokens as f64
        };
        let tokens = stats.estimated_tokens as f64;

        SizeValidation {
            is_valid: tokens <= limit,
            stats,
            limit_used: limit,
            usage_percentage: tokens / limit * 100.0,
            needs_processing: tokens > limit,
        }
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_CHARS_PER_TOKEN, DEFAULT_MAX_TOKENS)
    }
}

fn is_hangul_syllable(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

/// Share of Hangul syllables among Hangul and Latin letters.
fn hangul_ratio(text: &str) -> f64 {
    let (hangul, latin) = text.chars().fold((0usize, 0usize), |(h, l), c| {
        if is_hangul_syllable(c) {
            (h + 1, l)
        } else if c.is_ascii_alphabetic() {
            (h, l + 1)
        } else {
            (h, l)
        }
    });

    if hangul + latin == 0 {
        0.0
    } else {
        hangul as f64 / (hangul + latin) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        let estimator = TokenEstimator::default();
        assert_eq!(estimator.count_tokens(""), 0);
        assert!(!estimator.validate("", false).needs_processing);
    }

    #[test]
    fn test_latin_estimate() {
        let estimator = TokenEstimator::default();
        // 35 chars / 3.5 = 10, 7 words * 1.3 = 9.1, average 9.55
        let text = "We are hiring a Rust engineer now!!";
        assert_eq!(text.chars().count(), 35);
        assert_eq!(estimator.count_tokens(text), 9);
    }

    #[test]
    fn test_hangul_costs_more() {
        let estimator = TokenEstimator::default();
        let latin = "abcdefg abcdefg abcdefg";
        let hangul = "가나다라마바사 가나다라마바사 가나다라마바사";
        assert!(estimator.count_tokens(hangul) > estimator.count_tokens(latin));
    }

    #[test]
    fn test_hangul_ratio() {
        assert_eq!(hangul_ratio("1234 !!"), 0.0);
        assert_eq!(hangul_ratio("가나ab"), 0.5);
        assert_eq!(hangul_ratio("개발자"), 1.0);
    }

    #[test]
    fn test_short_input_is_direct() {
        let estimator = TokenEstimator::new(3.5, 4096);
        let text = "Senior backend engineer, Rust and Go. ".repeat(14);
        let text = &text[..500];

        let validation = estimator.validate(text, false);
        assert!(!validation.needs_processing);
        assert!(validation.is_valid);
        assert_eq!(validation.stats.recommended_action, RecommendedAction::Direct);
    }

    #[test]
    fn test_strict_mode_lowers_limit() {
        let estimator = TokenEstimator::new(3.5, 100);
        // 95 tokens: under the plain limit, over the strict one
        let text = "word ".repeat(70);
        let tokens = estimator.count_tokens(&text);
        assert!(tokens > 80 && tokens <= 100, "tokens = {}", tokens);

        assert!(!estimator.validate(&text, false).needs_processing);
        let strict = estimator.validate(&text, true);
        assert!(strict.needs_processing);
        assert_eq!(strict.limit_used, 80.0);
        assert!(strict.usage_percentage > 100.0);
    }

    #[test]
    fn test_recommended_action_scales_with_size() {
        let estimator = TokenEstimator::new(3.5, 100);
        let action = |repeat: usize| {
            estimator
                .estimate(&"posting ".repeat(repeat))
                .recommended_action
        };
        assert_eq!(action(10), RecommendedAction::Direct);
        assert_eq!(action(60), RecommendedAction::SimpleChunk);
        assert_eq!(action(150), RecommendedAction::MapReduce);
        assert_eq!(action(400), RecommendedAction::AdvancedMapReduce);
    }

    #[test]
    fn test_monotonic_within_one_script() {
        let estimator = TokenEstimator::default();
        let groups = [
            [
                "백엔드 개발자를 채용합니다. 주요 업무는 서버 개발입니다.",
                "## 자격요건\n- 경력 3년 이상\n- 관련 전공자 우대",
            ],
            [
                "We are looking for a backend engineer with Rust experience.",
                "Benefits: flexible hours, remote work, meal allowance.",
            ],
        ];
        for samples in groups {
            for a in samples {
                for b in samples {
                    let combined = format!("{}\n{}", a, b);
                    assert!(
                        estimator.count_tokens(&combined) >= estimator.count_tokens(a),
                        "{:?} + {:?}",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_mixed_script_append_can_lower_estimate() {
        // Appending Latin text dilutes the Hangul multiplier, which can outweigh
        // the added length when the text is mostly short Hangul words.
        let estimator = TokenEstimator::default();
        let hangul = format!("{}가", "가 ".repeat(99));
        let mixed = format!("{}a", hangul);

        assert_eq!(estimator.count_tokens(&hangul), 140);
        assert_eq!(estimator.count_tokens(&mixed), 139);
    }
}
