//! Token budget for summarization calls
//!
//! - Direct summarization: inputs up to `token_threshold` tokens
//! - Chunked summarization: chunks near `chunk_target_tokens`, overlapping by
//!   `chunk_overlap_tokens`
//! - Final call: combined intermediate summaries are re-bounded once they
//!   pass `token_threshold × 1.5`, down to `token_threshold × 1.4`

use crate::error::SummaryError;
use serde::{Deserialize, Serialize};

/// Re-bounding kicks in above threshold × 15 / 10
const REBOUND_TRIGGER_TENTHS: usize = 15;

/// Combined text is truncated to threshold × 14 / 10
const REBOUND_TARGET_TENTHS: usize = 14;

/// Characters assumed per token when no encoding is loaded.
///
/// Rough heuristic for the word-mode fallback only; real ratios vary with
/// language and content, so the resulting bound is approximate.
pub const APPROX_CHARS_PER_TOKEN: usize = 4;

/// Token budget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBudget {
    #[serde(default = "default_threshold")]
    pub token_threshold: usize,
    #[serde(default = "default_chunk_target")]
    pub chunk_target_tokens: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap_tokens: usize,
}

fn default_threshold() -> usize {
    3500
}

fn default_chunk_target() -> usize {
    3000
}

fn default_chunk_overlap() -> usize {
    150
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            token_threshold: default_threshold(),
            chunk_target_tokens: default_chunk_target(),
            chunk_overlap_tokens: default_chunk_overlap(),
        }
    }
}

impl TokenBudget {
    /// Validate that the budget is usable
    pub fn validate(&self) -> Result<(), SummaryError> {
        if self.token_threshold == 0 {
            return Err(SummaryError::InvalidBudget(
                "token_threshold must be greater than zero".to_string(),
            ));
        }
        if self.chunk_target_tokens == 0 {
            return Err(SummaryError::InvalidBudget(
                "chunk_target_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a text of `tokens` tokens can be summarized in one call
    pub fn fits_direct(&self, tokens: usize) -> bool {
        tokens <= self.token_threshold
    }

    /// Whether combined intermediate summaries of `tokens` tokens need truncating
    pub fn needs_rebound(&self, tokens: usize) -> bool {
        tokens * 10 > self.token_threshold * REBOUND_TRIGGER_TENTHS
    }

    /// Token count combined summaries are truncated to
    pub fn rebound_target_tokens(&self) -> usize {
        self.token_threshold * REBOUND_TARGET_TENTHS / 10
    }

    /// Character count used for truncation in word mode
    pub fn rebound_target_chars(&self) -> usize {
        self.rebound_target_tokens() * APPROX_CHARS_PER_TOKEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_valid() {
        let budget = TokenBudget::default();
        assert!(budget.validate().is_ok());
        assert_eq!(budget.token_threshold, 3500);
        assert_eq!(budget.chunk_target_tokens, 3000);
        assert_eq!(budget.chunk_overlap_tokens, 150);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let budget = TokenBudget {
            token_threshold: 0,
            ..TokenBudget::default()
        };
        assert!(matches!(budget.validate(), Err(SummaryError::InvalidBudget(_))));
    }

    #[test]
    fn test_threshold_boundary() {
        let budget = TokenBudget::default();
        assert!(budget.fits_direct(3500));
        assert!(!budget.fits_direct(3501));
    }

    #[test]
    fn test_rebound_limits() {
        let budget = TokenBudget::default();
        assert!(!budget.needs_rebound(5250));
        assert!(budget.needs_rebound(5251));
        assert_eq!(budget.rebound_target_tokens(), 4900);
        assert_eq!(budget.rebound_target_chars(), 19600);
    }
}
