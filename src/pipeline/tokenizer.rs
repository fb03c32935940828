//! Token counting using tiktoken, with a word-count fallback

use std::sync::Arc;
use thiserror::Error;
use tiktoken_rs::{cl100k_base, CoreBPE};
use tracing::warn;

/// Tokenizer errors
#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("No token encoding is loaded")]
    Unavailable,

    #[error("Token sequence does not decode to valid UTF-8: {0}")]
    Decode(String),
}

/// Tokenizer backed by the cl100k_base encoding (GPT-4, GPT-3.5-turbo).
///
/// When the encoding cannot be loaded the tokenizer runs in word mode:
/// `count_tokens` counts whitespace-separated words and `encode`/`decode`
/// return [`TokenizerError::Unavailable`]. Thresholds computed in word mode
/// are advisory only.
#[derive(Clone)]
pub struct Tokenizer {
    bpe: Option<Arc<CoreBPE>>,
}

impl Tokenizer {
    /// Load cl100k_base, degrading to word mode if that fails
    pub fn cl100k() -> Self {
        match cl100k_base() {
            Ok(bpe) => Self {
                bpe: Some(Arc::new(bpe)),
            },
            Err(e) => {
                warn!("Failed to load cl100k_base, falling back to word counts: {}", e);
                Self::word_based()
            }
        }
    }

    /// Word-count tokenizer with no encoding
    pub fn word_based() -> Self {
        Self { bpe: None }
    }

    /// Whether token counts are exact
    pub fn is_exact(&self) -> bool {
        self.bpe.is_some()
    }

    /// Short label for logs and health output
    pub fn mode(&self) -> &'static str {
        if self.is_exact() {
            "cl100k_base"
        } else {
            "word_count"
        }
    }

    /// Count tokens, or words when no encoding is loaded
    pub fn count_tokens(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            None => text.split_whitespace().count(),
        }
    }

    /// Encode text into token ids
    pub fn encode(&self, text: &str) -> Result<Vec<usize>, TokenizerError> {
        let bpe = self.bpe.as_ref().ok_or(TokenizerError::Unavailable)?;
        Ok(bpe.encode_with_special_tokens(text))
    }

    /// Decode token ids back into text
    pub fn decode(&self, tokens: &[usize]) -> Result<String, TokenizerError> {
        let bpe = self.bpe.as_ref().ok_or(TokenizerError::Unavailable)?;
        bpe.decode(tokens.to_vec())
            .map_err(|e| TokenizerError::Decode(e.to_string()))
    }

    /// Decode the window `tokens[start..end]`.
    ///
    /// Byte-level tokens can split a multi-byte character, so the window is
    /// shrunk by up to three tokens on either side until it decodes.
    pub(crate) fn decode_window(
        &self,
        tokens: &[usize],
        start: usize,
        end: usize,
    ) -> Result<String, TokenizerError> {
        let mut last_err = TokenizerError::Unavailable;
        for lead in 0..=3 {
            for trail in 0..=3 {
                let from = start + lead;
                let to = end.saturating_sub(trail);
                if from >= to {
                    continue;
                }
                match self.decode(&tokens[from..to]) {
                    Ok(text) => return Ok(text),
                    Err(TokenizerError::Unavailable) => return Err(TokenizerError::Unavailable),
                    Err(e) => last_err = e,
                }
            }
        }
        Err(last_err)
    }

    /// Keep at most `max_tokens` tokens (or words in word mode)
    pub fn truncate(&self, text: &str, max_tokens: usize) -> String {
        match self.encode(text) {
            Ok(tokens) if tokens.len() > max_tokens => self
                .decode_window(&tokens, 0, max_tokens)
                .unwrap_or_default(),
            Ok(_) => text.to_string(),
            Err(_) => {
                let words: Vec<&str> = text.split_whitespace().collect();
                if words.len() > max_tokens {
                    words[..max_tokens].join(" ")
                } else {
                    text.to_string()
                }
            }
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::cl100k()
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer").field("mode", &self.mode()).finish()
    }
}
