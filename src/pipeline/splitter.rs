//! Boundary-aware text splitting for map-reduce summarization
//!
//! Text is windowed over its token sequence (or over whitespace-separated
//! words when no encoding is loaded). Each window is cut back to the last
//! paragraph or sentence boundary when one sits late enough in the window,
//! and consecutive chunks overlap by up to `overlap_tokens`.

use super::tokenizer::Tokenizer;
use tracing::debug;

/// Smallest cursor advance per window; bounds the loop at `ceil(L / 16)` steps
pub const MIN_PROGRESS_TOKENS: usize = 16;

/// Chunks must have more tokens than this to be kept
const MIN_CHUNK_TOKENS: usize = 20;

/// Chunks must have more (trimmed) characters than this to be kept
const MIN_CHUNK_CHARS: usize = 10;

/// A chunk of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// Offset of the chunk's first unit in the source token (or word) sequence
    pub start: usize,
    /// Length in tokens (or words)
    pub token_count: usize,
}

impl Chunk {
    /// Offset one past the chunk's last unit
    pub fn end(&self) -> usize {
        self.start + self.token_count
    }
}

/// Splits text into overlapping chunks near a target token size
#[derive(Debug, Clone)]
pub struct TextSplitter {
    tokenizer: Tokenizer,
    target_tokens: usize,
    overlap_tokens: usize,
}

impl TextSplitter {
    pub fn new(tokenizer: Tokenizer, target_tokens: usize, overlap_tokens: usize) -> Self {
        Self {
            tokenizer,
            target_tokens: target_tokens.max(1),
            overlap_tokens,
        }
    }

    /// Split into chunk texts, in source order
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_chunks(text).into_iter().map(|c| c.text).collect()
    }

    /// Split into chunks with their positions
    pub fn split_chunks(&self, text: &str) -> Vec<Chunk> {
        match self.tokenizer.encode(text) {
            Ok(tokens) => self.split_units(&TokenUnits {
                tokenizer: &self.tokenizer,
                tokens,
            }),
            Err(_) => self.split_units(&WordUnits {
                words: text.split_whitespace().collect(),
            }),
        }
    }

    fn split_units<U: Units>(&self, units: &U) -> Vec<Chunk> {
        let total = units.len();
        let target = self.target_tokens;
        let mut chunks = Vec::new();
        let mut pos = 0;

        while pos < total {
            let end = (pos + target).min(total);
            let mut text = units.window(pos, end);
            let reaches_end = end == total;

            if !reaches_end {
                if let Some(cut) = find_cut_point(&text) {
                    let head = &text[..cut];
                    // Cuts that leave less than half a chunk are ignored
                    if units.measure(head) * 2 >= target {
                        text = head.to_string();
                    }
                }
            }

            let mut token_count = units.measure(&text);
            let mut truncated = false;
            if token_count > target {
                text = units.truncate(&text, target);
                token_count = units.measure(&text);
                truncated = true;
            }

            if token_count > MIN_CHUNK_TOKENS && text.trim().chars().count() > MIN_CHUNK_CHARS {
                chunks.push(Chunk {
                    text,
                    start: pos,
                    token_count,
                });
            } else {
                debug!("Dropping degenerate chunk at {} ({} tokens)", pos, token_count);
            }

            // The remainder is fully covered; another window would be pure overlap
            if reaches_end && !truncated {
                break;
            }

            pos += token_count
                .saturating_sub(self.overlap_tokens)
                .max(MIN_PROGRESS_TOKENS);
        }

        debug!("Split {} units into {} chunks", total, chunks.len());
        chunks
    }
}

/// Units the splitter windows over
trait Units {
    fn len(&self) -> usize;
    fn window(&self, start: usize, end: usize) -> String;
    fn measure(&self, text: &str) -> usize;
    fn truncate(&self, text: &str, max: usize) -> String;
}

struct TokenUnits<'a> {
    tokenizer: &'a Tokenizer,
    tokens: Vec<usize>,
}

impl Units for TokenUnits<'_> {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn window(&self, start: usize, end: usize) -> String {
        self.tokenizer
            .decode_window(&self.tokens, start, end)
            .unwrap_or_default()
    }

    fn measure(&self, text: &str) -> usize {
        self.tokenizer.count_tokens(text)
    }

    fn truncate(&self, text: &str, max: usize) -> String {
        self.tokenizer.truncate(text, max)
    }
}

struct WordUnits<'a> {
    words: Vec<&'a str>,
}

impl Units for WordUnits<'_> {
    fn len(&self) -> usize {
        self.words.len()
    }

    fn window(&self, start: usize, end: usize) -> String {
        self.words[start..end].join(" ")
    }

    fn measure(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn truncate(&self, text: &str, max: usize) -> String {
        text.split_whitespace().take(max).collect::<Vec<_>>().join(" ")
    }
}

/// Byte offset to cut `text` at, if a good boundary exists.
///
/// Paragraph breaks in the second half win; otherwise the last sentence
/// terminator followed by whitespace (or the end) after the 30% mark.
fn find_cut_point(text: &str) -> Option<usize> {
    let len = text.len();

    let para_from = ceil_char_boundary(text, len / 2);
    if let Some(idx) = text[para_from..].rfind("\n\n") {
        return Some(para_from + idx + 2);
    }

    let floor = len * 3 / 10;
    for (i, ch) in text.char_indices().rev() {
        if i < floor {
            break;
        }
        if matches!(ch, '.' | '!' | '?') {
            let followed_by_space = text[i + 1..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace);
            if followed_by_space {
                return Some(i + 1);
            }
        }
    }

    None
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
