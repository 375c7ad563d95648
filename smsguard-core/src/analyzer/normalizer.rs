//! Text Normalizer Module
//!
//! Turns a raw message into the canonical token string the vectorizer was
//! fitted on. Every message goes through the same fixed pipeline:
//!
//! 1. **Case folding**: full Unicode lowercase mapping
//! 2. **Tokenization**: Treebank-style word tokens (see [`Tokenizer`])
//! 3. **Alphanumeric filter**: keep tokens made only of letters and numbers
//! 4. **Stop-word filter**: drop English stop words and ASCII punctuation
//! 5. **Stemming**: Porter stemmer with the NLTK extensions
//! 6. **Join**: single spaces, empty string when nothing survives
//!
//! ## What It Does
//!
//! ```text
//! "Hey, are we still meeting for lunch tomorrow at 12pm?"
//!     -> "hey still meet lunch tomorrow 12pm"
//! ```
//!
//! ## Sharing
//!
//! A [`TextNormalizer`] owns immutable reference data only (stop-word set,
//! stemmer tables, tokenizer options). Build one and pass it around, or use
//! [`shared`] for a process-wide instance that is initialized on first use.
//! The output depends only on the input text.

use std::borrow::Cow;
use std::sync::OnceLock;

use unicode_general_category::{get_general_category, GeneralCategory};

use super::stemmer::PorterStemmer;
use super::stopwords::{is_punctuation, StopWords};
use super::tokenizer::{Tokenizer, TokenizerConfig};

static SHARED: OnceLock<TextNormalizer> = OnceLock::new();

/// Process-wide normalizer with default options.
///
/// Concurrent first calls block until a single instance is built.
pub fn shared() -> &'static TextNormalizer {
    SHARED.get_or_init(TextNormalizer::default)
}

/// Normalizes `text` with the [`shared`] normalizer.
#[inline]
pub fn normalize(text: &str) -> String {
    shared().normalize(text)
}

/// Returns `true` if `token` is non-empty and every char is a Unicode letter
/// or number.
///
/// Classification is by general category (`L*`, `Nd`, `Nl`, `No`), not by the
/// Alphabetic property. Combining marks fail, so `caf\u{301}` is rejected
/// while the precomposed `café` passes, and so do letter-like symbols such as
/// `ⓦ` or `🄰`.
#[inline]
pub fn is_alphanumeric_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_letter_or_number)
}

#[inline(always)]
fn is_letter_or_number(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric();
    }
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}

/// Full Unicode lowercase, borrowing when there is nothing to fold.
fn fold_case(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        if text.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(text.to_ascii_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

/// Message preprocessing pipeline.
///
/// # Examples
///
/// ```
/// use smsguard_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("I am RUNNING late!"), "run late");
/// assert_eq!(normalizer.normalize(""), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    tokenizer: Tokenizer,
    stop_words: StopWords,
    stemmer: PorterStemmer,
}

impl TextNormalizer {
    /// Creates a normalizer with the given tokenizer options and the pinned
    /// English stop words.
    pub fn with_config(config: TokenizerConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config),
            ..Default::default()
        }
    }

    /// Replaces the stop-word set.
    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// The tokenizer used by stage 2.
    #[inline]
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The stop-word set used by stage 4.
    #[inline]
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Returns `true` if a lowercase token survives stages 3 and 4.
    #[inline]
    pub fn keeps(&self, token: &str) -> bool {
        // The punctuation check cannot fire once the alphanumeric filter has
        // passed; it mirrors the filter the vocabulary was built with.
        is_alphanumeric_token(token) && !self.stop_words.contains(token) && !is_punctuation(token)
    }

    /// Normalizes `text` into `out`, replacing its contents.
    ///
    /// Reuses the buffer's capacity, so a caller processing many messages can
    /// keep one `String` around.
    pub fn normalize_into(&self, text: &str, out: &mut String) {
        out.clear();
        let folded = fold_case(text);

        self.tokenizer.tokenize(&folded, |token| {
            if !self.keeps(token) {
                return;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            self.stemmer.stem_into(token, out);
        });
    }

    /// Normalizes `text` and returns the space-joined stems.
    #[inline]
    pub fn normalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.normalize_into(text, &mut out);
        out
    }

    /// Returns the stems in source order, before joining.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let folded = fold_case(text);
        let mut stems = Vec::new();

        self.tokenizer.tokenize(&folded, |token| {
            if self.keeps(token) {
                stems.push(self.stemmer.stem(token));
            }
        });
        stems
    }
}
