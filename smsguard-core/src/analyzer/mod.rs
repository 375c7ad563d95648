//! Text analysis pipeline.
//!
//! This module provides the message preprocessing components:
//! - **Normalizer**: Runs the full pipeline from raw text to stems
//! - **Tokenizer**: Splits lowercase text into Treebank-style tokens
//! - **Stop words**: Pinned English stop-word list and punctuation set
//! - **Stemmer**: Porter stemmer with the NLTK extensions

pub mod normalizer;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use normalizer::{normalize, shared, TextNormalizer};
pub use stemmer::PorterStemmer;
pub use stopwords::StopWords;
pub use tokenizer::{is_space, Tokenizer, TokenizerConfig};
