//! Core types shared across the smsguard crates.
//!
//! This crate holds the small value types that flow between the text
//! pipeline, the model layer and the command-line shell. Keeping them
//! separate means:
//!
//! - **Stable contract**: the shell renders a [`Prediction`] without
//!   depending on how it was computed
//! - **Serializable**: every type derives `serde` so results can be
//!   emitted as JSON
//! - **Clean boundaries**: no dependency on the inference code

#![warn(missing_docs)]

use core::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Classification outcome for a message.
///
/// The discriminants match the class ids the model was trained with:
/// ham is the negative class (0), spam the positive class (1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Label {
    /// Legitimate message.
    Ham = 0,
    /// Unsolicited or fraudulent message.
    Spam = 1,
}

impl Label {
    /// Maps a trained class id to a label.
    ///
    /// Returns `None` for anything other than 0 or 1.
    #[inline]
    pub const fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Label::Ham),
            1 => Some(Label::Spam),
            _ => None,
        }
    }

    /// Class id used by the model (0 = ham, 1 = spam).
    #[inline(always)]
    pub const fn class_id(self) -> usize {
        self as usize
    }

    /// Returns `true` for [`Label::Spam`].
    #[inline(always)]
    pub const fn is_spam(self) -> bool {
        matches!(self, Label::Spam)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Ham => f.write_str("ham"),
            Label::Spam => f.write_str("spam"),
        }
    }
}

/// Result of classifying one message.
///
/// Besides the label it carries the full class distribution and the
/// preprocessed text, so callers can show how the input was interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label.
    pub label: Label,
    /// Posterior probability per class, indexed by [`Label::class_id`].
    pub probabilities: [f64; 2],
    /// Maximum posterior probability, in percent (0.0-100.0).
    pub confidence: f64,
    /// Normalized token string handed to the vectorizer.
    pub processed: String,
    /// Length of the raw message in characters.
    pub original_len: usize,
    /// Length of the normalized text in characters.
    pub processed_len: usize,
}

impl Prediction {
    /// Builds a prediction from the class distribution.
    ///
    /// The label is the most probable class; on an exact tie ham wins,
    /// matching an argmax that keeps the first maximum.
    pub fn from_probabilities(probabilities: [f64; 2], original: &str, processed: String) -> Self {
        let label = if probabilities[Label::Spam.class_id()] > probabilities[Label::Ham.class_id()]
        {
            Label::Spam
        } else {
            Label::Ham
        };
        let confidence = probabilities[0].max(probabilities[1]) * 100.0;

        Self {
            label,
            probabilities,
            confidence,
            original_len: original.chars().count(),
            processed_len: processed.chars().count(),
            processed,
        }
    }

    /// Probability assigned to the spam class.
    #[inline]
    pub fn spam_probability(&self) -> f64 {
        self.probabilities[Label::Spam.class_id()]
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}% confidence)", self.label, self.confidence)
    }
}

/// Location of the persisted vectorizer and classifier artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Directory holding both artifacts.
    pub model_dir: PathBuf,
    /// File name of the TF-IDF vectorizer artifact.
    pub vectorizer_file: String,
    /// File name of the Naive Bayes model artifact.
    pub model_file: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("MODELS"),
            vectorizer_file: "vectorizer.json".to_string(),
            model_file: "model.json".to_string(),
        }
    }
}

impl ClassifierConfig {
    /// Creates a configuration rooted at `model_dir` with default file names.
    pub fn with_model_dir(model_dir: impl AsRef<Path>) -> Self {
        Self {
            model_dir: model_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Full path of the vectorizer artifact.
    pub fn vectorizer_path(&self) -> PathBuf {
        self.model_dir.join(&self.vectorizer_file)
    }

    /// Full path of the model artifact.
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }
}
