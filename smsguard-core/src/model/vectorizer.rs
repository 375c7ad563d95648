//! TF-IDF vectorizer.
//!
//! Applies a fitted TF-IDF model to a normalized message. The vocabulary,
//! idf weights and term extraction options come from a JSON artifact exported
//! from the trained vectorizer; nothing is fitted here.
//!
//! ## Weighting
//!
//! For every vocabulary term found in the message:
//!
//! ```text
//! tf     = count            (or 1 + ln(count) when sublinear_tf,
//!                            or 1 when binary)
//! weight = tf * idf[term]
//! ```
//!
//! The resulting vector is then scaled to unit L2 (or L1) norm. Terms missing
//! from the vocabulary are ignored.

use std::borrow::Cow;

use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SmsGuardError};

/// Term pattern used when the artifact does not name one: runs of two or
/// more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Vector normalization applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    /// Sum of absolute values is 1.
    L1,
    /// Euclidean length is 1.
    L2,
}

fn default_true() -> bool {
    true
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// On-disk layout of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerArtifact {
    /// Term to feature index.
    pub vocabulary: FxHashMap<String, u32>,
    /// Inverse document frequency per feature index.
    pub idf: Vec<f64>,
    /// Lowercase the text before extracting terms.
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// Use `1 + ln(tf)` instead of the raw count.
    #[serde(default)]
    pub sublinear_tf: bool,
    /// Clamp every count to 1.
    #[serde(default)]
    pub binary: bool,
    /// Output normalization, `null` for none.
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    /// Regular expression matching one term.
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    /// Smallest and largest word n-gram length.
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

/// Sparse feature vector: `(feature index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(u32, f64)>,
}

impl SparseVector {
    /// Builds a vector from pairs already sorted by index, without duplicates.
    pub fn from_sorted(entries: Vec<(u32, f64)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { entries }
    }

    /// Number of non-zero features.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no feature is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `(index, weight)` pairs.
    #[inline]
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Weight of feature `index`, zero when unset.
    pub fn get(&self, index: u32) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Dot product with a dense row; indices past the row end count as zero.
    #[inline]
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(i, w)| dense.get(i as usize).map_or(0.0, |d| w * d))
            .sum()
    }

    /// Euclidean length.
    pub fn l2_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    fn normalize(&mut self, norm: Norm) {
        let total = match norm {
            Norm::L1 => self.entries.iter().map(|&(_, w)| w.abs()).sum::<f64>(),
            Norm::L2 => self.l2_norm(),
        };
        if total > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= total;
            }
        }
    }
}

/// Fitted TF-IDF vectorizer.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: FxHashMap<String, u32>,
    idf: Vec<f64>,
    lowercase: bool,
    sublinear_tf: bool,
    binary: bool,
    norm: Option<Norm>,
    token_pattern: Regex,
    captures_group: bool,
    ngram_range: (usize, usize),
}

impl TfidfVectorizer {
    /// Validates an artifact and compiles its token pattern.
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self> {
        let VectorizerArtifact {
            vocabulary,
            idf,
            lowercase,
            sublinear_tf,
            binary,
            norm,
            token_pattern,
            ngram_range,
        } = artifact;

        if idf.is_empty() {
            return Err(SmsGuardError::invalid("vectorizer has no features"));
        }
        if vocabulary.len() != idf.len() {
            return Err(SmsGuardError::invalid(format!(
                "vocabulary has {} terms but idf has {} weights",
                vocabulary.len(),
                idf.len()
            )));
        }
        if let Some(pos) = idf.iter().position(|w| !w.is_finite()) {
            return Err(SmsGuardError::invalid(format!("idf[{pos}] is not finite")));
        }

        let mut seen = vec![false; idf.len()];
        for (term, &index) in &vocabulary {
            match seen.get_mut(index as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(SmsGuardError::invalid(format!(
                        "feature index {index} is assigned twice (at {term:?})"
                    )))
                }
                None => {
                    return Err(SmsGuardError::invalid(format!(
                        "term {term:?} has index {index} past {} features",
                        idf.len()
                    )))
                }
            }
        }

        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SmsGuardError::invalid(format!(
                "invalid ngram range ({min_n}, {max_n})"
            )));
        }

        let token_pattern = Regex::new(&token_pattern).map_err(|e| {
            SmsGuardError::invalid(format!("bad token pattern {token_pattern:?}: {e}"))
        })?;
        let groups = token_pattern.captures_len() - 1;
        if groups > 1 {
            return Err(SmsGuardError::invalid(format!(
                "token pattern has {groups} capture groups, at most one is allowed"
            )));
        }

        Ok(Self {
            vocabulary,
            idf,
            lowercase,
            sublinear_tf,
            binary,
            norm,
            token_pattern,
            captures_group: groups == 1,
            ngram_range,
        })
    }

    /// Number of features, equal to the vocabulary size.
    #[inline]
    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    /// Feature index of `term`.
    #[inline]
    pub fn index_of(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    /// Calls `emit` for every term of `text`, unigrams first, then longer
    /// n-grams in order.
    fn for_each_term<F>(&self, text: &str, mut emit: F)
    where
        F: FnMut(&str),
    {
        let tokens: Vec<&str> = if self.captures_group {
            self.token_pattern
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str())
                .collect()
        } else {
            self.token_pattern
                .find_iter(text)
                .map(|m| m.as_str())
                .collect()
        };

        let (min_n, max_n) = self.ngram_range;
        let mut gram = String::new();

        for n in min_n..=max_n.min(tokens.len()) {
            if n == 1 {
                tokens.iter().for_each(|t| emit(t));
                continue;
            }
            for window in tokens.windows(n) {
                gram.clear();
                for (i, token) in window.iter().enumerate() {
                    if i > 0 {
                        gram.push(' ');
                    }
                    gram.push_str(token);
                }
                emit(&gram);
            }
        }
    }

    /// Maps a normalized message to its TF-IDF vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let text: Cow<'_, str> = if self.lowercase {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        };

        let mut counts: FxHashMap<u32, u32> = FxHashMap::default();
        self.for_each_term(&text, |term| {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_insert(0) += 1;
            }
        });

        let mut entries: Vec<(u32, f64)> = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.binary {
                    1.0
                } else if self.sublinear_tf {
                    1.0 + f64::from(count).ln()
                } else {
                    f64::from(count)
                };
                (index, tf * self.idf[index as usize])
            })
            .collect();
        entries.sort_unstable_by_key(|&(index, _)| index);

        let mut vector = SparseVector::from_sorted(entries);
        if let Some(norm) = self.norm {
            vector.normalize(norm);
        }
        vector
    }
}
