//! Stop-word and punctuation reference sets.
//!
//! The English list is pinned: the vectorizer vocabulary was fitted on text
//! filtered with exactly these 179 entries, so changing it changes which
//! features a message can ever produce.
//!
//! Newer releases of the upstream list only append apostrophe forms such as
//! `he'd` or `i'm`. Those can never reach this filter (the alphanumeric stage
//! rejects any token containing `'`), so the pinned list behaves identically.

use rustc_hash::FxHashSet;

/// English stop words, in upstream order.
#[rustfmt::skip]
pub const ENGLISH_STOP_WORDS: [&str; 179] = [
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing",
    "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
    "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each",
    "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o",
    "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't",
    "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't",
    "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// ASCII punctuation characters (`!"#$%&'()*+,-./:;<=>?@[\]^_{|}~` and backtick).
pub const ASCII_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Returns `true` if `token` occurs in [`ASCII_PUNCTUATION`].
///
/// This is a substring test, so `"()"` matches while `"!!"` does not, and the
/// empty string always matches.
#[inline]
pub fn is_punctuation(token: &str) -> bool {
    ASCII_PUNCTUATION.contains(token)
}

/// Immutable stop-word set.
///
/// Built once and only read afterwards, so a single instance can be shared
/// freely between threads.
#[derive(Debug, Clone)]
pub struct StopWords {
    words: FxHashSet<&'static str>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}

impl StopWords {
    /// The pinned English list.
    pub fn english() -> Self {
        Self::from_words(&ENGLISH_STOP_WORDS)
    }

    /// Builds a set from a static word list.
    pub fn from_words(words: &[&'static str]) -> Self {
        let mut set = FxHashSet::with_capacity_and_hasher(words.len(), Default::default());
        set.extend(words.iter().copied());
        Self { words: set }
    }

    /// Returns `true` if `token` is a stop word.
    #[inline(always)]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the set has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_has_no_duplicates() {
        assert_eq!(StopWords::english().len(), ENGLISH_STOP_WORDS.len());
    }

    #[test]
    fn common_function_words_are_stop_words() {
        let sw = StopWords::english();
        for w in ["the", "is", "and", "a", "you", "have", "been", "are", "we", "for", "at"] {
            assert!(sw.contains(w), "{w} should be a stop word");
        }
    }

    #[test]
    fn content_words_are_not_stop_words() {
        let sw = StopWords::english();
        for w in ["winner", "prize", "call", "lunch", "free", "txt"] {
            assert!(!sw.contains(w), "{w} should not be a stop word");
        }
    }

    #[test]
    fn contraction_fragments_are_stop_words() {
        let sw = StopWords::english();
        for w in ["don", "t", "s", "ll", "ve", "re", "m", "d"] {
            assert!(sw.contains(w));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(!StopWords::english().contains("The"));
    }

    #[test]
    fn punctuation_set_matches_ascii() {
        assert_eq!(ASCII_PUNCTUATION.len(), 32);
        for c in ASCII_PUNCTUATION.chars() {
            assert!(is_punctuation(c.encode_utf8(&mut [0u8; 4])));
        }
    }

    #[test]
    fn punctuation_is_a_substring_test() {
        assert!(is_punctuation("()"));
        assert!(is_punctuation(""));
        assert!(!is_punctuation("a"));
        assert!(!is_punctuation("!!"));
        assert!(!is_punctuation("£"));
    }

    #[test]
    fn custom_list() {
        let sw = StopWords::from_words(&["foo"]);
        assert!(sw.contains("foo"));
        assert!(!sw.contains("the"));
        assert!(!sw.is_empty());
    }
}
