//! Word Tokenizer Module
//!
//! Splits text into word and punctuation tokens following Penn Treebank
//! conventions, with a light sentence splitter in front. It is the second
//! stage of the normalizer pipeline: case folding runs before it, the
//! alphanumeric and stop-word filters after it.
//!
//! ## What It Does
//!
//! Given `"don't call now!!"` it emits:
//!
//! ```text
//! "do", "n't", "call", "now", "!", "!"
//! ```
//!
//! ## Boundary Rules
//!
//! - Whitespace separates chunks and is never part of a token
//! - `? ! ; @ # $ % & *`, brackets, double quotes, backticks and typographic
//!   quotes (`« » “ ” ‘ ’ „`) always become their own tokens
//! - runs of two or more dots, `--` and `''` become one token each
//! - `,` and `:` split off unless a digit follows (`1,000`, `12:30` stay whole);
//!   the char after the separator is consumed with it, so in `hi,,call` the
//!   second comma stays on the next word (`hi , ,call`)
//! - clitics split from the end of a word: `'s 'm 'd 'll 're 've n't` and a
//!   bare trailing `'` (`can't` → `ca n't`)
//! - fused forms split: `cannot`, `gonna`, `gotta`, `gimme`, `lemme`,
//!   `wanna`, `'tis`, `'twas`, `d'ye`, `more'n`
//! - a sentence-final period splits from its word; periods inside a chunk
//!   (`3.5`, `e.g`, `end.next`) stay attached
//! - everything else (`- / + = _ ~ ^ |`, currency signs) stays attached, so
//!   `£900` is a single token
//!
//! ## Sentence Ends
//!
//! A word ending in `.` closes a sentence when it is the last word of the
//! text, or when it is followed by more text and is not a known
//! abbreviation. Numbers and single-letter initials only close a sentence
//! when the next chunk does not start with a lowercase letter.
//!
//! ## Zero Allocation
//!
//! Every token is a slice of the input. Tokens are emitted through a callback
//! in source order.

use memchr::{memchr, memchr_iter};
use smallvec::SmallVec;

/// Abbreviations whose trailing period never ends a sentence mid-text.
const ABBREVIATIONS: [&str; 33] = [
    "mr", "mrs", "ms", "dr", "prof", "jr", "sr", "st", "mt", "ft", "inc", "ltd", "corp", "co",
    "vs", "etc", "approx", "dept", "est", "govt", "jan", "feb", "aug", "sept", "oct", "nov",
    "dec", "a.m", "p.m", "e.g", "i.e", "u.s", "u.k",
];

/// Fused forms and the byte offset at which they split.
const FUSED_FORMS: [(&str, usize); 10] = [
    ("cannot", 3),
    ("d'ye", 1),
    ("gimme", 3),
    ("gonna", 3),
    ("gotta", 3),
    ("lemme", 3),
    ("more'n", 4),
    ("wanna", 3),
    ("'tis", 2),
    ("'twas", 2),
];

/// Clitics checked first, at the very end of a word.
const TRAILING_CLITICS: [&str; 4] = ["'s", "'m", "'d", "'"];

/// Clitics checked after [`TRAILING_CLITICS`] on what remains.
const INNER_CLITICS: [&str; 4] = ["'ll", "'re", "'ve", "n't"];

/// Tokenizer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Split sentence-final periods in the middle of the text. When disabled
    /// only the period that ends the whole input is split off.
    pub split_sentences: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            split_sentences: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Piece<'t> {
    Word(&'t str),
    Punct(&'t str),
}

/// Whitespace as understood by the tokenizer: Unicode whitespace plus the
/// ASCII information separators `\x1c`-`\x1f`.
#[inline(always)]
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

#[inline(always)]
fn is_split_char(c: char) -> bool {
    matches!(
        c,
        '?' | '!'
            | ';'
            | '@'
            | '#'
            | '$'
            | '%'
            | '&'
            | '*'
            | '['
            | ']'
            | '('
            | ')'
            | '{'
            | '}'
            | '<'
            | '>'
            | '"'
            | '`'
            | '«'
            | '»'
            | '“'
            | '”'
            | '‘'
            | '’'
            | '„'
    )
}

#[inline(always)]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[inline]
fn is_closer(token: &str) -> bool {
    matches!(token, "]" | ")" | "}" | ">" | "\"" | "''")
}

fn is_abbreviation(stem: &str) -> bool {
    let tail = stem.rsplit('-').next().unwrap_or(stem);
    ABBREVIATIONS
        .iter()
        .any(|a| a.eq_ignore_ascii_case(stem) || a.eq_ignore_ascii_case(tail))
}

fn is_initial(stem: &str) -> bool {
    let mut chars = stem.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic() || c == '_')
}

/// Numeric tokens such as `12`, `-3.5`, `1,000` or `.5`.
fn is_number(stem: &str) -> bool {
    let s = stem.strip_prefix('-').unwrap_or(stem);
    let s = s.strip_prefix(|c: char| c == '.' || c == ',').unwrap_or(s);
    let mut chars = s.chars();
    chars.next().is_some_and(char::is_numeric)
        && chars.all(|c| c.is_numeric() || matches!(c, ',' | '.' | '-'))
}

#[inline]
fn ends_with_ignore_ascii_case(word: &str, suffix: &str) -> bool {
    let (w, s) = (word.as_bytes(), suffix.as_bytes());
    w.len() >= s.len() && w[w.len() - s.len()..].eq_ignore_ascii_case(s)
}

/// Treebank-style word tokenizer.
///
/// Stateless apart from its configuration, so one instance can serve any
/// number of threads.
///
/// ## Example
///
/// ```
/// use smsguard_core::analyzer::tokenizer::Tokenizer;
///
/// let tokenizer = Tokenizer::default();
/// let mut tokens = Vec::new();
/// tokenizer.tokenize("hey, are we still on?", |t| tokens.push(t));
///
/// assert_eq!(tokens, ["hey", ",", "are", "we", "still", "on", "?"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Creates a tokenizer with the given options.
    #[inline]
    pub const fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    /// Returns the tokenizer options.
    #[inline]
    pub const fn config(&self) -> TokenizerConfig {
        self.config
    }

    /// Tokenizes `text` and emits every token, left to right.
    pub fn tokenize<'t, F>(&self, text: &'t str, mut emit: F)
    where
        F: FnMut(&'t str),
    {
        let mut chunks = text.split(is_space).filter(|c| !c.is_empty()).peekable();

        while let Some(chunk) = chunks.next() {
            let next = chunks.peek().copied();
            self.tokenize_chunk(chunk, next, &mut emit);
        }
    }

    /// Collects the tokens of `text` into a vector.
    pub fn tokens<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut out = Vec::new();
        self.tokenize(text, |t| out.push(t));
        out
    }

    fn tokenize_chunk<'t, F>(&self, chunk: &'t str, next: Option<&'t str>, emit: &mut F)
    where
        F: FnMut(&'t str),
    {
        let pieces = split_punctuation(chunk);
        let last_word = pieces.iter().rposition(|p| matches!(p, Piece::Word(_)));

        for (idx, piece) in pieces.iter().enumerate() {
            match *piece {
                Piece::Punct(p) => emit(p),
                Piece::Word(w) => {
                    let closes_chunk = Some(idx) == last_word
                        && pieces[idx + 1..]
                            .iter()
                            .all(|p| matches!(p, Piece::Punct(s) if is_closer(s)));
                    let sentence_end = closes_chunk && self.ends_sentence(w, next);
                    split_word(w, sentence_end, emit);
                }
            }
        }
    }

    /// Decides whether the trailing period of `word` closes a sentence.
    fn ends_sentence(&self, word: &str, next: Option<&str>) -> bool {
        let Some(next) = next else {
            return true;
        };
        if !self.config.split_sentences {
            return false;
        }
        let Some(stem) = word.trim_end_matches('\'').strip_suffix('.') else {
            return false;
        };

        if is_abbreviation(stem) {
            return false;
        }
        if is_initial(stem) || is_number(stem) {
            return !next.chars().next().is_some_and(char::is_lowercase);
        }
        true
    }
}

/// Separates always-split punctuation from the word runs of one chunk.
fn split_punctuation(chunk: &str) -> SmallVec<[Piece<'_>; 8]> {
    let bytes = chunk.as_bytes();
    let mut pieces = SmallVec::new();
    let mut word_start = 0usize;
    let mut i = 0usize;

    while let Some(c) = chunk[i..].chars().next() {
        let width = c.len_utf8();
        let punct_end = match c {
            '.' => {
                let run = bytes[i..].iter().take_while(|&&b| b == b'.').count();
                (run >= 2).then_some(i + run)
            }
            '-' => (bytes.get(i + 1) == Some(&b'-')).then_some(i + 2),
            '\'' => (bytes.get(i + 1) == Some(&b'\'')).then_some(i + 2),
            ',' | ':' => {
                let mut rest = chunk[i + width..].chars();
                match (rest.next(), rest.next()) {
                    (Some(n), _) if n.is_numeric() => None,
                    (Some(n @ (',' | ':')), Some(_)) => {
                        if word_start < i {
                            pieces.push(Piece::Word(&chunk[word_start..i]));
                        }
                        pieces.push(Piece::Punct(&chunk[i..i + width]));
                        // The follower is never a separator itself.
                        word_start = i + width;
                        i = word_start + n.len_utf8();
                        continue;
                    }
                    _ => Some(i + width),
                }
            }
            c if is_split_char(c) => Some(i + width),
            _ => None,
        };

        match punct_end {
            Some(end) => {
                if word_start < i {
                    pieces.push(Piece::Word(&chunk[word_start..i]));
                }
                pieces.push(Piece::Punct(&chunk[i..end]));
                i = end;
                word_start = end;
            }
            None => i += width,
        }
    }

    if word_start < chunk.len() {
        pieces.push(Piece::Word(&chunk[word_start..]));
    }
    pieces
}

/// Emits one word run, splitting quote-initials, the sentence-final period,
/// clitics and fused forms.
fn split_word<'t, F>(word: &'t str, sentence_end: bool, emit: &mut F)
where
    F: FnMut(&'t str),
{
    let parts = split_quote_initials(word);
    let last = parts.len() - 1;

    for (idx, part) in parts.into_iter().enumerate() {
        if idx == last && sentence_end {
            if let Some((head, period, quotes)) = split_final_period(part) {
                emit_clitics(head, emit);
                emit(period);
                if !quotes.is_empty() {
                    emit(quotes);
                }
                continue;
            }
        }
        emit_clitics(part, emit);
    }
}

/// Splits `'x` where `x` is a single word character closing the word, as in
/// `o'k` → `o'`, `k`. Clitic letters (`m t s d n`) are left alone.
fn split_quote_initials(word: &str) -> SmallVec<[&str; 4]> {
    let mut parts = SmallVec::new();
    let mut start = 0usize;

    for q in memchr_iter(b'\'', word.as_bytes()) {
        let mut rest = word[q + 1..].chars();
        let Some(c1) = rest.next() else {
            continue;
        };
        let bounded = rest.next().map_or(true, |c2| !is_word_char(c2));
        let clitic = matches!(c1.to_ascii_lowercase(), 'm' | 't' | 's' | 'd' | 'n');

        if is_word_char(c1) && bounded && !clitic {
            parts.push(&word[start..q + 1]);
            start = q + 1;
        }
    }

    parts.push(&word[start..]);
    parts
}

/// Splits `word.` or `word.'` into `(word, ".", "'")`.
fn split_final_period(word: &str) -> Option<(&str, &str, &str)> {
    let core = word.trim_end_matches('\'');
    let head = core.strip_suffix('.')?;
    if head.is_empty() || head.ends_with('.') {
        return None;
    }
    Some((head, &core[head.len()..], &word[core.len()..]))
}

fn split_clitic<'t>(word: &'t str, clitics: &[&str]) -> (&'t str, Option<&'t str>) {
    for clitic in clitics {
        if word.len() > clitic.len() && ends_with_ignore_ascii_case(word, clitic) {
            let head = &word[..word.len() - clitic.len()];
            if !head.ends_with('\'') {
                return (head, Some(&word[head.len()..]));
            }
        }
    }
    (word, None)
}

fn emit_clitics<'t, F>(word: &'t str, emit: &mut F)
where
    F: FnMut(&'t str),
{
    if memchr(b'\'', word.as_bytes()).is_none() {
        emit_fused(word, emit);
        return;
    }

    let (head, trailing) = split_clitic(word, &TRAILING_CLITICS);
    let (head, inner) = split_clitic(head, &INNER_CLITICS);

    emit_fused(head, emit);
    for clitic in [inner, trailing].into_iter().flatten() {
        emit(clitic);
    }
}

fn emit_fused<'t, F>(word: &'t str, emit: &mut F)
where
    F: FnMut(&'t str),
{
    for (form, at) in FUSED_FORMS {
        if word.eq_ignore_ascii_case(form) {
            emit(&word[..at]);
            emit(&word[at..]);
            return;
        }
    }
    emit(word);
}
