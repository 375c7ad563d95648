//! Porter stemmer.
//!
//! Implements the Porter suffix-stripping algorithm together with the
//! widely deployed "NLTK extensions" variant, which the vectorizer vocabulary
//! was fitted against:
//!
//! - a small pool of irregular forms (`dying` → `die`, `skies` → `sky`, ...)
//! - words of one or two characters are returned unchanged
//! - `ies`/`ied` on four-letter words keep the `e` (`dies` → `die`)
//! - `y` → `i` only after a consonant that is not the first letter
//!   (`happy` → `happi`, `enjoy` → `enjoy`)
//! - step 2 tries `alli` first and re-runs, maps `bli` → `ble`, and adds
//!   `fulli` and `logi`
//! - the cvc test also accepts two-letter vowel-consonant stems
//!
//! Every rule list stops at the first suffix that matches, whether or not its
//! condition holds. Words are processed as `char`s, so any Unicode token can
//! be stemmed; non-`aeiouy` characters count as consonants.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

type Word = SmallVec<[char; 24]>;
type Flags = SmallVec<[bool; 24]>;

#[rustfmt::skip]
const IRREGULAR_FORMS: [(&str, &str); 16] = [
    ("sky", "sky"), ("skies", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"), ("inning", "inning"),
    ("outings", "outing"), ("outing", "outing"),
    ("cannings", "canning"), ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

#[derive(Clone, Copy)]
enum Condition {
    /// m(stem) > 0
    PositiveMeasure,
    /// m(stem) > 1
    MeasureAbove1,
    /// m(stem) > 1 and stem ends in `s` or `t`
    IonStem,
    /// m(stem + "l") > 0, for `logi` where the `l` stays with the stem
    LStemPositiveMeasure,
    /// m(stem + "l") > 1, for `ll` → `l`
    LStemMeasureAbove1,
}

struct Rule {
    suffix: &'static str,
    replacement: &'static str,
    condition: Condition,
}

const fn rule(suffix: &'static str, replacement: &'static str, condition: Condition) -> Rule {
    Rule {
        suffix,
        replacement,
        condition,
    }
}

use Condition::*;

const STEP2: [Rule; 22] = [
    rule("ational", "ate", PositiveMeasure),
    rule("tional", "tion", PositiveMeasure),
    rule("enci", "ence", PositiveMeasure),
    rule("anci", "ance", PositiveMeasure),
    rule("izer", "ize", PositiveMeasure),
    rule("bli", "ble", PositiveMeasure),
    rule("alli", "al", PositiveMeasure),
    rule("entli", "ent", PositiveMeasure),
    rule("eli", "e", PositiveMeasure),
    rule("ousli", "ous", PositiveMeasure),
    rule("ization", "ize", PositiveMeasure),
    rule("ation", "ate", PositiveMeasure),
    rule("ator", "ate", PositiveMeasure),
    rule("alism", "al", PositiveMeasure),
    rule("iveness", "ive", PositiveMeasure),
    rule("fulness", "ful", PositiveMeasure),
    rule("ousness", "ous", PositiveMeasure),
    rule("aliti", "al", PositiveMeasure),
    rule("iviti", "ive", PositiveMeasure),
    rule("biliti", "ble", PositiveMeasure),
    rule("fulli", "ful", PositiveMeasure),
    rule("logi", "log", LStemPositiveMeasure),
];

const STEP3: [Rule; 7] = [
    rule("icate", "ic", PositiveMeasure),
    rule("ative", "", PositiveMeasure),
    rule("alize", "al", PositiveMeasure),
    rule("iciti", "ic", PositiveMeasure),
    rule("ical", "ic", PositiveMeasure),
    rule("ful", "", PositiveMeasure),
    rule("ness", "", PositiveMeasure),
];

const STEP4: [Rule; 19] = [
    rule("al", "", MeasureAbove1),
    rule("ance", "", MeasureAbove1),
    rule("ence", "", MeasureAbove1),
    rule("er", "", MeasureAbove1),
    rule("ic", "", MeasureAbove1),
    rule("able", "", MeasureAbove1),
    rule("ible", "", MeasureAbove1),
    rule("ant", "", MeasureAbove1),
    rule("ement", "", MeasureAbove1),
    rule("ment", "", MeasureAbove1),
    rule("ent", "", MeasureAbove1),
    rule("ion", "", IonStem),
    rule("ou", "", MeasureAbove1),
    rule("ism", "", MeasureAbove1),
    rule("ate", "", MeasureAbove1),
    rule("iti", "", MeasureAbove1),
    rule("ous", "", MeasureAbove1),
    rule("ive", "", MeasureAbove1),
    rule("ize", "", MeasureAbove1),
];

const STEP5B: [Rule; 1] = [rule("ll", "l", LStemMeasureAbove1)];

/// Porter stemmer with NLTK extensions.
///
/// Holds only the irregular-form table, which is never mutated after
/// construction; `stem` takes `&self` and is safe to call from many threads.
///
/// ```
/// use smsguard_core::analyzer::stemmer::PorterStemmer;
///
/// let stemmer = PorterStemmer::new();
/// assert_eq!(stemmer.stem("running"), "run");
/// assert_eq!(stemmer.stem("flies"), "fli");
/// ```
#[derive(Debug, Clone)]
pub struct PorterStemmer {
    pool: FxHashMap<&'static str, &'static str>,
}

impl Default for PorterStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl PorterStemmer {
    /// Creates a stemmer with the irregular-form pool loaded.
    pub fn new() -> Self {
        Self {
            pool: IRREGULAR_FORMS.iter().copied().collect(),
        }
    }

    /// Stems a single lowercase word.
    pub fn stem(&self, word: &str) -> String {
        let mut out = String::with_capacity(word.len());
        self.stem_into(word, &mut out);
        out
    }

    /// Stems `word` and appends the result to `out`.
    pub fn stem_into(&self, word: &str, out: &mut String) {
        if let Some(root) = self.pool.get(word) {
            out.push_str(root);
            return;
        }

        let mut w: Word = word.chars().collect();
        if w.len() <= 2 {
            out.push_str(word);
            return;
        }

        step1a(&mut w);
        step1b(&mut w);
        step1c(&mut w);
        step2(&mut w);
        apply_rules(&mut w, &STEP3);
        apply_rules(&mut w, &STEP4);
        step5a(&mut w);
        apply_rules(&mut w, &STEP5B);

        out.extend(w.iter());
    }
}

/// Consonant flags for every position of `w`.
///
/// `y` is a consonant at the start of a word or after a vowel, and a vowel
/// after a consonant.
fn consonant_flags(w: &[char]) -> Flags {
    let mut flags = Flags::with_capacity(w.len());
    for (i, &c) in w.iter().enumerate() {
        let consonant = match c {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => i == 0 || !flags[i - 1],
            _ => true,
        };
        flags.push(consonant);
    }
    flags
}

/// Number of vowel-consonant transitions (the `m` in `[C](VC)^m[V]`).
fn measure(w: &[char]) -> usize {
    let flags = consonant_flags(w);
    flags.windows(2).filter(|p| !p[0] && p[1]).count()
}

fn contains_vowel(w: &[char]) -> bool {
    consonant_flags(w).iter().any(|&c| !c)
}

fn ends_double_consonant(w: &[char]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && consonant_flags(w)[n - 1]
}

/// `*o`: stem ends consonant-vowel-consonant, last not `w`, `x` or `y`; or is
/// a two-letter vowel-consonant stem.
fn ends_cvc(w: &[char]) -> bool {
    let n = w.len();
    let flags = consonant_flags(w);
    match n {
        2 => !flags[0] && flags[1],
        n if n >= 3 => {
            flags[n - 3] && !flags[n - 2] && flags[n - 1] && !matches!(w[n - 1], 'w' | 'x' | 'y')
        }
        _ => false,
    }
}

fn ends_with(w: &[char], suffix: &str) -> bool {
    let k = suffix.len();
    k <= w.len() && w[w.len() - k..].iter().copied().eq(suffix.chars())
}

fn replace_suffix(w: &mut Word, suffix_len: usize, replacement: &str) {
    w.truncate(w.len() - suffix_len);
    w.extend(replacement.chars());
}

fn holds(condition: Condition, stem: &[char]) -> bool {
    match condition {
        PositiveMeasure => measure(stem) > 0,
        MeasureAbove1 => measure(stem) > 1,
        IonStem => measure(stem) > 1 && matches!(stem.last(), Some('s' | 't')),
        LStemPositiveMeasure | LStemMeasureAbove1 => {
            let mut with_l: Word = stem.iter().copied().collect();
            with_l.push('l');
            let m = measure(&with_l);
            match condition {
                LStemPositiveMeasure => m > 0,
                _ => m > 1,
            }
        }
    }
}

/// Applies the first rule whose suffix matches; later rules are not tried
/// even when that rule's condition fails.
fn apply_rules(w: &mut Word, rules: &[Rule]) {
    for r in rules {
        if ends_with(w, r.suffix) {
            let stem_len = w.len() - r.suffix.len();
            if holds(r.condition, &w[..stem_len]) {
                replace_suffix(w, r.suffix.len(), r.replacement);
            }
            return;
        }
    }
}

fn step1a(w: &mut Word) {
    if w.len() == 4 && ends_with(w, "ies") {
        replace_suffix(w, 3, "ie");
        return;
    }

    if ends_with(w, "sses") {
        replace_suffix(w, 4, "ss");
    } else if ends_with(w, "ies") {
        replace_suffix(w, 3, "i");
    } else if ends_with(w, "ss") {
        // unchanged
    } else if ends_with(w, "s") {
        w.pop();
    }
}

fn step1b(w: &mut Word) {
    if ends_with(w, "ied") {
        let replacement = if w.len() == 4 { "ie" } else { "i" };
        replace_suffix(w, 3, replacement);
        return;
    }

    if ends_with(w, "eed") {
        if measure(&w[..w.len() - 3]) > 0 {
            w.pop();
        }
        return;
    }

    let word: &[char] = w;
    let stem_len = ["ed", "ing"].iter().find_map(|suffix| {
        let stem_len = word.len().checked_sub(suffix.len())?;
        (ends_with(word, suffix) && contains_vowel(&word[..stem_len])).then_some(stem_len)
    });
    let Some(stem_len) = stem_len else {
        return;
    };
    w.truncate(stem_len);

    if ends_with(w, "at") || ends_with(w, "bl") || ends_with(w, "iz") {
        w.push('e');
    } else if ends_double_consonant(w) {
        if !matches!(w.last(), Some('l' | 's' | 'z')) {
            w.pop();
        }
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push('e');
    }
}

fn step1c(w: &mut Word) {
    if !ends_with(w, "y") {
        return;
    }
    let stem = &w[..w.len() - 1];
    if stem.len() > 1 && consonant_flags(stem)[stem.len() - 1] {
        replace_suffix(w, 1, "i");
    }
}

fn step2(w: &mut Word) {
    while ends_with(w, "alli") && measure(&w[..w.len() - 4]) > 0 {
        replace_suffix(w, 4, "al");
    }
    apply_rules(w, &STEP2);
}

fn step5a(w: &mut Word) {
    if !ends_with(w, "e") {
        return;
    }
    let stem = &w[..w.len() - 1];
    let m = measure(stem);
    if m > 1 || (m == 1 && !ends_cvc(stem)) {
        w.pop();
    }
}
