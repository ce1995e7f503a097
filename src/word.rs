//! Word validation and normalization for lexicon entries.
//!
//! Every word stored on an ontology element passes through [`normalize`]
//! first. The normalized form is the key of the ontology's uniqueness
//! index: runs of whitespace and underscores collapse into a single `_`,
//! so `"located in"`, `"located_in"` and `" located   in "` name the same
//! word. [`pretty`] turns a normalized word back into display form.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("separator pattern is valid"));

static VALID_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9_\- ]*)?$").expect("word pattern is valid")
});

/// Reserved keywords of the controlled languages.
///
/// Covers the ACE function words plus the keywords used by the built-in
/// German and Spanish grammars. Kept sorted.
const FUNCTION_WORDS: &[&str] = &[
    "a", "all", "alle", "an", "and", "are", "as", "at", "be", "by", "can",
    "das", "der", "did", "die", "do", "does", "each", "eight", "ein", "eine", "einen", "el",
    "es", "every", "everybody", "everyone", "everything", "exactly", "false", "five", "for",
    "four", "has", "have", "he", "her", "herself", "him", "himself", "his", "how", "if",
    "is", "ist", "it", "its", "itself", "jede", "jeder", "jedes", "kein", "keine", "la",
    "las", "least", "less", "los", "may", "more", "most", "must", "necessary", "nicht",
    "nine", "ningun", "ninguna", "ningún", "no", "nobody", "noone", "nor", "not", "nothing",
    "of", "one", "only", "or", "por", "possible", "seven", "she", "should", "sind", "six",
    "some", "somebody", "someone", "something", "son", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "there", "they", "three", "toda", "todas",
    "todo", "todos", "true", "two", "un", "una", "von", "was", "what", "when", "where",
    "which", "who", "whom", "whose",
];

/// Canonicalize a raw word.
///
/// Applies Unicode NFC composition, collapses every run of whitespace
/// and underscores into one `_`, and strips leading/trailing `_`.
/// The function is idempotent.
pub fn normalize(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    let collapsed = SEPARATORS.replace_all(&composed, "_");
    collapsed.trim_matches('_').to_string()
}

/// Whether `s` is empty or a well-formed word.
///
/// A word starts with an ASCII letter and continues with ASCII letters,
/// digits, hyphens, underscores or spaces.
pub fn is_valid_word_or_empty(s: &str) -> bool {
    VALID_WORD.is_match(s)
}

/// Whether `s` is a reserved keyword of the controlled languages.
///
/// The comparison is ASCII case-insensitive and expects a single word;
/// a normalized multi-word compound is never a function word.
pub fn is_function_word(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    FUNCTION_WORDS.binary_search(&lower.as_str()).is_ok()
}

/// Whether a normalized word is, or starts with, a reserved keyword.
///
/// `every_man` or `the_Beatles` would read as a keyword followed by
/// another word, so a compound is reserved when its first token is.
pub fn is_reserved(word: &str) -> bool {
    is_function_word(word) || word.split('_').next().is_some_and(is_function_word)
}

/// Display form of a normalized word (`_` shown as space).
pub fn pretty(word: &str) -> String {
    word.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn function_words_sorted_for_binary_search() {
        let mut sorted = FUNCTION_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, FUNCTION_WORDS);
    }

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize("located in"), "located_in");
        assert_eq!(normalize("  located \t in  "), "located_in");
        assert_eq!(normalize("located__in"), "located_in");
        assert_eq!(normalize("_located _ in_"), "located_in");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_composes_unicode() {
        // "e" + combining acute accent becomes the precomposed character.
        assert_eq!(normalize("cafe\u{301}"), "caf\u{e9}");
    }

    #[test]
    fn normalize_is_idempotent_over_separator_mixes() {
        const PIECES: &[&str] = &["a", "Bc", " ", "_", "\t", "\n", "__", "\u{3000}", "e\u{301}", "-"];
        let mut level = vec![String::new()];
        let mut inputs = level.clone();
        for _ in 0..4 {
            level = level
                .iter()
                .flat_map(|prefix| PIECES.iter().map(move |p| format!("{prefix}{p}")))
                .collect();
            inputs.extend(level.iter().cloned());
        }
        for raw in &inputs {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
            assert!(!once.starts_with('_') && !once.ends_with('_'), "{raw:?} -> {once:?}");
        }
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in any::<String>()) {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalized_words_have_no_separator_runs(raw in "[a-zA-Z _\t]{0,32}") {
            let once = normalize(&raw);
            prop_assert!(!once.contains("__"));
            prop_assert!(!once.contains(char::is_whitespace));
        }
    }

    #[test]
    fn valid_words() {
        assert!(is_valid_word_or_empty(""));
        assert!(is_valid_word_or_empty("runs"));
        assert!(is_valid_word_or_empty("located_in"));
        assert!(is_valid_word_or_empty("located in"));
        assert!(is_valid_word_or_empty("x-ray"));
        assert!(is_valid_word_or_empty("R2D2"));
    }

    #[test]
    fn invalid_words() {
        assert!(!is_valid_word_or_empty("123abc"));
        assert!(!is_valid_word_or_empty("-dash"));
        assert!(!is_valid_word_or_empty("_under"));
        assert!(!is_valid_word_or_empty("semi;colon"));
        assert!(!is_valid_word_or_empty("caf\u{e9}"));
    }

    #[test]
    fn function_word_lookup() {
        assert!(is_function_word("the"));
        assert!(is_function_word("The"));
        assert!(is_function_word("every"));
        assert!(is_function_word("jeder"));
        assert!(!is_function_word("runs"));
        assert!(!is_function_word("the_beatles"));
    }

    #[test]
    fn compounds_starting_with_keywords_are_reserved() {
        assert!(is_reserved("every_man"));
        assert!(is_reserved("The_Beatles"));
        assert!(is_reserved("ninguna"));
        assert!(is_reserved("todas_las_cosas"));
        assert!(!is_reserved("New_York"));
        assert!(!is_reserved("fond_of"));
        assert!(!is_reserved("everyman"));
    }

    #[test]
    fn pretty_restores_spaces() {
        assert_eq!(pretty("located_in"), "located in");
        assert_eq!(pretty("man"), "man");
    }
}
