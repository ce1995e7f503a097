//! Surface morphology the lexicon does not store.
//!
//! Editors enter every inflected form of an element (singular, plural,
//! finite verb, participle), but no articles and no sentence casing. The
//! English grammar derives "a"/"an" from the noun that follows it, and
//! every grammar capitalizes the sentence start; German also capitalizes
//! each word of a noun.

/// Noun prefixes whose first letter misleads the vowel test.
///
/// `true` means the word takes "an" (silent h), `false` means "a"
/// (a vowel letter pronounced as a consonant).
const ARTICLE_EXCEPTIONS: &[(&str, bool)] = &[
    ("heir", true),
    ("honest", true),
    ("honor", true),
    ("hour", true),
    ("euro", false),
    ("one", false),
    ("uni", false),
    ("use", false),
    ("util", false),
];

/// Indefinite article for an English noun.
///
/// Nouns are lexicon words, which always start with an ASCII letter.
pub fn article(noun: &str) -> &'static str {
    let lower = noun.trim().to_ascii_lowercase();
    let an = ARTICLE_EXCEPTIONS
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|&(_, an)| an)
        .unwrap_or_else(|| lower.starts_with(['a', 'e', 'i', 'o', 'u']));
    if an { "an" } else { "a" }
}

/// Uppercase the first character (sentence start, German nouns).
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Capitalize every space-separated word ("ice cream" → "Ice Cream").
pub fn capitalize_words(s: &str) -> String {
    s.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_selection() {
        assert_eq!(article("dog"), "a");
        assert_eq!(article("apple"), "an");
        assert_eq!(article("hour"), "an");
        assert_eq!(article("university"), "a");
        assert_eq!(article("European"), "a");
        assert_eq!(article("Elephant"), "an");
        assert_eq!(article("one-way street"), "a");
        assert_eq!(article("heirloom"), "an");
        assert_eq!(article("ice cream"), "an");
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("every man"), "Every man");
        assert_eq!(capitalize("ábc"), "Ábc");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn capitalize_each_word() {
        assert_eq!(capitalize_words("ice cream"), "Ice Cream");
        assert_eq!(capitalize_words("frau"), "Frau");
    }
}
