//! Rich diagnostic error types for the grammar subsystem.
//!
//! Every error variant carries `#[diagnostic(code(...), help(...))]` so
//! the wiki editor knows exactly what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use super::cat::Cat;

/// Errors produced by the multilingual grammar layer.
#[derive(Debug, Error, Diagnostic)]
pub enum GrammarError {
    #[error("could not parse \"{input}\" as a {language} sentence")]
    #[diagnostic(
        code(wikilex::grammar::parse_failed),
        help(
            "The text does not match any sentence pattern of the language, or uses \
             words that are not in the lexicon. Try simple sentences like \
             \"Every man is a human.\" or \"Mary likes John.\"."
        )
    )]
    ParseFailed { input: String, language: String },

    #[error("\"{input}\" has {readings} different readings in {language}")]
    #[diagnostic(
        code(wikilex::grammar::ambiguous),
        help(
            "Some lexicon words overlap so that the text can be read in more than one \
             way. Rename one of the overlapping words."
        )
    )]
    AmbiguousParse {
        input: String,
        language: String,
        readings: usize,
    },

    #[error("malformed serialized sentence \"{input}\": {message}")]
    #[diagnostic(
        code(wikilex::grammar::deserialize),
        help(
            "Serialized sentences look like `en (every 3 5)` or `en ?(instance 4 3)`: \
             a language code, an optional `?`, and a parenthesized head with element ids."
        )
    )]
    Deserialize { input: String, message: String },

    #[error("sentence refers to unknown element {id}")]
    #[diagnostic(
        code(wikilex::grammar::unresolved),
        help("The element was removed or never registered in this ontology.")
    )]
    UnresolvedElement { id: u64 },

    #[error("element {id} is a {actual}, but the sentence needs a {expected}")]
    #[diagnostic(
        code(wikilex::grammar::kind_mismatch),
        help(
            "Each sentence position accepts one kind of element: nouns for concepts, \
             proper names for individuals, verbs or transitive adjectives for relations."
        )
    )]
    KindMismatch {
        id: u64,
        expected: String,
        actual: String,
    },

    #[error("unsupported language: \"{language}\"")]
    #[diagnostic(
        code(wikilex::grammar::unsupported_language),
        help(
            "No grammar is registered for this language code. \
             Use `Engine::languages()` to list the visible languages."
        )
    )]
    UnsupportedLanguage { language: String },

    #[error("linearization failed for {cat:?} in \"{language}\": {message}")]
    #[diagnostic(
        code(wikilex::grammar::lin_failed),
        help(
            "The element has no word for the form this sentence needs. \
             Fill in the missing word form in the lexicon."
        )
    )]
    LinearizationFailed {
        cat: Cat,
        language: String,
        message: String,
    },
}

/// Result type for grammar operations.
pub type GrammarResult<T> = std::result::Result<T, GrammarError>;
