//! Rich diagnostic error types for the wikilex engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so editors of the wiki know exactly what
//! went wrong and how to fix it. All of them are recoverable: a failed edit never
//! leaves the ontology half-changed.

use miette::Diagnostic;
use thiserror::Error;

pub use crate::grammar::error::{GrammarError, GrammarResult};

/// Top-level error type for the wikilex engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum WikiError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reason(#[from] ReasonError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

impl From<InvalidWordError> for WikiError {
    fn from(err: InvalidWordError) -> Self {
        WikiError::Lexicon(LexiconError::InvalidWord(err))
    }
}

// ---------------------------------------------------------------------------
// Word errors
// ---------------------------------------------------------------------------

/// A proposed word was rejected. Nothing was changed.
#[derive(Debug, Error, Diagnostic)]
pub enum InvalidWordError {
    #[error("no word defined: please specify the {slot}")]
    #[diagnostic(
        code(wikilex::word::empty),
        help("This word form is mandatory for the element kind. Enter a word before saving.")
    )]
    EmptyWord { slot: String },

    #[error(
        "invalid character in \"{word}\": only a-z, A-Z, 0-9, -, and spaces are allowed, \
         and the first character must be one of a-z A-Z"
    )]
    #[diagnostic(
        code(wikilex::word::invalid_character),
        help("Words must start with a letter. Digits, hyphens and spaces may follow.")
    )]
    InvalidCharacter { word: String },

    #[error("'{word}' is a predefined word and cannot be used here")]
    #[diagnostic(
        code(wikilex::word::reserved),
        help(
            "Function words such as \"every\", \"the\" or \"is\" belong to the controlled \
             language itself and cannot name an ontology element."
        )
    )]
    ReservedWord { word: String },

    #[error("the word '{word}' is already used; please use a different one")]
    #[diagnostic(
        code(wikilex::word::duplicate),
        help(
            "Every word form may name at most one element of the ontology. \
             The word is currently owned by element {owner}."
        )
    )]
    DuplicateWord { word: String, owner: u64 },

    #[error("malformed lexicon values for {kind}: {message}")]
    #[diagnostic(
        code(wikilex::word::slot_mismatch),
        help("Submit exactly one value per word slot, using words for word slots and flags for flag slots.")
    )]
    SlotMismatch { kind: String, message: String },
}

// ---------------------------------------------------------------------------
// Lexicon errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LexiconError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidWord(#[from] InvalidWordError),

    #[error("element {id} has been removed from the ontology")]
    #[diagnostic(
        code(wikilex::lexicon::unknown_element),
        help("Removed elements cannot be edited. Create a new element instead.")
    )]
    UnknownElement { id: u64 },

    #[error("element {id} is a {actual}, not a {expected}")]
    #[diagnostic(
        code(wikilex::lexicon::kind_mismatch),
        help("An element's kind is fixed at creation. Use the lexicon changer of its own kind.")
    )]
    KindMismatch {
        id: u64,
        expected: String,
        actual: String,
    },

    #[error("word number {word_number} is out of range for a {kind} ({slots} slot(s))")]
    #[diagnostic(
        code(wikilex::lexicon::word_number),
        help("The edited word number must refer to one of the element's slots.")
    )]
    WordNumberOutOfRange {
        kind: String,
        word_number: usize,
        slots: usize,
    },
}

/// Result type for lexicon operations.
pub type LexiconResult<T> = std::result::Result<T, LexiconError>;

// ---------------------------------------------------------------------------
// Ontology errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OntologyError {
    #[error("element {id} does not exist")]
    #[diagnostic(
        code(wikilex::ontology::unknown_element),
        help("The element was never registered or has been removed.")
    )]
    UnknownElement { id: u64 },

    #[error("element \"{word}\" is used by {sentence_count} sentence(s) and cannot be removed")]
    #[diagnostic(
        code(wikilex::ontology::element_in_use),
        help("Retract the sentences that mention the element first.")
    )]
    ElementInUse {
        id: u64,
        word: String,
        sentence_count: usize,
    },

    #[error("sentence {id} does not exist")]
    #[diagnostic(
        code(wikilex::ontology::unknown_sentence),
        help("The sentence was never asserted or has already been retracted.")
    )]
    UnknownSentence { id: u64 },

    #[error("element allocator exhausted: cannot allocate more than u64::MAX elements")]
    #[diagnostic(
        code(wikilex::ontology::exhausted),
        help("The element ID space is exhausted. Check for allocation loops.")
    )]
    AllocatorExhausted,
}

/// Result type for ontology operations.
pub type OntologyResult<T> = std::result::Result<T, OntologyError>;

// ---------------------------------------------------------------------------
// Reasoning errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ReasonError {
    #[error("reasoner \"{reasoner}\" is unavailable: {reason}")]
    #[diagnostic(
        code(wikilex::reason::unavailable),
        help(
            "Lexicon edits keep working while the reasoner is down. \
             Call `Engine::resync_reasoner()` once it is back."
        )
    )]
    Unavailable { reasoner: String, reason: String },

    #[error("reasoning exceeded its budget of {budget} steps")]
    #[diagnostic(
        code(wikilex::reason::budget_exceeded),
        help("Increase `reasoner.step_budget` in the engine configuration, or simplify the ontology.")
    )]
    BudgetExceeded { budget: usize },
}

/// Result type for reasoner operations.
pub type ReasonResult<T> = std::result::Result<T, ReasonError>;

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("unknown exporter: \"{name}\"")]
    #[diagnostic(
        code(wikilex::export::unknown),
        help("Use `Engine::exporters()` to list the registered exporters.")
    )]
    UnknownExporter { name: String },

    #[error("exporter \"{exporter}\" failed: {message}")]
    #[diagnostic(
        code(wikilex::export::render),
        help("The ontology snapshot could not be rendered in this format.")
    )]
    Render { exporter: String, message: String },
}

/// Result type for exporters.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(wikilex::engine::invalid_config),
        help("Check the EngineConfig fields. {message}")
    )]
    InvalidConfig { message: String },

    #[error("failed to read configuration: {path}")]
    #[diagnostic(
        code(wikilex::engine::config_read),
        help("Ensure the config file exists and is readable.")
    )]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {path}: {message}")]
    #[diagnostic(
        code(wikilex::engine::config_parse),
        help("Check the TOML syntax in the config file.")
    )]
    ConfigParse { path: String, message: String },

    #[error("failed to write configuration: {path}")]
    #[diagnostic(
        code(wikilex::engine::config_write),
        help("Ensure the directory exists and you have write permissions.")
    )]
    ConfigWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sentence would make the ontology inconsistent: \"{sentence}\"")]
    #[diagnostic(
        code(wikilex::engine::inconsistent),
        help("The sentence contradicts what the wiki already states. Nothing was added.")
    )]
    InconsistentSentence { sentence: String },

    #[error("questions cannot be asserted")]
    #[diagnostic(
        code(wikilex::engine::question),
        help("Ask questions with `Engine::answer()` instead.")
    )]
    QuestionNotAssertable,

    #[error("only questions can be answered")]
    #[diagnostic(
        code(wikilex::engine::not_a_question),
        help("Assert declarative sentences with `Engine::add_sentence()`.")
    )]
    NotAQuestion,

    #[error("ontology kept changing during {attempts} consistency check(s)")]
    #[diagnostic(
        code(wikilex::engine::conflict),
        help("Concurrent edits invalidated every snapshot. Retry the operation.")
    )]
    Conflict { attempts: usize },
}

/// Convenience alias for functions returning wikilex results.
pub type WikiResult<T> = std::result::Result<T, WikiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_word_converts_to_wiki_error() {
        let err = InvalidWordError::ReservedWord { word: "the".into() };
        let wiki: WikiError = err.into();
        assert!(matches!(
            wiki,
            WikiError::Lexicon(LexiconError::InvalidWord(InvalidWordError::ReservedWord { .. }))
        ));
    }

    #[test]
    fn grammar_result_is_reexported() {
        fn failing() -> GrammarResult<()> {
            Err(GrammarError::UnsupportedLanguage {
                language: "fr".into(),
            })
        }
        let wiki: WikiError = failing().unwrap_err().into();
        assert!(matches!(wiki, WikiError::Grammar(GrammarError::UnsupportedLanguage { .. })));
    }

    #[test]
    fn reason_error_converts_to_wiki_error() {
        let err = ReasonError::BudgetExceeded { budget: 10 };
        let wiki: WikiError = err.into();
        assert!(matches!(wiki, WikiError::Reason(ReasonError::BudgetExceeded { .. })));
    }

    #[test]
    fn messages_name_the_word() {
        let err = InvalidWordError::DuplicateWord {
            word: "located in".into(),
            owner: 7,
        };
        let msg = format!("{err}");
        assert!(msg.contains("'located in'"));
        assert!(msg.contains("already used"));

        let err = InvalidWordError::EmptyWord {
            slot: "transitive adjective".into(),
        };
        assert!(format!("{err}").contains("transitive adjective"));
    }
}
