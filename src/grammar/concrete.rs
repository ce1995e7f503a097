//! The `ConcreteGrammar` trait: the interface every language implements.
//!
//! A concrete grammar defines both directions of the mapping:
//! - `linearize()`: abstract syntax → text
//! - `parse()`: text → abstract syntax
//!
//! Both directions read element words from a [`LexIndex`] built with the
//! grammar's own [`inflect`](ConcreteGrammar::inflect), so every language
//! sees the same ontology through its own morphology.

use crate::word;

use super::abs::SentenceTree;
use super::cat::Cat;
use super::error::GrammarResult;
use super::lexer::LexIndex;

/// A concrete grammar for one language.
///
/// Implementations must be `Send + Sync` so one instance can be shared by
/// every handler and request thread.
pub trait ConcreteGrammar: Send + Sync {
    /// Language code ("en", "de", ...). Unique within a [`Grammar`](super::Grammar).
    fn code(&self) -> &str;

    /// Display name of the language ("English", "Deutsch", ...).
    fn language_name(&self) -> &str;

    /// Surface form of a stored (normalized) word in category `cat`.
    fn inflect(&self, cat: Cat, word: &str) -> String {
        let _ = cat;
        word::pretty(word)
    }

    /// Render a sentence tree as text.
    fn linearize(&self, tree: &SentenceTree, question: bool, lex: &LexIndex)
    -> GrammarResult<String>;

    /// Parse text into a sentence tree and its question flag.
    fn parse(&self, input: &str, lex: &LexIndex) -> GrammarResult<(SentenceTree, bool)>;
}
