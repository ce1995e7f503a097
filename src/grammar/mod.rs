//! Multilingual grammar layer.
//!
//! The system follows an **abstract/concrete syntax split**: every sentence
//! has one language-independent [`SentenceTree`] that refers to ontology
//! elements by id, and each language is a [`ConcreteGrammar`] that
//! linearizes trees into text and parses text back into trees.
//!
//! ## Architecture
//!
//! ```text
//! Text ──→ tokenize ──→ PatternGrammar::parse ──→ SentenceTree ──→ Sentence
//!                             ↑                        │
//!                         LexIndex ←── Ontology    linearize
//!                      (per language,                  ↓
//!                       per revision)                 Text
//! ```
//!
//! ## Built-in languages
//!
//! - **en**: Attempto-style English
//! - **de**: German
//! - **es**: Spanish
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wikilex::grammar::{Grammar, LanguageHandler};
//! use wikilex::ontology::Ontology;
//!
//! let grammar = Grammar::new();
//! let ontology = Arc::new(Ontology::new("zoo", "http://example.org/zoo"));
//! let english = LanguageHandler::new(grammar.get("en").unwrap(), ontology);
//! let sentence = english.parse("Every lion is an animal.");
//! ```

pub mod abs;
pub mod cat;
pub mod concrete;
pub mod error;
pub mod handler;
pub mod lexer;
pub mod morpho;
pub mod pattern;

use std::sync::Arc;

pub use abs::{Construct, SentenceTree};
pub use cat::Cat;
pub use concrete::ConcreteGrammar;
pub use error::{GrammarError, GrammarResult};
pub use handler::LanguageHandler;
pub use lexer::LexIndex;
pub use pattern::PatternGrammar;

/// Registry of concrete grammars, in declaration order.
///
/// Ships with English, German and Spanish. Further languages can be
/// registered at runtime.
pub struct Grammar {
    grammars: Vec<Arc<dyn ConcreteGrammar>>,
}

impl Grammar {
    /// Create a registry with the built-in languages.
    pub fn new() -> Self {
        let mut grammar = Self::empty();
        grammar.register(PatternGrammar::english());
        grammar.register(PatternGrammar::german());
        grammar.register(PatternGrammar::spanish());
        grammar
    }

    /// Create a registry without any language.
    pub fn empty() -> Self {
        Self {
            grammars: Vec::new(),
        }
    }

    /// Register a grammar. Replaces an existing grammar with the same code,
    /// keeping its position.
    pub fn register(&mut self, grammar: impl ConcreteGrammar + 'static) {
        let grammar: Arc<dyn ConcreteGrammar> = Arc::new(grammar);
        match self.grammars.iter_mut().find(|g| g.code() == grammar.code()) {
            Some(existing) => *existing = grammar,
            None => self.grammars.push(grammar),
        }
    }

    /// Get a grammar by language code.
    pub fn get(&self, code: &str) -> GrammarResult<Arc<dyn ConcreteGrammar>> {
        self.grammars
            .iter()
            .find(|g| g.code() == code)
            .cloned()
            .ok_or_else(|| GrammarError::UnsupportedLanguage {
                language: code.to_string(),
            })
    }

    /// Declared language codes, in registration order.
    pub fn languages(&self) -> Vec<String> {
        self.grammars.iter().map(|g| g.code().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("languages", &self.languages())
            .finish()
    }
}
