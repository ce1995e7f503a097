//! Language handlers: one concrete grammar bound to one ontology.
//!
//! A handler caches the [`LexIndex`] of its language together with the
//! ontology revision it was built from. Every parse or serialization first
//! compares revisions and rebuilds the index when the ontology has moved,
//! so a word change is visible to the very next call.

use std::sync::{Arc, RwLock};

use crate::element::OntologyElement;
use crate::ontology::Ontology;
use crate::sentence::Sentence;

use super::cat::Cat;
use super::concrete::ConcreteGrammar;
use super::error::GrammarResult;
use super::lexer::LexIndex;

/// Parses and renders sentences of one language against one ontology.
pub struct LanguageHandler {
    grammar: Arc<dyn ConcreteGrammar>,
    ontology: Arc<Ontology>,
    cache: RwLock<Option<Arc<LexIndex>>>,
}

impl LanguageHandler {
    pub fn new(grammar: Arc<dyn ConcreteGrammar>, ontology: Arc<Ontology>) -> Self {
        tracing::debug!(language = grammar.code(), "created language handler");
        Self {
            grammar,
            ontology,
            cache: RwLock::new(None),
        }
    }

    /// Language code.
    pub fn language(&self) -> &str {
        self.grammar.code()
    }

    /// Display name of the language.
    pub fn get_language_name(&self) -> &str {
        self.grammar.language_name()
    }

    /// Parse text of this language into a sentence.
    pub fn parse(&self, text: &str) -> GrammarResult<Sentence> {
        let lex = self.lexicon();
        let (tree, question) = self.grammar.parse(text, &lex)?;
        Ok(Sentence {
            tree,
            question,
            language: self.language().to_string(),
        })
    }

    /// Render a sentence in this language, whatever language it was written in.
    pub fn serialize(&self, sentence: &Sentence) -> GrammarResult<String> {
        let lex = self.lexicon();
        self.grammar
            .linearize(&sentence.tree, sentence.question, &lex)
    }

    /// Surface form of one word slot of an element in this language.
    ///
    /// Returns `None` for flag slots and unset words.
    pub fn word(&self, element: &OntologyElement, slot: usize) -> Option<String> {
        let cat = Cat::of_kind(element.kind()).find(|c| c.slot() == slot)?;
        let word = element.word(slot);
        (!word.is_empty()).then(|| self.grammar.inflect(cat, word))
    }

    /// The lexical index for the current ontology revision.
    pub fn lexicon(&self) -> Arc<LexIndex> {
        let current = self.ontology.revision();
        if let Some(index) = self
            .cache
            .read()
            .expect("handler cache lock poisoned")
            .as_ref()
            .filter(|i| i.revision() == current)
        {
            return Arc::clone(index);
        }
        self.refresh()
    }

    /// Rebuild the lexical index from the ontology unconditionally.
    pub fn refresh(&self) -> Arc<LexIndex> {
        let (revision, elements) = self.ontology.elements_with_revision();
        let index = Arc::new(LexIndex::build(self.grammar.as_ref(), revision, &elements));

        let mut slot = self.cache.write().expect("handler cache lock poisoned");
        if slot.as_ref().is_none_or(|cached| cached.revision() <= revision) {
            *slot = Some(Arc::clone(&index));
        }
        tracing::debug!(language = self.language(), revision, "refreshed lexical index");
        index
    }
}

impl std::fmt::Debug for LanguageHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageHandler")
            .field("language", &self.language())
            .field("ontology", &self.ontology.name())
            .finish()
    }
}
