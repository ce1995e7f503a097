//! The ontology: registry of elements, their words, and asserted sentences.
//!
//! All mutable state sits behind one `RwLock`. The word index maps every
//! normalized word form of every registered element to its owner, ignoring
//! case since sentences are matched case-insensitively, and the
//! uniqueness check runs under the same write guard as the commit, so two
//! concurrent saves of the same word can never both succeed. Every
//! successful change bumps the [`Revision`], which language handlers and
//! the engine use to detect stale caches and stale reasoner verdicts.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use serde::Serialize;

use crate::element::{ElementAllocator, ElementId, ElementKind, LexiconValue, OntologyElement};
use crate::error::{
    InvalidWordError, LexiconError, LexiconResult, OntologyError, OntologyResult,
};
use crate::grammar::abs::Construct;
use crate::grammar::error::GrammarResult;
use crate::reason::AxiomSet;
use crate::sentence::{Sentence, SentenceId};
use crate::word;

/// Monotonic change counter of an ontology.
pub type Revision = u64;

/// Result of a conditional sentence commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { id: SentenceId, revision: Revision },
    /// The ontology moved past the expected revision; nothing was stored.
    Stale { current: Revision },
}

/// Immutable copy of an ontology at one revision.
#[derive(Debug, Clone, Serialize)]
pub struct OntologySnapshot {
    pub name: String,
    pub base_iri: String,
    pub revision: Revision,
    /// Registered elements, ordered by id.
    pub elements: Vec<OntologyElement>,
    /// Asserted sentences, ordered by id.
    pub sentences: Vec<(SentenceId, Sentence)>,
}

impl OntologySnapshot {
    pub fn element(&self, id: ElementId) -> Option<&OntologyElement> {
        self.elements
            .binary_search_by_key(&id, OntologyElement::id)
            .ok()
            .map(|i| &self.elements[i])
    }
}

#[derive(Debug)]
struct OntologyState {
    elements: HashMap<ElementId, OntologyElement>,
    /// Keyed by [`word_key`].
    words: HashMap<String, ElementId>,
    sentences: BTreeMap<SentenceId, Sentence>,
    /// Ids of removed elements. Each allocated id is removed at most once and
    /// the allocator never hands it out again, so this is bounded by the
    /// number of allocated ids.
    removed: HashSet<ElementId>,
    next_sentence: SentenceId,
    revision: Revision,
}

/// Identity of a normalized word in the uniqueness index.
fn word_key(word: &str) -> String {
    word.to_lowercase()
}

impl OntologyState {
    fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        self.elements.get(&id).map(OntologyElement::kind)
    }
}

/// Registry of all elements and sentences of one wiki.
#[derive(Debug)]
pub struct Ontology {
    name: String,
    base_iri: String,
    allocator: ElementAllocator,
    state: RwLock<OntologyState>,
}

impl Ontology {
    /// Create an empty ontology.
    pub fn new(name: impl Into<String>, base_iri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_iri: base_iri.into(),
            allocator: ElementAllocator::new(),
            state: RwLock::new(OntologyState {
                elements: HashMap::new(),
                words: HashMap::new(),
                sentences: BTreeMap::new(),
                removed: HashSet::new(),
                next_sentence: SentenceId::FIRST,
                revision: 0,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_iri(&self) -> &str {
        &self.base_iri
    }

    /// Canonical form of a raw word. See [`word::normalize`].
    pub fn normalize(raw: &str) -> String {
        word::normalize(raw)
    }

    /// See [`word::is_valid_word_or_empty`].
    pub fn is_valid_word_or_empty(s: &str) -> bool {
        word::is_valid_word_or_empty(s)
    }

    /// Create a fresh, unregistered element of `kind`.
    ///
    /// The element joins the ontology on its first successful save.
    pub fn allocate(&self, kind: ElementKind) -> OntologyResult<OntologyElement> {
        let id = self.allocator.next_id()?;
        Ok(OntologyElement::new(id, kind))
    }

    /// Current state of a registered element.
    pub fn get(&self, id: ElementId) -> Option<OntologyElement> {
        self.read().elements.get(&id).cloned()
    }

    pub fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        self.read().kind_of(id)
    }

    /// The element owning a word (raw or normalized, in any case).
    pub fn lookup(&self, raw_word: &str) -> Option<ElementId> {
        let key = word_key(&word::normalize(raw_word));
        self.read().words.get(&key).copied()
    }

    /// All registered elements, ordered by id.
    pub fn elements(&self) -> Vec<OntologyElement> {
        self.elements_with_revision().1
    }

    /// All registered elements together with the revision they were read at.
    pub fn elements_with_revision(&self) -> (Revision, Vec<OntologyElement>) {
        let state = self.read();
        let mut elements: Vec<_> = state.elements.values().cloned().collect();
        elements.sort_by_key(OntologyElement::id);
        (state.revision, elements)
    }

    pub fn revision(&self) -> Revision {
        self.read().revision
    }

    /// Number of registered elements.
    pub fn len(&self) -> usize {
        self.read().elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().elements.is_empty()
    }

    /// Replace the word slots of an element, checking word uniqueness.
    ///
    /// Values must already be normalized and validated. Registers the
    /// element if it is new. A commit that changes nothing succeeds without
    /// bumping the revision.
    pub fn commit(
        &self,
        id: ElementId,
        kind: ElementKind,
        values: Vec<LexiconValue>,
    ) -> LexiconResult<Revision> {
        let mut state = self.write();

        if state.removed.contains(&id) {
            return Err(LexiconError::UnknownElement { id: id.get() });
        }
        if let Some(actual) = state.kind_of(id).filter(|k| *k != kind) {
            return Err(LexiconError::KindMismatch {
                id: id.get(),
                expected: kind.to_string(),
                actual: actual.to_string(),
            });
        }

        for value in &values {
            let Some(w) = value.as_word().filter(|w| !w.is_empty()) else {
                continue;
            };
            if let Some(&owner) = state.words.get(&word_key(w)) {
                if owner != id {
                    return Err(InvalidWordError::DuplicateWord {
                        word: word::pretty(w),
                        owner: owner.get(),
                    }
                    .into());
                }
            }
        }

        if state
            .elements
            .get(&id)
            .is_some_and(|existing| existing.values() == values.as_slice())
        {
            return Ok(state.revision);
        }

        let mut element = match state.elements.remove(&id) {
            Some(old) => {
                for w in old.words() {
                    state.words.remove(&word_key(w));
                }
                old
            }
            None => OntologyElement::new(id, kind),
        };
        element.set_values(values);
        for w in element.words() {
            state.words.insert(word_key(w), id);
        }
        state.elements.insert(id, element);
        state.revision += 1;

        tracing::debug!(element = %id, %kind, revision = state.revision, "committed lexicon entry");
        Ok(state.revision)
    }

    /// Remove an element that no asserted sentence mentions.
    pub fn remove_element(&self, id: ElementId) -> OntologyResult<OntologyElement> {
        let mut state = self.write();
        let Some(element) = state.elements.get(&id) else {
            return Err(OntologyError::UnknownElement { id: id.get() });
        };

        let sentence_count = state.sentences.values().filter(|s| s.references(id)).count();
        if sentence_count > 0 {
            return Err(OntologyError::ElementInUse {
                id: id.get(),
                word: element.pretty_word(0),
                sentence_count,
            });
        }

        let Some(element) = state.elements.remove(&id) else {
            return Err(OntologyError::UnknownElement { id: id.get() });
        };
        for w in element.words() {
            state.words.remove(&word_key(w));
        }
        state.removed.insert(id);
        state.revision += 1;

        tracing::debug!(element = %id, revision = state.revision, "removed element");
        Ok(element)
    }

    /// Store a sentence if the ontology is still at `expected`.
    ///
    /// `None` skips the revision check. The sentence's elements are checked
    /// against the current state under the write guard.
    pub fn add_sentence_if(
        &self,
        sentence: Sentence,
        expected: Option<Revision>,
    ) -> GrammarResult<CommitOutcome> {
        let mut state = self.write();
        if let Some(expected) = expected {
            if expected != state.revision {
                return Ok(CommitOutcome::Stale {
                    current: state.revision,
                });
            }
        }

        sentence.tree.validate(|id| state.kind_of(id))?;

        let id = state.next_sentence;
        state.next_sentence = id.succ();
        state.sentences.insert(id, sentence);
        state.revision += 1;

        tracing::debug!(sentence = %id, revision = state.revision, "asserted sentence");
        Ok(CommitOutcome::Committed {
            id,
            revision: state.revision,
        })
    }

    /// Check a sentence against the current elements without storing it.
    pub fn validate_sentence(&self, sentence: &Sentence) -> GrammarResult<Construct> {
        let state = self.read();
        sentence.tree.validate(|id| state.kind_of(id))
    }

    /// Remove an asserted sentence.
    pub fn retract_sentence(&self, id: SentenceId) -> OntologyResult<Sentence> {
        let mut state = self.write();
        let sentence = state
            .sentences
            .remove(&id)
            .ok_or(OntologyError::UnknownSentence { id: id.get() })?;
        state.revision += 1;
        tracing::debug!(sentence = %id, revision = state.revision, "retracted sentence");
        Ok(sentence)
    }

    pub fn sentence(&self, id: SentenceId) -> Option<Sentence> {
        self.read().sentences.get(&id).cloned()
    }

    /// All asserted sentences, ordered by id.
    pub fn sentences(&self) -> Vec<(SentenceId, Sentence)> {
        self.read()
            .sentences
            .iter()
            .map(|(id, s)| (*id, s.clone()))
            .collect()
    }

    /// Logical content of the asserted sentences at the current revision.
    pub fn axioms(&self) -> AxiomSet {
        let state = self.read();
        AxiomSet {
            revision: state.revision,
            axioms: state
                .sentences
                .values()
                .filter(|s| !s.question)
                .map(|s| s.tree.to_axiom())
                .collect(),
        }
    }

    /// Consistent copy of the whole ontology.
    pub fn snapshot(&self) -> OntologySnapshot {
        let state = self.read();
        let mut elements: Vec<_> = state.elements.values().cloned().collect();
        elements.sort_by_key(OntologyElement::id);
        OntologySnapshot {
            name: self.name.clone(),
            base_iri: self.base_iri.clone(),
            revision: state.revision,
            elements,
            sentences: state
                .sentences
                .iter()
                .map(|(id, s)| (*id, s.clone()))
                .collect(),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, OntologyState> {
        self.state.read().expect("ontology lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, OntologyState> {
        self.state.write().expect("ontology lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::abs::SentenceTree;
    use crate::grammar::error::GrammarError;

    fn concept(onto: &Ontology, sg: &str, pl: &str) -> ElementId {
        let el = onto.allocate(ElementKind::Concept).unwrap();
        onto.commit(el.id(), ElementKind::Concept, vec![sg.into(), pl.into()])
            .unwrap();
        el.id()
    }

    #[test]
    fn commit_registers_and_indexes_words() {
        let onto = Ontology::new("test", "http://example.org/test");
        assert!(onto.is_empty());
        let man = concept(&onto, "man", "men");

        assert_eq!(onto.len(), 1);
        assert_eq!(onto.lookup("men"), Some(man));
        assert_eq!(onto.kind_of(man), Some(ElementKind::Concept));
        assert_eq!(onto.revision(), 1);
    }

    #[test]
    fn duplicate_word_rejected_without_change() {
        let onto = Ontology::new("test", "http://example.org/test");
        let man = concept(&onto, "man", "men");
        let other = onto.allocate(ElementKind::Concept).unwrap();

        let err = onto
            .commit(other.id(), ElementKind::Concept, vec!["human".into(), "men".into()])
            .unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::DuplicateWord { owner, .. }) if owner == man.get()
        ));
        assert_eq!(onto.lookup("human"), None);
        assert_eq!(onto.revision(), 1);
    }

    #[test]
    fn words_differing_only_in_case_collide() {
        let onto = Ontology::new("test", "http://example.org/test");
        let turkey = onto.allocate(ElementKind::Individual).unwrap();
        onto.commit(turkey.id(), ElementKind::Individual, vec!["Turkey".into(), false.into()])
            .unwrap();

        let bird = onto.allocate(ElementKind::Concept).unwrap();
        let err = onto
            .commit(bird.id(), ElementKind::Concept, vec!["turkey".into(), "turkeys".into()])
            .unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::DuplicateWord { owner, .. }) if owner == turkey.id().get()
        ));
        assert_eq!(onto.lookup("TURKEY"), Some(turkey.id()));
        assert_eq!(onto.lookup("turkeys"), None);

        // The owner may change the case of its own word.
        onto.commit(turkey.id(), ElementKind::Individual, vec!["turkey".into(), false.into()])
            .unwrap();
        assert_eq!(onto.get(turkey.id()).unwrap().word(0), "turkey");
        assert_eq!(onto.lookup("Turkey"), Some(turkey.id()));
    }

    #[test]
    fn removed_ids_are_never_reallocated() {
        let onto = Ontology::new("test", "http://example.org/test");
        let man = concept(&onto, "man", "men");
        onto.remove_element(man).unwrap();
        assert!(matches!(
            onto.remove_element(man),
            Err(OntologyError::UnknownElement { .. })
        ));
        let fresh = onto.allocate(ElementKind::Concept).unwrap();
        assert!(fresh.id() > man);
    }

    #[test]
    fn renaming_frees_old_words() {
        let onto = Ontology::new("test", "http://example.org/test");
        let man = concept(&onto, "man", "men");
        onto.commit(man, ElementKind::Concept, vec!["person".into(), "persons".into()])
            .unwrap();

        assert_eq!(onto.lookup("man"), None);
        assert_eq!(onto.lookup("person"), Some(man));
        let again = concept(&onto, "man", "men");
        assert_ne!(again, man);
    }

    #[test]
    fn unchanged_commit_keeps_revision() {
        let onto = Ontology::new("test", "http://example.org/test");
        let man = concept(&onto, "man", "men");
        let rev = onto
            .commit(man, ElementKind::Concept, vec!["man".into(), "men".into()])
            .unwrap();
        assert_eq!(rev, 1);
    }

    #[test]
    fn kind_cannot_change() {
        let onto = Ontology::new("test", "http://example.org/test");
        let man = concept(&onto, "man", "men");
        let err = onto
            .commit(man, ElementKind::Individual, vec!["Bob".into(), false.into()])
            .unwrap_err();
        assert!(matches!(err, LexiconError::KindMismatch { .. }));
    }

    #[test]
    fn referenced_element_cannot_be_removed() {
        let onto = Ontology::new("test", "http://example.org/test");
        let man = concept(&onto, "man", "men");
        let human = concept(&onto, "human", "humans");
        let tree = SentenceTree::Subsumption { sub: man, sup: human };
        let CommitOutcome::Committed { id, .. } = onto
            .add_sentence_if(Sentence::statement(tree, "en"), None)
            .unwrap()
        else {
            panic!("expected commit");
        };

        let err = onto.remove_element(man).unwrap_err();
        assert!(matches!(err, OntologyError::ElementInUse { sentence_count: 1, .. }));

        onto.retract_sentence(id).unwrap();
        onto.remove_element(man).unwrap();
        assert_eq!(onto.lookup("man"), None);

        let err = onto
            .commit(man, ElementKind::Concept, vec!["man".into(), "men".into()])
            .unwrap_err();
        assert!(matches!(err, LexiconError::UnknownElement { .. }));
    }

    #[test]
    fn stale_revision_is_not_committed() {
        let onto = Ontology::new("test", "http://example.org/test");
        let man = concept(&onto, "man", "men");
        let human = concept(&onto, "human", "humans");
        let tree = SentenceTree::Subsumption { sub: man, sup: human };

        let outcome = onto
            .add_sentence_if(Sentence::statement(tree, "en"), Some(0))
            .unwrap();
        assert_eq!(outcome, CommitOutcome::Stale { current: 2 });
        assert!(onto.sentences().is_empty());
    }

    #[test]
    fn ill_typed_sentence_rejected() {
        let onto = Ontology::new("test", "http://example.org/test");
        let man = concept(&onto, "man", "men");
        let tree = SentenceTree::Instance {
            individual: man,
            concept: man,
        };
        let err = onto
            .add_sentence_if(Sentence::statement(tree, "en"), None)
            .unwrap_err();
        assert!(matches!(err, GrammarError::KindMismatch { .. }));
    }

    #[test]
    fn snapshot_is_ordered() {
        let onto = Ontology::new("test", "http://example.org/test");
        let a = concept(&onto, "man", "men");
        let b = concept(&onto, "woman", "women");
        let snap = onto.snapshot();
        assert_eq!(snap.elements.len(), 2);
        assert_eq!(snap.elements[0].id(), a);
        assert_eq!(snap.element(b).unwrap().word(0), "woman");
        assert_eq!(snap.revision, 2);
    }
}
