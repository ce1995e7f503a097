//! Lexer and per-language lexical index.
//!
//! [`tokenize`] splits sentence text into lowercase tokens, with
//! punctuation as separate tokens. A [`LexIndex`] holds the surface form of
//! every element word in one language and resolves token runs back to
//! elements, longest match first. Multi-word entries ("located in",
//! "New York") are ordinary token sequences in the index.

use std::collections::{HashMap, HashSet};

use crate::element::{ElementId, ElementKind, OntologyElement, slot};
use crate::ontology::Revision;

use super::cat::Cat;
use super::concrete::ConcreteGrammar;

const TRAILING_PUNCT: &[char] = &['.', '?', '!', ','];
const LEADING_PUNCT: &[char] = &['¿', '¡'];

/// Split text into lowercase tokens.
///
/// Sentence punctuation becomes its own token: `.`, `?`, `!` and `,` when
/// they trail a word, `¿` and `¡` when they lead one.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in input.split_whitespace() {
        let mut word = chunk;

        while let Some(c) = word.chars().next().filter(|c| LEADING_PUNCT.contains(c)) {
            tokens.push(c.to_string());
            word = &word[c.len_utf8()..];
        }

        let mut trailing = Vec::new();
        while let Some(c) = word.chars().next_back().filter(|c| TRAILING_PUNCT.contains(c)) {
            trailing.push(c.to_string());
            word = &word[..word.len() - c.len_utf8()];
        }

        if !word.is_empty() {
            tokens.push(word.to_lowercase());
        }
        tokens.extend(trailing.into_iter().rev());
    }
    tokens
}

/// Surface forms of all element words in one language, at one revision.
#[derive(Debug, Default)]
pub struct LexIndex {
    revision: Revision,
    surfaces: HashMap<(ElementId, Cat), String>,
    kinds: HashMap<ElementId, ElementKind>,
    definite: HashSet<ElementId>,
    entries: HashMap<Vec<String>, Vec<(ElementId, Cat)>>,
    max_tokens: usize,
}

impl LexIndex {
    /// Build the index for `grammar` from the registered elements.
    pub fn build(
        grammar: &dyn ConcreteGrammar,
        revision: Revision,
        elements: &[OntologyElement],
    ) -> Self {
        let mut index = LexIndex {
            revision,
            ..Default::default()
        };

        for element in elements {
            let id = element.id();
            index.kinds.insert(id, element.kind());
            if element.kind() == ElementKind::Individual && element.flag(slot::DEFINITE) {
                index.definite.insert(id);
            }

            for cat in Cat::of_kind(element.kind()) {
                let word = element.word(cat.slot());
                if word.is_empty() {
                    continue;
                }
                let surface = grammar.inflect(cat, word);
                let key = tokenize(&surface);
                if key.is_empty() {
                    continue;
                }
                index.max_tokens = index.max_tokens.max(key.len());
                index.entries.entry(key).or_default().push((id, cat));
                index.surfaces.insert((id, cat), surface);
            }
        }

        tracing::trace!(
            language = grammar.code(),
            revision,
            entries = index.entries.len(),
            "built lexical index"
        );
        index
    }

    /// Revision of the ontology this index was built from.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Surface form of an element word, if the element has one for `cat`.
    pub fn surface(&self, id: ElementId, cat: Cat) -> Option<&str> {
        self.surfaces.get(&(id, cat)).map(String::as_str)
    }

    pub fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        self.kinds.get(&id).copied()
    }

    /// Whether an individual is named with "the" ("the Nile").
    pub fn is_definite(&self, id: ElementId) -> bool {
        self.definite.contains(&id)
    }

    /// Entries of category `cat` starting at `tokens[pos]`.
    ///
    /// Returns `(element, token count)` pairs, longest match first.
    pub fn matches_at(&self, tokens: &[String], pos: usize, cat: Cat) -> Vec<(ElementId, usize)> {
        let available = tokens.len().saturating_sub(pos);
        let mut found = Vec::new();
        for len in (1..=self.max_tokens.min(available)).rev() {
            if let Some(candidates) = self.entries.get(&tokens[pos..pos + len]) {
                found.extend(
                    candidates
                        .iter()
                        .filter(|(_, c)| *c == cat)
                        .map(|(id, _)| (*id, len)),
                );
            }
        }
        found
    }

    /// Number of distinct surface token sequences.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::pattern::PatternGrammar;

    fn element(raw: u64, kind: ElementKind, values: Vec<crate::element::LexiconValue>) -> OntologyElement {
        let mut el = OntologyElement::new(ElementId::new(raw).unwrap(), kind);
        el.set_values(values);
        el
    }

    #[test]
    fn tokenize_splits_punctuation() {
        assert_eq!(tokenize("Every man is a human."), ["every", "man", "is", "a", "human", "."]);
        assert_eq!(tokenize("¿Es Juan un hombre?"), ["¿", "es", "juan", "un", "hombre", "?"]);
        assert_eq!(tokenize("  "), Vec::<String>::new());
        assert_eq!(tokenize("x-ray, ok"), ["x-ray", ",", "ok"]);
    }

    #[test]
    fn longest_match_first() {
        let grammar = PatternGrammar::english();
        let elements = vec![
            element(1, ElementKind::Individual, vec!["New".into(), false.into()]),
            element(2, ElementKind::Individual, vec!["New_York".into(), false.into()]),
        ];
        let index = LexIndex::build(&grammar, 7, &elements);
        assert_eq!(index.revision(), 7);

        let tokens = tokenize("New York is a city");
        let found = index.matches_at(&tokens, 0, Cat::ProperName);
        assert_eq!(found[0], (ElementId::new(2).unwrap(), 2));
        assert_eq!(found[1], (ElementId::new(1).unwrap(), 1));
        assert!(index.matches_at(&tokens, 0, Cat::NounSg).is_empty());
    }

    #[test]
    fn index_records_forms_and_flags() {
        let grammar = PatternGrammar::english();
        let elements = vec![
            element(1, ElementKind::Concept, vec!["man".into(), "men".into()]),
            element(2, ElementKind::Individual, vec!["Nile".into(), true.into()]),
            element(
                3,
                ElementKind::Relation,
                vec!["likes".into(), "like".into(), "".into()],
            ),
        ];
        let index = LexIndex::build(&grammar, 1, &elements);
        let man = ElementId::new(1).unwrap();
        let nile = ElementId::new(2).unwrap();
        let likes = ElementId::new(3).unwrap();

        assert_eq!(index.surface(man, Cat::NounPl), Some("men"));
        assert!(index.is_definite(nile));
        assert_eq!(index.surface(likes, Cat::VerbPastPart), None);
        assert_eq!(index.kind_of(likes), Some(ElementKind::Relation));
    }
}
