//! Lexicon changers: validated editing of element words.
//!
//! A [`LexiconChanger`] is a thin view over the static [`KindSpec`] of one
//! element kind. It describes the editable slots and saves new values in
//! two stages: a pure validation pass shared by all kinds, then the
//! uniqueness check and commit, which the ontology runs under its write
//! lock. A rejected save changes nothing.

use serde::Serialize;

use crate::element::{ElementKind, KindSpec, LexiconValue, OntologyElement, SlotForm};
use crate::error::{InvalidWordError, LexiconError, LexiconResult};
use crate::ontology::{Ontology, Revision};
use crate::word;

/// Read-only description of one editable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexiconDetail {
    pub label: &'static str,
    pub example: &'static str,
    pub mandatory: bool,
    pub value: LexiconValue,
}

/// Word editor for one element kind.
#[derive(Debug, Clone, Copy)]
pub struct LexiconChanger {
    spec: &'static KindSpec,
}

impl LexiconChanger {
    pub fn for_kind(kind: ElementKind) -> Self {
        Self { spec: kind.spec() }
    }

    pub fn kind(&self) -> ElementKind {
        self.spec.kind
    }

    pub fn title(&self) -> &'static str {
        self.spec.title
    }

    pub fn description(&self) -> &'static str {
        self.spec.description
    }

    /// Slot descriptors with the element's current values.
    pub fn get_details(&self, element: &OntologyElement) -> Vec<LexiconDetail> {
        self.spec
            .slots
            .iter()
            .zip(element.values())
            .map(|(slot, value)| LexiconDetail {
                label: slot.label,
                example: slot.example,
                mandatory: slot.mandatory,
                value: match value {
                    LexiconValue::Word(w) => LexiconValue::Word(word::pretty(w)),
                    flag => flag.clone(),
                },
            })
            .collect()
    }

    /// Validate `values` and commit them to `element` and the ontology.
    ///
    /// `word_number` is the slot the editor changed. On success `element`
    /// holds the committed values; on failure neither it nor the ontology
    /// changes.
    pub fn save(
        &self,
        ontology: &Ontology,
        element: &mut OntologyElement,
        word_number: usize,
        values: &[LexiconValue],
    ) -> LexiconResult<Revision> {
        if element.kind() != self.spec.kind {
            return Err(LexiconError::KindMismatch {
                id: element.id().get(),
                expected: self.spec.kind.to_string(),
                actual: element.kind().to_string(),
            });
        }
        if word_number >= self.spec.slots.len() {
            return Err(LexiconError::WordNumberOutOfRange {
                kind: self.spec.kind.to_string(),
                word_number,
                slots: self.spec.slots.len(),
            });
        }

        let normalized = validate_values(self.spec, values)?;
        let revision = ontology.commit(element.id(), self.spec.kind, normalized.clone())?;
        element.set_values(normalized);

        tracing::info!(
            element = %element.id(),
            kind = %self.spec.kind,
            word_number,
            word = element.word(word_number),
            revision,
            "saved lexicon entry"
        );
        Ok(revision)
    }
}

/// Normalize and check values against a kind's slots.
///
/// Rejects empty mandatory words, malformed words and words that are or
/// begin with a function word, in slot order. Returns the normalized values.
pub fn validate_values(
    spec: &KindSpec,
    values: &[LexiconValue],
) -> Result<Vec<LexiconValue>, InvalidWordError> {
    if values.len() != spec.slots.len() {
        return Err(InvalidWordError::SlotMismatch {
            kind: spec.kind.to_string(),
            message: format!("expected {} value(s), got {}", spec.slots.len(), values.len()),
        });
    }

    spec.slots
        .iter()
        .zip(values)
        .map(|(slot, value)| match (slot.form, value) {
            (SlotForm::Flag, LexiconValue::Flag(b)) => Ok(LexiconValue::Flag(*b)),
            (SlotForm::Word, LexiconValue::Word(raw)) => {
                let w = word::normalize(raw);
                if w.is_empty() {
                    if slot.mandatory {
                        return Err(InvalidWordError::EmptyWord {
                            slot: slot.label.to_string(),
                        });
                    }
                } else if !word::is_valid_word_or_empty(&w) {
                    return Err(InvalidWordError::InvalidCharacter { word: raw.clone() });
                } else if word::is_reserved(&w) {
                    return Err(InvalidWordError::ReservedWord {
                        word: word::pretty(&w),
                    });
                }
                Ok(LexiconValue::Word(w))
            }
            (SlotForm::Word, LexiconValue::Flag(_)) => Err(InvalidWordError::SlotMismatch {
                kind: spec.kind.to_string(),
                message: format!("slot \"{}\" takes a word, not a flag", slot.label),
            }),
            (SlotForm::Flag, LexiconValue::Word(_)) => Err(InvalidWordError::SlotMismatch {
                kind: spec.kind.to_string(),
                message: format!("slot \"{}\" takes a flag, not a word", slot.label),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::slot;

    fn ontology() -> Ontology {
        Ontology::new("test", "http://example.org/test")
    }

    fn save(
        onto: &Ontology,
        element: &mut OntologyElement,
        values: &[LexiconValue],
    ) -> LexiconResult<Revision> {
        LexiconChanger::for_kind(element.kind()).save(onto, element, 0, values)
    }

    #[test]
    fn transitive_adjective_saved_normalized() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::TransitiveAdjective).unwrap();
        save(&onto, &mut el, &["located in".into()]).unwrap();

        assert_eq!(el.word(slot::ADJECTIVE), "located_in");
        assert_eq!(el.pretty_word(slot::ADJECTIVE), "located in");
        assert_eq!(onto.lookup("located in"), Some(el.id()));
    }

    #[test]
    fn empty_mandatory_word_rejected() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::TransitiveAdjective).unwrap();
        let err = save(&onto, &mut el, &["   ".into()]).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::EmptyWord { ref slot }) if slot == "transitive adjective"
        ));
        assert!(onto.is_empty());
    }

    #[test]
    fn optional_slot_may_be_empty() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::Relation).unwrap();
        save(&onto, &mut el, &["likes".into(), "like".into(), "".into()]).unwrap();
        assert_eq!(el.word(slot::PAST_PARTICIPLE), "");
    }

    #[test]
    fn invalid_character_rejected() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::TransitiveAdjective).unwrap();
        let err = save(&onto, &mut el, &["123abc".into()]).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn function_word_rejected() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::Individual).unwrap();
        let err = save(&onto, &mut el, &["the".into(), false.into()]).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::ReservedWord { .. })
        ));
    }

    #[test]
    fn keyword_compounds_and_spanish_keywords_rejected() {
        let onto = ontology();
        let mut name = onto.allocate(ElementKind::Individual).unwrap();
        let err = save(&onto, &mut name, &["every man".into(), false.into()]).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::ReservedWord { ref word }) if word == "every man"
        ));

        let mut adj = onto.allocate(ElementKind::TransitiveAdjective).unwrap();
        for reserved in ["ninguna", "todas", "las"] {
            assert!(save(&onto, &mut adj, &[reserved.into()]).is_err(), "{reserved} accepted");
        }
        assert!(onto.is_empty());
    }

    #[test]
    fn duplicate_word_rejected_and_element_unchanged() {
        let onto = ontology();
        let mut first = onto.allocate(ElementKind::TransitiveAdjective).unwrap();
        save(&onto, &mut first, &["located in".into()]).unwrap();

        let mut second = onto.allocate(ElementKind::TransitiveAdjective).unwrap();
        save(&onto, &mut second, &["part of".into()]).unwrap();
        let err = save(&onto, &mut second, &["located_in".into()]).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::DuplicateWord { .. })
        ));
        assert_eq!(second.word(0), "part_of");
        assert_eq!(onto.lookup("part of"), Some(second.id()));
    }

    #[test]
    fn renaming_to_own_word_succeeds() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::TransitiveAdjective).unwrap();
        let rev = save(&onto, &mut el, &["located in".into()]).unwrap();
        assert_eq!(save(&onto, &mut el, &["located_in".into()]).unwrap(), rev);
    }

    #[test]
    fn slot_mismatches() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::Individual).unwrap();
        let err = save(&onto, &mut el, &["Mary".into()]).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::SlotMismatch { .. })
        ));
        let err = save(&onto, &mut el, &["Mary".into(), "yes".into()]).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidWord(InvalidWordError::SlotMismatch { .. })
        ));
    }

    #[test]
    fn wrong_changer_or_word_number() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::Concept).unwrap();
        let changer = LexiconChanger::for_kind(ElementKind::Individual);
        let err = changer
            .save(&onto, &mut el, 0, &["Mary".into(), false.into()])
            .unwrap_err();
        assert!(matches!(err, LexiconError::KindMismatch { .. }));

        let changer = LexiconChanger::for_kind(ElementKind::Concept);
        let err = changer
            .save(&onto, &mut el, 2, &["man".into(), "men".into()])
            .unwrap_err();
        assert!(matches!(err, LexiconError::WordNumberOutOfRange { .. }));
    }

    #[test]
    fn details_show_pretty_values() {
        let onto = ontology();
        let mut el = onto.allocate(ElementKind::TransitiveAdjective).unwrap();
        save(&onto, &mut el, &["fond of".into()]).unwrap();

        let changer = LexiconChanger::for_kind(ElementKind::TransitiveAdjective);
        assert_eq!(changer.title(), "Transitive Adjective");
        let details = changer.get_details(&el);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].label, "transitive adjective");
        assert!(details[0].example.contains("located in"));
        assert_eq!(details[0].value, LexiconValue::Word("fond of".into()));
    }
}
