//! Lexical categories.
//!
//! Each [`Cat`] is one word form of an element as it appears in sentences.
//! Categories link the grammar to the element model: every category is
//! backed by one slot of one [`ElementKind`].

use serde::{Deserialize, Serialize};

use crate::element::{ElementKind, slot};

/// Lexical category of a surface word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Cat {
    /// Singular noun ("man").
    NounSg,
    /// Plural noun ("men").
    NounPl,
    /// Proper name ("Mary").
    ProperName,
    /// Finite verb, third person singular ("likes").
    VerbFinite,
    /// Bare infinitive ("like").
    VerbInf,
    /// Past participle ("liked").
    VerbPastPart,
    /// Transitive adjective ("located in").
    TrAdj,
}

impl Cat {
    pub const ALL: [Cat; 7] = [
        Cat::NounSg,
        Cat::NounPl,
        Cat::ProperName,
        Cat::VerbFinite,
        Cat::VerbInf,
        Cat::VerbPastPart,
        Cat::TrAdj,
    ];

    /// The element kind whose words carry this category.
    pub fn kind(self) -> ElementKind {
        match self {
            Cat::NounSg | Cat::NounPl => ElementKind::Concept,
            Cat::ProperName => ElementKind::Individual,
            Cat::VerbFinite | Cat::VerbInf | Cat::VerbPastPart => ElementKind::Relation,
            Cat::TrAdj => ElementKind::TransitiveAdjective,
        }
    }

    /// The slot of [`Cat::kind`] holding the word.
    pub fn slot(self) -> usize {
        match self {
            Cat::NounSg => slot::SINGULAR,
            Cat::NounPl => slot::PLURAL,
            Cat::ProperName => slot::NAME,
            Cat::VerbFinite => slot::THIRD_SINGULAR,
            Cat::VerbInf => slot::INFINITIVE,
            Cat::VerbPastPart => slot::PAST_PARTICIPLE,
            Cat::TrAdj => slot::ADJECTIVE,
        }
    }

    /// Categories carried by the words of `kind`.
    pub fn of_kind(kind: ElementKind) -> impl Iterator<Item = Cat> {
        Self::ALL.into_iter().filter(move |c| c.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_categories() {
        for kind in ElementKind::ALL {
            let cats: Vec<_> = Cat::of_kind(kind).collect();
            assert!(!cats.is_empty(), "{kind} has no category");
            for cat in cats {
                assert!(cat.slot() < kind.spec().slots.len());
            }
        }
    }

    #[test]
    fn verb_forms_map_to_relation_slots() {
        assert_eq!(Cat::VerbInf.kind(), ElementKind::Relation);
        assert_eq!(Cat::VerbInf.slot(), slot::INFINITIVE);
        assert_eq!(Cat::of_kind(ElementKind::Relation).count(), 3);
    }
}
