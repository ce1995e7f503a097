//! Abstract syntax of wiki sentences.
//!
//! All concrete grammars linearize from, and parse into, the same
//! [`SentenceTree`]. The tree refers to ontology elements by id only, so
//! renaming an element never invalidates a stored sentence; the words are
//! looked up again at linearization time.

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementKind};
use crate::reason::Axiom;

use super::error::{GrammarError, GrammarResult};

/// Language-independent meaning of one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentenceTree {
    /// "Every man is a human."
    Subsumption { sub: ElementId, sup: ElementId },
    /// "No man is a woman."
    Disjointness { concept: ElementId, other: ElementId },
    /// "Mary is a woman."
    Instance {
        individual: ElementId,
        concept: ElementId,
    },
    /// "Mary is not a man."
    NegatedInstance {
        individual: ElementId,
        concept: ElementId,
    },
    /// "Mary likes John." / "Zurich is located in Switzerland."
    Relation {
        subject: ElementId,
        relation: ElementId,
        object: ElementId,
    },
}

/// Surface construction of a sentence. Relation sentences split by the
/// kind of their relation, since verbs and transitive adjectives read
/// differently in every language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Construct {
    Subsumption,
    Disjointness,
    Instance,
    NegatedInstance,
    VerbRelation,
    AdjectiveRelation,
}

impl SentenceTree {
    /// Head symbol of the storage form.
    pub fn head(&self) -> &'static str {
        match self {
            SentenceTree::Subsumption { .. } => "every",
            SentenceTree::Disjointness { .. } => "no",
            SentenceTree::Instance { .. } => "instance",
            SentenceTree::NegatedInstance { .. } => "not-instance",
            SentenceTree::Relation { .. } => "relation",
        }
    }

    /// Element arguments in storage order.
    pub fn elements(&self) -> Vec<ElementId> {
        match *self {
            SentenceTree::Subsumption { sub, sup } => vec![sub, sup],
            SentenceTree::Disjointness { concept, other } => vec![concept, other],
            SentenceTree::Instance {
                individual,
                concept,
            }
            | SentenceTree::NegatedInstance {
                individual,
                concept,
            } => vec![individual, concept],
            SentenceTree::Relation {
                subject,
                relation,
                object,
            } => vec![subject, relation, object],
        }
    }

    /// Rebuild a tree from its head symbol and arguments.
    ///
    /// Returns `None` for an unknown head or the wrong number of arguments.
    pub fn from_parts(head: &str, args: &[ElementId]) -> Option<Self> {
        let tree = match (head, args) {
            ("every", &[sub, sup]) => SentenceTree::Subsumption { sub, sup },
            ("no", &[concept, other]) => SentenceTree::Disjointness { concept, other },
            ("instance", &[individual, concept]) => SentenceTree::Instance {
                individual,
                concept,
            },
            ("not-instance", &[individual, concept]) => SentenceTree::NegatedInstance {
                individual,
                concept,
            },
            ("relation", &[subject, relation, object]) => SentenceTree::Relation {
                subject,
                relation,
                object,
            },
            _ => return None,
        };
        Some(tree)
    }

    /// Whether the sentence mentions `id`.
    pub fn references(&self, id: ElementId) -> bool {
        self.elements().contains(&id)
    }

    /// Check that every argument exists and has the kind its position needs.
    ///
    /// Returns the surface construct on success.
    pub fn validate<F>(&self, kind_of: F) -> GrammarResult<Construct>
    where
        F: Fn(ElementId) -> Option<ElementKind>,
    {
        let expect = |id: ElementId, allowed: &[ElementKind]| -> GrammarResult<ElementKind> {
            let actual = kind_of(id).ok_or(GrammarError::UnresolvedElement { id: id.get() })?;
            if allowed.contains(&actual) {
                Ok(actual)
            } else {
                Err(GrammarError::KindMismatch {
                    id: id.get(),
                    expected: allowed
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" or "),
                    actual: actual.to_string(),
                })
            }
        };

        const CONCEPT: &[ElementKind] = &[ElementKind::Concept];
        const INDIVIDUAL: &[ElementKind] = &[ElementKind::Individual];
        const RELATION: &[ElementKind] =
            &[ElementKind::Relation, ElementKind::TransitiveAdjective];

        match *self {
            SentenceTree::Subsumption { sub, sup } => {
                expect(sub, CONCEPT)?;
                expect(sup, CONCEPT)?;
                Ok(Construct::Subsumption)
            }
            SentenceTree::Disjointness { concept, other } => {
                expect(concept, CONCEPT)?;
                expect(other, CONCEPT)?;
                Ok(Construct::Disjointness)
            }
            SentenceTree::Instance {
                individual,
                concept,
            } => {
                expect(individual, INDIVIDUAL)?;
                expect(concept, CONCEPT)?;
                Ok(Construct::Instance)
            }
            SentenceTree::NegatedInstance {
                individual,
                concept,
            } => {
                expect(individual, INDIVIDUAL)?;
                expect(concept, CONCEPT)?;
                Ok(Construct::NegatedInstance)
            }
            SentenceTree::Relation {
                subject,
                relation,
                object,
            } => {
                expect(subject, INDIVIDUAL)?;
                let kind = expect(relation, RELATION)?;
                expect(object, INDIVIDUAL)?;
                Ok(match kind {
                    ElementKind::TransitiveAdjective => Construct::AdjectiveRelation,
                    _ => Construct::VerbRelation,
                })
            }
        }
    }

    /// The logical axiom stated by this sentence.
    pub fn to_axiom(&self) -> Axiom {
        match *self {
            SentenceTree::Subsumption { sub, sup } => Axiom::SubClassOf { sub, sup },
            SentenceTree::Disjointness { concept, other } => Axiom::DisjointClasses {
                first: concept,
                second: other,
            },
            SentenceTree::Instance {
                individual,
                concept,
            } => Axiom::ClassAssertion {
                individual,
                class: concept,
            },
            SentenceTree::NegatedInstance {
                individual,
                concept,
            } => Axiom::NegativeClassAssertion {
                individual,
                class: concept,
            },
            SentenceTree::Relation {
                subject,
                relation,
                object,
            } => Axiom::ObjectPropertyAssertion {
                subject,
                property: relation,
                object,
            },
        }
    }
}
