//! Reasoning boundary.
//!
//! The engine never reasons itself: it hands an [`AxiomSet`] snapshot to a
//! [`Reasoner`] and commits only if the ontology has not moved since the
//! snapshot was taken. Any backend can sit behind the trait; the crate
//! ships [`SaturationReasoner`], a small class-hierarchy reasoner over
//! petgraph, and [`DisabledReasoner`] for deployments without one.

pub mod saturation;

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::error::{ReasonError, ReasonResult};
use crate::ontology::Revision;

pub use saturation::SaturationReasoner;

/// One logical statement, in OWL terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axiom {
    SubClassOf {
        sub: ElementId,
        sup: ElementId,
    },
    DisjointClasses {
        first: ElementId,
        second: ElementId,
    },
    ClassAssertion {
        individual: ElementId,
        class: ElementId,
    },
    NegativeClassAssertion {
        individual: ElementId,
        class: ElementId,
    },
    ObjectPropertyAssertion {
        subject: ElementId,
        property: ElementId,
        object: ElementId,
    },
}

/// The axioms of an ontology at one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxiomSet {
    pub revision: Revision,
    pub axioms: Vec<Axiom>,
}

impl AxiomSet {
    /// A copy with one more axiom, at the same revision.
    pub fn with(&self, axiom: Axiom) -> Self {
        let mut axioms = self.axioms.clone();
        axioms.push(axiom);
        Self {
            revision: self.revision,
            axioms,
        }
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }
}

/// A consistency-checking backend.
///
/// Calls receive an immutable snapshot and must not block on the ontology.
pub trait Reasoner: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the axioms have a model.
    fn check_consistency(&self, axioms: &AxiomSet) -> ReasonResult<bool>;

    /// Whether `axiom` follows from `axioms`.
    fn entails(&self, axioms: &AxiomSet, axiom: &Axiom) -> ReasonResult<bool>;
}

/// Stand-in used when reasoning is switched off.
///
/// Every call fails with [`ReasonError::Unavailable`], so the engine keeps
/// accepting sentences unchecked and reports the reasoner as out of sync.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledReasoner;

impl DisabledReasoner {
    fn unavailable(&self) -> ReasonError {
        ReasonError::Unavailable {
            reasoner: self.name().to_string(),
            reason: "reasoning is disabled in the engine configuration".to_string(),
        }
    }
}

impl Reasoner for DisabledReasoner {
    fn name(&self) -> &str {
        "disabled"
    }

    fn check_consistency(&self, _axioms: &AxiomSet) -> ReasonResult<bool> {
        Err(self.unavailable())
    }

    fn entails(&self, _axioms: &AxiomSet, _axiom: &Axiom) -> ReasonResult<bool> {
        Err(self.unavailable())
    }
}
