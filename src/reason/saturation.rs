//! Built-in reasoner: class hierarchy saturation.
//!
//! Builds the subclass graph with petgraph, closes it by depth-first
//! search, and derives the types of every individual. The ontology is
//! inconsistent when an individual falls into two disjoint classes or into
//! a class it is asserted not to belong to. An inconsistent ontology
//! entails everything.
//!
//! Every visited node and every compared class pair costs one step; once
//! the budget is spent the call fails with
//! [`ReasonError::BudgetExceeded`](crate::error::ReasonError::BudgetExceeded).

use std::cell::Cell;
use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;

use crate::element::ElementId;
use crate::error::{ReasonError, ReasonResult};

use super::{Axiom, AxiomSet, Reasoner};

/// Default number of reasoning steps per call.
pub const DEFAULT_STEP_BUDGET: usize = 100_000;

/// Reasoner over subclass, disjointness and (negative) class assertions.
#[derive(Debug, Clone)]
pub struct SaturationReasoner {
    step_budget: usize,
}

impl SaturationReasoner {
    pub fn new(step_budget: usize) -> Self {
        Self { step_budget }
    }

    pub fn step_budget(&self) -> usize {
        self.step_budget
    }
}

impl Default for SaturationReasoner {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_BUDGET)
    }
}

struct Meter {
    budget: usize,
    used: Cell<usize>,
}

impl Meter {
    fn tick(&self) -> ReasonResult<()> {
        let used = self.used.get() + 1;
        if used > self.budget {
            return Err(ReasonError::BudgetExceeded {
                budget: self.budget,
            });
        }
        self.used.set(used);
        Ok(())
    }
}

/// Saturated view of one axiom set.
struct Closure {
    supers: HashMap<ElementId, BTreeSet<ElementId>>,
    types: HashMap<ElementId, BTreeSet<ElementId>>,
    disjoint: HashSet<(ElementId, ElementId)>,
    negative: HashSet<(ElementId, ElementId)>,
    relations: HashSet<(ElementId, ElementId, ElementId)>,
}

impl Closure {
    fn build(axioms: &AxiomSet, meter: &Meter) -> ReasonResult<Self> {
        let mut hierarchy: DiGraphMap<ElementId, ()> = DiGraphMap::new();
        let mut asserted: HashMap<ElementId, Vec<ElementId>> = HashMap::new();
        let mut disjoint = HashSet::new();
        let mut negative = HashSet::new();
        let mut relations = HashSet::new();

        for axiom in &axioms.axioms {
            match *axiom {
                Axiom::SubClassOf { sub, sup } => {
                    hierarchy.add_edge(sub, sup, ());
                }
                Axiom::DisjointClasses { first, second } => {
                    hierarchy.add_node(first);
                    hierarchy.add_node(second);
                    disjoint.insert((first, second));
                    disjoint.insert((second, first));
                }
                Axiom::ClassAssertion { individual, class } => {
                    hierarchy.add_node(class);
                    asserted.entry(individual).or_default().push(class);
                }
                Axiom::NegativeClassAssertion { individual, class } => {
                    hierarchy.add_node(class);
                    negative.insert((individual, class));
                }
                Axiom::ObjectPropertyAssertion {
                    subject,
                    property,
                    object,
                } => {
                    relations.insert((subject, property, object));
                }
            }
        }

        let mut supers = HashMap::new();
        for class in hierarchy.nodes() {
            let mut reachable = BTreeSet::new();
            let mut dfs = Dfs::new(&hierarchy, class);
            while let Some(next) = dfs.next(&hierarchy) {
                meter.tick()?;
                reachable.insert(next);
            }
            supers.insert(class, reachable);
        }

        let mut types = HashMap::new();
        for (individual, classes) in asserted {
            let mut all = BTreeSet::new();
            for class in classes {
                if let Some(s) = supers.get(&class) {
                    all.extend(s.iter().copied());
                }
            }
            types.insert(individual, all);
        }

        Ok(Self {
            supers,
            types,
            disjoint,
            negative,
            relations,
        })
    }

    fn supers_of(&self, class: ElementId) -> BTreeSet<ElementId> {
        self.supers
            .get(&class)
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([class]))
    }

    /// Whether some member of `left` is disjoint with some member of `right`.
    fn clash(
        &self,
        left: &BTreeSet<ElementId>,
        right: &BTreeSet<ElementId>,
        meter: &Meter,
    ) -> ReasonResult<bool> {
        for &a in left {
            for &b in right {
                meter.tick()?;
                if self.disjoint.contains(&(a, b)) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn consistent(&self, meter: &Meter) -> ReasonResult<bool> {
        for (individual, types) in &self.types {
            if self.clash(types, types, meter)? {
                tracing::debug!(%individual, "individual falls into disjoint classes");
                return Ok(false);
            }
        }
        for &(individual, class) in &self.negative {
            meter.tick()?;
            if self.types.get(&individual).is_some_and(|t| t.contains(&class)) {
                tracing::debug!(%individual, %class, "negative class assertion violated");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn entails(&self, axiom: &Axiom, meter: &Meter) -> ReasonResult<bool> {
        match *axiom {
            Axiom::SubClassOf { sub, sup } => {
                let supers = self.supers_of(sub);
                // An unsatisfiable class is a subclass of everything.
                Ok(supers.contains(&sup) || self.clash(&supers, &supers, meter)?)
            }
            Axiom::DisjointClasses { first, second } => {
                self.clash(&self.supers_of(first), &self.supers_of(second), meter)
            }
            Axiom::ClassAssertion { individual, class } => Ok(self
                .types
                .get(&individual)
                .is_some_and(|t| t.contains(&class))),
            Axiom::NegativeClassAssertion { individual, class } => {
                let supers = self.supers_of(class);
                for &(negated_for, negated) in &self.negative {
                    meter.tick()?;
                    if negated_for == individual && supers.contains(&negated) {
                        return Ok(true);
                    }
                }
                match self.types.get(&individual) {
                    Some(types) => self.clash(types, &supers, meter),
                    None => Ok(false),
                }
            }
            Axiom::ObjectPropertyAssertion {
                subject,
                property,
                object,
            } => Ok(self.relations.contains(&(subject, property, object))),
        }
    }
}

impl Reasoner for SaturationReasoner {
    fn name(&self) -> &str {
        "saturation"
    }

    fn check_consistency(&self, axioms: &AxiomSet) -> ReasonResult<bool> {
        let meter = Meter {
            budget: self.step_budget,
            used: Cell::new(0),
        };
        let closure = Closure::build(axioms, &meter)?;
        let consistent = closure.consistent(&meter)?;
        tracing::debug!(
            revision = axioms.revision,
            axioms = axioms.len(),
            steps = meter.used.get(),
            consistent,
            "checked consistency"
        );
        Ok(consistent)
    }

    fn entails(&self, axioms: &AxiomSet, axiom: &Axiom) -> ReasonResult<bool> {
        let meter = Meter {
            budget: self.step_budget,
            used: Cell::new(0),
        };
        let closure = Closure::build(axioms, &meter)?;
        if !closure.consistent(&meter)? {
            return Ok(true);
        }
        closure.entails(axiom, &meter)
    }
}
