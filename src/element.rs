//! Ontology element types.
//!
//! Every concept, individual and relation of the wiki is an
//! [`OntologyElement`] identified by an [`ElementId`]. The element kinds form
//! a closed set ([`ElementKind`]); each kind carries a static [`KindSpec`]
//! describing its word slots, which drives both the lexicon changer and the
//! grammar. The [`ElementAllocator`] provides thread-safe ID generation.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{OntologyError, OntologyResult};
use crate::word;

/// Unique, niche-optimized identifier for an ontology element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ElementId(NonZeroU64);

impl ElementId {
    /// Create an `ElementId` from a raw `u64`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(ElementId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "el:{}", self.0)
    }
}

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// A general concept named by a noun ("man", "country").
    Concept,
    /// A single thing named by a proper name ("Mary", "the Nile").
    Individual,
    /// A relation named by a transitive verb ("likes").
    Relation,
    /// A relation named by an adjective plus preposition ("located in").
    TransitiveAdjective,
}

/// How the value of a word slot is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotForm {
    /// A word, validated and normalized.
    Word,
    /// A yes/no option.
    Flag,
}

/// Static description of one word slot of an element kind.
#[derive(Debug, Clone, Copy)]
pub struct SlotSpec {
    pub label: &'static str,
    pub example: &'static str,
    pub mandatory: bool,
    pub form: SlotForm,
}

/// Static description of an element kind: presentation texts and slots.
#[derive(Debug)]
pub struct KindSpec {
    pub kind: ElementKind,
    pub tag: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub slots: &'static [SlotSpec],
}

/// Slot positions of each kind.
pub mod slot {
    pub const SINGULAR: usize = 0;
    pub const PLURAL: usize = 1;

    pub const NAME: usize = 0;
    pub const DEFINITE: usize = 1;

    pub const THIRD_SINGULAR: usize = 0;
    pub const INFINITIVE: usize = 1;
    pub const PAST_PARTICIPLE: usize = 2;

    pub const ADJECTIVE: usize = 0;
}

static CONCEPT: KindSpec = KindSpec {
    kind: ElementKind::Concept,
    tag: "noun",
    title: "Noun",
    description: "Every noun represents a certain type of things. \
                  For example, the noun \"city\" stands for all things that are cities.",
    slots: &[
        SlotSpec {
            label: "singular",
            example: "examples: woman, city, process",
            mandatory: true,
            form: SlotForm::Word,
        },
        SlotSpec {
            label: "plural",
            example: "examples: women, cities, processes",
            mandatory: true,
            form: SlotForm::Word,
        },
    ],
};

static INDIVIDUAL: KindSpec = KindSpec {
    kind: ElementKind::Individual,
    tag: "propername",
    title: "Proper Name",
    description: "Every proper name represents a certain individual. \
                  The country \"Switzerland\", the person \"Bob Dylan\" and the river \
                  \"Nile\" are examples. Some proper names are used with \"the\".",
    slots: &[
        SlotSpec {
            label: "proper name",
            example: "examples: Switzerland, Bob Dylan, Nile",
            mandatory: true,
            form: SlotForm::Word,
        },
        SlotSpec {
            label: "used with \"the\"",
            example: "example: the Nile",
            mandatory: false,
            form: SlotForm::Flag,
        },
    ],
};

static RELATION: KindSpec = KindSpec {
    kind: ElementKind::Relation,
    tag: "verb",
    title: "Verb",
    description: "Every verb represents a certain relation between things. \
                  For example, the verb \"owns\" relates persons to their possessions.",
    slots: &[
        SlotSpec {
            label: "third singular",
            example: "examples: owns, applies to, touches",
            mandatory: true,
            form: SlotForm::Word,
        },
        SlotSpec {
            label: "bare infinitive",
            example: "examples: own, apply to, touch",
            mandatory: true,
            form: SlotForm::Word,
        },
        SlotSpec {
            label: "past participle",
            example: "examples: owned, applied to, touched",
            mandatory: false,
            form: SlotForm::Word,
        },
    ],
};

static TRANSITIVE_ADJECTIVE: KindSpec = KindSpec {
    kind: ElementKind::TransitiveAdjective,
    tag: "tradj",
    title: "Transitive Adjective",
    description: "Every transitive adjective represents a certain relation between things. \
                  For example, the transitive adjective \"located in\" relates things to \
                  their location. Transitive adjectives consist of an adjective that \
                  is followed by a preposition.",
    slots: &[SlotSpec {
        label: "transitive adjective",
        example: "examples: located in, matched with, fond of",
        mandatory: true,
        form: SlotForm::Word,
    }],
};

impl ElementKind {
    /// All kinds, in lexical-type order.
    pub const ALL: [ElementKind; 4] = [
        ElementKind::Concept,
        ElementKind::Individual,
        ElementKind::Relation,
        ElementKind::TransitiveAdjective,
    ];

    /// The static description of this kind.
    pub fn spec(self) -> &'static KindSpec {
        match self {
            ElementKind::Concept => &CONCEPT,
            ElementKind::Individual => &INDIVIDUAL,
            ElementKind::Relation => &RELATION,
            ElementKind::TransitiveAdjective => &TRANSITIVE_ADJECTIVE,
        }
    }

    /// The type tag used by element factories ("noun", "propername", ...).
    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    /// Resolve a type tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Whether elements of this kind denote binary relations.
    pub fn is_relation(self) -> bool {
        matches!(self, ElementKind::Relation | ElementKind::TransitiveAdjective)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().title)
    }
}

/// The value held by one word slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LexiconValue {
    Word(String),
    Flag(bool),
}

impl LexiconValue {
    /// The word, if this is a word value.
    pub fn as_word(&self) -> Option<&str> {
        match self {
            LexiconValue::Word(w) => Some(w),
            LexiconValue::Flag(_) => None,
        }
    }

    /// The flag, if this is a flag value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            LexiconValue::Flag(b) => Some(*b),
            LexiconValue::Word(_) => None,
        }
    }

    fn empty_for(form: SlotForm) -> Self {
        match form {
            SlotForm::Word => LexiconValue::Word(String::new()),
            SlotForm::Flag => LexiconValue::Flag(false),
        }
    }
}

impl From<&str> for LexiconValue {
    fn from(word: &str) -> Self {
        LexiconValue::Word(word.to_string())
    }
}

impl From<String> for LexiconValue {
    fn from(word: String) -> Self {
        LexiconValue::Word(word)
    }
}

impl From<bool> for LexiconValue {
    fn from(flag: bool) -> Self {
        LexiconValue::Flag(flag)
    }
}

impl std::fmt::Display for LexiconValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexiconValue::Word(w) => f.write_str(&word::pretty(w)),
            LexiconValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// An ontology element: identity, kind and the values of its word slots.
///
/// Values are only changed through the lexicon changer, which commits them
/// to the owning [`Ontology`](crate::ontology::Ontology) atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyElement {
    id: ElementId,
    kind: ElementKind,
    values: Vec<LexiconValue>,
}

impl OntologyElement {
    /// Create an element with every slot unset.
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        let values = kind
            .spec()
            .slots
            .iter()
            .map(|s| LexiconValue::empty_for(s.form))
            .collect();
        Self { id, kind, values }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// All slot values in slot order.
    pub fn values(&self) -> &[LexiconValue] {
        &self.values
    }

    /// The normalized word in slot `index`, or `""` if unset or not a word slot.
    pub fn word(&self, index: usize) -> &str {
        self.values
            .get(index)
            .and_then(LexiconValue::as_word)
            .unwrap_or("")
    }

    /// The word in slot `index` in display form.
    pub fn pretty_word(&self, index: usize) -> String {
        word::pretty(self.word(index))
    }

    /// The flag in slot `index` (false if unset or not a flag slot).
    pub fn flag(&self, index: usize) -> bool {
        self.values
            .get(index)
            .and_then(LexiconValue::as_flag)
            .unwrap_or(false)
    }

    /// All non-empty words, in slot order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter_map(LexiconValue::as_word)
            .filter(|w| !w.is_empty())
    }

    /// The word that names the element (first slot).
    pub fn headword(&self) -> &str {
        self.word(0)
    }

    pub(crate) fn set_values(&mut self, values: Vec<LexiconValue>) {
        self.values = values;
    }
}

/// Thread-safe element ID allocator.
///
/// Produces monotonically increasing IDs starting from 1.
#[derive(Debug)]
pub struct ElementAllocator {
    next: AtomicU64,
}

impl ElementAllocator {
    /// Create a new allocator that starts from ID 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Create an allocator that resumes from a given ID.
    pub fn starting_from(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start.max(1)),
        }
    }

    /// Allocate the next element ID.
    pub fn next_id(&self) -> OntologyResult<ElementId> {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        ElementId::new(raw).ok_or(OntologyError::AllocatorExhausted)
    }

    /// Return the next ID that *would* be allocated, without consuming it.
    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for ElementAllocator {
    fn default() -> Self {
        Self::new()
    }
}
