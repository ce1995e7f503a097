//! Sentences and their storage form.
//!
//! A [`Sentence`] is a [`SentenceTree`] plus the question flag and the code
//! of the language it was written in. It is stored as a small s-expression
//! over element ids:
//!
//! ```text
//! en (every 3 5)
//! de ?(instance 4 3)
//! ```
//!
//! The storage form never contains words, so it survives lexicon edits.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::grammar::abs::SentenceTree;
use crate::grammar::error::{GrammarError, GrammarResult};

/// Identifier of an asserted sentence within its ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SentenceId(NonZeroU64);

impl SentenceId {
    pub const FIRST: SentenceId = SentenceId(NonZeroU64::MIN);

    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(SentenceId)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    pub(crate) fn succ(self) -> Self {
        SentenceId(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for SentenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s:{}", self.0)
    }
}

/// A declarative sentence or question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub tree: SentenceTree,
    pub question: bool,
    pub language: String,
}

impl Sentence {
    /// A declarative sentence.
    pub fn statement(tree: SentenceTree, language: impl Into<String>) -> Self {
        Self {
            tree,
            question: false,
            language: language.into(),
        }
    }

    /// A question.
    pub fn question(tree: SentenceTree, language: impl Into<String>) -> Self {
        Self {
            tree,
            question: true,
            language: language.into(),
        }
    }

    /// Whether the sentence mentions `id`.
    pub fn references(&self, id: ElementId) -> bool {
        self.tree.references(id)
    }

    /// Storage form: `<lang> [?](<head> <id>...)`.
    pub fn serialize(&self) -> String {
        let args: Vec<String> = self
            .tree
            .elements()
            .iter()
            .map(|id| id.get().to_string())
            .collect();
        format!(
            "{} {}({} {})",
            self.language,
            if self.question { "?" } else { "" },
            self.tree.head(),
            args.join(" ")
        )
    }

    /// Parse the storage form produced by [`Sentence::serialize`].
    ///
    /// Only the shape is checked here; whether the ids resolve is up to the
    /// ontology the sentence is used with.
    pub fn deserialize(input: &str) -> GrammarResult<Self> {
        let malformed = |message: &str| GrammarError::Deserialize {
            input: input.to_string(),
            message: message.to_string(),
        };

        let (language, rest) = input
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| malformed("missing language code"))?;
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(malformed("invalid language code"));
        }

        let rest = rest.trim_start();
        let (question, rest) = match rest.strip_prefix('?') {
            Some(r) => (true, r),
            None => (false, rest),
        };
        let body = rest
            .strip_prefix('(')
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(|| malformed("expected a parenthesized expression"))?;

        let mut parts = body.split_whitespace();
        let head = parts.next().ok_or_else(|| malformed("empty expression"))?;
        let args = parts
            .map(|p| {
                p.parse::<u64>()
                    .ok()
                    .and_then(ElementId::new)
                    .ok_or_else(|| malformed(&format!("invalid element id \"{p}\"")))
            })
            .collect::<GrammarResult<Vec<_>>>()?;

        let tree = SentenceTree::from_parts(head, &args)
            .ok_or_else(|| malformed(&format!("unknown head \"{head}\" with {} argument(s)", args.len())))?;

        Ok(Self {
            tree,
            question,
            language: language.to_string(),
        })
    }
}

impl std::fmt::Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ElementId {
        ElementId::new(raw).unwrap()
    }

    #[test]
    fn serialize_statement_and_question() {
        let s = Sentence::statement(SentenceTree::Subsumption { sub: id(3), sup: id(5) }, "en");
        assert_eq!(s.serialize(), "en (every 3 5)");

        let q = Sentence::question(
            SentenceTree::Instance {
                individual: id(4),
                concept: id(3),
            },
            "en",
        );
        assert_eq!(q.serialize(), "en ?(instance 4 3)");
    }

    #[test]
    fn deserialize_inverts_serialize() {
        for text in [
            "en (every 3 5)",
            "de ?(instance 4 3)",
            "es (not-instance 4 3)",
            "en (relation 4 7 8)",
            "en (no 1 2)",
        ] {
            let s = Sentence::deserialize(text).unwrap();
            assert_eq!(s.serialize(), text);
        }
    }

    #[test]
    fn deserialize_tolerates_spacing() {
        let s = Sentence::deserialize("  en   ?(every  3 5)  ").unwrap();
        assert!(s.question);
        assert_eq!(s.language, "en");
    }

    #[test]
    fn deserialize_rejects_garbage() {
        for bad in [
            "",
            "en",
            "en every 3 5",
            "en (every 3)",
            "en (every 0 5)",
            "en (every x 5)",
            "en (sometimes 1 2)",
            "e;n (every 1 2)",
        ] {
            assert!(
                matches!(Sentence::deserialize(bad), Err(GrammarError::Deserialize { .. })),
                "accepted {bad:?}"
            );
        }
    }
}
