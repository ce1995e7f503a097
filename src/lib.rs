// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # wikilex
//!
//! Lexicon and ontology engine of a controlled-natural-language semantic wiki.
//! Users name concepts, individuals and relations with words; sentences built
//! from those words are parsed in several languages into one language-neutral
//! form, checked for consistency and exported as OWL.
//!
//! ## Architecture
//!
//! - **Words** (`word`): normalization, validity and function-word checks
//! - **Elements** (`element`): element kinds, their word slots, identifiers
//! - **Ontology** (`ontology`): word index, sentences, revision counter
//! - **Lexicon** (`lexicon`): per-kind editors with validated, atomic saves
//! - **Grammar** (`grammar`): abstract sentence trees and concrete languages
//! - **Reasoning** (`reason`): consistency and entailment over the axioms
//! - **Export** (`export`): OWL functional syntax, N-Triples, lexicon reports
//!
//! ## Library usage
//!
//! ```no_run
//! use wikilex::config::EngineConfig;
//! use wikilex::engine::Engine;
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let mut man = engine.create_ontology_element("noun").unwrap();
//! engine.save_words(&mut man, 0, &["man".into(), "men".into()]).unwrap();
//! let mut human = engine.create_ontology_element("noun").unwrap();
//! engine.save_words(&mut human, 0, &["human".into(), "humans".into()]).unwrap();
//!
//! let sentence = engine.parse("en", "Every man is a human.").unwrap();
//! engine.add_sentence(sentence).unwrap();
//! println!("{}", engine.export("owl-fss").unwrap());
//! ```

pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod export;
pub mod grammar;
pub mod lexicon;
pub mod ontology;
pub mod reason;
pub mod sentence;
pub mod word;
