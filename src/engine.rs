//! Engine facade: top-level API of the wiki's lexicon and ontology.
//!
//! The `Engine` owns the ontology, the grammar, one memoized language
//! handler per language, the reasoner and the exporters. Sentences are
//! added optimistically: the reasoner checks an axiom snapshot with no lock
//! held, and the commit goes through only if the ontology has not moved in
//! the meantime. When the reasoner is unavailable, sentences are committed
//! unchecked and the reasoner is reported as out of sync until
//! [`Engine::resync_reasoner`] succeeds.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::element::{ElementId, ElementKind, LexiconValue, OntologyElement};
use crate::error::{EngineError, GrammarResult, ReasonError, WikiResult};
use crate::export::{
    Exporter, LexiconReportExporter, NTriplesExporter, OwlFunctionalExporter, OwlXmlExporter,
};
use crate::grammar::abs::SentenceTree;
use crate::grammar::{Grammar, LanguageHandler};
use crate::lexicon::LexiconChanger;
use crate::ontology::{CommitOutcome, Ontology, Revision};
use crate::reason::{DisabledReasoner, Reasoner, SaturationReasoner};
use crate::sentence::{Sentence, SentenceId};

/// Outcome of a full consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub consistent: bool,
    /// Ontology revision the verdict applies to.
    pub revision: Revision,
}

/// Answer to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Answer {
    /// Whether the questioned statement follows from the ontology.
    pub holds: bool,
    pub revision: Revision,
}

/// Synchronization state between the ontology and the reasoner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonerStatus {
    pub reasoner: String,
    /// Last revision the reasoner has checked, if any.
    pub synced_revision: Option<Revision>,
    pub current_revision: Revision,
    /// The ontology changed since the last successful check.
    pub pending: bool,
    /// Error of the last failed reasoner call, cleared by the next success.
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct SyncState {
    synced_revision: Option<Revision>,
    last_error: Option<String>,
}

/// The wikilex engine.
pub struct Engine {
    config: EngineConfig,
    ontology: Arc<Ontology>,
    grammar: Arc<Grammar>,
    languages: Vec<String>,
    handlers: DashMap<String, Arc<LanguageHandler>>,
    reasoner: Arc<dyn Reasoner>,
    exporters: Vec<Arc<dyn Exporter>>,
    sync: Mutex<SyncState>,
}

impl Engine {
    /// Create an engine with a fresh ontology, the built-in languages and
    /// the built-in reasoner.
    pub fn new(config: EngineConfig) -> WikiResult<Self> {
        config.validate()?;
        let ontology = Arc::new(Ontology::new(config.name.clone(), config.base_iri.clone()));
        let reasoner: Arc<dyn Reasoner> = if config.reasoner.enabled {
            Arc::new(SaturationReasoner::new(config.reasoner.step_budget))
        } else {
            Arc::new(DisabledReasoner)
        };
        Self::init(config, ontology, Arc::new(Grammar::new()), reasoner)
    }

    /// Create an engine from its parts.
    ///
    /// Exposes the grammar's languages minus the hidden ones, sorted by
    /// display name, and creates their handlers.
    pub fn init(
        config: EngineConfig,
        ontology: Arc<Ontology>,
        grammar: Arc<Grammar>,
        reasoner: Arc<dyn Reasoner>,
    ) -> WikiResult<Self> {
        config.validate()?;

        let mut named = Vec::new();
        for code in grammar.languages() {
            if config.hidden_languages.contains(&code) {
                continue;
            }
            let name = grammar.get(&code)?.language_name().to_string();
            named.push((name, code));
        }
        named.sort_by(|a, b| a.0.cmp(&b.0));
        let languages: Vec<String> = named.into_iter().map(|(_, code)| code).collect();

        if !languages.is_empty() && !languages.contains(&config.default_language) {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "default_language \"{}\" is not among the visible languages {languages:?}",
                    config.default_language
                ),
            }
            .into());
        }

        let handlers = DashMap::new();
        for code in &languages {
            let handler = LanguageHandler::new(grammar.get(code)?, Arc::clone(&ontology));
            handlers.insert(code.clone(), Arc::new(handler));
        }

        let exporters: Vec<Arc<dyn Exporter>> = vec![
            Arc::new(OwlFunctionalExporter::new(true)),
            Arc::new(OwlFunctionalExporter::new(false)),
            Arc::new(OwlXmlExporter::new(true)),
            Arc::new(OwlXmlExporter::new(false)),
            Arc::new(NTriplesExporter),
            Arc::new(LexiconReportExporter::new(Arc::clone(&grammar), languages.clone())),
        ];

        tracing::info!(
            name = %config.name,
            languages = ?languages,
            hidden = ?config.hidden_languages,
            reasoner = reasoner.name(),
            "engine initialized"
        );

        Ok(Self {
            config,
            ontology,
            grammar,
            languages,
            handlers,
            reasoner,
            exporters,
            sync: Mutex::new(SyncState::default()),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ontology(&self) -> &Arc<Ontology> {
        &self.ontology
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Visible language codes, sorted by display name.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Type tags accepted by [`Engine::create_ontology_element`].
    pub fn lexical_types(&self) -> Vec<&'static str> {
        ElementKind::ALL.iter().map(|k| k.tag()).collect()
    }

    // -----------------------------------------------------------------------
    // Lexicon
    // -----------------------------------------------------------------------

    /// Create a fresh element for a type tag. Unknown tags yield `None`.
    pub fn create_ontology_element(&self, tag: &str) -> Option<OntologyElement> {
        let kind = ElementKind::from_tag(tag)?;
        self.ontology
            .allocate(kind)
            .inspect_err(|err| tracing::warn!(tag, error = %err, "element allocation failed"))
            .ok()
    }

    pub fn lexicon_changer(&self, kind: ElementKind) -> LexiconChanger {
        LexiconChanger::for_kind(kind)
    }

    /// Save the words of an element with the changer of its kind.
    pub fn save_words(
        &self,
        element: &mut OntologyElement,
        word_number: usize,
        values: &[LexiconValue],
    ) -> WikiResult<Revision> {
        let changer = LexiconChanger::for_kind(element.kind());
        Ok(changer.save(&self.ontology, element, word_number, values)?)
    }

    /// Remove an element no sentence refers to.
    pub fn remove_element(&self, id: ElementId) -> WikiResult<OntologyElement> {
        Ok(self.ontology.remove_element(id)?)
    }

    // -----------------------------------------------------------------------
    // Languages and sentences
    // -----------------------------------------------------------------------

    /// The handler of a declared language, created once per code.
    pub fn get_language_handler(&self, code: &str) -> GrammarResult<Arc<LanguageHandler>> {
        if let Some(handler) = self.handlers.get(code) {
            return Ok(Arc::clone(handler.value()));
        }
        let grammar = self.grammar.get(code)?;
        let handler = self
            .handlers
            .entry(code.to_string())
            .or_insert_with(|| Arc::new(LanguageHandler::new(grammar, Arc::clone(&self.ontology))));
        Ok(Arc::clone(handler.value()))
    }

    /// Rebuild a sentence from its storage form.
    pub fn create_sentence(&self, serialized: &str) -> GrammarResult<Sentence> {
        let sentence = Sentence::deserialize(serialized)?;
        self.grammar.get(&sentence.language)?;
        self.ontology.validate_sentence(&sentence)?;
        Ok(sentence)
    }

    /// "`individual` is a `concept`."
    pub fn create_assignment_sentence(
        &self,
        individual: ElementId,
        concept: ElementId,
    ) -> GrammarResult<Sentence> {
        self.checked_statement(SentenceTree::Instance {
            individual,
            concept,
        })
    }

    /// "Every `sub` is a `sup`."
    pub fn create_hierarchy_sentence(&self, sub: ElementId, sup: ElementId) -> GrammarResult<Sentence> {
        self.checked_statement(SentenceTree::Subsumption { sub, sup })
    }

    fn checked_statement(&self, tree: SentenceTree) -> GrammarResult<Sentence> {
        let sentence = Sentence::statement(tree, self.config.default_language.clone());
        self.ontology.validate_sentence(&sentence)?;
        Ok(sentence)
    }

    /// Parse text of a language.
    pub fn parse(&self, language: &str, text: &str) -> GrammarResult<Sentence> {
        self.get_language_handler(language)?.parse(text)
    }

    /// Render a sentence in a language.
    pub fn translate(&self, sentence: &Sentence, language: &str) -> GrammarResult<String> {
        self.get_language_handler(language)?.serialize(sentence)
    }

    fn describe(&self, sentence: &Sentence) -> String {
        self.translate(sentence, &sentence.language)
            .unwrap_or_else(|_| sentence.serialize())
    }

    pub fn sentences(&self) -> Vec<(SentenceId, Sentence)> {
        self.ontology.sentences()
    }

    /// Assert a declarative sentence.
    ///
    /// With `check_on_add`, the sentence is committed only if the reasoner
    /// finds the extended ontology consistent at an unchanged revision.
    pub fn add_sentence(&self, sentence: Sentence) -> WikiResult<SentenceId> {
        if sentence.question {
            return Err(EngineError::QuestionNotAssertable.into());
        }
        self.ontology.validate_sentence(&sentence)?;

        if !self.config.check_on_add {
            return self.commit_unchecked(sentence);
        }

        let attempts = self.config.max_commit_retries;
        for attempt in 1..=attempts {
            let axioms = self.ontology.axioms();
            let candidate = axioms.with(sentence.tree.to_axiom());

            match self.reasoner.check_consistency(&candidate) {
                Ok(true) => {}
                Ok(false) => {
                    let text = self.describe(&sentence);
                    tracing::info!(sentence = %text, "rejected inconsistent sentence");
                    return Err(EngineError::InconsistentSentence { sentence: text }.into());
                }
                Err(err) => {
                    self.record_error(&err);
                    tracing::warn!(error = %err, "reasoner unavailable, committing unchecked");
                    return self.commit_unchecked(sentence);
                }
            }

            match self
                .ontology
                .add_sentence_if(sentence.clone(), Some(axioms.revision))?
            {
                CommitOutcome::Committed { id, revision } => {
                    self.mark_synced(revision);
                    tracing::info!(sentence = %id, revision, "added sentence");
                    return Ok(id);
                }
                CommitOutcome::Stale { current } => {
                    tracing::debug!(
                        attempt,
                        checked = axioms.revision,
                        current,
                        "ontology moved during check, retrying"
                    );
                }
            }
        }
        Err(EngineError::Conflict { attempts }.into())
    }

    fn commit_unchecked(&self, sentence: Sentence) -> WikiResult<SentenceId> {
        match self.ontology.add_sentence_if(sentence, None)? {
            CommitOutcome::Committed { id, revision } => {
                tracing::info!(sentence = %id, revision, "added sentence without consistency check");
                Ok(id)
            }
            CommitOutcome::Stale { .. } => Err(EngineError::Conflict { attempts: 1 }.into()),
        }
    }

    /// Retract an asserted sentence.
    pub fn retract_sentence(&self, id: SentenceId) -> WikiResult<Sentence> {
        let sentence = self.ontology.retract_sentence(id)?;
        tracing::info!(sentence = %id, "retracted sentence");
        Ok(sentence)
    }

    // -----------------------------------------------------------------------
    // Reasoning
    // -----------------------------------------------------------------------

    pub fn get_reasoner(&self) -> Arc<dyn Reasoner> {
        Arc::clone(&self.reasoner)
    }

    /// Check the whole ontology.
    pub fn check_consistency(&self) -> WikiResult<ConsistencyReport> {
        let axioms = self.ontology.axioms();
        match self.reasoner.check_consistency(&axioms) {
            Ok(consistent) => {
                self.mark_synced(axioms.revision);
                Ok(ConsistencyReport {
                    consistent,
                    revision: axioms.revision,
                })
            }
            Err(err) => {
                self.record_error(&err);
                Err(err.into())
            }
        }
    }

    /// Bring the reasoner up to date after an outage.
    pub fn resync_reasoner(&self) -> WikiResult<ConsistencyReport> {
        let report = self.check_consistency()?;
        tracing::info!(
            revision = report.revision,
            consistent = report.consistent,
            "reasoner resynchronized"
        );
        Ok(report)
    }

    /// Whether a verdict still applies to the current ontology.
    pub fn is_current(&self, report: &ConsistencyReport) -> bool {
        report.revision == self.ontology.revision()
    }

    /// Answer a question by entailment.
    pub fn answer(&self, question: &Sentence) -> WikiResult<Answer> {
        if !question.question {
            return Err(EngineError::NotAQuestion.into());
        }
        self.ontology.validate_sentence(question)?;

        let axioms = self.ontology.axioms();
        match self.reasoner.entails(&axioms, &question.tree.to_axiom()) {
            Ok(holds) => {
                self.mark_synced(axioms.revision);
                Ok(Answer {
                    holds,
                    revision: axioms.revision,
                })
            }
            Err(err) => {
                self.record_error(&err);
                Err(err.into())
            }
        }
    }

    pub fn reasoner_status(&self) -> ReasonerStatus {
        let sync = self.sync.lock().expect("sync state lock poisoned");
        let current_revision = self.ontology.revision();
        ReasonerStatus {
            reasoner: self.reasoner.name().to_string(),
            synced_revision: sync.synced_revision,
            current_revision,
            pending: sync.synced_revision != Some(current_revision),
            last_error: sync.last_error.clone(),
        }
    }

    fn mark_synced(&self, revision: Revision) {
        let mut sync = self.sync.lock().expect("sync state lock poisoned");
        if sync.synced_revision.is_none_or(|r| r < revision) {
            sync.synced_revision = Some(revision);
        }
        sync.last_error = None;
    }

    fn record_error(&self, err: &ReasonError) {
        let mut sync = self.sync.lock().expect("sync state lock poisoned");
        sync.last_error = Some(err.to_string());
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Names of the registered exporters.
    pub fn exporters(&self) -> Vec<&str> {
        self.exporters.iter().map(|e| e.name()).collect()
    }

    /// Register an additional exporter. Replaces one with the same name.
    pub fn register_exporter(&mut self, exporter: Arc<dyn Exporter>) {
        match self.exporters.iter_mut().find(|e| e.name() == exporter.name()) {
            Some(existing) => *existing = exporter,
            None => self.exporters.push(exporter),
        }
    }

    /// Export the current ontology with a named exporter.
    pub fn export(&self, name: &str) -> WikiResult<String> {
        let exporter = self
            .exporters
            .iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| crate::error::ExportError::UnknownExporter {
                name: name.to_string(),
            })?;
        let snapshot = self.ontology.snapshot();
        let out = exporter.export(&snapshot)?;
        tracing::info!(
            exporter = name,
            revision = snapshot.revision,
            bytes = out.len(),
            "exported ontology"
        );
        Ok(out)
    }

    /// Summary of the engine state.
    pub fn info(&self) -> EngineInfo {
        let status = self.reasoner_status();
        EngineInfo {
            name: self.ontology.name().to_string(),
            languages: self.languages.clone(),
            element_count: self.ontology.len(),
            sentence_count: self.ontology.sentences().len(),
            revision: status.current_revision,
            reasoner: status.reasoner,
            synced_revision: status.synced_revision,
        }
    }
}

/// Summary information about the engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub name: String,
    pub languages: Vec<String>,
    pub element_count: usize,
    pub sentence_count: usize,
    pub revision: Revision,
    pub reasoner: String,
    pub synced_revision: Option<Revision>,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "wikilex engine info")?;
        writeln!(f, "  ontology:   {}", self.name)?;
        writeln!(f, "  languages:  {}", self.languages.join(", "))?;
        writeln!(f, "  elements:   {}", self.element_count)?;
        writeln!(f, "  sentences:  {}", self.sentence_count)?;
        writeln!(f, "  revision:   {}", self.revision)?;
        match self.synced_revision {
            Some(r) => writeln!(f, "  reasoner:   {} (synced at {r})", self.reasoner)?,
            None => writeln!(f, "  reasoner:   {} (not synced)", self.reasoner)?,
        }
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("ontology", &self.ontology)
            .field("languages", &self.languages)
            .field("reasoner", &self.reasoner.name())
            .finish()
    }
}
