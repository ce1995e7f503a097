//! Ontology exporters.
//!
//! Every exporter renders an [`OntologySnapshot`], so an export never holds
//! the ontology lock and always sees one consistent revision. Element IRIs
//! are `<base_iri>#<headword>`. Questions are never exported.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{BlankNode, Literal, NamedNode, Triple};
use serde::Serialize;

use crate::element::{ElementId, ElementKind, OntologyElement};
use crate::error::{ExportError, ExportResult};
use crate::grammar::Grammar;
use crate::grammar::lexer::LexIndex;
use crate::ontology::OntologySnapshot;
use crate::reason::Axiom;

const OWL: &str = "http://www.w3.org/2002/07/owl#";
const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// Renders an ontology snapshot in one format.
pub trait Exporter: Send + Sync {
    /// Registry name ("owl-fss", "owl-xml", "ntriples", ...).
    fn name(&self) -> &str;

    /// MIME type of the output.
    fn content_type(&self) -> &str;

    fn export(&self, snapshot: &OntologySnapshot) -> ExportResult<String>;
}

fn render_error(exporter: &str, message: impl Into<String>) -> ExportError {
    ExportError::Render {
        exporter: exporter.to_string(),
        message: message.into(),
    }
}

fn element<'a>(
    exporter: &str,
    snapshot: &'a OntologySnapshot,
    id: ElementId,
) -> ExportResult<&'a OntologyElement> {
    snapshot
        .element(id)
        .ok_or_else(|| render_error(exporter, format!("sentence refers to unknown element {id}")))
}

/// OWL entity type of an element kind.
fn entity_type(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::Concept => "Class",
        ElementKind::Individual => "NamedIndividual",
        ElementKind::Relation | ElementKind::TransitiveAdjective => "ObjectProperty",
    }
}

/// Axioms of the asserted statements of a snapshot.
fn statement_axioms(snapshot: &OntologySnapshot) -> impl Iterator<Item = Axiom> + '_ {
    snapshot
        .sentences
        .iter()
        .filter(|(_, s)| !s.question)
        .map(|(_, s)| s.tree.to_axiom())
}

// ---------------------------------------------------------------------------
// OWL functional-style syntax
// ---------------------------------------------------------------------------

/// OWL 2 functional-style syntax, optionally with `rdfs:label` annotations.
#[derive(Debug, Clone, Copy)]
pub struct OwlFunctionalExporter {
    annotate: bool,
}

impl OwlFunctionalExporter {
    pub fn new(annotate: bool) -> Self {
        Self { annotate }
    }

    fn entity(&self, snapshot: &OntologySnapshot, id: ElementId) -> ExportResult<String> {
        Ok(format!(":{}", element(self.name(), snapshot, id)?.headword()))
    }
}

impl Exporter for OwlFunctionalExporter {
    fn name(&self) -> &str {
        if self.annotate { "owl-fss" } else { "owl-fss-plain" }
    }

    fn content_type(&self) -> &str {
        "text/owl-functional"
    }

    fn export(&self, snapshot: &OntologySnapshot) -> ExportResult<String> {
        let mut out = String::new();
        let base = &snapshot.base_iri;
        let fmt_err = |_| render_error(self.name(), "formatting failed");

        writeln!(out, "Prefix(:=<{base}#>)").map_err(fmt_err)?;
        writeln!(out, "Prefix(owl:=<{OWL}>)").map_err(fmt_err)?;
        writeln!(out, "Prefix(rdfs:=<{RDFS}>)").map_err(fmt_err)?;
        writeln!(out).map_err(fmt_err)?;
        writeln!(out, "Ontology(<{base}>").map_err(fmt_err)?;

        for el in &snapshot.elements {
            let entity = entity_type(el.kind());
            writeln!(out, "Declaration({entity}(:{}))", el.headword()).map_err(fmt_err)?;
            if self.annotate {
                for word in el.words() {
                    writeln!(
                        out,
                        "AnnotationAssertion(rdfs:label :{} \"{}\")",
                        el.headword(),
                        crate::word::pretty(word)
                    )
                    .map_err(fmt_err)?;
                }
            }
        }

        for axiom in statement_axioms(snapshot) {
            let e = |id| self.entity(snapshot, id);
            let line = match axiom {
                Axiom::SubClassOf { sub, sup } => format!("SubClassOf({} {})", e(sub)?, e(sup)?),
                Axiom::DisjointClasses { first, second } => {
                    format!("DisjointClasses({} {})", e(first)?, e(second)?)
                }
                Axiom::ClassAssertion { individual, class } => {
                    format!("ClassAssertion({} {})", e(class)?, e(individual)?)
                }
                Axiom::NegativeClassAssertion { individual, class } => format!(
                    "ClassAssertion(ObjectComplementOf({}) {})",
                    e(class)?,
                    e(individual)?
                ),
                Axiom::ObjectPropertyAssertion {
                    subject,
                    property,
                    object,
                } => format!(
                    "ObjectPropertyAssertion({} {} {})",
                    e(property)?,
                    e(subject)?,
                    e(object)?
                ),
            };
            writeln!(out, "{line}").map_err(fmt_err)?;
        }

        writeln!(out, ")").map_err(fmt_err)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// OWL/XML
// ---------------------------------------------------------------------------

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn write_xml_axiom(out: &mut String, name: &str, children: &[String]) -> std::fmt::Result {
    writeln!(out, "    <{name}>")?;
    for child in children {
        writeln!(out, "        {child}")?;
    }
    writeln!(out, "    </{name}>")
}

/// OWL 2 XML serialization, optionally with `rdfs:label` annotations.
#[derive(Debug, Clone, Copy)]
pub struct OwlXmlExporter {
    annotate: bool,
}

impl OwlXmlExporter {
    pub fn new(annotate: bool) -> Self {
        Self { annotate }
    }

    fn iri(snapshot: &OntologySnapshot, el: &OntologyElement) -> String {
        escape_xml(&format!("{}#{}", snapshot.base_iri, el.headword()))
    }

    fn entity(&self, snapshot: &OntologySnapshot, id: ElementId) -> ExportResult<String> {
        let el = element(self.name(), snapshot, id)?;
        Ok(format!("<{} IRI=\"{}\"/>", entity_type(el.kind()), Self::iri(snapshot, el)))
    }
}

impl Exporter for OwlXmlExporter {
    fn name(&self) -> &str {
        if self.annotate { "owl-xml" } else { "owl-xml-plain" }
    }

    fn content_type(&self) -> &str {
        "application/owl+xml"
    }

    fn export(&self, snapshot: &OntologySnapshot) -> ExportResult<String> {
        let mut out = String::new();
        let base = escape_xml(&snapshot.base_iri);
        let fmt_err = |_| render_error(self.name(), "formatting failed");

        writeln!(out, "<?xml version=\"1.0\"?>").map_err(fmt_err)?;
        writeln!(out, "<Ontology xmlns=\"{OWL}\" ontologyIRI=\"{base}\">").map_err(fmt_err)?;
        writeln!(out, "    <Prefix name=\"owl\" IRI=\"{OWL}\"/>").map_err(fmt_err)?;
        writeln!(out, "    <Prefix name=\"rdfs\" IRI=\"{RDFS}\"/>").map_err(fmt_err)?;

        for el in &snapshot.elements {
            let entity = format!("<{} IRI=\"{}\"/>", entity_type(el.kind()), Self::iri(snapshot, el));
            write_xml_axiom(&mut out, "Declaration", &[entity]).map_err(fmt_err)?;
            if self.annotate {
                for word in el.words() {
                    let children = [
                        "<AnnotationProperty abbreviatedIRI=\"rdfs:label\"/>".to_string(),
                        format!("<IRI>{}</IRI>", Self::iri(snapshot, el)),
                        format!("<Literal>{}</Literal>", escape_xml(&crate::word::pretty(word))),
                    ];
                    write_xml_axiom(&mut out, "AnnotationAssertion", &children).map_err(fmt_err)?;
                }
            }
        }

        for axiom in statement_axioms(snapshot) {
            let e = |id| self.entity(snapshot, id);
            let (name, children) = match axiom {
                Axiom::SubClassOf { sub, sup } => ("SubClassOf", vec![e(sub)?, e(sup)?]),
                Axiom::DisjointClasses { first, second } => {
                    ("DisjointClasses", vec![e(first)?, e(second)?])
                }
                Axiom::ClassAssertion { individual, class } => {
                    ("ClassAssertion", vec![e(class)?, e(individual)?])
                }
                Axiom::NegativeClassAssertion { individual, class } => (
                    "ClassAssertion",
                    vec![
                        format!("<ObjectComplementOf>{}</ObjectComplementOf>", e(class)?),
                        e(individual)?,
                    ],
                ),
                Axiom::ObjectPropertyAssertion {
                    subject,
                    property,
                    object,
                } => (
                    "ObjectPropertyAssertion",
                    vec![e(property)?, e(subject)?, e(object)?],
                ),
            };
            write_xml_axiom(&mut out, name, &children).map_err(fmt_err)?;
        }

        writeln!(out, "</Ontology>").map_err(fmt_err)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// N-Triples
// ---------------------------------------------------------------------------

/// OWL in RDF, serialized as N-Triples.
#[derive(Debug, Clone, Copy, Default)]
pub struct NTriplesExporter;

impl NTriplesExporter {
    fn iri(&self, iri: &str) -> ExportResult<NamedNode> {
        NamedNode::new(iri).map_err(|e| render_error(self.name(), format!("invalid IRI <{iri}>: {e}")))
    }

    fn node(&self, snapshot: &OntologySnapshot, id: ElementId) -> ExportResult<NamedNode> {
        let el = element(self.name(), snapshot, id)?;
        self.iri(&format!("{}#{}", snapshot.base_iri, el.headword()))
    }
}

impl Exporter for NTriplesExporter {
    fn name(&self) -> &str {
        "ntriples"
    }

    fn content_type(&self) -> &str {
        "application/n-triples"
    }

    fn export(&self, snapshot: &OntologySnapshot) -> ExportResult<String> {
        let owl = |local: &str| self.iri(&format!("{OWL}{local}"));
        let mut triples = Vec::new();

        triples.push(Triple::new(
            self.iri(&snapshot.base_iri)?,
            rdf::TYPE,
            owl("Ontology")?,
        ));

        for el in &snapshot.elements {
            let node = self.node(snapshot, el.id())?;
            triples.push(Triple::new(node.clone(), rdf::TYPE, owl(entity_type(el.kind()))?));
            for word in el.words() {
                triples.push(Triple::new(
                    node.clone(),
                    rdfs::LABEL,
                    Literal::new_simple_literal(crate::word::pretty(word)),
                ));
            }
        }

        for (n, axiom) in statement_axioms(snapshot).enumerate() {
            match axiom {
                Axiom::SubClassOf { sub, sup } => triples.push(Triple::new(
                    self.node(snapshot, sub)?,
                    rdfs::SUB_CLASS_OF,
                    self.node(snapshot, sup)?,
                )),
                Axiom::DisjointClasses { first, second } => triples.push(Triple::new(
                    self.node(snapshot, first)?,
                    owl("disjointWith")?,
                    self.node(snapshot, second)?,
                )),
                Axiom::ClassAssertion { individual, class } => triples.push(Triple::new(
                    self.node(snapshot, individual)?,
                    rdf::TYPE,
                    self.node(snapshot, class)?,
                )),
                Axiom::NegativeClassAssertion { individual, class } => {
                    let complement = BlankNode::new(format!("c{n}"))
                        .map_err(|e| render_error(self.name(), e.to_string()))?;
                    triples.push(Triple::new(complement.clone(), rdf::TYPE, owl("Class")?));
                    triples.push(Triple::new(
                        complement.clone(),
                        owl("complementOf")?,
                        self.node(snapshot, class)?,
                    ));
                    triples.push(Triple::new(self.node(snapshot, individual)?, rdf::TYPE, complement));
                }
                Axiom::ObjectPropertyAssertion {
                    subject,
                    property,
                    object,
                } => triples.push(Triple::new(
                    self.node(snapshot, subject)?,
                    self.node(snapshot, property)?,
                    self.node(snapshot, object)?,
                )),
            }
        }

        let mut out = String::new();
        for triple in &triples {
            out.push_str(&triple.to_string());
            out.push_str(" .\n");
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Lexicon report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ElementExport {
    id: u64,
    #[serde(rename = "type")]
    tag: &'static str,
    words: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SentenceExport {
    id: u64,
    serialized: String,
    text: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct LexiconReport<'a> {
    name: &'a str,
    revision: u64,
    elements: Vec<ElementExport>,
    sentences: Vec<SentenceExport>,
}

/// JSON report of every element and every sentence in every exposed language.
pub struct LexiconReportExporter {
    grammar: Arc<Grammar>,
    languages: Vec<String>,
}

impl LexiconReportExporter {
    pub fn new(grammar: Arc<Grammar>, languages: Vec<String>) -> Self {
        Self { grammar, languages }
    }
}

impl Exporter for LexiconReportExporter {
    fn name(&self) -> &str {
        "lexicon-report"
    }

    fn content_type(&self) -> &str {
        "application/json"
    }

    fn export(&self, snapshot: &OntologySnapshot) -> ExportResult<String> {
        let mut grammars = Vec::with_capacity(self.languages.len());
        for code in &self.languages {
            let grammar = self
                .grammar
                .get(code)
                .map_err(|e| render_error(self.name(), e.to_string()))?;
            let lex = LexIndex::build(grammar.as_ref(), snapshot.revision, &snapshot.elements);
            grammars.push((grammar, lex));
        }

        let elements = snapshot
            .elements
            .iter()
            .map(|el| ElementExport {
                id: el.id().get(),
                tag: el.kind().tag(),
                words: el.words().map(crate::word::pretty).collect(),
            })
            .collect();

        let sentences = snapshot
            .sentences
            .iter()
            .map(|(id, sentence)| {
                let mut text = BTreeMap::new();
                for (grammar, lex) in &grammars {
                    match grammar.linearize(&sentence.tree, sentence.question, lex) {
                        Ok(t) => {
                            text.insert(grammar.code().to_string(), t);
                        }
                        Err(err) => tracing::warn!(
                            sentence = %id,
                            language = grammar.code(),
                            error = %err,
                            "sentence not rendered"
                        ),
                    }
                }
                SentenceExport {
                    id: id.get(),
                    serialized: sentence.serialize(),
                    text,
                }
            })
            .collect();

        let report = LexiconReport {
            name: &snapshot.name,
            revision: snapshot.revision,
            elements,
            sentences,
        };
        serde_json::to_string_pretty(&report).map_err(|e| render_error(self.name(), e.to_string()))
    }
}
