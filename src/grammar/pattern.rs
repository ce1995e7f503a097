//! Data-driven concrete grammars.
//!
//! A [`PatternGrammar`] is an ordered list of [`Rule`]s. Each rule spells
//! one construct (statement or question) as a sequence of [`Item`]s. The
//! first rule for a construct is the one used for linearization; later
//! rules for the same construct are accepted on parse only (English plural
//! subsumption, passive voice). Parsing collects every reading of the input
//! over all rules and all splits of multi-word lexicon entries; input with
//! more than one distinct reading is rejected as ambiguous.
//!
//! The built-in languages are English, German and Spanish.

use crate::element::ElementId;

use super::abs::{Construct, SentenceTree};
use super::cat::Cat;
use super::concrete::ConcreteGrammar;
use super::error::{GrammarError, GrammarResult};
use super::lexer::{LexIndex, tokenize};
use super::morpho;

/// Argument position of a construct.
///
/// `A` is the subject (sub-concept, individual), `B` the object
/// (super-concept, class, relation object) and `R` the relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    A,
    B,
    R,
}

/// One element of a rule.
#[derive(Debug, Clone, Copy)]
pub enum Item {
    /// Keyword; the first spelling is used for output, all are accepted.
    Kw(&'static [&'static str]),
    /// Punctuation mark; optional on parse.
    Punct(&'static str),
    /// Proper name, preceded by the definite article when the individual
    /// is used with "the".
    Name(Role),
    /// Element word in a fixed category.
    Word(Role, Cat),
    /// Indefinite article agreeing with the singular noun of a role.
    Indef(Role),
}

/// A sentence pattern.
#[derive(Debug, Clone)]
pub struct Rule {
    pub construct: Construct,
    pub question: bool,
    pub items: Vec<Item>,
}

impl Rule {
    pub fn new(construct: Construct, question: bool, items: Vec<Item>) -> Self {
        Self {
            construct,
            question,
            items,
        }
    }
}

/// How a language spells indefinite articles.
#[derive(Debug, Clone, Copy)]
pub enum Indefinite {
    /// English "a"/"an", chosen by the following noun.
    English,
    /// Fixed spellings; the first is used for output.
    Fixed(&'static [&'static str]),
}

/// A concrete grammar defined by sentence patterns.
#[derive(Debug, Clone)]
pub struct PatternGrammar {
    code: String,
    name: String,
    rules: Vec<Rule>,
    definite: &'static [&'static str],
    indefinite: Indefinite,
    capitalize_nouns: bool,
}

use Item::{Indef, Kw, Name, Punct, Word};
use Role::{A, B, R};

impl PatternGrammar {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        rules: Vec<Rule>,
        definite: &'static [&'static str],
        indefinite: Indefinite,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            rules,
            definite,
            indefinite,
            capitalize_nouns: false,
        }
    }

    /// Capitalize nouns in every surface form (German orthography).
    pub fn with_capitalized_nouns(mut self) -> Self {
        self.capitalize_nouns = true;
        self
    }

    /// Same grammar under another code and display name.
    pub fn renamed(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.code = code.into();
        self.name = name.into();
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Attempto-style English.
    pub fn english() -> Self {
        const IS: Item = Kw(&["is"]);
        let rules = vec![
            Rule::new(
                Construct::Subsumption,
                false,
                vec![Kw(&["every"]), Word(A, Cat::NounSg), IS, Indef(B), Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Subsumption,
                false,
                vec![Kw(&["all"]), Word(A, Cat::NounPl), Kw(&["are"]), Word(B, Cat::NounPl), Punct(".")],
            ),
            Rule::new(
                Construct::Subsumption,
                true,
                vec![IS, Kw(&["every"]), Word(A, Cat::NounSg), Indef(B), Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::Disjointness,
                false,
                vec![Kw(&["no"]), Word(A, Cat::NounSg), IS, Indef(B), Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Disjointness,
                true,
                vec![IS, Kw(&["no"]), Word(A, Cat::NounSg), Indef(B), Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::Instance,
                false,
                vec![Name(A), IS, Indef(B), Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Instance,
                true,
                vec![IS, Name(A), Indef(B), Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::NegatedInstance,
                false,
                vec![Name(A), IS, Kw(&["not"]), Indef(B), Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::NegatedInstance,
                true,
                vec![IS, Name(A), Kw(&["not"]), Indef(B), Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::VerbRelation,
                false,
                vec![Name(A), Word(R, Cat::VerbFinite), Name(B), Punct(".")],
            ),
            Rule::new(
                Construct::VerbRelation,
                false,
                vec![Name(B), IS, Word(R, Cat::VerbPastPart), Kw(&["by"]), Name(A), Punct(".")],
            ),
            Rule::new(
                Construct::VerbRelation,
                true,
                vec![Kw(&["does"]), Name(A), Word(R, Cat::VerbInf), Name(B), Punct("?")],
            ),
            Rule::new(
                Construct::AdjectiveRelation,
                false,
                vec![Name(A), IS, Word(R, Cat::TrAdj), Name(B), Punct(".")],
            ),
            Rule::new(
                Construct::AdjectiveRelation,
                true,
                vec![IS, Name(A), Word(R, Cat::TrAdj), Name(B), Punct("?")],
            ),
        ];
        Self::new("en", "English", rules, &["the"], Indefinite::English)
    }

    /// German, with capitalized nouns and verb-first questions.
    pub fn german() -> Self {
        const IST: Item = Kw(&["ist"]);
        const EIN: Item = Indef(B);
        const JEDER: Item = Kw(&["jeder", "jede", "jedes"]);
        const KEIN: Item = Kw(&["kein", "keine"]);
        let rules = vec![
            Rule::new(
                Construct::Subsumption,
                false,
                vec![JEDER, Word(A, Cat::NounSg), IST, EIN, Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Subsumption,
                false,
                vec![Kw(&["alle"]), Word(A, Cat::NounPl), Kw(&["sind"]), Word(B, Cat::NounPl), Punct(".")],
            ),
            Rule::new(
                Construct::Subsumption,
                true,
                vec![IST, JEDER, Word(A, Cat::NounSg), EIN, Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::Disjointness,
                false,
                vec![KEIN, Word(A, Cat::NounSg), IST, EIN, Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Disjointness,
                true,
                vec![IST, KEIN, Word(A, Cat::NounSg), EIN, Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::Instance,
                false,
                vec![Name(A), IST, EIN, Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Instance,
                true,
                vec![IST, Name(A), EIN, Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::NegatedInstance,
                false,
                vec![Name(A), IST, KEIN, Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::NegatedInstance,
                true,
                vec![IST, Name(A), KEIN, Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::VerbRelation,
                false,
                vec![Name(A), Word(R, Cat::VerbFinite), Name(B), Punct(".")],
            ),
            Rule::new(
                Construct::VerbRelation,
                true,
                vec![Word(R, Cat::VerbFinite), Name(A), Name(B), Punct("?")],
            ),
            Rule::new(
                Construct::AdjectiveRelation,
                false,
                vec![Name(A), IST, Word(R, Cat::TrAdj), Name(B), Punct(".")],
            ),
            Rule::new(
                Construct::AdjectiveRelation,
                true,
                vec![IST, Name(A), Word(R, Cat::TrAdj), Name(B), Punct("?")],
            ),
        ];
        Self::new(
            "de",
            "Deutsch",
            rules,
            &["der", "die", "das"],
            Indefinite::Fixed(&["ein", "eine", "einen"]),
        )
        .with_capitalized_nouns()
    }

    /// Spanish, with inverted question marks.
    pub fn spanish() -> Self {
        const ES: Item = Kw(&["es"]);
        const UN: Item = Indef(B);
        const TODO: Item = Kw(&["todo", "toda"]);
        const NINGUN: Item = Kw(&["ningún", "ningun", "ninguna"]);
        let rules = vec![
            Rule::new(
                Construct::Subsumption,
                false,
                vec![TODO, Word(A, Cat::NounSg), ES, UN, Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Subsumption,
                false,
                vec![Kw(&["todos", "todas"]), Kw(&["los", "las"]), Word(A, Cat::NounPl), Kw(&["son"]), Word(B, Cat::NounPl), Punct(".")],
            ),
            Rule::new(
                Construct::Subsumption,
                true,
                vec![Punct("¿"), ES, TODO, Word(A, Cat::NounSg), UN, Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::Disjointness,
                false,
                vec![NINGUN, Word(A, Cat::NounSg), ES, UN, Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Disjointness,
                true,
                vec![Punct("¿"), ES, NINGUN, Word(A, Cat::NounSg), UN, Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::Instance,
                false,
                vec![Name(A), ES, UN, Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::Instance,
                true,
                vec![Punct("¿"), ES, Name(A), UN, Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::NegatedInstance,
                false,
                vec![Name(A), Kw(&["no"]), ES, UN, Word(B, Cat::NounSg), Punct(".")],
            ),
            Rule::new(
                Construct::NegatedInstance,
                true,
                vec![Punct("¿"), Kw(&["no"]), ES, Name(A), UN, Word(B, Cat::NounSg), Punct("?")],
            ),
            Rule::new(
                Construct::VerbRelation,
                false,
                vec![Name(A), Word(R, Cat::VerbFinite), Name(B), Punct(".")],
            ),
            Rule::new(
                Construct::VerbRelation,
                true,
                vec![Punct("¿"), Name(A), Word(R, Cat::VerbFinite), Name(B), Punct("?")],
            ),
            Rule::new(
                Construct::AdjectiveRelation,
                false,
                vec![Name(A), ES, Word(R, Cat::TrAdj), Name(B), Punct(".")],
            ),
            Rule::new(
                Construct::AdjectiveRelation,
                true,
                vec![Punct("¿"), ES, Name(A), Word(R, Cat::TrAdj), Name(B), Punct("?")],
            ),
        ];
        Self::new("es", "Español", rules, &["el", "la"], Indefinite::Fixed(&["un", "una"]))
    }

    fn output_rule(&self, construct: Construct, question: bool) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| r.construct == construct && r.question == question)
    }

    fn lin_failed(&self, cat: Cat, message: String) -> GrammarError {
        GrammarError::LinearizationFailed {
            cat,
            language: self.code.clone(),
            message,
        }
    }

    fn surface<'a>(&self, lex: &'a LexIndex, id: ElementId, cat: Cat) -> GrammarResult<&'a str> {
        lex.surface(id, cat)
            .ok_or_else(|| self.lin_failed(cat, format!("element {id} has no {cat:?} form")))
    }

    /// Push every complete binding of `items` against `tokens[pos..]` to `out`.
    fn match_items(
        &self,
        items: &[Item],
        tokens: &[String],
        pos: usize,
        bound: Bindings,
        lex: &LexIndex,
        out: &mut Vec<Bindings>,
    ) {
        let Some((item, rest)) = items.split_first() else {
            if pos == tokens.len() {
                out.push(bound);
            }
            return;
        };
        let token = tokens.get(pos).map(String::as_str);

        match *item {
            Kw(spellings) => {
                if token.is_some_and(|t| spellings.contains(&t)) {
                    self.match_items(rest, tokens, pos + 1, bound, lex, out);
                }
            }
            Punct(p) => {
                if token == Some(p) {
                    self.match_items(rest, tokens, pos + 1, bound, lex, out);
                }
                self.match_items(rest, tokens, pos, bound, lex, out);
            }
            Indef(_) => {
                let accepted = token.is_some_and(|t| match self.indefinite {
                    Indefinite::English => t == "a" || t == "an",
                    Indefinite::Fixed(spellings) => spellings.contains(&t),
                });
                if accepted {
                    self.match_items(rest, tokens, pos + 1, bound, lex, out);
                }
            }
            Name(role) => {
                self.match_word(rest, tokens, pos, bound, lex, role, Cat::ProperName, out);
                if token.is_some_and(|t| self.definite.contains(&t)) {
                    self.match_word(rest, tokens, pos + 1, bound, lex, role, Cat::ProperName, out);
                }
            }
            Word(role, cat) => self.match_word(rest, tokens, pos, bound, lex, role, cat, out),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn match_word(
        &self,
        rest: &[Item],
        tokens: &[String],
        pos: usize,
        bound: Bindings,
        lex: &LexIndex,
        role: Role,
        cat: Cat,
        out: &mut Vec<Bindings>,
    ) {
        for (id, len) in lex.matches_at(tokens, pos, cat) {
            if let Some(bound) = bound.bind(role, id) {
                self.match_items(rest, tokens, pos + len, bound, lex, out);
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Bindings {
    a: Option<ElementId>,
    b: Option<ElementId>,
    r: Option<ElementId>,
}

impl Bindings {
    fn bind(mut self, role: Role, id: ElementId) -> Option<Self> {
        let slot = match role {
            A => &mut self.a,
            B => &mut self.b,
            R => &mut self.r,
        };
        match *slot {
            Some(existing) if existing != id => None,
            _ => {
                *slot = Some(id);
                Some(self)
            }
        }
    }

    fn get(&self, role: Role) -> Option<ElementId> {
        match role {
            A => self.a,
            B => self.b,
            R => self.r,
        }
    }

    fn assemble(&self, construct: Construct) -> Option<SentenceTree> {
        let (a, b) = (self.a?, self.b?);
        Some(match construct {
            Construct::Subsumption => SentenceTree::Subsumption { sub: a, sup: b },
            Construct::Disjointness => SentenceTree::Disjointness {
                concept: a,
                other: b,
            },
            Construct::Instance => SentenceTree::Instance {
                individual: a,
                concept: b,
            },
            Construct::NegatedInstance => SentenceTree::NegatedInstance {
                individual: a,
                concept: b,
            },
            Construct::VerbRelation | Construct::AdjectiveRelation => SentenceTree::Relation {
                subject: a,
                relation: self.r?,
                object: b,
            },
        })
    }

    fn from_tree(tree: &SentenceTree) -> Self {
        let (a, b, r) = match *tree {
            SentenceTree::Subsumption { sub, sup } => (sub, sup, None),
            SentenceTree::Disjointness { concept, other } => (concept, other, None),
            SentenceTree::Instance {
                individual,
                concept,
            }
            | SentenceTree::NegatedInstance {
                individual,
                concept,
            } => (individual, concept, None),
            SentenceTree::Relation {
                subject,
                relation,
                object,
            } => (subject, object, Some(relation)),
        };
        Self {
            a: Some(a),
            b: Some(b),
            r,
        }
    }
}

fn is_opening(p: &str) -> bool {
    matches!(p, "¿" | "¡")
}

/// Join output pieces, attaching punctuation, and capitalize the first letter.
fn join_pieces(pieces: &[(String, bool)]) -> String {
    let mut out = String::new();
    let mut glue_next = false;
    for (piece, is_punct) in pieces {
        let attach = *is_punct && !is_opening(piece);
        if !out.is_empty() && !attach && !glue_next {
            out.push(' ');
        }
        out.push_str(piece);
        glue_next = *is_punct && is_opening(piece);
    }
    match out.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((i, _)) => format!("{}{}", &out[..i], morpho::capitalize(&out[i..])),
        None => out,
    }
}

impl ConcreteGrammar for PatternGrammar {
    fn code(&self) -> &str {
        &self.code
    }

    fn language_name(&self) -> &str {
        &self.name
    }

    fn inflect(&self, cat: Cat, word: &str) -> String {
        let pretty = crate::word::pretty(word);
        if self.capitalize_nouns && matches!(cat, Cat::NounSg | Cat::NounPl) {
            morpho::capitalize_words(&pretty)
        } else {
            pretty
        }
    }

    fn linearize(&self, tree: &SentenceTree, question: bool, lex: &LexIndex) -> GrammarResult<String> {
        let construct = tree.validate(|id| lex.kind_of(id))?;
        let rule = self.output_rule(construct, question).ok_or_else(|| {
            self.lin_failed(
                Cat::NounSg,
                format!("no rule for {construct:?} (question: {question})"),
            )
        })?;
        let bound = Bindings::from_tree(tree);
        let arg = |role: Role, cat: Cat| {
            bound
                .get(role)
                .ok_or_else(|| self.lin_failed(cat, format!("missing {role:?} argument")))
        };

        let mut pieces: Vec<(String, bool)> = Vec::with_capacity(rule.items.len() + 2);
        for item in &rule.items {
            match *item {
                Kw(spellings) => pieces.push((spellings[0].to_string(), false)),
                Punct(p) => pieces.push((p.to_string(), true)),
                Indef(role) => {
                    let article = match self.indefinite {
                        Indefinite::English => {
                            let noun = self.surface(lex, arg(role, Cat::NounSg)?, Cat::NounSg)?;
                            morpho::article(noun)
                        }
                        Indefinite::Fixed(spellings) => spellings[0],
                    };
                    pieces.push((article.to_string(), false));
                }
                Name(role) => {
                    let id = arg(role, Cat::ProperName)?;
                    if lex.is_definite(id) {
                        if let Some(article) = self.definite.first() {
                            pieces.push((article.to_string(), false));
                        }
                    }
                    pieces.push((self.surface(lex, id, Cat::ProperName)?.to_string(), false));
                }
                Word(role, cat) => {
                    let id = arg(role, cat)?;
                    pieces.push((self.surface(lex, id, cat)?.to_string(), false));
                }
            }
        }
        Ok(join_pieces(&pieces))
    }

    fn parse(&self, input: &str, lex: &LexIndex) -> GrammarResult<(SentenceTree, bool)> {
        let tokens = tokenize(input);
        let mut readings: Vec<(SentenceTree, bool)> = Vec::new();
        let mut matches = Vec::new();
        if !tokens.is_empty() {
            for rule in &self.rules {
                matches.clear();
                self.match_items(&rule.items, &tokens, 0, Bindings::default(), lex, &mut matches);
                for tree in matches.iter().filter_map(|b| b.assemble(rule.construct)) {
                    let reading = (tree, rule.question);
                    if !readings.contains(&reading) {
                        readings.push(reading);
                    }
                }
            }
        }

        match readings.as_slice() {
            [reading] => Ok(*reading),
            [] => Err(GrammarError::ParseFailed {
                input: input.to_string(),
                language: self.code.clone(),
            }),
            _ => {
                tracing::debug!(language = %self.code, input, readings = ?readings, "ambiguous sentence");
                Err(GrammarError::AmbiguousParse {
                    input: input.to_string(),
                    language: self.code.clone(),
                    readings: readings.len(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, LexiconValue, OntologyElement};

    fn id(raw: u64) -> ElementId {
        ElementId::new(raw).unwrap()
    }

    fn element(raw: u64, kind: ElementKind, values: Vec<LexiconValue>) -> OntologyElement {
        let mut el = OntologyElement::new(id(raw), kind);
        el.set_values(values);
        el
    }

    fn lexicon() -> Vec<OntologyElement> {
        vec![
            element(1, ElementKind::Concept, vec!["man".into(), "men".into()]),
            element(2, ElementKind::Concept, vec!["human".into(), "humans".into()]),
            element(3, ElementKind::Concept, vec!["animal".into(), "animals".into()]),
            element(4, ElementKind::Individual, vec!["Mary".into(), false.into()]),
            element(5, ElementKind::Individual, vec!["John".into(), false.into()]),
            element(6, ElementKind::Individual, vec!["Nile".into(), true.into()]),
            element(
                7,
                ElementKind::Relation,
                vec!["likes".into(), "like".into(), "liked".into()],
            ),
            element(8, ElementKind::TransitiveAdjective, vec!["located_in".into()]),
            element(9, ElementKind::Individual, vec!["New_York".into(), false.into()]),
            element(10, ElementKind::Concept, vec!["ice_cream".into(), "ice_creams".into()]),
        ]
    }

    fn index(grammar: &PatternGrammar) -> LexIndex {
        LexIndex::build(grammar, 1, &lexicon())
    }

    #[test]
    fn english_linearization() {
        let en = PatternGrammar::english();
        let lex = index(&en);

        let every = SentenceTree::Subsumption { sub: id(1), sup: id(3) };
        assert_eq!(en.linearize(&every, false, &lex).unwrap(), "Every man is an animal.");

        let nile = SentenceTree::Instance {
            individual: id(6),
            concept: id(3),
        };
        assert_eq!(en.linearize(&nile, false, &lex).unwrap(), "The Nile is an animal.");
        assert_eq!(en.linearize(&nile, true, &lex).unwrap(), "Is the Nile an animal?");

        let likes = SentenceTree::Relation {
            subject: id(4),
            relation: id(7),
            object: id(5),
        };
        assert_eq!(en.linearize(&likes, false, &lex).unwrap(), "Mary likes John.");
        assert_eq!(en.linearize(&likes, true, &lex).unwrap(), "Does Mary like John?");

        let located = SentenceTree::Relation {
            subject: id(9),
            relation: id(8),
            object: id(6),
        };
        assert_eq!(
            en.linearize(&located, false, &lex).unwrap(),
            "New York is located in the Nile."
        );
    }

    #[test]
    fn english_parse() {
        let en = PatternGrammar::english();
        let lex = index(&en);

        let (tree, q) = en.parse("Every man is a human.", &lex).unwrap();
        assert_eq!(tree, SentenceTree::Subsumption { sub: id(1), sup: id(2) });
        assert!(!q);

        let (tree, q) = en.parse("is Mary not a man?", &lex).unwrap();
        assert_eq!(
            tree,
            SentenceTree::NegatedInstance {
                individual: id(4),
                concept: id(1)
            }
        );
        assert!(q);

        // Final punctuation is optional.
        let (tree, _) = en.parse("New York is located in Mary", &lex).unwrap();
        assert!(matches!(tree, SentenceTree::Relation { subject, .. } if subject == id(9)));
    }

    #[test]
    fn english_parse_only_rules() {
        let en = PatternGrammar::english();
        let lex = index(&en);

        let (tree, _) = en.parse("All men are humans.", &lex).unwrap();
        assert_eq!(tree, SentenceTree::Subsumption { sub: id(1), sup: id(2) });

        let (tree, _) = en.parse("John is liked by Mary.", &lex).unwrap();
        assert_eq!(
            tree,
            SentenceTree::Relation {
                subject: id(4),
                relation: id(7),
                object: id(5)
            }
        );
    }

    #[test]
    fn english_parse_failures() {
        let en = PatternGrammar::english();
        let lex = index(&en);
        for bad in ["", "Every man is a", "Every dog is a human.", "Mary is a John.", "Mary likes John. Extra"] {
            assert!(
                matches!(en.parse(bad, &lex), Err(GrammarError::ParseFailed { .. })),
                "parsed {bad:?}"
            );
        }
    }

    #[test]
    fn german_capitalizes_nouns() {
        let de = PatternGrammar::german();
        let lex = index(&de);
        let tree = SentenceTree::Subsumption { sub: id(10), sup: id(2) };
        assert_eq!(de.linearize(&tree, false, &lex).unwrap(), "Jeder Ice Cream ist ein Human.");
        let (parsed, _) = de.parse("jede ice cream ist eine human", &lex).unwrap();
        assert_eq!(parsed, tree);

        let likes = SentenceTree::Relation {
            subject: id(4),
            relation: id(7),
            object: id(5),
        };
        assert_eq!(de.linearize(&likes, true, &lex).unwrap(), "Likes Mary John?");
    }

    #[test]
    fn spanish_questions() {
        let es = PatternGrammar::spanish();
        let lex = index(&es);
        let tree = SentenceTree::Instance {
            individual: id(4),
            concept: id(1),
        };
        let text = es.linearize(&tree, true, &lex).unwrap();
        assert_eq!(text, "¿Es Mary un man?");
        assert_eq!(es.parse(&text, &lex).unwrap(), (tree, true));

        let none = SentenceTree::Disjointness {
            concept: id(1),
            other: id(3),
        };
        assert_eq!(es.linearize(&none, false, &lex).unwrap(), "Ningún man es un animal.");
    }

    #[test]
    fn linearize_missing_form_fails() {
        let en = PatternGrammar::english();
        let mut elements = lexicon();
        elements.push(element(
            11,
            ElementKind::Relation,
            vec!["owns".into(), "own".into(), "".into()],
        ));
        let lex = LexIndex::build(&en, 1, &elements);
        let tree = SentenceTree::Relation {
            subject: id(4),
            relation: id(11),
            object: id(5),
        };
        assert_eq!(en.linearize(&tree, false, &lex).unwrap(), "Mary owns John.");
        // The passive needs the past participle, which is unset.
        assert!(en.parse("John is owned by Mary.", &lex).is_err());
    }

    #[test]
    fn round_trip_every_rule_output() {
        for grammar in [PatternGrammar::english(), PatternGrammar::german(), PatternGrammar::spanish()] {
            let lex = index(&grammar);
            let trees = [
                SentenceTree::Subsumption { sub: id(1), sup: id(2) },
                SentenceTree::Disjointness {
                    concept: id(1),
                    other: id(10),
                },
                SentenceTree::Instance {
                    individual: id(6),
                    concept: id(3),
                },
                SentenceTree::NegatedInstance {
                    individual: id(4),
                    concept: id(1),
                },
                SentenceTree::Relation {
                    subject: id(4),
                    relation: id(7),
                    object: id(9),
                },
                SentenceTree::Relation {
                    subject: id(9),
                    relation: id(8),
                    object: id(6),
                },
            ];
            for tree in trees {
                for question in [false, true] {
                    let text = grammar.linearize(&tree, question, &lex).unwrap();
                    let parsed = grammar.parse(&text, &lex).unwrap();
                    assert_eq!(parsed, (tree, question), "{}: {text}", grammar.code());
                }
            }
        }
    }

    #[test]
    fn every_keyword_spelling_is_reserved() {
        for grammar in [PatternGrammar::english(), PatternGrammar::german(), PatternGrammar::spanish()] {
            let mut spellings: Vec<&str> = grammar.definite.to_vec();
            match grammar.indefinite {
                Indefinite::English => spellings.extend(["a", "an"]),
                Indefinite::Fixed(fixed) => spellings.extend(fixed),
            }
            for rule in grammar.rules() {
                for item in &rule.items {
                    if let Kw(kw) = item {
                        spellings.extend(kw.iter());
                    }
                }
            }
            for spelling in spellings {
                assert!(
                    crate::word::is_function_word(spelling),
                    "{}: keyword {spelling:?} is not reserved",
                    grammar.code()
                );
            }
        }
    }

    #[test]
    fn keyword_name_makes_text_ambiguous_not_wrong() {
        let en = PatternGrammar::english();
        let mut elements = lexicon();
        elements.push(element(11, ElementKind::Individual, vec!["every_man".into(), false.into()]));
        let lex = LexIndex::build(&en, 1, &elements);

        let tree = SentenceTree::Instance {
            individual: id(11),
            concept: id(2),
        };
        let text = en.linearize(&tree, false, &lex).unwrap();
        assert_eq!(text, "Every man is a human.");
        assert!(matches!(
            en.parse(&text, &lex),
            Err(GrammarError::AmbiguousParse { readings: 2, .. })
        ));
    }

    #[test]
    fn prefix_names_round_trip() {
        let mut elements = lexicon();
        elements.push(element(11, ElementKind::Individual, vec!["New".into(), false.into()]));
        elements.push(element(12, ElementKind::Individual, vec!["York".into(), false.into()]));
        for grammar in [PatternGrammar::english(), PatternGrammar::german(), PatternGrammar::spanish()] {
            let lex = LexIndex::build(&grammar, 1, &elements);
            let trees = [
                SentenceTree::Instance {
                    individual: id(11),
                    concept: id(1),
                },
                SentenceTree::Instance {
                    individual: id(9),
                    concept: id(1),
                },
                SentenceTree::Relation {
                    subject: id(11),
                    relation: id(8),
                    object: id(9),
                },
                SentenceTree::Relation {
                    subject: id(9),
                    relation: id(7),
                    object: id(12),
                },
                SentenceTree::Relation {
                    subject: id(12),
                    relation: id(7),
                    object: id(11),
                },
            ];
            for tree in trees {
                for question in [false, true] {
                    let text = grammar.linearize(&tree, question, &lex).unwrap();
                    let parsed = grammar.parse(&text, &lex).unwrap();
                    assert_eq!(parsed, (tree, question), "{}: {text}", grammar.code());
                }
            }
        }
    }

    #[test]
    fn overlapping_names_are_reported_as_ambiguous() {
        // "New York City" splits as "New York" + "City" or "New" + "York City".
        let de = PatternGrammar::german();
        let mut elements = lexicon();
        elements.push(element(11, ElementKind::Individual, vec!["New".into(), false.into()]));
        elements.push(element(12, ElementKind::Individual, vec!["York_City".into(), false.into()]));
        elements.push(element(13, ElementKind::Individual, vec!["City".into(), false.into()]));
        let lex = LexIndex::build(&de, 1, &elements);

        let tree = SentenceTree::Relation {
            subject: id(9),
            relation: id(7),
            object: id(13),
        };
        let text = de.linearize(&tree, true, &lex).unwrap();
        assert_eq!(text, "Likes New York City?");
        assert!(matches!(
            de.parse(&text, &lex),
            Err(GrammarError::AmbiguousParse { .. })
        ));
        // The statement order keeps the verb between the names.
        let text = de.linearize(&tree, false, &lex).unwrap();
        assert_eq!(de.parse(&text, &lex).unwrap(), (tree, false));
    }
}
