//! wikilex CLI: controlled-language lexicon and ontology tool.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Deserialize;

use wikilex::config::EngineConfig;
use wikilex::element::{LexiconValue, SlotForm};
use wikilex::engine::Engine;

#[derive(Parser)]
#[command(name = "wikilex", version, about = "Controlled-language lexicon and ontology engine")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON lexicon: `[{"type": "noun", "words": ["man", "men"]}, ...]`.
    #[arg(long, global = true)]
    lexicon: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the visible languages.
    Languages,

    /// Parse a sentence and print its storage form.
    Parse {
        /// Language code (defaults to the configured default language).
        #[arg(long)]
        lang: Option<String>,
        text: String,
    },

    /// Render a sentence in another language.
    Translate {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: String,
        text: String,
    },

    /// Add the sentences of a file and check the ontology for consistency.
    Check {
        /// One sentence per line; `#` starts a comment line.
        sentences: PathBuf,
        #[arg(long)]
        lang: Option<String>,
    },

    /// Ask a question against the sentences of a file.
    Ask {
        sentences: PathBuf,
        question: String,
        #[arg(long)]
        lang: Option<String>,
    },

    /// Export the ontology built from a sentence file.
    Export {
        sentences: Option<PathBuf>,
        /// Exporter name.
        #[arg(long, default_value = "owl-fss")]
        format: String,
        #[arg(long)]
        lang: Option<String>,
    },

    /// Show engine info.
    Info,
}

/// One element of a JSON lexicon file.
#[derive(Debug, Deserialize)]
struct LexiconEntry {
    #[serde(rename = "type")]
    kind: String,
    words: Vec<String>,
    #[serde(default)]
    definite: bool,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config)?;
    if let Some(path) = &cli.lexicon {
        load_lexicon(&engine, path)?;
    }
    let default_lang = engine.config().default_language.clone();

    match cli.command {
        Commands::Languages => {
            for code in engine.languages() {
                let handler = engine.get_language_handler(code)?;
                println!("{code}\t{}", handler.get_language_name());
            }
        }

        Commands::Parse { lang, text } => {
            let lang = lang.unwrap_or(default_lang);
            let sentence = engine.parse(&lang, &text)?;
            println!("{}", sentence.serialize());
        }

        Commands::Translate { from, to, text } => {
            let from = from.unwrap_or(default_lang);
            let sentence = engine.parse(&from, &text)?;
            println!("{}", engine.translate(&sentence, &to)?);
        }

        Commands::Check { sentences, lang } => {
            let lang = lang.unwrap_or(default_lang);
            let rejected = load_sentences(&engine, &sentences, &lang)?;
            let report = engine.check_consistency()?;
            println!(
                "{} sentence(s) added, {rejected} rejected, ontology is {}",
                engine.sentences().len(),
                if report.consistent { "consistent" } else { "inconsistent" }
            );
        }

        Commands::Ask {
            sentences,
            question,
            lang,
        } => {
            let lang = lang.unwrap_or(default_lang);
            load_sentences(&engine, &sentences, &lang)?;
            let question = engine.parse(&lang, &question)?;
            let answer = engine.answer(&question)?;
            println!("{}", if answer.holds { "yes" } else { "unknown" });
        }

        Commands::Export {
            sentences,
            format,
            lang,
        } => {
            let lang = lang.unwrap_or(default_lang);
            if let Some(path) = sentences {
                load_sentences(&engine, &path, &lang)?;
            }
            print!("{}", engine.export(&format)?);
        }

        Commands::Info => {
            print!("{}", engine.info());
        }
    }

    Ok(())
}

fn load_lexicon(engine: &Engine, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    let entries: Vec<LexiconEntry> = serde_json::from_str(&content).into_diagnostic()?;

    for entry in entries {
        let Some(mut element) = engine.create_ontology_element(&entry.kind) else {
            miette::bail!(
                "unknown element type \"{}\" (expected one of: {})",
                entry.kind,
                engine.lexical_types().join(", ")
            );
        };
        let mut words = entry.words.into_iter();
        let values: Vec<LexiconValue> = element
            .kind()
            .spec()
            .slots
            .iter()
            .map(|slot| match slot.form {
                SlotForm::Word => LexiconValue::Word(words.next().unwrap_or_default()),
                SlotForm::Flag => LexiconValue::Flag(entry.definite),
            })
            .collect();
        engine.save_words(&mut element, 0, &values)?;
    }
    tracing::info!(path = %path.display(), elements = engine.ontology().len(), "loaded lexicon");
    Ok(())
}

/// Add every sentence of a file. Returns how many were rejected as inconsistent.
fn load_sentences(engine: &Engine, path: &Path, lang: &str) -> Result<usize> {
    let content = std::fs::read_to_string(path).into_diagnostic()?;
    let mut rejected = 0;
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let sentence = engine.parse(lang, line)?;
        match engine.add_sentence(sentence) {
            Ok(_) => {}
            Err(wikilex::error::WikiError::Engine(
                err @ wikilex::error::EngineError::InconsistentSentence { .. },
            )) => {
                eprintln!("rejected: {err}");
                rejected += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(rejected)
}
