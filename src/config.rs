//! Engine configuration, persisted as TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! name = "zoo"
//! base_iri = "http://example.org/zoo"
//! hidden_languages = ["es"]
//!
//! [reasoner]
//! enabled = true
//! step_budget = 50000
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::reason::saturation::DEFAULT_STEP_BUDGET;

/// Configuration for the wikilex engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ontology name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Base IRI of exported elements (`<base_iri>#<word>`).
    #[serde(default = "default_base_iri")]
    pub base_iri: String,
    /// Language codes that are not offered to users.
    #[serde(default)]
    pub hidden_languages: BTreeSet<String>,
    /// Language used when the caller does not name one.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Reject sentences that make the ontology inconsistent.
    #[serde(default = "default_true")]
    pub check_on_add: bool,
    /// Consistency re-checks before an add gives up under contention.
    #[serde(default = "default_max_commit_retries")]
    pub max_commit_retries: usize,
    #[serde(default)]
    pub reasoner: ReasonerConfig,
}

/// Settings of the built-in reasoner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Reasoning steps allowed per call.
    #[serde(default = "default_step_budget")]
    pub step_budget: usize,
}

fn default_name() -> String {
    "wiki".into()
}
fn default_base_iri() -> String {
    "http://example.org/wiki".into()
}
fn default_language() -> String {
    "en".into()
}
fn default_true() -> bool {
    true
}
fn default_step_budget() -> usize {
    DEFAULT_STEP_BUDGET
}
fn default_max_commit_retries() -> usize {
    3
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            step_budget: default_step_budget(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            base_iri: default_base_iri(),
            hidden_languages: BTreeSet::new(),
            default_language: default_language(),
            reasoner: ReasonerConfig::default(),
            check_on_add: true,
            max_commit_retries: default_max_commit_retries(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        toml::from_str(content).map_err(|e| EngineError::ConfigParse {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| EngineError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let content = toml::to_string_pretty(self).map_err(|e| EngineError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| EngineError::ConfigWrite {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Check field values.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.default_language.trim().is_empty() {
            return Err(EngineError::InvalidConfig {
                message: "default_language must not be empty".into(),
            });
        }
        if self.reasoner.step_budget == 0 {
            return Err(EngineError::InvalidConfig {
                message: "reasoner.step_budget must be greater than 0".into(),
            });
        }
        if self.max_commit_retries == 0 {
            return Err(EngineError::InvalidConfig {
                message: "max_commit_retries must be at least 1".into(),
            });
        }
        if oxrdf::NamedNode::new(self.base_iri.as_str()).is_err() {
            return Err(EngineError::InvalidConfig {
                message: format!("base_iri \"{}\" is not a valid IRI", self.base_iri),
            });
        }
        Ok(())
    }
}
